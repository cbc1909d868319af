/// Render target trait and descriptor
///
/// A render target is an offscreen texture that can be drawn into and then
/// sampled. Whether it is a color or a depth/stencil attachment follows from
/// its format.

use std::any::Any;
use crate::error::{Error, Result};
use crate::renderer::TextureFormat;

/// Output-merger attachment a target binds to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentPoint {
    Color,
    DepthStencil,
}

impl AttachmentPoint {
    pub fn for_format(format: TextureFormat) -> AttachmentPoint {
        if format.is_depth_stencil() {
            AttachmentPoint::DepthStencil
        } else {
            AttachmentPoint::Color
        }
    }
}

/// Descriptor for creating a render target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderTargetDesc {
    pub width: u32,
    pub height: u32,
    pub format: TextureFormat,
}

impl RenderTargetDesc {
    pub fn new(width: u32, height: u32, format: TextureFormat) -> Self {
        Self { width, height, format }
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidResource(format!(
                "Render target size must be non-zero (got {}x{})", self.width, self.height
            )));
        }
        Ok(())
    }
}

/// Offscreen render target
pub trait RenderTarget: Send + Sync {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    fn format(&self) -> TextureFormat;

    fn is_depth_stencil(&self) -> bool {
        self.format().is_depth_stencil()
    }

    fn attachment_point(&self) -> AttachmentPoint {
        AttachmentPoint::for_format(self.format())
    }

    fn desc(&self) -> RenderTargetDesc {
        RenderTargetDesc::new(self.width(), self.height(), self.format())
    }

    /// Backend downcast access
    fn as_any(&self) -> &dyn Any;
}
