/// Swap chain trait and descriptor

use std::any::Any;
use crate::error::Result;
use crate::renderer::TextureFormat;

/// Descriptor for creating a swap chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapChainDesc {
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
    /// Depth buffer created alongside the back buffer
    pub depth_format: Option<TextureFormat>,
}

impl Default for SwapChainDesc {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            vsync: true,
            depth_format: Some(TextureFormat::D24_UNORM_S8_UINT),
        }
    }
}

/// Window-backed presentation target
pub trait SwapChain: Send + Sync {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Back buffer format
    fn format(&self) -> TextureFormat;

    fn depth_format(&self) -> Option<TextureFormat>;

    fn has_depth_buffer(&self) -> bool {
        self.depth_format().is_some()
    }

    fn vsync(&self) -> bool;

    fn set_vsync(&mut self, vsync: bool);

    /// Resize the back buffer (and depth buffer), e.g. after a window resize
    fn resize(&mut self, width: u32, height: u32) -> Result<()>;

    /// Present the back buffer, waiting for vblank when vsync is on
    fn present(&mut self) -> Result<()>;

    /// Backend downcast access
    fn as_any(&self) -> &dyn Any;
}
