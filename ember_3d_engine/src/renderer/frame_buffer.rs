/// FrameBuffer - a set of color targets plus at most one depth/stencil target

use std::sync::Arc;
use crate::error::Result;
use crate::renderer::{RenderTarget, RenderTargetDesc, Renderer};

pub struct FrameBuffer {
    color_targets: Vec<Arc<dyn RenderTarget>>,
    depth_target: Option<Arc<dyn RenderTarget>>,
}

impl FrameBuffer {
    /// Sort targets into color and depth attachments by format
    ///
    /// Color targets keep their order. Only the first depth/stencil target is
    /// kept; later ones are reported and dropped.
    pub fn new(targets: Vec<Arc<dyn RenderTarget>>) -> FrameBuffer {
        let mut color_targets = Vec::new();
        let mut depth_target: Option<Arc<dyn RenderTarget>> = None;

        for target in targets {
            if !target.is_depth_stencil() {
                color_targets.push(target);
            } else if depth_target.is_none() {
                depth_target = Some(target);
            } else {
                crate::engine_warn!("ember3d::FrameBuffer",
                    "FrameBuffer already has a depth texture, dropping {:?} target",
                    target.format());
            }
        }

        FrameBuffer { color_targets, depth_target }
    }

    pub fn color_targets(&self) -> &[Arc<dyn RenderTarget>] {
        &self.color_targets
    }

    pub fn depth_target(&self) -> Option<&Arc<dyn RenderTarget>> {
        self.depth_target.as_ref()
    }

    pub fn has_depth_target(&self) -> bool {
        self.depth_target.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.color_targets.is_empty() && self.depth_target.is_none()
    }

    fn first_target(&self) -> Option<&Arc<dyn RenderTarget>> {
        self.color_targets.first().or(self.depth_target.as_ref())
    }

    /// Width of the first attachment, 0 when empty
    pub fn width(&self) -> u32 {
        self.first_target().map(|t| t.width()).unwrap_or(0)
    }

    /// Height of the first attachment, 0 when empty
    pub fn height(&self) -> u32 {
        self.first_target().map(|t| t.height()).unwrap_or(0)
    }

    /// Recreate every attachment at the new size, keeping formats
    pub fn resize(&mut self, renderer: &mut dyn Renderer, width: u32, height: u32) -> Result<()> {
        let mut recreate = |target: &Arc<dyn RenderTarget>| {
            renderer.create_render_target(RenderTargetDesc::new(width, height, target.format()))
        };

        let color_targets = self.color_targets.iter().map(&mut recreate).collect::<Result<Vec<_>>>()?;
        let depth_target = self.depth_target.as_ref().map(&mut recreate).transpose()?;

        self.color_targets = color_targets;
        self.depth_target = depth_target;
        Ok(())
    }
}

#[cfg(test)]
#[path = "frame_buffer_tests.rs"]
mod tests;
