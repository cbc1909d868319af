/// CommandList trait - immediate-mode native binding and draw calls
///
/// `RenderCommand` builds on these primitives; backends implement them
/// directly on top of the native device context.

use crate::error::Result;
use crate::renderer::{Buffer, RenderTarget, Sampler, ShaderProgram, SwapChain, Texture};
use crate::shader::ShaderStage;

/// Viewport rectangle and depth range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub min_depth: f32,
    pub max_depth: f32,
}

impl Viewport {
    /// Viewport covering `width` x `height` at (`x`, `y`), depth range [0, 1]
    pub fn new(width: u32, height: u32, x: i32, y: i32) -> Self {
        Self {
            x: x as f32,
            y: y as f32,
            width: width as f32,
            height: height as f32,
            min_depth: 0.0,
            max_depth: 1.0,
        }
    }

    pub fn from_size(width: u32, height: u32) -> Self {
        Self::new(width, height, 0, 0)
    }
}

/// Resource bound through a shader resource view (t register)
#[derive(Clone, Copy)]
pub enum ShaderResource<'a> {
    Texture(&'a dyn Texture),
    /// Render target sampled as a texture, depth targets expose their depth channel
    RenderTarget(&'a dyn RenderTarget),
    StructuredBuffer(&'a dyn Buffer),
}

/// Immediate command list
pub trait CommandList {
    /// Bind color targets and an optional depth/stencil target
    fn set_render_targets(
        &mut self,
        colors: &[&dyn RenderTarget],
        depth: Option<&dyn RenderTarget>,
    ) -> Result<()>;

    /// Bind the swap chain back buffer and its depth buffer, if any
    fn set_swap_chain_target(&mut self, swap_chain: &dyn SwapChain) -> Result<()>;

    /// Clear the back buffer to `color` and its depth buffer to 1
    fn clear_swap_chain(&mut self, swap_chain: &dyn SwapChain, color: [f32; 4]) -> Result<()>;

    fn clear_color(&mut self, target: &dyn RenderTarget, color: [f32; 4]) -> Result<()>;

    fn clear_depth_stencil(&mut self, target: &dyn RenderTarget, depth: f32, stencil: u8) -> Result<()>;

    fn set_viewport(&mut self, viewport: Viewport);

    fn set_vertex_buffer(&mut self, buffer: &dyn Buffer) -> Result<()>;

    fn set_index_buffer(&mut self, buffer: &dyn Buffer) -> Result<()>;

    /// Bind input layout, stages, rasterizer and depth/stencil state
    fn set_shader_program(&mut self, program: &dyn ShaderProgram) -> Result<()>;

    fn bind_constant_buffer(&mut self, stage: ShaderStage, slot: u32, buffer: &dyn Buffer) -> Result<()>;

    fn bind_shader_resource(&mut self, stage: ShaderStage, slot: u32, resource: ShaderResource<'_>) -> Result<()>;

    fn bind_sampler(&mut self, stage: ShaderStage, slot: u32, sampler: &dyn Sampler) -> Result<()>;

    /// Draw indexed triangles from the bound buffers
    fn draw_indexed(&mut self, index_count: u32, first_index: u32, base_vertex: i32) -> Result<()>;
}
