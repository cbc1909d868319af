/// RenderCommand - backend-agnostic binding and draw helpers
///
/// Stateless functions over a `CommandList`. Resources are bound through a
/// shader's bind points, so callers never hardcode register slots: a bind
/// point visible to both stages is bound at its vertex slot and at its pixel
/// slot.

use glam::Vec4;

use crate::error::Result;
use crate::renderer::{
    AttachmentPoint, Buffer, BufferKind, CommandList, FrameBuffer, RenderTarget,
    ShaderResource, SwapChain, Texture, Viewport,
};
use crate::resource::Mesh;
use crate::shader::{BindPoint, BindingKind, Shader};

pub struct RenderCommand;

impl RenderCommand {
    // ===== TARGETS =====

    /// Draw to the swap chain back buffer, viewport covering the whole window
    pub fn set_swap_chain(cmd: &mut dyn CommandList, swap_chain: &dyn SwapChain) -> Result<()> {
        cmd.set_swap_chain_target(swap_chain)?;
        cmd.set_viewport(Viewport::from_size(swap_chain.width(), swap_chain.height()));
        Ok(())
    }

    pub fn clear_swap_chain(cmd: &mut dyn CommandList, swap_chain: &dyn SwapChain, color: Vec4) -> Result<()> {
        cmd.clear_swap_chain(swap_chain, color.to_array())
    }

    /// Draw to a single offscreen target
    ///
    /// A depth-format target is bound as the depth/stencil attachment with no
    /// color output, any other format as the only color attachment.
    pub fn set_render_target(cmd: &mut dyn CommandList, target: &dyn RenderTarget) -> Result<()> {
        match target.attachment_point() {
            AttachmentPoint::Color => cmd.set_render_targets(&[target], None)?,
            AttachmentPoint::DepthStencil => cmd.set_render_targets(&[], Some(target))?,
        }
        cmd.set_viewport(Viewport::from_size(target.width(), target.height()));
        Ok(())
    }

    /// Clear a target
    ///
    /// Depth targets are cleared with `color.x` as depth and `color.y` as stencil.
    pub fn clear_render_target(cmd: &mut dyn CommandList, target: &dyn RenderTarget, color: Vec4) -> Result<()> {
        match target.attachment_point() {
            AttachmentPoint::Color => cmd.clear_color(target, color.to_array()),
            AttachmentPoint::DepthStencil => {
                let stencil = color.y.clamp(0.0, 255.0) as u8;
                cmd.clear_depth_stencil(target, color.x, stencil)
            }
        }
    }

    /// Draw to all attachments of a frame buffer, viewport sized from its first target
    pub fn set_frame_buffer(cmd: &mut dyn CommandList, frame_buffer: &FrameBuffer) -> Result<()> {
        if frame_buffer.is_empty() {
            crate::engine_bail!("ember3d::RenderCommand", "Cannot bind an empty frame buffer");
        }
        let colors: Vec<&dyn RenderTarget> = frame_buffer.color_targets().iter().map(|t| t.as_ref()).collect();
        let depth = frame_buffer.depth_target().map(|t| t.as_ref());
        cmd.set_render_targets(&colors, depth)?;
        cmd.set_viewport(Viewport::from_size(frame_buffer.width(), frame_buffer.height()));
        Ok(())
    }

    /// Clear every color attachment to `color` and the depth attachment to `depth`
    pub fn clear_frame_buffer(cmd: &mut dyn CommandList, frame_buffer: &FrameBuffer, color: Vec4, depth: f32) -> Result<()> {
        for target in frame_buffer.color_targets() {
            cmd.clear_color(target.as_ref(), color.to_array())?;
        }
        if let Some(target) = frame_buffer.depth_target() {
            cmd.clear_depth_stencil(target.as_ref(), depth, 0)?;
        }
        Ok(())
    }

    pub fn set_viewport(cmd: &mut dyn CommandList, width: u32, height: u32, x: i32, y: i32) {
        cmd.set_viewport(Viewport::new(width, height, x, y));
    }

    // ===== GEOMETRY =====

    pub fn set_vertex_buffer(cmd: &mut dyn CommandList, buffer: &dyn Buffer) -> Result<()> {
        cmd.set_vertex_buffer(buffer)
    }

    pub fn set_index_buffer(cmd: &mut dyn CommandList, buffer: &dyn Buffer) -> Result<()> {
        cmd.set_index_buffer(buffer)
    }

    pub fn set_mesh(cmd: &mut dyn CommandList, mesh: &Mesh) -> Result<()> {
        cmd.set_vertex_buffer(mesh.vertex_buffer().as_ref())?;
        cmd.set_index_buffer(mesh.index_buffer().as_ref())
    }

    pub fn draw_indexed(cmd: &mut dyn CommandList, index_count: u32) -> Result<()> {
        cmd.draw_indexed(index_count, 0, 0)
    }

    pub fn draw_mesh(cmd: &mut dyn CommandList, mesh: &Mesh) -> Result<()> {
        Self::set_mesh(cmd, mesh)?;
        Self::draw_indexed(cmd, mesh.index_count())
    }

    // ===== SHADER AND RESOURCES =====

    /// Bind the shader program and each of its resolved static samplers
    pub fn set_shader(cmd: &mut dyn CommandList, shader: &Shader) -> Result<()> {
        cmd.set_shader_program(shader.program().as_ref())?;
        for sampler in shader.samplers() {
            if let Some((stage, slot)) = sampler.binding() {
                cmd.bind_sampler(stage, slot, sampler.sampler.as_ref())?;
            }
        }
        Ok(())
    }

    pub fn set_constant_buffer(cmd: &mut dyn CommandList, bind_point: &BindPoint, buffer: &dyn Buffer) -> Result<()> {
        Self::expect_kind(bind_point, BindingKind::ConstantBuffer)?;
        if buffer.info().kind != BufferKind::Constant {
            crate::engine_bail!("ember3d::RenderCommand",
                "Expected a constant buffer, got {:?}", buffer.info().kind);
        }
        for (stage, slot) in bind_point.stage_slots() {
            cmd.bind_constant_buffer(stage, slot, buffer)?;
        }
        Ok(())
    }

    pub fn set_structured_buffer(cmd: &mut dyn CommandList, bind_point: &BindPoint, buffer: &dyn Buffer) -> Result<()> {
        Self::expect_kind(bind_point, BindingKind::StructuredBuffer)?;
        if !matches!(buffer.info().kind, BufferKind::Structured { .. }) {
            crate::engine_bail!("ember3d::RenderCommand",
                "Expected a structured buffer, got {:?}", buffer.info().kind);
        }
        Self::bind_resource(cmd, bind_point, ShaderResource::StructuredBuffer(buffer))
    }

    pub fn set_texture(cmd: &mut dyn CommandList, bind_point: &BindPoint, texture: &dyn Texture) -> Result<()> {
        Self::expect_kind(bind_point, BindingKind::Texture)?;
        Self::bind_resource(cmd, bind_point, ShaderResource::Texture(texture))
    }

    /// Sample a render target; depth targets are read through their depth channel
    pub fn set_render_target_texture(cmd: &mut dyn CommandList, bind_point: &BindPoint, target: &dyn RenderTarget) -> Result<()> {
        Self::expect_kind(bind_point, BindingKind::Texture)?;
        Self::bind_resource(cmd, bind_point, ShaderResource::RenderTarget(target))
    }

    // ===== BY NAME =====

    /// Bind a constant buffer by its `cbuffer` name
    ///
    /// A name the shader does not use is reported and skipped.
    pub fn set_constant_buffer_by_name(cmd: &mut dyn CommandList, shader: &Shader, name: &str, buffer: &dyn Buffer) -> Result<()> {
        match Self::lookup(shader, name) {
            Some(bind_point) => Self::set_constant_buffer(cmd, bind_point, buffer),
            None => Ok(()),
        }
    }

    pub fn set_structured_buffer_by_name(cmd: &mut dyn CommandList, shader: &Shader, name: &str, buffer: &dyn Buffer) -> Result<()> {
        match Self::lookup(shader, name) {
            Some(bind_point) => Self::set_structured_buffer(cmd, bind_point, buffer),
            None => Ok(()),
        }
    }

    pub fn set_texture_by_name(cmd: &mut dyn CommandList, shader: &Shader, name: &str, texture: &dyn Texture) -> Result<()> {
        match Self::lookup(shader, name) {
            Some(bind_point) => Self::set_texture(cmd, bind_point, texture),
            None => Ok(()),
        }
    }

    pub fn set_render_target_texture_by_name(cmd: &mut dyn CommandList, shader: &Shader, name: &str, target: &dyn RenderTarget) -> Result<()> {
        match Self::lookup(shader, name) {
            Some(bind_point) => Self::set_render_target_texture(cmd, bind_point, target),
            None => Ok(()),
        }
    }

    // ===== INTERNAL =====

    fn lookup<'a>(shader: &'a Shader, name: &str) -> Option<&'a BindPoint> {
        let bind_point = shader.bind_point(name);
        if bind_point.is_none() {
            crate::engine_warn!("ember3d::RenderCommand",
                "Shader has no bind point named '{}'", name);
        }
        bind_point
    }

    fn expect_kind(bind_point: &BindPoint, kind: BindingKind) -> Result<()> {
        if bind_point.kind != kind {
            crate::engine_bail!("ember3d::RenderCommand",
                "Bind point is a {:?}, cannot bind a {:?} to it", bind_point.kind, kind);
        }
        Ok(())
    }

    fn bind_resource(cmd: &mut dyn CommandList, bind_point: &BindPoint, resource: ShaderResource<'_>) -> Result<()> {
        for (stage, slot) in bind_point.stage_slots() {
            cmd.bind_shader_resource(stage, slot, resource)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "render_command_tests.rs"]
mod tests;
