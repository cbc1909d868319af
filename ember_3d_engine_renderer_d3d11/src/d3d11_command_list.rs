/// CommandList - D3D11 immediate-context implementation of the CommandList trait

use ember_3d_engine::ember3d::{
    Result,
    render::{
        Buffer, BufferKind, CommandList as RendererCommandList, RenderTarget, RendererStats,
        Sampler, ShaderProgram, ShaderResource, SwapChain, Viewport,
    },
    shader::ShaderStage,
};
use ember_3d_engine::{engine_bail, engine_err};
use std::any::Any;
use std::sync::Arc;
use windows::Win32::Graphics::Direct3D::D3D11_PRIMITIVE_TOPOLOGY_TRIANGLELIST;
use windows::Win32::Graphics::Direct3D11::*;
use windows::Win32::Graphics::Dxgi::Common::DXGI_FORMAT_R32_UINT;

use crate::d3d11_buffer::D3D11Buffer;
use crate::d3d11_context::GpuContext;
use crate::d3d11_render_target::D3D11RenderTarget;
use crate::d3d11_sampler::D3D11Sampler;
use crate::d3d11_shader::D3D11ShaderProgram;
use crate::d3d11_swap_chain::D3D11SwapChain;
use crate::d3d11_texture::D3D11Texture;

fn downcast<'a, T: 'static>(object: &'a dyn Any, what: &str) -> Result<&'a T> {
    object
        .downcast_ref::<T>()
        .ok_or_else(|| engine_err!("ember3d::d3d11", "{} was not created by the D3D11 renderer", what))
}

pub struct D3D11CommandList {
    ctx: Arc<GpuContext>,
    /// Highest bound shader resource slot + 1, per stage (vertex, pixel)
    bound_resource_slots: [u32; 2],
    stats: RendererStats,
}

unsafe impl Send for D3D11CommandList {}
unsafe impl Sync for D3D11CommandList {}

impl D3D11CommandList {
    pub(crate) fn new(ctx: Arc<GpuContext>) -> Self {
        Self {
            ctx,
            bound_resource_slots: [0; 2],
            stats: RendererStats::default(),
        }
    }

    pub(crate) fn stats(&self) -> RendererStats {
        self.stats
    }

    pub(crate) fn reset_stats(&mut self) {
        self.stats = RendererStats::default();
    }

    fn stage_index(stage: ShaderStage) -> usize {
        match stage {
            ShaderStage::Vertex => 0,
            ShaderStage::Pixel => 1,
        }
    }

    /// A texture still bound for sampling cannot become an output
    fn unbind_shader_resources(&mut self) {
        let [vertex, pixel] = self.bound_resource_slots;
        let empty: Vec<Option<ID3D11ShaderResourceView>> = vec![None; vertex.max(pixel) as usize];
        unsafe {
            if vertex > 0 {
                self.ctx.context.VSSetShaderResources(0, Some(&empty[..vertex as usize]));
            }
            if pixel > 0 {
                self.ctx.context.PSSetShaderResources(0, Some(&empty[..pixel as usize]));
            }
        }
        self.bound_resource_slots = [0; 2];
    }
}

impl RendererCommandList for D3D11CommandList {
    fn set_render_targets(
        &mut self,
        colors: &[&dyn RenderTarget],
        depth: Option<&dyn RenderTarget>,
    ) -> Result<()> {
        let mut views = Vec::with_capacity(colors.len());
        for target in colors {
            let target = downcast::<D3D11RenderTarget>(target.as_any(), "Render target")?;
            let Some(rtv) = target.render_target_view() else {
                engine_bail!("ember3d::d3d11", "Depth target bound as a color attachment");
            };
            views.push(Some(rtv.clone()));
        }

        let depth_view = match depth {
            Some(target) => {
                let target = downcast::<D3D11RenderTarget>(target.as_any(), "Render target")?;
                match target.depth_stencil_view() {
                    Some(dsv) => Some(dsv),
                    None => engine_bail!("ember3d::d3d11", "Color target bound as the depth attachment"),
                }
            }
            None => None,
        };

        self.unbind_shader_resources();
        unsafe {
            if views.is_empty() {
                self.ctx.context.OMSetRenderTargets(None, depth_view);
            } else {
                self.ctx.context.OMSetRenderTargets(Some(views.as_slice()), depth_view);
            }
        }
        Ok(())
    }

    fn set_swap_chain_target(&mut self, swap_chain: &dyn SwapChain) -> Result<()> {
        let swap_chain = downcast::<D3D11SwapChain>(swap_chain.as_any(), "Swap chain")?;
        let rtv = swap_chain.back_buffer_view()?;

        self.unbind_shader_resources();
        unsafe {
            self.ctx
                .context
                .OMSetRenderTargets(Some(&[Some(rtv.clone())]), swap_chain.depth_stencil_view());
        }
        Ok(())
    }

    fn clear_swap_chain(&mut self, swap_chain: &dyn SwapChain, color: [f32; 4]) -> Result<()> {
        let swap_chain = downcast::<D3D11SwapChain>(swap_chain.as_any(), "Swap chain")?;
        let rtv = swap_chain.back_buffer_view()?;
        unsafe {
            self.ctx.context.ClearRenderTargetView(rtv, &color);
            if let Some(dsv) = swap_chain.depth_stencil_view() {
                self.ctx.context.ClearDepthStencilView(
                    dsv,
                    (D3D11_CLEAR_DEPTH.0 | D3D11_CLEAR_STENCIL.0) as u32,
                    1.0,
                    0,
                );
            }
        }
        Ok(())
    }

    fn clear_color(&mut self, target: &dyn RenderTarget, color: [f32; 4]) -> Result<()> {
        let target = downcast::<D3D11RenderTarget>(target.as_any(), "Render target")?;
        let Some(rtv) = target.render_target_view() else {
            engine_bail!("ember3d::d3d11", "clear_color called on a depth target");
        };
        unsafe {
            self.ctx.context.ClearRenderTargetView(rtv, &color);
        }
        Ok(())
    }

    fn clear_depth_stencil(&mut self, target: &dyn RenderTarget, depth: f32, stencil: u8) -> Result<()> {
        let has_stencil = target.format().has_stencil();
        let target = downcast::<D3D11RenderTarget>(target.as_any(), "Render target")?;
        let Some(dsv) = target.depth_stencil_view() else {
            engine_bail!("ember3d::d3d11", "clear_depth_stencil called on a color target");
        };

        let mut flags = D3D11_CLEAR_DEPTH.0;
        if has_stencil {
            flags |= D3D11_CLEAR_STENCIL.0;
        }
        unsafe {
            self.ctx.context.ClearDepthStencilView(dsv, flags as u32, depth, stencil);
        }
        Ok(())
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        let native = D3D11_VIEWPORT {
            TopLeftX: viewport.x,
            TopLeftY: viewport.y,
            Width: viewport.width,
            Height: viewport.height,
            MinDepth: viewport.min_depth,
            MaxDepth: viewport.max_depth,
        };
        unsafe {
            self.ctx.context.RSSetViewports(Some(&[native]));
        }
    }

    fn set_vertex_buffer(&mut self, buffer: &dyn Buffer) -> Result<()> {
        let BufferKind::Vertex { stride } = buffer.info().kind else {
            engine_bail!("ember3d::d3d11", "{:?} buffer bound as a vertex buffer", buffer.info().kind);
        };
        let buffer = downcast::<D3D11Buffer>(buffer.as_any(), "Buffer")?;
        let offset = 0u32;
        unsafe {
            self.ctx.context.IASetVertexBuffers(
                0,
                1,
                Some(&Some(buffer.buffer.clone())),
                Some(&stride),
                Some(&offset),
            );
        }
        Ok(())
    }

    fn set_index_buffer(&mut self, buffer: &dyn Buffer) -> Result<()> {
        if buffer.info().kind != BufferKind::Index {
            engine_bail!("ember3d::d3d11", "{:?} buffer bound as an index buffer", buffer.info().kind);
        }
        let buffer = downcast::<D3D11Buffer>(buffer.as_any(), "Buffer")?;
        unsafe {
            self.ctx.context.IASetIndexBuffer(&buffer.buffer, DXGI_FORMAT_R32_UINT, 0);
        }
        Ok(())
    }

    fn set_shader_program(&mut self, program: &dyn ShaderProgram) -> Result<()> {
        let program = downcast::<D3D11ShaderProgram>(program.as_any(), "Shader program")?;
        unsafe {
            let context = &self.ctx.context;
            context.IASetPrimitiveTopology(D3D11_PRIMITIVE_TOPOLOGY_TRIANGLELIST);
            context.IASetInputLayout(program.input_layout.as_ref());
            context.VSSetShader(&program.vertex_shader, None);
            context.PSSetShader(program.pixel_shader.as_ref(), None);
            context.RSSetState(&program.rasterizer_state);
            context.OMSetDepthStencilState(&program.depth_stencil_state, 0);
        }
        Ok(())
    }

    fn bind_constant_buffer(&mut self, stage: ShaderStage, slot: u32, buffer: &dyn Buffer) -> Result<()> {
        let buffer = downcast::<D3D11Buffer>(buffer.as_any(), "Buffer")?;
        let buffers = [Some(buffer.buffer.clone())];
        unsafe {
            match stage {
                ShaderStage::Vertex => self.ctx.context.VSSetConstantBuffers(slot, Some(&buffers)),
                ShaderStage::Pixel => self.ctx.context.PSSetConstantBuffers(slot, Some(&buffers)),
            }
        }
        Ok(())
    }

    fn bind_shader_resource(&mut self, stage: ShaderStage, slot: u32, resource: ShaderResource<'_>) -> Result<()> {
        let srv = match resource {
            ShaderResource::Texture(texture) => {
                downcast::<D3D11Texture>(texture.as_any(), "Texture")?.srv.clone()
            }
            ShaderResource::RenderTarget(target) => {
                downcast::<D3D11RenderTarget>(target.as_any(), "Render target")?.srv.clone()
            }
            ShaderResource::StructuredBuffer(buffer) => {
                let buffer = downcast::<D3D11Buffer>(buffer.as_any(), "Buffer")?;
                match &buffer.srv {
                    Some(srv) => srv.clone(),
                    None => engine_bail!("ember3d::d3d11", "{:?} buffer bound as a structured buffer", buffer.info().kind),
                }
            }
        };

        let views = [Some(srv)];
        unsafe {
            match stage {
                ShaderStage::Vertex => self.ctx.context.VSSetShaderResources(slot, Some(&views)),
                ShaderStage::Pixel => self.ctx.context.PSSetShaderResources(slot, Some(&views)),
            }
        }

        let bound = &mut self.bound_resource_slots[Self::stage_index(stage)];
        *bound = (*bound).max(slot + 1);
        Ok(())
    }

    fn bind_sampler(&mut self, stage: ShaderStage, slot: u32, sampler: &dyn Sampler) -> Result<()> {
        let sampler = downcast::<D3D11Sampler>(sampler.as_any(), "Sampler")?;
        let states = [Some(sampler.state.clone())];
        unsafe {
            match stage {
                ShaderStage::Vertex => self.ctx.context.VSSetSamplers(slot, Some(&states)),
                ShaderStage::Pixel => self.ctx.context.PSSetSamplers(slot, Some(&states)),
            }
        }
        Ok(())
    }

    fn draw_indexed(&mut self, index_count: u32, first_index: u32, base_vertex: i32) -> Result<()> {
        unsafe {
            self.ctx.context.DrawIndexed(index_count, first_index, base_vertex);
        }
        self.stats.record_draw(index_count);
        Ok(())
    }
}
