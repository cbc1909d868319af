/// D3D11Renderer - Direct3D 11 implementation of the Renderer trait

use ember_3d_engine::ember3d::{
    Error,
    Result,
    render::{
        Buffer, BufferDesc, CommandList, RenderTarget, RenderTargetDesc, Renderer, RendererConfig,
        RendererStats, Sampler, SamplerDesc, ShaderProgram, SwapChain, SwapChainDesc, Texture,
        TextureDesc,
    },
    shader::{CompiledShader, StageCompiler},
};
use ember_3d_engine::{engine_debug, engine_error, engine_info, engine_warn};
use std::sync::Arc;
use windows::Win32::Foundation::HMODULE;
use windows::Win32::Graphics::Direct3D::*;
use windows::Win32::Graphics::Direct3D11::*;
use winit::window::Window;

use crate::d3d11_buffer::D3D11Buffer;
use crate::d3d11_command_list::D3D11CommandList;
use crate::d3d11_compiler::FxcCompiler;
use crate::d3d11_context::GpuContext;
use crate::d3d11_render_target::D3D11RenderTarget;
use crate::d3d11_sampler::SamplerCache;
use crate::d3d11_shader::D3D11ShaderProgram;
use crate::d3d11_swap_chain::D3D11SwapChain;
use crate::d3d11_texture::D3D11Texture;

pub struct D3D11Renderer {
    ctx: Arc<GpuContext>,
    compiler: FxcCompiler,
    samplers: SamplerCache,
    command_list: D3D11CommandList,
    config: RendererConfig,
}

fn create_device(flags: D3D11_CREATE_DEVICE_FLAG) -> windows::core::Result<(ID3D11Device, ID3D11DeviceContext, D3D_FEATURE_LEVEL)> {
    let feature_levels = [D3D_FEATURE_LEVEL_11_0];
    let mut device = None;
    let mut context = None;
    let mut feature_level = D3D_FEATURE_LEVEL::default();

    unsafe {
        D3D11CreateDevice(
            None,
            D3D_DRIVER_TYPE_HARDWARE,
            HMODULE::default(),
            flags,
            Some(&feature_levels),
            D3D11_SDK_VERSION,
            Some(&mut device),
            Some(&mut feature_level),
            Some(&mut context),
        )?;
    }

    match (device, context) {
        (Some(device), Some(context)) => Ok((device, context, feature_level)),
        _ => Err(windows::core::Error::from_hresult(windows::Win32::Foundation::E_FAIL)),
    }
}

impl D3D11Renderer {
    /// Create a hardware device at feature level 11.0
    ///
    /// With the `d3d11-debug-layer` feature and `enable_debug_layer` set, the
    /// device is created with the debug layer. Without the SDK layers
    /// installed this falls back to a regular device.
    pub fn new(config: RendererConfig) -> Result<Self> {
        let mut flags = D3D11_CREATE_DEVICE_FLAG(0);

        #[cfg(feature = "d3d11-debug-layer")]
        if config.enable_debug_layer {
            flags |= D3D11_CREATE_DEVICE_DEBUG;
            crate::d3d11_debug::init_debug_layer();
        }

        #[cfg(not(feature = "d3d11-debug-layer"))]
        if config.enable_debug_layer {
            engine_warn!("ember3d::d3d11",
                "Debug layer requested but the d3d11-debug-layer feature is disabled");
        }

        let created = match create_device(flags) {
            Err(e) if flags != D3D11_CREATE_DEVICE_FLAG(0) => {
                engine_warn!("ember3d::d3d11",
                    "Debug device creation failed ({}), retrying without the debug layer", e);
                create_device(D3D11_CREATE_DEVICE_FLAG(0))
            }
            other => other,
        };
        let (device, context, feature_level) = created.map_err(|e| {
            engine_error!("ember3d::d3d11", "Failed to create D3D11 device: {}", e);
            Error::InitializationFailed(format!("Failed to create D3D11 device: {}", e))
        })?;

        engine_info!("ember3d::d3d11",
            "Created D3D11 device for '{}' (feature level {:#x})", config.app_name, feature_level.0);

        let ctx = Arc::new(GpuContext::new(device, context));

        Ok(Self {
            compiler: FxcCompiler::new(),
            samplers: SamplerCache::new(Arc::clone(&ctx)),
            command_list: D3D11CommandList::new(Arc::clone(&ctx)),
            ctx,
            config,
        })
    }
}

impl Renderer for D3D11Renderer {
    fn create_texture(&mut self, desc: TextureDesc) -> Result<Arc<dyn Texture>> {
        Ok(Arc::new(D3D11Texture::new(Arc::clone(&self.ctx), desc)?))
    }

    fn create_render_target(&mut self, desc: RenderTargetDesc) -> Result<Arc<dyn RenderTarget>> {
        Ok(Arc::new(D3D11RenderTarget::new(&self.ctx, desc)?))
    }

    fn create_buffer(&mut self, desc: BufferDesc) -> Result<Arc<dyn Buffer>> {
        Ok(Arc::new(D3D11Buffer::new(Arc::clone(&self.ctx), desc)?))
    }

    fn create_sampler(&mut self, desc: &SamplerDesc) -> Result<Arc<dyn Sampler>> {
        let sampler: Arc<dyn Sampler> = self.samplers.get(desc)?;
        Ok(sampler)
    }

    fn create_shader_program(&mut self, compiled: &CompiledShader) -> Result<Arc<dyn ShaderProgram>> {
        Ok(Arc::new(D3D11ShaderProgram::new(&self.ctx, compiled)?))
    }

    fn create_swap_chain(&mut self, window: &Window, desc: SwapChainDesc) -> Result<Box<dyn SwapChain>> {
        Ok(Box::new(D3D11SwapChain::new(Arc::clone(&self.ctx), window, desc)?))
    }

    fn stage_compiler(&self) -> &dyn StageCompiler {
        &self.compiler
    }

    fn command_list(&mut self) -> &mut dyn CommandList {
        &mut self.command_list
    }

    fn config(&self) -> &RendererConfig {
        &self.config
    }

    fn stats(&self) -> RendererStats {
        self.command_list.stats()
    }

    fn reset_stats(&mut self) {
        self.command_list.reset_stats();
    }
}

impl Drop for D3D11Renderer {
    fn drop(&mut self) {
        engine_debug!("ember3d::d3d11", "Releasing {} cached sampler state(s)", self.samplers.len());
        self.samplers.clear();

        unsafe {
            self.ctx.context.ClearState();
            self.ctx.context.Flush();
        }

        #[cfg(feature = "d3d11-debug-layer")]
        crate::d3d11_debug::drain_info_queue(&self.ctx);
    }
}
