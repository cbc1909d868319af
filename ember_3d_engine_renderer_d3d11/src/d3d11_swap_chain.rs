/// SwapChain - DXGI swap chain bound to a winit window

use ember_3d_engine::ember3d::{
    Result,
    render::{RenderTargetDesc, SwapChain as RendererSwapChain, SwapChainDesc, TextureFormat},
};
use ember_3d_engine::{engine_bail, engine_debug, engine_err};
use raw_window_handle::{HasWindowHandle, RawWindowHandle};
use std::any::Any;
use std::sync::Arc;
use windows::core::Interface;
use windows::Win32::Foundation::{HWND, TRUE};
use windows::Win32::Graphics::Direct3D11::*;
use windows::Win32::Graphics::Dxgi::Common::*;
use windows::Win32::Graphics::Dxgi::*;
use winit::window::Window;

use crate::d3d11_context::{created, GpuContext};
use crate::d3d11_render_target::D3D11RenderTarget;

const BACK_BUFFER_FORMAT: DXGI_FORMAT = DXGI_FORMAT_R8G8B8A8_UNORM;

pub struct D3D11SwapChain {
    ctx: Arc<GpuContext>,
    swap_chain: IDXGISwapChain,
    /// Released before every resize
    back_buffer_view: Option<ID3D11RenderTargetView>,
    depth: Option<D3D11RenderTarget>,
    desc: SwapChainDesc,
}

fn window_hwnd(window: &Window) -> Result<HWND> {
    let handle = window
        .window_handle()
        .map_err(|e| engine_err!("ember3d::d3d11", "Window handle unavailable: {}", e))?;
    match handle.as_raw() {
        RawWindowHandle::Win32(win32) => Ok(HWND(win32.hwnd.get() as *mut _)),
        other => Err(engine_err!("ember3d::d3d11", "Unsupported window handle {:?}", other)),
    }
}

// Presented and resized only from the thread holding the renderer lock
unsafe impl Send for D3D11SwapChain {}
unsafe impl Sync for D3D11SwapChain {}

impl D3D11SwapChain {
    pub(crate) fn new(ctx: Arc<GpuContext>, window: &Window, desc: SwapChainDesc) -> Result<Self> {
        if desc.width == 0 || desc.height == 0 {
            engine_bail!("ember3d::d3d11", "Swap chain size must be non-zero (got {}x{})", desc.width, desc.height);
        }
        if let Some(format) = desc.depth_format {
            if !format.is_depth_stencil() {
                engine_bail!("ember3d::d3d11", "Swap chain depth format {:?} is not a depth format", format);
            }
        }

        let hwnd = window_hwnd(window)?;

        let swap_chain_desc = DXGI_SWAP_CHAIN_DESC {
            BufferDesc: DXGI_MODE_DESC {
                Width: desc.width,
                Height: desc.height,
                RefreshRate: DXGI_RATIONAL { Numerator: 0, Denominator: 1 },
                Format: BACK_BUFFER_FORMAT,
                ScanlineOrdering: DXGI_MODE_SCANLINE_ORDER_UNSPECIFIED,
                Scaling: DXGI_MODE_SCALING_UNSPECIFIED,
            },
            SampleDesc: DXGI_SAMPLE_DESC { Count: 1, Quality: 0 },
            BufferUsage: DXGI_USAGE_RENDER_TARGET_OUTPUT,
            BufferCount: 1,
            OutputWindow: hwnd,
            Windowed: TRUE,
            SwapEffect: DXGI_SWAP_EFFECT_DISCARD,
            Flags: 0,
        };

        let swap_chain = unsafe {
            // The factory that created the device's adapter must create the swap chain
            let dxgi_device: IDXGIDevice = ctx
                .device
                .cast()
                .map_err(|e| engine_err!("ember3d::d3d11", "Device is not a DXGI device: {}", e))?;
            let adapter = dxgi_device
                .GetAdapter()
                .map_err(|e| engine_err!("ember3d::d3d11", "GetAdapter failed: {}", e))?;
            let factory: IDXGIFactory = adapter
                .GetParent()
                .map_err(|e| engine_err!("ember3d::d3d11", "GetParent(IDXGIFactory) failed: {}", e))?;

            let mut swap_chain = None;
            factory
                .CreateSwapChain(&ctx.device, &swap_chain_desc, &mut swap_chain)
                .ok()
                .map_err(|e| engine_err!("ember3d::d3d11", "CreateSwapChain failed: {}", e))?;
            created(swap_chain, "CreateSwapChain")?
        };

        let mut result = Self {
            ctx,
            swap_chain,
            back_buffer_view: None,
            depth: None,
            desc,
        };
        result.create_views()?;

        engine_debug!(
            "ember3d::d3d11",
            "Created swap chain {}x{} (vsync: {}, depth: {:?})",
            desc.width, desc.height, desc.vsync, desc.depth_format
        );
        Ok(result)
    }

    fn create_views(&mut self) -> Result<()> {
        let back_buffer: ID3D11Texture2D = unsafe {
            self.swap_chain
                .GetBuffer(0)
                .map_err(|e| engine_err!("ember3d::d3d11", "Swap chain GetBuffer failed: {}", e))?
        };

        let mut rtv = None;
        unsafe {
            self.ctx
                .device
                .CreateRenderTargetView(&back_buffer, None, Some(&mut rtv))
                .map_err(|e| engine_err!("ember3d::d3d11", "Back buffer CreateRenderTargetView failed: {}", e))?;
        }
        self.back_buffer_view = Some(created(rtv, "CreateRenderTargetView")?);

        self.depth = match self.desc.depth_format {
            Some(format) => Some(D3D11RenderTarget::new(
                &self.ctx,
                RenderTargetDesc::new(self.desc.width, self.desc.height, format),
            )?),
            None => None,
        };
        Ok(())
    }

    pub(crate) fn back_buffer_view(&self) -> Result<&ID3D11RenderTargetView> {
        self.back_buffer_view
            .as_ref()
            .ok_or_else(|| engine_err!("ember3d::d3d11", "Swap chain has no back buffer view"))
    }

    pub(crate) fn depth_stencil_view(&self) -> Option<&ID3D11DepthStencilView> {
        self.depth.as_ref().and_then(|depth| depth.depth_stencil_view())
    }
}

impl RendererSwapChain for D3D11SwapChain {
    fn width(&self) -> u32 {
        self.desc.width
    }

    fn height(&self) -> u32 {
        self.desc.height
    }

    fn format(&self) -> TextureFormat {
        TextureFormat::RGBA8_UNORM
    }

    fn depth_format(&self) -> Option<TextureFormat> {
        self.desc.depth_format
    }

    fn vsync(&self) -> bool {
        self.desc.vsync
    }

    fn set_vsync(&mut self, vsync: bool) {
        self.desc.vsync = vsync;
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        // Minimized window
        if width == 0 || height == 0 {
            engine_debug!("ember3d::d3d11", "Ignoring swap chain resize to {}x{}", width, height);
            return Ok(());
        }
        if width == self.desc.width && height == self.desc.height {
            return Ok(());
        }

        // Every reference to the back buffer must be gone before ResizeBuffers
        unsafe {
            self.ctx.context.OMSetRenderTargets(None, None);
            self.ctx.context.Flush();
        }
        self.back_buffer_view = None;
        self.depth = None;

        unsafe {
            self.swap_chain
                .ResizeBuffers(1, width, height, BACK_BUFFER_FORMAT, DXGI_SWAP_CHAIN_FLAG(0))
                .map_err(|e| engine_err!("ember3d::d3d11", "ResizeBuffers {}x{} failed: {}", width, height, e))?;
        }

        self.desc.width = width;
        self.desc.height = height;
        self.create_views()?;

        engine_debug!("ember3d::d3d11", "Resized swap chain to {}x{}", width, height);
        Ok(())
    }

    fn present(&mut self) -> Result<()> {
        let interval = if self.desc.vsync { 1 } else { 0 };
        unsafe {
            self.swap_chain
                .Present(interval, DXGI_PRESENT(0))
                .ok()
                .map_err(|e| engine_err!("ember3d::d3d11", "Present failed: {}", e))?;
        }

        #[cfg(feature = "d3d11-debug-layer")]
        crate::d3d11_debug::drain_info_queue(&self.ctx);

        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
