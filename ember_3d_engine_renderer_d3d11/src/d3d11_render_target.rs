/// RenderTarget - D3D11 implementation of the RenderTarget trait
///
/// Color targets own a render target view, depth targets a depth-stencil
/// view over a typeless texture. Both can be sampled through `srv`.

use ember_3d_engine::ember3d::{
    Result,
    render::{RenderTarget as RendererRenderTarget, RenderTargetDesc, TextureFormat},
};
use ember_3d_engine::engine_err;
use std::any::Any;
use windows::Win32::Graphics::Direct3D::D3D11_SRV_DIMENSION_TEXTURE2D;
use windows::Win32::Graphics::Direct3D11::*;

use crate::d3d11_context::{created, GpuContext};
use crate::d3d11_format::{depth_formats, dxgi_format};
use crate::d3d11_texture::create_texture_2d;

pub(crate) enum TargetView {
    Color(ID3D11RenderTargetView),
    DepthStencil(ID3D11DepthStencilView),
}

pub struct D3D11RenderTarget {
    pub(crate) view: TargetView,
    pub(crate) srv: ID3D11ShaderResourceView,
    desc: RenderTargetDesc,
}

unsafe impl Send for D3D11RenderTarget {}
unsafe impl Sync for D3D11RenderTarget {}

impl D3D11RenderTarget {
    pub(crate) fn new(ctx: &GpuContext, desc: RenderTargetDesc) -> Result<Self> {
        desc.validate()?;

        match depth_formats(desc.format) {
            Some((texture_format, dsv_format, srv_format)) => {
                let texture = create_texture_2d(
                    ctx,
                    desc.width,
                    desc.height,
                    texture_format,
                    (D3D11_BIND_DEPTH_STENCIL.0 | D3D11_BIND_SHADER_RESOURCE.0) as u32,
                    None,
                )?;

                let dsv_desc = D3D11_DEPTH_STENCIL_VIEW_DESC {
                    Format: dsv_format,
                    ViewDimension: D3D11_DSV_DIMENSION_TEXTURE2D,
                    Flags: 0,
                    Anonymous: D3D11_DEPTH_STENCIL_VIEW_DESC_0 {
                        Texture2D: D3D11_TEX2D_DSV { MipSlice: 0 },
                    },
                };
                let mut dsv = None;
                unsafe {
                    ctx.device
                        .CreateDepthStencilView(&texture, Some(&dsv_desc), Some(&mut dsv))
                        .map_err(|e| engine_err!("ember3d::d3d11", "CreateDepthStencilView failed: {}", e))?;
                }
                let dsv = created(dsv, "CreateDepthStencilView")?;

                let srv_desc = D3D11_SHADER_RESOURCE_VIEW_DESC {
                    Format: srv_format,
                    ViewDimension: D3D11_SRV_DIMENSION_TEXTURE2D,
                    Anonymous: D3D11_SHADER_RESOURCE_VIEW_DESC_0 {
                        Texture2D: D3D11_TEX2D_SRV { MostDetailedMip: 0, MipLevels: 1 },
                    },
                };
                let srv = create_srv(ctx, &texture, Some(&srv_desc))?;

                Ok(Self { view: TargetView::DepthStencil(dsv), srv, desc })
            }
            None => {
                let texture = create_texture_2d(
                    ctx,
                    desc.width,
                    desc.height,
                    dxgi_format(desc.format),
                    (D3D11_BIND_RENDER_TARGET.0 | D3D11_BIND_SHADER_RESOURCE.0) as u32,
                    None,
                )?;

                let mut rtv = None;
                unsafe {
                    ctx.device
                        .CreateRenderTargetView(&texture, None, Some(&mut rtv))
                        .map_err(|e| engine_err!("ember3d::d3d11", "CreateRenderTargetView failed: {}", e))?;
                }
                let rtv = created(rtv, "CreateRenderTargetView")?;
                let srv = create_srv(ctx, &texture, None)?;

                Ok(Self { view: TargetView::Color(rtv), srv, desc })
            }
        }
    }

    pub(crate) fn render_target_view(&self) -> Option<&ID3D11RenderTargetView> {
        match &self.view {
            TargetView::Color(rtv) => Some(rtv),
            TargetView::DepthStencil(_) => None,
        }
    }

    pub(crate) fn depth_stencil_view(&self) -> Option<&ID3D11DepthStencilView> {
        match &self.view {
            TargetView::DepthStencil(dsv) => Some(dsv),
            TargetView::Color(_) => None,
        }
    }
}

fn create_srv(
    ctx: &GpuContext,
    texture: &ID3D11Texture2D,
    desc: Option<&D3D11_SHADER_RESOURCE_VIEW_DESC>,
) -> Result<ID3D11ShaderResourceView> {
    let mut srv = None;
    let result = unsafe {
        match desc {
            Some(desc) => ctx.device.CreateShaderResourceView(texture, Some(desc), Some(&mut srv)),
            None => ctx.device.CreateShaderResourceView(texture, None, Some(&mut srv)),
        }
    };
    result.map_err(|e| engine_err!("ember3d::d3d11", "CreateShaderResourceView failed: {}", e))?;
    created(srv, "CreateShaderResourceView")
}

impl RendererRenderTarget for D3D11RenderTarget {
    fn width(&self) -> u32 {
        self.desc.width
    }

    fn height(&self) -> u32 {
        self.desc.height
    }

    fn format(&self) -> TextureFormat {
        self.desc.format
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
