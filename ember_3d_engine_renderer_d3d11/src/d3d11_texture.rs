/// Texture - D3D11 implementation of the Texture trait

use ember_3d_engine::ember3d::{
    Result,
    render::{Texture as RendererTexture, TextureDesc, TextureInfo},
};
use ember_3d_engine::engine_err;
use std::any::Any;
use std::sync::Arc;
use windows::Win32::Graphics::Direct3D11::*;
use windows::Win32::Graphics::Dxgi::Common::{DXGI_FORMAT, DXGI_SAMPLE_DESC};

use crate::d3d11_context::{created, GpuContext};
use crate::d3d11_format::dxgi_format;

/// Create a single-mip 2D texture in default usage
pub(crate) fn create_texture_2d(
    ctx: &GpuContext,
    width: u32,
    height: u32,
    format: DXGI_FORMAT,
    bind_flags: u32,
    initial: Option<(&[u8], u32)>,
) -> Result<ID3D11Texture2D> {
    let desc = D3D11_TEXTURE2D_DESC {
        Width: width,
        Height: height,
        MipLevels: 1,
        ArraySize: 1,
        Format: format,
        SampleDesc: DXGI_SAMPLE_DESC { Count: 1, Quality: 0 },
        Usage: D3D11_USAGE_DEFAULT,
        BindFlags: bind_flags,
        CPUAccessFlags: 0,
        MiscFlags: 0,
    };

    let mut texture = None;
    let result = unsafe {
        match initial {
            Some((data, row_pitch)) => {
                let subresource = D3D11_SUBRESOURCE_DATA {
                    pSysMem: data.as_ptr() as *const _,
                    SysMemPitch: row_pitch,
                    SysMemSlicePitch: 0,
                };
                ctx.device.CreateTexture2D(&desc, Some(&subresource), Some(&mut texture))
            }
            None => ctx.device.CreateTexture2D(&desc, None, Some(&mut texture)),
        }
    };
    result.map_err(|e| engine_err!("ember3d::d3d11", "CreateTexture2D {}x{} failed: {}", width, height, e))?;
    created(texture, "CreateTexture2D")
}

/// D3D11 sampled texture
pub struct D3D11Texture {
    ctx: Arc<GpuContext>,
    pub(crate) texture: ID3D11Texture2D,
    pub(crate) srv: ID3D11ShaderResourceView,
    info: TextureInfo,
}

unsafe impl Send for D3D11Texture {}
unsafe impl Sync for D3D11Texture {}

impl D3D11Texture {
    pub(crate) fn new(ctx: Arc<GpuContext>, desc: TextureDesc) -> Result<Self> {
        desc.validate()?;

        let row_pitch = desc.width * desc.format.bytes_per_pixel();
        let texture = create_texture_2d(
            &ctx,
            desc.width,
            desc.height,
            dxgi_format(desc.format),
            D3D11_BIND_SHADER_RESOURCE.0 as u32,
            desc.data.as_deref().map(|data| (data, row_pitch)),
        )?;

        let mut srv = None;
        unsafe {
            ctx.device
                .CreateShaderResourceView(&texture, None, Some(&mut srv))
                .map_err(|e| engine_err!("ember3d::d3d11", "CreateShaderResourceView failed: {}", e))?;
        }
        let srv = created(srv, "CreateShaderResourceView")?;

        Ok(Self {
            ctx,
            texture,
            srv,
            info: TextureInfo { width: desc.width, height: desc.height, format: desc.format },
        })
    }
}

impl RendererTexture for D3D11Texture {
    fn info(&self) -> &TextureInfo {
        &self.info
    }

    fn update(&self, data: &[u8]) -> Result<()> {
        let expected = self.info.width as u64
            * self.info.height as u64
            * self.info.format.bytes_per_pixel() as u64;
        if data.len() as u64 != expected {
            return Err(engine_err!(
                "ember3d::d3d11",
                "Texture update is {} bytes, expected {}", data.len(), expected
            ));
        }

        let row_pitch = self.info.width * self.info.format.bytes_per_pixel();
        unsafe {
            self.ctx.context.UpdateSubresource(
                &self.texture,
                0,
                None,
                data.as_ptr() as *const _,
                row_pitch,
                0,
            );
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
