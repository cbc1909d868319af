/// Buffer - D3D11 implementation of the Buffer trait

use ember_3d_engine::ember3d::{
    Result,
    render::{Buffer as RendererBuffer, BufferDesc, BufferInfo, BufferKind},
};
use ember_3d_engine::engine_err;
use std::any::Any;
use std::sync::{Arc, Mutex};
use windows::Win32::Graphics::Direct3D11::*;

use crate::d3d11_context::{created, GpuContext};

/// D3D11 buffer
///
/// Constant buffers are dynamic and keep a CPU shadow: D3D11 cannot update
/// part of a constant buffer, so every update re-uploads the whole shadow
/// with `WRITE_DISCARD`. Other kinds live in default memory and are patched
/// with `UpdateSubresource`.
pub struct D3D11Buffer {
    ctx: Arc<GpuContext>,
    pub(crate) buffer: ID3D11Buffer,
    /// Structured buffers only
    pub(crate) srv: Option<ID3D11ShaderResourceView>,
    shadow: Option<Mutex<Vec<u8>>>,
    info: BufferInfo,
}

unsafe impl Send for D3D11Buffer {}
unsafe impl Sync for D3D11Buffer {}

impl D3D11Buffer {
    pub(crate) fn new(ctx: Arc<GpuContext>, desc: BufferDesc) -> Result<Self> {
        desc.validate()?;

        let byte_width = u32::try_from(desc.size).map_err(|_| {
            engine_err!("ember3d::d3d11", "Buffer size {} exceeds the D3D11 limit", desc.size)
        })?;

        // Initial data must cover the whole buffer
        let mut contents = vec![0u8; desc.size as usize];
        if let Some(data) = &desc.data {
            contents[..data.len()].copy_from_slice(data);
        }

        let (usage, bind_flags, cpu_access, misc_flags, stride) = match desc.kind {
            BufferKind::Vertex { .. } => {
                (D3D11_USAGE_DEFAULT, D3D11_BIND_VERTEX_BUFFER.0, 0, 0, 0)
            }
            BufferKind::Index => (D3D11_USAGE_DEFAULT, D3D11_BIND_INDEX_BUFFER.0, 0, 0, 0),
            BufferKind::Constant => (
                D3D11_USAGE_DYNAMIC,
                D3D11_BIND_CONSTANT_BUFFER.0,
                D3D11_CPU_ACCESS_WRITE.0,
                0,
                0,
            ),
            BufferKind::Structured { stride } => (
                D3D11_USAGE_DEFAULT,
                D3D11_BIND_SHADER_RESOURCE.0,
                0,
                D3D11_RESOURCE_MISC_BUFFER_STRUCTURED.0,
                stride,
            ),
        };

        let buffer_desc = D3D11_BUFFER_DESC {
            ByteWidth: byte_width,
            Usage: usage,
            BindFlags: bind_flags as u32,
            CPUAccessFlags: cpu_access as u32,
            MiscFlags: misc_flags as u32,
            StructureByteStride: stride,
        };
        let initial = D3D11_SUBRESOURCE_DATA {
            pSysMem: contents.as_ptr() as *const _,
            SysMemPitch: 0,
            SysMemSlicePitch: 0,
        };

        let mut buffer = None;
        unsafe {
            ctx.device
                .CreateBuffer(&buffer_desc, Some(&initial), Some(&mut buffer))
                .map_err(|e| engine_err!("ember3d::d3d11", "CreateBuffer ({:?}) failed: {}", desc.kind, e))?;
        }
        let buffer = created(buffer, "CreateBuffer")?;

        let srv = match desc.kind {
            BufferKind::Structured { .. } => {
                let mut srv = None;
                unsafe {
                    ctx.device
                        .CreateShaderResourceView(&buffer, None, Some(&mut srv))
                        .map_err(|e| engine_err!("ember3d::d3d11", "CreateShaderResourceView failed: {}", e))?;
                }
                Some(created(srv, "CreateShaderResourceView")?)
            }
            _ => None,
        };

        let shadow = match desc.kind {
            BufferKind::Constant => Some(Mutex::new(contents)),
            _ => None,
        };

        Ok(Self {
            ctx,
            buffer,
            srv,
            shadow,
            info: BufferInfo { kind: desc.kind, size: desc.size },
        })
    }

    fn upload_shadow(&self, shadow: &[u8]) -> Result<()> {
        unsafe {
            let mut mapped = D3D11_MAPPED_SUBRESOURCE::default();
            self.ctx
                .context
                .Map(&self.buffer, 0, D3D11_MAP_WRITE_DISCARD, 0, Some(&mut mapped))
                .map_err(|e| engine_err!("ember3d::d3d11", "Map constant buffer failed: {}", e))?;

            std::ptr::copy_nonoverlapping(shadow.as_ptr(), mapped.pData as *mut u8, shadow.len());

            self.ctx.context.Unmap(&self.buffer, 0);
        }
        Ok(())
    }
}

impl RendererBuffer for D3D11Buffer {
    fn info(&self) -> &BufferInfo {
        &self.info
    }

    fn update(&self, offset: u64, data: &[u8]) -> Result<()> {
        self.info.check_range(offset, data.len())?;
        if data.is_empty() {
            return Ok(());
        }

        if let Some(shadow) = &self.shadow {
            let mut shadow = shadow
                .lock()
                .map_err(|_| engine_err!("ember3d::d3d11", "Constant buffer shadow lock poisoned"))?;
            let start = offset as usize;
            shadow[start..start + data.len()].copy_from_slice(data);
            return self.upload_shadow(&shadow);
        }

        let region = D3D11_BOX {
            left: offset as u32,
            top: 0,
            front: 0,
            right: (offset + data.len() as u64) as u32,
            bottom: 1,
            back: 1,
        };
        unsafe {
            self.ctx.context.UpdateSubresource(
                &self.buffer,
                0,
                Some(&region),
                data.as_ptr() as *const _,
                0,
                0,
            );
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
