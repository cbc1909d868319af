/// GpuContext - device and immediate context shared by all D3D11 objects
///
/// Resources keep an `Arc<GpuContext>` so they can upload data without
/// going back through the renderer.

use ember_3d_engine::ember3d::Result;
use ember_3d_engine::engine_err;
use windows::Win32::Graphics::Direct3D11::{ID3D11Device, ID3D11DeviceContext};

pub struct GpuContext {
    pub device: ID3D11Device,

    /// Immediate context. Not thread-safe on the native side: every call
    /// through it happens on the thread that owns the renderer lock.
    pub context: ID3D11DeviceContext,
}

// COM pointers are not marked Send/Sync by windows-rs. The device is
// free-threaded; the immediate context is only used behind the renderer lock.
unsafe impl Send for GpuContext {}
unsafe impl Sync for GpuContext {}

impl GpuContext {
    pub fn new(device: ID3D11Device, context: ID3D11DeviceContext) -> Self {
        Self { device, context }
    }
}

/// Unwrap the out-parameter of a successful `Create*` call
pub(crate) fn created<T>(value: Option<T>, what: &str) -> Result<T> {
    value.ok_or_else(|| engine_err!("ember3d::d3d11", "{} succeeded but returned no object", what))
}
