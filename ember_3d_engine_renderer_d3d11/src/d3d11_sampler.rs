/// Sampler - D3D11 sampler state and the per-renderer sampler cache
///
/// Identical `StaticSampler` declarations across shaders share one native
/// sampler state. Typical scenes only use a handful of descriptors.

use ember_3d_engine::ember3d::{
    Result,
    render::{Sampler as RendererSampler, SamplerDesc},
};
use ember_3d_engine::{engine_err, engine_trace};
use rustc_hash::FxHashMap;
use std::any::Any;
use std::sync::Arc;
use windows::Win32::Graphics::Direct3D11::*;

use crate::d3d11_context::{created, GpuContext};
use crate::d3d11_format::{address_mode, filter};

const MAX_ANISOTROPY: u32 = 16;

pub struct D3D11Sampler {
    pub(crate) state: ID3D11SamplerState,
    desc: SamplerDesc,
}

unsafe impl Send for D3D11Sampler {}
unsafe impl Sync for D3D11Sampler {}

impl D3D11Sampler {
    fn new(ctx: &GpuContext, desc: SamplerDesc) -> Result<Self> {
        let native = D3D11_SAMPLER_DESC {
            Filter: filter(desc.min_filter, desc.mag_filter),
            AddressU: address_mode(desc.wrap_u),
            AddressV: address_mode(desc.wrap_v),
            AddressW: D3D11_TEXTURE_ADDRESS_WRAP,
            MipLODBias: 0.0,
            MaxAnisotropy: MAX_ANISOTROPY,
            ComparisonFunc: D3D11_COMPARISON_NEVER,
            BorderColor: [0.0; 4],
            MinLOD: 0.0,
            MaxLOD: D3D11_FLOAT32_MAX,
        };

        let mut state = None;
        unsafe {
            ctx.device
                .CreateSamplerState(&native, Some(&mut state))
                .map_err(|e| engine_err!("ember3d::d3d11", "CreateSamplerState {:?} failed: {}", desc, e))?;
        }

        Ok(Self { state: created(state, "CreateSamplerState")?, desc })
    }
}

impl RendererSampler for D3D11Sampler {
    fn desc(&self) -> &SamplerDesc {
        &self.desc
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Creates sampler states on first use and hands out shared references
pub(crate) struct SamplerCache {
    ctx: Arc<GpuContext>,
    cache: FxHashMap<SamplerDesc, Arc<D3D11Sampler>>,
}

impl SamplerCache {
    pub(crate) fn new(ctx: Arc<GpuContext>) -> Self {
        Self {
            ctx,
            cache: FxHashMap::default(),
        }
    }

    /// Get or create the sampler for `desc`
    pub(crate) fn get(&mut self, desc: &SamplerDesc) -> Result<Arc<D3D11Sampler>> {
        if let Some(sampler) = self.cache.get(desc) {
            return Ok(Arc::clone(sampler));
        }

        let sampler = Arc::new(D3D11Sampler::new(&self.ctx, *desc)?);
        engine_trace!("ember3d::d3d11", "Created sampler state {:?} ({} cached)", desc, self.cache.len() + 1);
        self.cache.insert(*desc, Arc::clone(&sampler));
        Ok(sampler)
    }

    pub(crate) fn len(&self) -> usize {
        self.cache.len()
    }

    /// Release every cached sampler state
    pub(crate) fn clear(&mut self) {
        self.cache.clear();
    }
}
