/// Sampler trait and sampler descriptor

use std::any::Any;

/// Texture coordinate addressing outside [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WrapMode {
    #[default]
    Repeat,
    MirroredRepeat,
    Clamp,
}

/// Minification / magnification filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FilterMode {
    Point,
    #[default]
    Linear,
    Anisotropic,
}

/// Sampler state description
///
/// W addressing always repeats. Hashable so backends can share one native
/// sampler between identical declarations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SamplerDesc {
    pub wrap_u: WrapMode,
    pub wrap_v: WrapMode,
    pub min_filter: FilterMode,
    pub mag_filter: FilterMode,
}

/// Native sampler state object
pub trait Sampler: Send + Sync {
    fn desc(&self) -> &SamplerDesc;

    /// Backend downcast access
    fn as_any(&self) -> &dyn Any;
}
