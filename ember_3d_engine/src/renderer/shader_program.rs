/// Native shader program trait

use std::any::Any;
use crate::shader::ShaderConfig;

/// Compiled stages, input layout and fixed-function state of one shader
pub trait ShaderProgram: Send + Sync {
    fn config(&self) -> &ShaderConfig;

    /// Vertex-only programs leave the pixel stage unbound
    fn has_pixel_stage(&self) -> bool;

    /// Backend downcast access
    fn as_any(&self) -> &dyn Any;
}
