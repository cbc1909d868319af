/// Shader module - source format, compiler driver and bind points

pub mod tokenizer;
pub mod sampler;
pub mod config;
pub mod source;
pub mod reflection;
pub mod bind_point;
pub mod compiler;
pub mod shader;

pub use tokenizer::tokenize;
pub use sampler::*;
pub use config::*;
pub use source::*;
pub use reflection::*;
pub use bind_point::*;
pub use compiler::*;
pub use shader::*;
