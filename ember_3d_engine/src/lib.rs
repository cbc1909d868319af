/*!
# Ember 3D Engine

Core traits and types for the Ember 3D rendering engine.

The crate is backend-agnostic: GPU resources are trait objects created by a
`Renderer` implementation (Direct3D 11 lives in `ember_3d_engine_renderer_d3d11`).

## Architecture

- **Shader**: sectioned source format, `StaticSampler` declarations, per-stage
  compilation and a name-indexed bind-point table
- **Renderer**: factory trait for textures, render targets, buffers, samplers,
  shader programs and swap chains
- **RenderCommand**: binding and draw helpers over a `CommandList`
- **FrameBuffer**: ordered color targets plus at most one depth target
- **Mesh**: vertex and index buffers for the engine vertex layout
*/

// Internal modules
mod error;
mod engine;
pub mod log;
pub mod renderer;
pub mod shader;
pub mod resource;

// Main ember3d namespace module
pub mod ember3d {
    // Error types
    pub use crate::error::{Error, Result};

    // Engine singleton
    pub use crate::engine::Engine;

    // Renderer factory trait
    pub use crate::renderer::Renderer;

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
    }

    // Render sub-module with all rendering types
    pub mod render {
        pub use crate::renderer::*;
    }

    // Shader sub-module
    pub mod shader {
        pub use crate::shader::*;
    }

    // Resource sub-module
    pub mod resource {
        pub use crate::resource::*;
    }
}

// Re-export math library at crate root
pub use glam;
