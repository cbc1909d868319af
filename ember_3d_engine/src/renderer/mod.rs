/// Renderer module - backend-agnostic resource traits and draw helpers

// Module declarations
pub mod texture;
pub mod buffer;
pub mod sampler;
pub mod render_target;
pub mod swap_chain;
pub mod shader_program;
pub mod command_list;
pub mod renderer;
pub mod frame_buffer;
pub mod render_command;
pub mod blitter;

#[cfg(test)]
pub mod mock_renderer;

// Re-export everything from renderer.rs
pub use renderer::*;

// Re-export from other modules
pub use texture::*;
pub use buffer::*;
pub use sampler::*;
pub use render_target::*;
pub use swap_chain::*;
pub use shader_program::*;
pub use command_list::*;
pub use frame_buffer::*;
pub use render_command::*;
pub use blitter::*;
