/*!
# Ember 3D Engine - Direct3D 11 Renderer Backend

Direct3D 11 implementation of the Ember 3D rendering engine.

This crate implements the ember_3d_engine renderer traits with the `windows`
crate: textures, render targets, buffers, sampler states, shader programs, DXGI
swap chains and the immediate-context command list. It also provides the native
shader compiler (`D3DCompile`) and reflection (`D3DReflect`) behind the engine's
`StageCompiler` seam.

Windows only; on other targets the crate is empty.
*/

#![cfg(windows)]

mod d3d11_context;
mod d3d11_format;
mod d3d11_texture;
mod d3d11_render_target;
mod d3d11_buffer;
mod d3d11_sampler;
mod d3d11_shader;
mod d3d11_compiler;
mod d3d11_swap_chain;
mod d3d11_command_list;
mod d3d11_renderer;

#[cfg(feature = "d3d11-debug-layer")]
mod d3d11_debug;

pub use d3d11_renderer::D3D11Renderer;
pub use d3d11_compiler::FxcCompiler;
pub use d3d11_texture::D3D11Texture;
pub use d3d11_render_target::D3D11RenderTarget;
pub use d3d11_buffer::D3D11Buffer;
pub use d3d11_sampler::D3D11Sampler;
pub use d3d11_shader::D3D11ShaderProgram;
pub use d3d11_swap_chain::D3D11SwapChain;
pub use d3d11_command_list::D3D11CommandList;

// Debug layer utilities
#[cfg(feature = "d3d11-debug-layer")]
pub use d3d11_debug::{
    get_debug_layer_stats, init_debug_layer, print_debug_layer_report, DebugLayerStats,
    DebugMessageSeverity,
};
