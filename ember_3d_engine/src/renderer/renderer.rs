/// Renderer trait - main rendering factory interface

use std::path::PathBuf;
use std::sync::Arc;
use winit::window::Window;

use crate::error::Result;
use crate::renderer::{
    Buffer, BufferDesc, CommandList, RenderTarget, RenderTargetDesc, Sampler, SamplerDesc,
    ShaderProgram, SwapChain, SwapChainDesc, Texture, TextureDesc,
};
use crate::shader::{CompileMode, CompiledShader, StageCompiler};

// ============================================================================
// Configuration and statistics
// ============================================================================

/// Renderer configuration
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Create the device with the native debug layer
    pub enable_debug_layer: bool,
    /// Application name
    pub app_name: String,
    /// Folder holding precompiled shader bytecode
    pub shader_binary_dir: PathBuf,
    /// Flags passed to the native shader compiler
    pub compile_mode: CompileMode,
    /// Default vsync for new swap chains
    pub vsync: bool,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            enable_debug_layer: cfg!(debug_assertions),
            app_name: "Ember3D Application".to_string(),
            shader_binary_dir: PathBuf::from("ShaderBin"),
            compile_mode: CompileMode::default(),
            vsync: true,
        }
    }
}

/// Renderer statistics since the last reset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RendererStats {
    /// Number of draw calls
    pub draw_calls: u32,
    /// Number of triangles drawn
    pub triangles: u32,
}

impl RendererStats {
    pub fn record_draw(&mut self, index_count: u32) {
        self.draw_calls += 1;
        self.triangles += index_count / 3;
    }
}

// ============================================================================
// Renderer trait
// ============================================================================

/// Main renderer trait
///
/// Factory for GPU resources, owner of the native shader compiler and of the
/// immediate command list. Implemented by backend renderers (e.g. D3D11Renderer).
pub trait Renderer: Send + Sync {
    fn create_texture(&mut self, desc: TextureDesc) -> Result<Arc<dyn Texture>>;

    fn create_render_target(&mut self, desc: RenderTargetDesc) -> Result<Arc<dyn RenderTarget>>;

    fn create_buffer(&mut self, desc: BufferDesc) -> Result<Arc<dyn Buffer>>;

    /// Create a sampler; identical descriptions may share one native object
    fn create_sampler(&mut self, desc: &SamplerDesc) -> Result<Arc<dyn Sampler>>;

    /// Create native stages, input layout and fixed-function state from compiled bytecode
    fn create_shader_program(&mut self, compiled: &CompiledShader) -> Result<Arc<dyn ShaderProgram>>;

    fn create_swap_chain(&mut self, window: &Window, desc: SwapChainDesc) -> Result<Box<dyn SwapChain>>;

    /// Native per-stage compiler and reflector
    fn stage_compiler(&self) -> &dyn StageCompiler;

    /// Immediate command list
    fn command_list(&mut self) -> &mut dyn CommandList;

    fn config(&self) -> &RendererConfig;

    fn stats(&self) -> RendererStats;

    fn reset_stats(&mut self);
}
