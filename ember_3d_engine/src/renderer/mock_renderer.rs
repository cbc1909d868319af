/// Mock Renderer for unit tests (no GPU required)
///
/// Resources carry a label (`tex0`, `rt1`, `buf2`, ...) so tests can check
/// which object a command was recorded with. `MockStageCompiler` stands in
/// for the native compiler: its "bytecode" is the stage source itself and
/// reflection scans the declarations in that source.

use std::any::Any;
use std::sync::{Arc, Mutex};
use winit::window::Window;

use crate::error::{Error, Result};
use crate::renderer::{
    Buffer, BufferDesc, BufferInfo, CommandList, Renderer, RendererConfig, RendererStats,
    RenderTarget, RenderTargetDesc, Sampler, SamplerDesc, ShaderProgram, ShaderResource,
    SwapChain, SwapChainDesc, Texture, TextureDesc, TextureFormat, TextureInfo, Viewport,
};
use crate::shader::{
    BoundResource, CompileMode, CompiledShader, ComponentType, ConstantBufferInfo,
    InputElement, ResourceKind, ShaderConfig, ShaderStage, StageCompiler, StageReflection,
    VertexFormat, tokenize,
};

// ============================================================================
// Mock Texture
// ============================================================================

#[derive(Debug)]
pub struct MockTexture {
    pub info: TextureInfo,
    pub label: String,
    pub updates: Mutex<u32>,
}

impl Texture for MockTexture {
    fn info(&self) -> &TextureInfo {
        &self.info
    }

    fn update(&self, data: &[u8]) -> Result<()> {
        let expected = self.info.width as usize * self.info.height as usize
            * self.info.format.bytes_per_pixel() as usize;
        if data.len() != expected {
            return Err(Error::InvalidResource(format!(
                "Texture update is {} bytes, expected {}", data.len(), expected
            )));
        }
        *self.updates.lock().unwrap() += 1;
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// ============================================================================
// Mock RenderTarget
// ============================================================================

#[derive(Debug)]
pub struct MockRenderTarget {
    pub desc: RenderTargetDesc,
    pub label: String,
}

impl MockRenderTarget {
    pub fn new(width: u32, height: u32, format: TextureFormat, label: &str) -> Self {
        Self { desc: RenderTargetDesc::new(width, height, format), label: label.to_string() }
    }
}

impl RenderTarget for MockRenderTarget {
    fn width(&self) -> u32 {
        self.desc.width
    }

    fn height(&self) -> u32 {
        self.desc.height
    }

    fn format(&self) -> TextureFormat {
        self.desc.format
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// ============================================================================
// Mock Buffer
// ============================================================================

#[derive(Debug)]
pub struct MockBuffer {
    pub info: BufferInfo,
    pub label: String,
    pub contents: Mutex<Vec<u8>>,
}

impl Buffer for MockBuffer {
    fn info(&self) -> &BufferInfo {
        &self.info
    }

    fn update(&self, offset: u64, data: &[u8]) -> Result<()> {
        self.info.check_range(offset, data.len())?;
        let start = offset as usize;
        self.contents.lock().unwrap()[start..start + data.len()].copy_from_slice(data);
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// ============================================================================
// Mock Sampler / ShaderProgram
// ============================================================================

#[derive(Debug)]
pub struct MockSampler {
    pub desc: SamplerDesc,
    pub label: String,
}

impl Sampler for MockSampler {
    fn desc(&self) -> &SamplerDesc {
        &self.desc
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[derive(Debug)]
pub struct MockShaderProgram {
    pub config: ShaderConfig,
    pub has_pixel_stage: bool,
    pub label: String,
}

impl ShaderProgram for MockShaderProgram {
    fn config(&self) -> &ShaderConfig {
        &self.config
    }

    fn has_pixel_stage(&self) -> bool {
        self.has_pixel_stage
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// ============================================================================
// Mock SwapChain
// ============================================================================

#[derive(Debug)]
pub struct MockSwapChain {
    pub desc: SwapChainDesc,
    pub presents: u32,
}

impl MockSwapChain {
    pub fn new(desc: SwapChainDesc) -> Self {
        Self { desc, presents: 0 }
    }
}

impl SwapChain for MockSwapChain {
    fn width(&self) -> u32 {
        self.desc.width
    }

    fn height(&self) -> u32 {
        self.desc.height
    }

    fn format(&self) -> TextureFormat {
        TextureFormat::RGBA8_UNORM
    }

    fn depth_format(&self) -> Option<TextureFormat> {
        self.desc.depth_format
    }

    fn vsync(&self) -> bool {
        self.desc.vsync
    }

    fn set_vsync(&mut self, vsync: bool) {
        self.desc.vsync = vsync;
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidResource("Swap chain size must be non-zero".to_string()));
        }
        self.desc.width = width;
        self.desc.height = height;
        Ok(())
    }

    fn present(&mut self) -> Result<()> {
        self.presents += 1;
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// ============================================================================
// Mock CommandList
// ============================================================================

fn target_label(target: &dyn RenderTarget) -> String {
    target.as_any().downcast_ref::<MockRenderTarget>()
        .map_or_else(|| "?".to_string(), |t| t.label.clone())
}

fn buffer_label(buffer: &dyn Buffer) -> String {
    buffer.as_any().downcast_ref::<MockBuffer>()
        .map_or_else(|| "?".to_string(), |b| b.label.clone())
}

/// Records every call as a readable line
#[derive(Debug, Default)]
pub struct MockCommandList {
    pub commands: Vec<String>,
    pub viewport: Option<Viewport>,
    pub stats: RendererStats,
}

impl MockCommandList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded commands starting with `prefix`
    pub fn matching(&self, prefix: &str) -> Vec<&str> {
        self.commands.iter().filter(|c| c.starts_with(prefix)).map(|c| c.as_str()).collect()
    }
}

impl CommandList for MockCommandList {
    fn set_render_targets(&mut self, colors: &[&dyn RenderTarget], depth: Option<&dyn RenderTarget>) -> Result<()> {
        let colors: Vec<String> = colors.iter().map(|t| target_label(*t)).collect();
        let depth = depth.map_or_else(|| "none".to_string(), target_label);
        self.commands.push(format!("set_render_targets colors=[{}] depth={}", colors.join(","), depth));
        Ok(())
    }

    fn set_swap_chain_target(&mut self, swap_chain: &dyn SwapChain) -> Result<()> {
        self.commands.push(format!("set_swap_chain_target depth={}", swap_chain.has_depth_buffer()));
        Ok(())
    }

    fn clear_swap_chain(&mut self, _swap_chain: &dyn SwapChain, color: [f32; 4]) -> Result<()> {
        self.commands.push(format!("clear_swap_chain {:?}", color));
        Ok(())
    }

    fn clear_color(&mut self, target: &dyn RenderTarget, color: [f32; 4]) -> Result<()> {
        self.commands.push(format!("clear_color {} {:?}", target_label(target), color));
        Ok(())
    }

    fn clear_depth_stencil(&mut self, target: &dyn RenderTarget, depth: f32, stencil: u8) -> Result<()> {
        self.commands.push(format!("clear_depth_stencil {} depth={} stencil={}", target_label(target), depth, stencil));
        Ok(())
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        self.commands.push(format!("set_viewport {}x{} at {},{}",
            viewport.width, viewport.height, viewport.x, viewport.y));
        self.viewport = Some(viewport);
    }

    fn set_vertex_buffer(&mut self, buffer: &dyn Buffer) -> Result<()> {
        self.commands.push(format!("set_vertex_buffer {}", buffer_label(buffer)));
        Ok(())
    }

    fn set_index_buffer(&mut self, buffer: &dyn Buffer) -> Result<()> {
        self.commands.push(format!("set_index_buffer {}", buffer_label(buffer)));
        Ok(())
    }

    fn set_shader_program(&mut self, program: &dyn ShaderProgram) -> Result<()> {
        let label = program.as_any().downcast_ref::<MockShaderProgram>()
            .map_or_else(|| "?".to_string(), |p| p.label.clone());
        self.commands.push(format!("set_shader_program {}", label));
        Ok(())
    }

    fn bind_constant_buffer(&mut self, stage: ShaderStage, slot: u32, buffer: &dyn Buffer) -> Result<()> {
        self.commands.push(format!("bind_constant_buffer {} slot={} {}", stage, slot, buffer_label(buffer)));
        Ok(())
    }

    fn bind_shader_resource(&mut self, stage: ShaderStage, slot: u32, resource: ShaderResource<'_>) -> Result<()> {
        let label = match resource {
            ShaderResource::Texture(texture) => texture.as_any().downcast_ref::<MockTexture>()
                .map_or_else(|| "?".to_string(), |t| t.label.clone()),
            ShaderResource::RenderTarget(target) => target_label(target),
            ShaderResource::StructuredBuffer(buffer) => buffer_label(buffer),
        };
        self.commands.push(format!("bind_shader_resource {} slot={} {}", stage, slot, label));
        Ok(())
    }

    fn bind_sampler(&mut self, stage: ShaderStage, slot: u32, sampler: &dyn Sampler) -> Result<()> {
        let label = sampler.as_any().downcast_ref::<MockSampler>()
            .map_or_else(|| "?".to_string(), |s| s.label.clone());
        self.commands.push(format!("bind_sampler {} slot={} {}", stage, slot, label));
        Ok(())
    }

    fn draw_indexed(&mut self, index_count: u32, first_index: u32, base_vertex: i32) -> Result<()> {
        self.commands.push(format!("draw_indexed count={} first={} base={}", index_count, first_index, base_vertex));
        self.stats.record_draw(index_count);
        Ok(())
    }
}

// ============================================================================
// Mock StageCompiler
// ============================================================================

/// Source-scanning stand-in for the native compiler
///
/// Compiling returns the source bytes; a `#error` line fails the stage.
/// Reflection assigns `b`, `t` and `s` registers in declaration order unless
/// a `register(xN)` annotation is present, and reads the vertex input layout
/// from the parameters of `main`.
#[derive(Debug, Default)]
pub struct MockStageCompiler;

impl MockStageCompiler {
    fn register_of(tokens: &[String]) -> Option<u32> {
        let index = tokens.iter().position(|t| t == "register")?;
        tokens.get(index + 2)?.get(1..)?.parse().ok()
    }

    fn next_slot(used: &mut Vec<u32>, explicit: Option<u32>) -> u32 {
        let slot = explicit.unwrap_or_else(|| (0..).find(|s| !used.contains(s)).unwrap_or(0));
        used.push(slot);
        slot
    }

    fn parse_type(type_name: &str) -> VertexFormat {
        let (component_type, rest) = if let Some(rest) = type_name.strip_prefix("float") {
            (ComponentType::Float32, rest)
        } else if let Some(rest) = type_name.strip_prefix("uint") {
            (ComponentType::Uint32, rest)
        } else if let Some(rest) = type_name.strip_prefix("int") {
            (ComponentType::Sint32, rest)
        } else {
            return VertexFormat::Unknown;
        };
        let components = if rest.is_empty() { 1 } else { rest.parse().unwrap_or(0) };
        VertexFormat::from_components(components, component_type)
    }

    fn parse_semantic(semantic: &str) -> (String, u32) {
        let digits = semantic.len() - semantic.trim_end_matches(|c: char| c.is_ascii_digit()).len();
        let (name, index) = semantic.split_at(semantic.len() - digits);
        (name.to_string(), index.parse().unwrap_or(0))
    }

    fn input_layout(tokens: &[String]) -> Vec<InputElement> {
        let Some(start) = tokens.windows(2).position(|w| w[0] == "main" && w[1] == "(") else {
            return Vec::new();
        };
        let params = &tokens[start + 2..];
        let end = params.iter().position(|t| t == ")").unwrap_or(params.len());

        params[..end]
            .split(|t| t == ",")
            .filter_map(|param| match param {
                [type_name, _name, colon, semantic] if colon == ":" => {
                    let (semantic_name, semantic_index) = Self::parse_semantic(semantic);
                    Some(InputElement { semantic_name, semantic_index, format: Self::parse_type(type_name) })
                }
                _ => None,
            })
            .collect()
    }
}

impl StageCompiler for MockStageCompiler {
    fn compile_stage(&self, source: &str, stage: ShaderStage, _mode: CompileMode) -> Result<Vec<u8>> {
        if source.lines().any(|line| line.trim_start().starts_with("#error")) {
            return Err(Error::ShaderCompilation(format!("{} stage: #error directive", stage)));
        }
        Ok(source.as_bytes().to_vec())
    }

    fn reflect_stage(&self, bytecode: &[u8], stage: ShaderStage) -> Result<StageReflection> {
        let source = std::str::from_utf8(bytecode)
            .map_err(|err| Error::InvalidResource(format!("Bad mock bytecode: {}", err)))?;

        let mut reflection = StageReflection::default();
        let (mut b, mut t, mut s) = (Vec::new(), Vec::new(), Vec::new());
        let mut all_tokens = Vec::new();

        for line in source.lines() {
            let tokens = tokenize(line);
            if let (Some(keyword), Some(name)) = (tokens.first(), tokens.get(1)) {
                let explicit = Self::register_of(&tokens);
                let name = name.clone();
                if keyword == "cbuffer" {
                    let slot = Self::next_slot(&mut b, explicit);
                    reflection.constant_buffers.push(ConstantBufferInfo { name: name.clone(), slot, size: 16 });
                    reflection.bound_resources.push(BoundResource { name, kind: ResourceKind::ConstantBuffer, slot });
                } else if keyword.starts_with("Texture2D") {
                    let slot = Self::next_slot(&mut t, explicit);
                    reflection.bound_resources.push(BoundResource { name, kind: ResourceKind::Texture, slot });
                } else if keyword.starts_with("StructuredBuffer") {
                    let slot = Self::next_slot(&mut t, explicit);
                    reflection.bound_resources.push(BoundResource { name, kind: ResourceKind::StructuredBuffer, slot });
                } else if keyword == "SamplerState" {
                    let slot = Self::next_slot(&mut s, explicit);
                    reflection.bound_resources.push(BoundResource { name, kind: ResourceKind::Sampler, slot });
                }
            }
            all_tokens.extend(tokens);
        }

        if stage == ShaderStage::Vertex {
            reflection.input_parameters = Self::input_layout(&all_tokens);
        }
        Ok(reflection)
    }
}

// ============================================================================
// Mock Renderer
// ============================================================================

/// Mock Renderer that labels and counts created resources without GPU
#[derive(Debug, Default)]
pub struct MockRenderer {
    pub config: RendererConfig,
    pub commands: MockCommandList,
    pub compiler: MockStageCompiler,
    pub textures_created: u32,
    pub render_targets_created: u32,
    pub buffers_created: u32,
    pub samplers_created: u32,
    pub programs_created: u32,
}

impl MockRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recorded(&self) -> &[String] {
        &self.commands.commands
    }
}

impl Renderer for MockRenderer {
    fn create_texture(&mut self, desc: TextureDesc) -> Result<Arc<dyn Texture>> {
        desc.validate()?;
        let label = format!("tex{}", self.textures_created);
        self.textures_created += 1;
        Ok(Arc::new(MockTexture {
            info: TextureInfo { width: desc.width, height: desc.height, format: desc.format },
            label,
            updates: Mutex::new(0),
        }))
    }

    fn create_render_target(&mut self, desc: RenderTargetDesc) -> Result<Arc<dyn RenderTarget>> {
        desc.validate()?;
        let label = format!("rt{}", self.render_targets_created);
        self.render_targets_created += 1;
        Ok(Arc::new(MockRenderTarget { desc, label }))
    }

    fn create_buffer(&mut self, desc: BufferDesc) -> Result<Arc<dyn Buffer>> {
        desc.validate()?;
        let label = format!("buf{}", self.buffers_created);
        self.buffers_created += 1;
        let mut contents = vec![0u8; desc.size as usize];
        if let Some(data) = &desc.data {
            contents[..data.len()].copy_from_slice(data);
        }
        Ok(Arc::new(MockBuffer {
            info: BufferInfo { kind: desc.kind, size: desc.size },
            label,
            contents: Mutex::new(contents),
        }))
    }

    fn create_sampler(&mut self, desc: &SamplerDesc) -> Result<Arc<dyn Sampler>> {
        let label = format!("smp{}", self.samplers_created);
        self.samplers_created += 1;
        Ok(Arc::new(MockSampler { desc: *desc, label }))
    }

    fn create_shader_program(&mut self, compiled: &CompiledShader) -> Result<Arc<dyn ShaderProgram>> {
        if compiled.vertex_bytecode.is_none() {
            return Err(Error::ShaderCompilation("no vertex bytecode".to_string()));
        }
        let label = format!("prog{}", self.programs_created);
        self.programs_created += 1;
        Ok(Arc::new(MockShaderProgram {
            config: compiled.config,
            has_pixel_stage: compiled.pixel_bytecode.is_some(),
            label,
        }))
    }

    fn create_swap_chain(&mut self, _window: &Window, desc: SwapChainDesc) -> Result<Box<dyn SwapChain>> {
        Ok(Box::new(MockSwapChain::new(desc)))
    }

    fn stage_compiler(&self) -> &dyn StageCompiler {
        &self.compiler
    }

    fn command_list(&mut self) -> &mut dyn CommandList {
        &mut self.commands
    }

    fn config(&self) -> &RendererConfig {
        &self.config
    }

    fn stats(&self) -> RendererStats {
        self.commands.stats
    }

    fn reset_stats(&mut self) {
        self.commands.stats = RendererStats::default();
    }
}

#[cfg(test)]
#[path = "mock_renderer_tests.rs"]
mod tests;
