//! Shader: compiled program plus its bind-point table and static samplers

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::renderer::{Renderer, Sampler, ShaderProgram};
use crate::shader::bind_point::{BindPoint, BindPointTable, ShaderStage};
use crate::shader::compiler::{CompiledShader, ShaderCompiler};
use crate::shader::config::ShaderConfig;
use crate::shader::reflection::InputElement;
use crate::shader::sampler::SamplerDeclaration;

/// A resolved static sampler and its native sampler object
#[derive(Clone)]
pub struct ShaderSampler {
    pub declaration: SamplerDeclaration,
    pub sampler: Arc<dyn Sampler>,
}

impl ShaderSampler {
    /// Stage and register the sampler is bound to
    pub fn binding(&self) -> Option<(ShaderStage, u32)> {
        Some((self.declaration.stage?, self.declaration.slot?))
    }
}

/// Immutable shader aggregate
///
/// Native objects are released when the last `Arc<Shader>` is dropped.
pub struct Shader {
    program: Arc<dyn ShaderProgram>,
    config: ShaderConfig,
    bind_points: BindPointTable,
    samplers: Vec<ShaderSampler>,
    input_layout: Vec<InputElement>,
}

impl Shader {
    /// Compile a shader from source text
    ///
    /// # Errors
    ///
    /// `Error::ShaderCompilation` if any stage failed or the source has no
    /// vertex stage. Use `ShaderCompiler::compile` directly to inspect a
    /// partially compiled shader.
    pub fn from_source(renderer: &mut dyn Renderer, source: &str) -> Result<Arc<Shader>> {
        let mode = renderer.config().compile_mode;
        let compiled = ShaderCompiler::compile(source, renderer.stage_compiler(), mode);
        Self::from_compiled(renderer, &compiled)
    }

    /// Read and compile a shader source file
    pub fn from_file(renderer: &mut dyn Renderer, path: impl AsRef<Path>) -> Result<Arc<Shader>> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|err| {
            crate::engine_error!("ember3d::shader", "Cannot read shader '{}': {}", path.display(), err);
            Error::InvalidResource(format!("Cannot read shader '{}': {}", path.display(), err))
        })?;
        crate::engine_debug!("ember3d::shader", "Compiling shader '{}'", path.display());
        Self::from_source(renderer, &source)
    }

    /// Load precompiled stage bytecode from the renderer's shader binary folder
    ///
    /// Precompiled shaders have no static samplers and use the default config.
    pub fn from_binaries(
        renderer: &mut dyn Renderer,
        vertex_file: &str,
        pixel_file: Option<&str>,
    ) -> Result<Arc<Shader>> {
        let dir = renderer.config().shader_binary_dir.clone();
        let read = |file: &str| -> Result<Vec<u8>> {
            let path = dir.join(file);
            std::fs::read(&path).map_err(|err| {
                crate::engine_error!("ember3d::shader", "Cannot read shader binary '{}': {}", path.display(), err);
                Error::InvalidResource(format!("Cannot read shader binary '{}': {}", path.display(), err))
            })
        };

        let vertex = read(vertex_file)?;
        let pixel = pixel_file.map(read).transpose()?;
        let compiled = ShaderCompiler::from_bytecode(vertex, pixel, renderer.stage_compiler())?;
        Self::from_compiled(renderer, &compiled)
    }

    /// Create the native program and samplers for an already compiled shader
    pub fn from_compiled(renderer: &mut dyn Renderer, compiled: &CompiledShader) -> Result<Arc<Shader>> {
        if !compiled.failed_stages.is_empty() {
            let stages: Vec<String> = compiled.failed_stages.iter().map(|s| s.to_string()).collect();
            return Err(Error::ShaderCompilation(format!("failed stage(s): {}", stages.join(", "))));
        }
        if compiled.vertex_bytecode.is_none() {
            return Err(Error::ShaderCompilation("shader has no vertex stage".to_string()));
        }

        let program = renderer.create_shader_program(compiled)?;

        let mut samplers = Vec::new();
        for declaration in compiled.resolved_samplers() {
            let sampler = renderer.create_sampler(&declaration.desc)?;
            samplers.push(ShaderSampler { declaration: declaration.clone(), sampler });
        }

        Ok(Arc::new(Shader {
            program,
            config: compiled.config,
            bind_points: compiled.bind_points(),
            samplers,
            input_layout: compiled.input_layout.clone(),
        }))
    }

    pub fn program(&self) -> &Arc<dyn ShaderProgram> {
        &self.program
    }

    pub fn config(&self) -> &ShaderConfig {
        &self.config
    }

    pub fn bind_points(&self) -> &BindPointTable {
        &self.bind_points
    }

    /// Look up a resource by the name used in the shader source
    pub fn bind_point(&self, name: &str) -> Option<&BindPoint> {
        self.bind_points.get(name)
    }

    /// Static samplers that reflection resolved to a stage and slot
    pub fn samplers(&self) -> &[ShaderSampler] {
        &self.samplers
    }

    pub fn input_layout(&self) -> &[InputElement] {
        &self.input_layout
    }
}

impl PartialEq for Shader {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.program, &other.program)
    }
}

impl fmt::Debug for Shader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shader")
            .field("config", &self.config)
            .field("bind_points", &self.bind_points.len())
            .field("samplers", &self.samplers.len())
            .field("input_layout", &self.input_layout)
            .finish()
    }
}

#[cfg(test)]
#[path = "shader_tests.rs"]
mod tests;
