//! Shader compiler driver
//!
//! Partitions the source, compiles each stage through a `StageCompiler`
//! (the native compiler seam implemented by backends), then reflects the
//! bytecode into raw bindings, resolved samplers and the input layout.

use crate::error::Result;
use crate::shader::bind_point::{BindPointTable, RawBinding, ShaderStage};
use crate::shader::config::ShaderConfig;
use crate::shader::reflection::{InputElement, ResourceKind, StageReflection};
use crate::shader::sampler::SamplerDeclaration;
use crate::shader::source::ShaderSource;

/// Native compiler flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompileMode {
    /// Debug info, no optimization
    Debug,
    /// Optimization level 3
    Release,
}

impl Default for CompileMode {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            CompileMode::Debug
        } else {
            CompileMode::Release
        }
    }
}

/// Native per-stage compiler and reflector
pub trait StageCompiler {
    /// Compile assembled stage source (entry point `main`) into bytecode
    ///
    /// The error carries the compiler diagnostic.
    fn compile_stage(&self, source: &str, stage: ShaderStage, mode: CompileMode) -> Result<Vec<u8>>;

    /// Reflect compiled bytecode
    fn reflect_stage(&self, bytecode: &[u8], stage: ShaderStage) -> Result<StageReflection>;
}

/// Output of the compiler driver
///
/// A stage whose section is missing or failed to compile has no bytecode.
#[derive(Debug, Clone, Default)]
pub struct CompiledShader {
    pub config: ShaderConfig,
    pub vertex_bytecode: Option<Vec<u8>>,
    pub pixel_bytecode: Option<Vec<u8>>,
    pub input_layout: Vec<InputElement>,
    pub bindings: Vec<RawBinding>,
    pub samplers: Vec<SamplerDeclaration>,
    pub failed_stages: Vec<ShaderStage>,
}

impl CompiledShader {
    pub fn bytecode(&self, stage: ShaderStage) -> Option<&[u8]> {
        match stage {
            ShaderStage::Vertex => self.vertex_bytecode.as_deref(),
            ShaderStage::Pixel => self.pixel_bytecode.as_deref(),
        }
    }

    /// No stage failed and the vertex stage is present
    pub fn is_complete(&self) -> bool {
        self.failed_stages.is_empty() && self.vertex_bytecode.is_some()
    }

    /// Merge the raw bindings of all stages by name
    pub fn bind_points(&self) -> BindPointTable {
        BindPointTable::from_bindings(&self.bindings)
    }

    /// Samplers that received a stage and a slot from reflection
    pub fn resolved_samplers(&self) -> impl Iterator<Item = &SamplerDeclaration> {
        self.samplers.iter().filter(|s| s.is_resolved())
    }

    fn set_bytecode(&mut self, stage: ShaderStage, bytecode: Vec<u8>) {
        match stage {
            ShaderStage::Vertex => self.vertex_bytecode = Some(bytecode),
            ShaderStage::Pixel => self.pixel_bytecode = Some(bytecode),
        }
    }

    /// Record one stage's reflection
    ///
    /// `declared` holds the samplers the source declared for this stage; a
    /// reflected sampler resolves the declaration with the same name.
    pub(crate) fn absorb_reflection(
        &mut self,
        stage: ShaderStage,
        reflection: StageReflection,
        mut declared: Vec<SamplerDeclaration>,
    ) {
        for cb in reflection.constant_buffers {
            self.bindings.push(RawBinding {
                name: cb.name,
                stage,
                slot: cb.slot,
                kind: crate::shader::BindingKind::ConstantBuffer,
            });
        }

        for resource in reflection.bound_resources {
            // constant buffers are already listed above
            if resource.kind == ResourceKind::ConstantBuffer {
                continue;
            }
            if let Some(kind) = resource.kind.binding_kind() {
                self.bindings.push(RawBinding { name: resource.name, stage, slot: resource.slot, kind });
            } else if resource.kind == ResourceKind::Sampler {
                match declared.iter_mut().find(|d| d.name == resource.name) {
                    Some(declaration) => {
                        declaration.stage = Some(stage);
                        declaration.slot = Some(resource.slot);
                    }
                    None => {
                        crate::engine_warn!("ember3d::shader",
                            "Sampler '{}' in the {} stage has no StaticSampler declaration, it will not be bound",
                            resource.name, stage);
                    }
                }
            }
        }

        if stage == ShaderStage::Vertex {
            self.input_layout = reflection.input_parameters;
        }

        for declaration in &declared {
            if declaration.slot.is_none() {
                crate::engine_debug!("ember3d::shader",
                    "Sampler '{}' is not used by the {} stage", declaration.name, stage);
            }
        }
        self.samplers.extend(declared);
    }
}

/// Shader compiler driver
pub struct ShaderCompiler;

impl ShaderCompiler {
    /// Compile every stage of a shader source
    ///
    /// A stage failure is logged and recorded in `failed_stages`; the other
    /// stage is still compiled.
    pub fn compile(source: &str, compiler: &dyn StageCompiler, mode: CompileMode) -> CompiledShader {
        let parsed = ShaderSource::parse(source);
        let mut compiled = CompiledShader {
            config: ShaderConfig::parse(parsed.config_text()),
            ..Default::default()
        };

        for section in parsed.unknown_sections() {
            crate::engine_warn!("ember3d::shader",
                "Skipping unknown section '{}'", section.name);
        }

        for stage in ShaderStage::ALL {
            let Some(stage_source) = parsed.assemble(stage) else {
                crate::engine_debug!("ember3d::shader", "No {} section", stage);
                continue;
            };

            let bytecode = match compiler.compile_stage(&stage_source, stage, mode) {
                Ok(bytecode) => bytecode,
                Err(err) => {
                    crate::engine_error!("ember3d::shader",
                        "Failed to compile {} stage: {}", stage, err);
                    compiled.failed_stages.push(stage);
                    continue;
                }
            };

            match compiler.reflect_stage(&bytecode, stage) {
                Ok(reflection) => {
                    compiled.absorb_reflection(stage, reflection, parsed.stage_samplers(stage));
                    compiled.set_bytecode(stage, bytecode);
                }
                Err(err) => {
                    crate::engine_error!("ember3d::shader",
                        "Failed to reflect {} stage: {}", stage, err);
                    compiled.failed_stages.push(stage);
                }
            }
        }

        crate::engine_debug!("ember3d::shader",
            "Compiled shader: {} binding(s), {} sampler(s), {} input element(s)",
            compiled.bindings.len(), compiled.samplers.len(), compiled.input_layout.len());

        compiled
    }

    /// Reflect precompiled stage bytecode
    ///
    /// Precompiled bytecode carries no `StaticSampler` declarations, so its
    /// samplers stay unbound.
    pub fn from_bytecode(
        vertex: Vec<u8>,
        pixel: Option<Vec<u8>>,
        compiler: &dyn StageCompiler,
    ) -> Result<CompiledShader> {
        let mut compiled = CompiledShader::default();

        let reflection = compiler.reflect_stage(&vertex, ShaderStage::Vertex)?;
        compiled.absorb_reflection(ShaderStage::Vertex, reflection, Vec::new());
        compiled.set_bytecode(ShaderStage::Vertex, vertex);

        if let Some(pixel) = pixel {
            let reflection = compiler.reflect_stage(&pixel, ShaderStage::Pixel)?;
            compiled.absorb_reflection(ShaderStage::Pixel, reflection, Vec::new());
            compiled.set_bytecode(ShaderStage::Pixel, pixel);
        }

        Ok(compiled)
    }
}

#[cfg(test)]
#[path = "compiler_tests.rs"]
mod tests;
