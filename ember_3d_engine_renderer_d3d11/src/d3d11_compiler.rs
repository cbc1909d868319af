/// FxcCompiler - native stage compiler and reflector over d3dcompiler_47
///
/// Implements the engine's `StageCompiler` seam: `D3DCompile` for bytecode,
/// `D3DReflect` for constant buffers, bound resources and the vertex input
/// signature.

use ember_3d_engine::ember3d::{
    Error,
    Result,
    shader::{
        BoundResource, CompileMode, ConstantBufferInfo, InputElement, ResourceKind, ShaderStage,
        StageCompiler, StageReflection, VertexFormat,
    },
};
use ember_3d_engine::engine_err;
use std::ffi::{c_void, CString};
use windows::core::{Interface, PCSTR};
use windows::Win32::Graphics::Direct3D::Fxc::{
    D3DCompile, D3DReflect, D3DCOMPILE_DEBUG, D3DCOMPILE_ENABLE_STRICTNESS,
    D3DCOMPILE_OPTIMIZATION_LEVEL3, D3DCOMPILE_SKIP_OPTIMIZATION,
};
use windows::Win32::Graphics::Direct3D::*;
use windows::Win32::Graphics::Direct3D11::*;

use crate::d3d11_format::component_type;

const ENTRY_POINT: &str = "main";

#[derive(Debug, Default)]
pub struct FxcCompiler;

impl FxcCompiler {
    pub fn new() -> Self {
        Self
    }

    fn flags(mode: CompileMode) -> u32 {
        match mode {
            CompileMode::Debug => D3DCOMPILE_DEBUG | D3DCOMPILE_SKIP_OPTIMIZATION | D3DCOMPILE_ENABLE_STRICTNESS,
            CompileMode::Release => D3DCOMPILE_OPTIMIZATION_LEVEL3 | D3DCOMPILE_ENABLE_STRICTNESS,
        }
    }
}

fn blob_bytes(blob: &ID3DBlob) -> &[u8] {
    unsafe { std::slice::from_raw_parts(blob.GetBufferPointer() as *const u8, blob.GetBufferSize()) }
}

fn pcstr_to_string(value: PCSTR) -> String {
    if value.is_null() {
        return String::new();
    }
    unsafe { String::from_utf8_lossy(value.as_bytes()).into_owned() }
}

fn resource_kind(input_type: D3D_SHADER_INPUT_TYPE) -> ResourceKind {
    match input_type {
        D3D_SIT_CBUFFER => ResourceKind::ConstantBuffer,
        D3D_SIT_TEXTURE => ResourceKind::Texture,
        D3D_SIT_STRUCTURED => ResourceKind::StructuredBuffer,
        D3D_SIT_SAMPLER => ResourceKind::Sampler,
        _ => ResourceKind::Other,
    }
}

impl StageCompiler for FxcCompiler {
    fn compile_stage(&self, source: &str, stage: ShaderStage, mode: CompileMode) -> Result<Vec<u8>> {
        let entry = CString::new(ENTRY_POINT)
            .map_err(|_| Error::ShaderCompilation("invalid entry point".to_string()))?;
        let target = CString::new(stage.target_profile())
            .map_err(|_| Error::ShaderCompilation("invalid target profile".to_string()))?;

        let mut code: Option<ID3DBlob> = None;
        let mut errors: Option<ID3DBlob> = None;
        let result = unsafe {
            D3DCompile(
                source.as_ptr() as *const c_void,
                source.len(),
                None,
                None,
                None,
                PCSTR(entry.as_ptr() as *const u8),
                PCSTR(target.as_ptr() as *const u8),
                Self::flags(mode),
                0,
                &mut code,
                Some(&mut errors),
            )
        };

        if let Err(e) = result {
            let diagnostic = match &errors {
                Some(blob) => String::from_utf8_lossy(blob_bytes(blob)).trim_end_matches('\0').trim().to_string(),
                None => e.to_string(),
            };
            return Err(Error::ShaderCompilation(format!("{} stage: {}", stage, diagnostic)));
        }

        match &code {
            Some(blob) => Ok(blob_bytes(blob).to_vec()),
            None => Err(Error::ShaderCompilation(format!("{} stage: compiler returned no bytecode", stage))),
        }
    }

    fn reflect_stage(&self, bytecode: &[u8], stage: ShaderStage) -> Result<StageReflection> {
        let reflector: ID3D11ShaderReflection = unsafe {
            let mut raw: *mut c_void = std::ptr::null_mut();
            D3DReflect(
                bytecode.as_ptr() as *const c_void,
                bytecode.len(),
                &ID3D11ShaderReflection::IID,
                &mut raw,
            )
            .map_err(|e| engine_err!("ember3d::d3d11", "D3DReflect ({} stage) failed: {}", stage, e))?;
            ID3D11ShaderReflection::from_raw(raw)
        };

        let mut shader_desc = D3D11_SHADER_DESC::default();
        unsafe {
            reflector
                .GetDesc(&mut shader_desc)
                .map_err(|e| engine_err!("ember3d::d3d11", "Shader reflection GetDesc failed: {}", e))?;
        }

        let mut reflection = StageReflection::default();

        for index in 0..shader_desc.BoundResources {
            let mut bind_desc = D3D11_SHADER_INPUT_BIND_DESC::default();
            unsafe {
                reflector
                    .GetResourceBindingDesc(index, &mut bind_desc)
                    .map_err(|e| engine_err!("ember3d::d3d11", "GetResourceBindingDesc({}) failed: {}", index, e))?;
            }

            let name = pcstr_to_string(bind_desc.Name);
            let kind = resource_kind(bind_desc.Type);

            if kind == ResourceKind::ConstantBuffer {
                let mut buffer_desc = D3D11_SHADER_BUFFER_DESC::default();
                unsafe {
                    if let Some(buffer) = reflector.GetConstantBufferByName(bind_desc.Name) {
                        buffer
                            .GetDesc(&mut buffer_desc)
                            .map_err(|e| engine_err!("ember3d::d3d11", "Constant buffer '{}' GetDesc failed: {}", name, e))?;
                    }
                }
                reflection.constant_buffers.push(ConstantBufferInfo {
                    name,
                    slot: bind_desc.BindPoint,
                    size: buffer_desc.Size,
                });
                continue;
            }

            reflection.bound_resources.push(BoundResource {
                name,
                kind,
                slot: bind_desc.BindPoint,
            });
        }

        if stage == ShaderStage::Vertex {
            for index in 0..shader_desc.InputParameters {
                let mut param = D3D11_SIGNATURE_PARAMETER_DESC::default();
                unsafe {
                    reflector
                        .GetInputParameterDesc(index, &mut param)
                        .map_err(|e| engine_err!("ember3d::d3d11", "GetInputParameterDesc({}) failed: {}", index, e))?;
                }

                // SV_VertexID and friends are generated, not fetched
                if param.SystemValueType != D3D_NAME_UNDEFINED {
                    continue;
                }

                reflection.input_parameters.push(InputElement {
                    semantic_name: pcstr_to_string(param.SemanticName),
                    semantic_index: param.SemanticIndex,
                    format: VertexFormat::from_signature(param.Mask, component_type(param.ComponentType)),
                });
            }
        }

        Ok(reflection)
    }
}

#[cfg(test)]
#[path = "d3d11_compiler_tests.rs"]
mod tests;
