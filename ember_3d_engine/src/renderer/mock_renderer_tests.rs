//! Unit tests for the mock renderer itself

use crate::renderer::*;
use crate::shader::{CompileMode, ResourceKind, ShaderStage, StageCompiler, VertexFormat};
use super::{MockBuffer, MockRenderer, MockStageCompiler};

// ============================================================================
// RESOURCES
// ============================================================================

#[test]
fn test_labels_count_per_kind() {
    let mut renderer = MockRenderer::new();
    renderer.create_buffer(BufferDesc::constant(16)).unwrap();
    renderer.create_buffer(BufferDesc::constant(16)).unwrap();
    renderer.create_render_target(RenderTargetDesc::new(4, 4, TextureFormat::RGBA8_UNORM)).unwrap();

    assert_eq!(renderer.buffers_created, 2);
    assert_eq!(renderer.render_targets_created, 1);
    assert_eq!(renderer.textures_created, 0);
}

#[test]
fn test_invalid_descs_are_rejected() {
    let mut renderer = MockRenderer::new();
    assert!(renderer.create_buffer(BufferDesc::structured(0, 4)).is_err());
    assert!(renderer.create_render_target(RenderTargetDesc::new(0, 4, TextureFormat::D32_FLOAT)).is_err());
    assert!(renderer.create_texture(TextureDesc {
        width: 4,
        height: 4,
        format: TextureFormat::D32_FLOAT,
        data: None,
    }).is_err());
}

#[test]
fn test_buffer_update_writes_contents() {
    let mut renderer = MockRenderer::new();
    let buffer = renderer.create_buffer(BufferDesc::constant(16)).unwrap();

    buffer.update(4, &[1, 2, 3, 4]).unwrap();
    assert!(buffer.update(14, &[0; 4]).is_err());

    let mock = buffer.as_any().downcast_ref::<MockBuffer>().unwrap();
    assert_eq!(&mock.contents.lock().unwrap()[..8], &[0, 0, 0, 0, 1, 2, 3, 4]);
}

// ============================================================================
// STAGE COMPILER
// ============================================================================

#[test]
fn test_error_directive_fails_compile() {
    let result = MockStageCompiler.compile_stage("#error bad\n", ShaderStage::Pixel, CompileMode::Release);
    assert!(result.is_err());
}

#[test]
fn test_registers_and_declaration_order() {
    let source = "\
cbuffer A
cbuffer B : register(b0)
Texture2D t0;
SamplerState s : register(s3)
";
    let reflection = MockStageCompiler.reflect_stage(source.as_bytes(), ShaderStage::Pixel).unwrap();

    let slots: Vec<(&str, u32)> = reflection.constant_buffers.iter().map(|c| (c.name.as_str(), c.slot)).collect();
    assert_eq!(slots, vec![("A", 0), ("B", 0)]);

    let sampler = reflection.bound_resources.iter().find(|r| r.kind == ResourceKind::Sampler).unwrap();
    assert_eq!(sampler.slot, 3);
    assert!(reflection.input_parameters.is_empty());
}

#[test]
fn test_vertex_input_types() {
    let source = "float4 main(uint id : SV_VERTEXID, int2 cell : CELL3, float weight : WEIGHT) : SV_POSITION";
    let reflection = MockStageCompiler.reflect_stage(source.as_bytes(), ShaderStage::Vertex).unwrap();

    let elements: Vec<(&str, u32, VertexFormat)> = reflection.input_parameters
        .iter()
        .map(|e| (e.semantic_name.as_str(), e.semantic_index, e.format))
        .collect();
    assert_eq!(elements, vec![
        ("SV_VERTEXID", 0, VertexFormat::R32_UINT),
        ("CELL", 3, VertexFormat::R32G32_SINT),
        ("WEIGHT", 0, VertexFormat::R32_FLOAT),
    ]);
}
