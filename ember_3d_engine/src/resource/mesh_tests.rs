/// Tests for Mesh resource
///
/// Buffers are created by the mock renderer, so contents can be inspected
/// after updates.

use super::*;
use crate::renderer::mock_renderer::{MockBuffer, MockRenderer};
use glam::{Vec2, Vec3};

// ============================================================================
// Helper Functions
// ============================================================================

fn triangle() -> (Vec<Vertex>, Vec<u32>) {
    let vertices = vec![
        Vertex::new(Vec3::new(0.0, 0.5, 0.0), Vec3::Z, Vec2::new(0.5, 0.0)),
        Vertex::new(Vec3::new(0.5, -0.5, 0.0), Vec3::Z, Vec2::new(1.0, 1.0)),
        Vertex::new(Vec3::new(-0.5, -0.5, 0.0), Vec3::Z, Vec2::new(0.0, 1.0)),
    ];
    (vertices, vec![0, 1, 2])
}

fn contents(buffer: &Arc<dyn Buffer>) -> Vec<u8> {
    buffer.as_any().downcast_ref::<MockBuffer>().unwrap().contents.lock().unwrap().clone()
}

// ============================================================================
// Vertex layout
// ============================================================================

#[test]
fn test_vertex_stride_is_48_bytes() {
    assert_eq!(Vertex::STRIDE, 48);
    assert_eq!(std::mem::offset_of!(Vertex, normal), 16);
    assert_eq!(std::mem::offset_of!(Vertex, tangent), 28);
    assert_eq!(std::mem::offset_of!(Vertex, uv), 40);
}

#[test]
fn test_vertex_new_sets_w_to_one() {
    let v = Vertex::new(Vec3::new(1.0, 2.0, 3.0), Vec3::Y, Vec2::ZERO);
    assert_eq!(v.position.w, 1.0);
    assert_eq!(v.tangent, Vec3::ZERO);
}

// ============================================================================
// Creation
// ============================================================================

#[test]
fn test_mesh_new_creates_buffers() {
    let mut renderer = MockRenderer::new();
    let (vertices, indices) = triangle();

    let mesh = Mesh::new(&mut renderer, &vertices, &indices).unwrap();

    assert_eq!(mesh.vertex_count(), 3);
    assert_eq!(mesh.index_count(), 3);
    assert_eq!(mesh.vertex_stride(), 48);
    assert_eq!(mesh.vertex_buffer().info().kind, BufferKind::Vertex { stride: 48 });
    assert_eq!(mesh.index_buffer().info().kind, BufferKind::Index);
    assert_eq!(mesh.index_buffer().info().element_count(), 3);
    assert_eq!(contents(mesh.vertex_buffer()), bytemuck::cast_slice::<Vertex, u8>(&vertices));
}

#[test]
fn test_empty_mesh_is_rejected() {
    let mut renderer = MockRenderer::new();
    assert!(Mesh::new(&mut renderer, &[], &[]).is_err());
}

// ============================================================================
// Updates
// ============================================================================

#[test]
fn test_update_in_place_when_it_fits() {
    let mut renderer = MockRenderer::new();
    let (mut vertices, indices) = triangle();
    let mut mesh = Mesh::new(&mut renderer, &vertices, &indices).unwrap();

    vertices.truncate(2);
    vertices[0].uv = Vec2::new(0.25, 0.75);
    mesh.update_vertices(&mut renderer, &vertices).unwrap();
    mesh.update_indices(&mut renderer, &[2, 1, 0]).unwrap();

    assert_eq!(renderer.buffers_created, 2);
    assert_eq!(mesh.vertex_count(), 2);
    assert_eq!(&contents(mesh.vertex_buffer())[..96], bytemuck::cast_slice::<Vertex, u8>(&vertices));
    assert_eq!(contents(mesh.index_buffer()), bytemuck::cast_slice::<u32, u8>(&[2, 1, 0]));
}

#[test]
fn test_update_grows_buffers() {
    let mut renderer = MockRenderer::new();
    let (vertices, indices) = triangle();
    let mut mesh = Mesh::new(&mut renderer, &vertices, &indices).unwrap();

    let mut more = vertices.clone();
    more.extend_from_slice(&vertices);
    mesh.update_vertices(&mut renderer, &more).unwrap();
    mesh.update_indices(&mut renderer, &[0, 1, 2, 3, 4, 5]).unwrap();

    assert_eq!(renderer.buffers_created, 4);
    assert_eq!(mesh.vertex_count(), 6);
    assert_eq!(mesh.index_count(), 6);
    assert_eq!(mesh.vertex_buffer().info().size, 6 * 48);
}
