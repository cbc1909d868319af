//! Tests for MeshBuilder

use super::*;
use crate::renderer::mock_renderer::MockRenderer;

#[test]
fn test_screen_quad_covers_clip_space() {
    let quad = MeshBuilder::screen_quad();
    assert_eq!(quad.indices(), &[0, 1, 2, 0, 2, 3]);

    let corners: Vec<(f32, f32)> = quad.vertices().iter().map(|v| (v.position.x, v.position.y)).collect();
    assert_eq!(corners, vec![(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)]);
}

#[test]
fn test_screen_quad_uv_origin_is_top_left() {
    let quad = MeshBuilder::screen_quad();
    let top_left = quad.vertices().iter().find(|v| v.position.x < 0.0 && v.position.y > 0.0).unwrap();
    assert_eq!(top_left.uv, Vec2::ZERO);
}

#[test]
fn test_push_vertex_returns_index() {
    let mut builder = MeshBuilder::new();
    let a = builder.push_vertex(Vertex::default());
    let b = builder.push_vertex(Vertex::default());
    let c = builder.push_vertex(Vertex::default());
    builder.push_triangle(a, b, c);

    assert_eq!((a, b, c), (0, 1, 2));
    assert_eq!(builder.indices(), &[0, 1, 2]);
}

#[test]
fn test_transform_moves_positions_and_rotates_normals() {
    let builder = MeshBuilder::from_data(
        vec![Vertex::new(Vec3::new(1.0, 0.0, 0.0), Vec3::X, Vec2::ZERO)],
        vec![0, 0, 0],
    );
    let transform = Mat4::from_translation(Vec3::new(0.0, 0.0, 5.0))
        * Mat4::from_rotation_z(std::f32::consts::FRAC_PI_2);

    let moved = builder.transformed_vertices(transform);

    assert!((moved[0].position - Vec4::new(0.0, 1.0, 5.0, 1.0)).length() < 1e-5);
    assert!((moved[0].normal - Vec3::Y).length() < 1e-5);
    assert_eq!(builder.vertices()[0].position.x, 1.0);
}

#[test]
fn test_build_creates_mesh() {
    let mut renderer = MockRenderer::new();
    let mesh = MeshBuilder::screen_quad().build(&mut renderer).unwrap();
    assert_eq!(mesh.vertex_count(), 4);
    assert_eq!(mesh.index_count(), 6);

    let scaled = MeshBuilder::screen_quad()
        .build_with_transform(&mut renderer, Mat4::from_scale(Vec3::splat(0.5)))
        .unwrap();
    assert_eq!(scaled.index_count(), 6);
    assert_eq!(renderer.buffers_created, 4);
}
