//! CPU-side mesh assembly

use glam::{Mat3, Mat4, Vec2, Vec3, Vec4};

use crate::error::Result;
use crate::resource::mesh::{Mesh, Vertex};
use crate::renderer::Renderer;

#[derive(Debug, Clone, Default)]
pub struct MeshBuilder {
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
}

impl MeshBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_data(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    /// Full-screen quad in clip space, UV origin at the top-left
    pub fn screen_quad() -> Self {
        let corner = |x: f32, y: f32, u: f32, v: f32| Vertex {
            position: Vec4::new(x, y, 0.0, 1.0),
            normal: Vec3::Z,
            tangent: Vec3::X,
            uv: Vec2::new(u, v),
        };
        Self::from_data(
            vec![
                corner(-1.0, -1.0, 0.0, 1.0),
                corner(1.0, -1.0, 1.0, 1.0),
                corner(1.0, 1.0, 1.0, 0.0),
                corner(-1.0, 1.0, 0.0, 0.0),
            ],
            vec![0, 1, 2, 0, 2, 3],
        )
    }

    /// Append a vertex and return its index
    pub fn push_vertex(&mut self, vertex: Vertex) -> u32 {
        self.vertices.push(vertex);
        self.vertices.len() as u32 - 1
    }

    pub fn push_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn build(&self, renderer: &mut dyn Renderer) -> Result<Mesh> {
        Mesh::new(renderer, &self.vertices, &self.indices)
    }

    /// Vertices with positions transformed by `transform` and normals by its upper 3x3
    pub fn transformed_vertices(&self, transform: Mat4) -> Vec<Vertex> {
        let normal_matrix = Mat3::from_mat4(transform);
        self.vertices
            .iter()
            .map(|v| Vertex {
                position: transform * v.position,
                normal: normal_matrix * v.normal,
                ..*v
            })
            .collect()
    }

    pub fn build_with_transform(&self, renderer: &mut dyn Renderer, transform: Mat4) -> Result<Mesh> {
        Mesh::new(renderer, &self.transformed_vertices(transform), &self.indices)
    }
}

#[cfg(test)]
#[path = "mesh_builder_tests.rs"]
mod tests;
