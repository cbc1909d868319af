//! Indexed triangle mesh
//!
//! Vertex layout (48 bytes):
//!
//! ```text
//! offset  0  POSITION  float4
//! offset 16  NORMAL    float3
//! offset 28  TANGENT   float3
//! offset 40  TEXCOORD  float2
//! ```

use std::sync::Arc;
use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3, Vec4};

use crate::error::Result;
use crate::renderer::{Buffer, BufferDesc, BufferKind, Renderer};

/// Mesh vertex, matches the input layout of the engine's shaders
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct Vertex {
    pub position: Vec4,
    pub normal: Vec3,
    pub tangent: Vec3,
    pub uv: Vec2,
}

impl Vertex {
    /// Size of one vertex in bytes
    pub const STRIDE: u32 = std::mem::size_of::<Vertex>() as u32;

    pub fn new(position: Vec3, normal: Vec3, uv: Vec2) -> Self {
        Self {
            position: position.extend(1.0),
            normal,
            tangent: Vec3::ZERO,
            uv,
        }
    }
}

/// GPU vertex and index buffers of an indexed triangle list
pub struct Mesh {
    vertex_buffer: Arc<dyn Buffer>,
    index_buffer: Arc<dyn Buffer>,
    vertex_count: u32,
    index_count: u32,
}

impl Mesh {
    pub fn new(renderer: &mut dyn Renderer, vertices: &[Vertex], indices: &[u32]) -> Result<Mesh> {
        let vertex_buffer = Self::create_vertex_buffer(renderer, vertices)?;
        let index_buffer = renderer.create_buffer(BufferDesc::index(indices))?;
        Ok(Mesh {
            vertex_buffer,
            index_buffer,
            vertex_count: vertices.len() as u32,
            index_count: indices.len() as u32,
        })
    }

    fn create_vertex_buffer(renderer: &mut dyn Renderer, vertices: &[Vertex]) -> Result<Arc<dyn Buffer>> {
        renderer.create_buffer(BufferDesc::vertex(Vertex::STRIDE, bytemuck::cast_slice(vertices)))
    }

    /// Replace the vertices, growing the buffer when they no longer fit
    pub fn update_vertices(&mut self, renderer: &mut dyn Renderer, vertices: &[Vertex]) -> Result<()> {
        let bytes: &[u8] = bytemuck::cast_slice(vertices);
        if bytes.len() as u64 <= self.vertex_buffer.info().size {
            self.vertex_buffer.update(0, bytes)?;
        } else {
            self.vertex_buffer = Self::create_vertex_buffer(renderer, vertices)?;
        }
        self.vertex_count = vertices.len() as u32;
        Ok(())
    }

    /// Replace the indices, growing the buffer when they no longer fit
    pub fn update_indices(&mut self, renderer: &mut dyn Renderer, indices: &[u32]) -> Result<()> {
        let bytes: &[u8] = bytemuck::cast_slice(indices);
        if bytes.len() as u64 <= self.index_buffer.info().size {
            self.index_buffer.update(0, bytes)?;
        } else {
            self.index_buffer = renderer.create_buffer(BufferDesc::index(indices))?;
        }
        self.index_count = indices.len() as u32;
        Ok(())
    }

    pub fn vertex_buffer(&self) -> &Arc<dyn Buffer> {
        &self.vertex_buffer
    }

    pub fn index_buffer(&self) -> &Arc<dyn Buffer> {
        &self.index_buffer
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    /// Indices drawn by `RenderCommand::draw_mesh`
    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    pub fn vertex_stride(&self) -> u32 {
        match self.vertex_buffer.info().kind {
            BufferKind::Vertex { stride } => stride,
            _ => Vertex::STRIDE,
        }
    }
}

#[cfg(test)]
#[path = "mesh_tests.rs"]
mod tests;
