//! Resource module
//!
//! GPU meshes and the CPU-side mesh builder.

pub mod mesh;
pub mod mesh_builder;

pub use mesh::{Mesh, Vertex};
pub use mesh_builder::MeshBuilder;
