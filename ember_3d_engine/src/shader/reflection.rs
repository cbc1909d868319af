//! Per-stage reflection data and vertex input formats

use crate::shader::bind_point::BindingKind;

/// Component type of a signature parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentType {
    Unknown,
    Uint32,
    Sint32,
    Float32,
}

/// Vertex attribute format derived from the vertex-stage input signature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(non_camel_case_types)]
pub enum VertexFormat {
    Unknown,
    R32_UINT,
    R32_SINT,
    R32_FLOAT,
    R32G32_UINT,
    R32G32_SINT,
    R32G32_FLOAT,
    R32G32B32_UINT,
    R32G32B32_SINT,
    R32G32B32_FLOAT,
    R32G32B32A32_UINT,
    R32G32B32A32_SINT,
    R32G32B32A32_FLOAT,
}

impl VertexFormat {
    /// Format from a signature component mask and component type
    ///
    /// The mask is read as a component count: 1 → R, ≤3 → RG, ≤7 → RGB,
    /// ≤15 → RGBA.
    pub fn from_signature(mask: u8, component_type: ComponentType) -> VertexFormat {
        let components = match mask {
            1 => 1,
            2..=3 => 2,
            4..=7 => 3,
            8..=15 => 4,
            _ => return VertexFormat::Unknown,
        };
        Self::from_components(components, component_type)
    }

    pub fn from_components(components: u32, component_type: ComponentType) -> VertexFormat {
        use VertexFormat::*;
        match (components, component_type) {
            (1, ComponentType::Uint32) => R32_UINT,
            (1, ComponentType::Sint32) => R32_SINT,
            (1, ComponentType::Float32) => R32_FLOAT,
            (2, ComponentType::Uint32) => R32G32_UINT,
            (2, ComponentType::Sint32) => R32G32_SINT,
            (2, ComponentType::Float32) => R32G32_FLOAT,
            (3, ComponentType::Uint32) => R32G32B32_UINT,
            (3, ComponentType::Sint32) => R32G32B32_SINT,
            (3, ComponentType::Float32) => R32G32B32_FLOAT,
            (4, ComponentType::Uint32) => R32G32B32A32_UINT,
            (4, ComponentType::Sint32) => R32G32B32A32_SINT,
            (4, ComponentType::Float32) => R32G32B32A32_FLOAT,
            _ => Unknown,
        }
    }

    pub fn component_count(self) -> u32 {
        use VertexFormat::*;
        match self {
            Unknown => 0,
            R32_UINT | R32_SINT | R32_FLOAT => 1,
            R32G32_UINT | R32G32_SINT | R32G32_FLOAT => 2,
            R32G32B32_UINT | R32G32B32_SINT | R32G32B32_FLOAT => 3,
            R32G32B32A32_UINT | R32G32B32A32_SINT | R32G32B32A32_FLOAT => 4,
        }
    }

    /// Size of one attribute in bytes
    pub fn size_bytes(self) -> u32 {
        self.component_count() * 4
    }
}

/// One vertex attribute of the input layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputElement {
    pub semantic_name: String,
    pub semantic_index: u32,
    pub format: VertexFormat,
}

/// Resource class reported by reflection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    ConstantBuffer,
    Texture,
    StructuredBuffer,
    Sampler,
    /// UAVs, byte-address buffers and the like, not bound by the engine
    Other,
}

impl ResourceKind {
    /// Bind-point kind for resources that go through the bind-point table
    pub fn binding_kind(self) -> Option<BindingKind> {
        match self {
            ResourceKind::ConstantBuffer => Some(BindingKind::ConstantBuffer),
            ResourceKind::Texture => Some(BindingKind::Texture),
            ResourceKind::StructuredBuffer => Some(BindingKind::StructuredBuffer),
            ResourceKind::Sampler | ResourceKind::Other => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstantBufferInfo {
    pub name: String,
    pub slot: u32,
    pub size: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundResource {
    pub name: String,
    pub kind: ResourceKind,
    pub slot: u32,
}

/// Everything reflection reports for one compiled stage
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageReflection {
    pub constant_buffers: Vec<ConstantBufferInfo>,
    /// Textures, structured buffers and samplers (constant buffers are listed above)
    pub bound_resources: Vec<BoundResource>,
    /// Vertex stage only
    pub input_parameters: Vec<InputElement>,
}

#[cfg(test)]
#[path = "reflection_tests.rs"]
mod tests;
