//! Name-indexed bind-point table
//!
//! Each stage's reflection yields raw (name, stage, slot, kind) bindings. The
//! table merges them by name: a resource declared in both stages ends up as a
//! single entry whose stage mask has both bits set and whose vertex and pixel
//! slots are both populated.

use std::fmt;
use bitflags::bitflags;
use rustc_hash::FxHashMap;

/// Programmable pipeline stage handled by the shader compiler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Pixel,
}

impl ShaderStage {
    /// Stages in compile order
    pub const ALL: [ShaderStage; 2] = [ShaderStage::Vertex, ShaderStage::Pixel];

    /// Native compiler target profile
    pub fn target_profile(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vs_5_0",
            ShaderStage::Pixel => "ps_5_0",
        }
    }

    /// Name of the `#section` holding this stage's code
    pub fn section_name(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Pixel => "pixel",
        }
    }

    pub fn from_section_name(name: &str) -> Option<ShaderStage> {
        match name {
            "vertex" => Some(ShaderStage::Vertex),
            "pixel" => Some(ShaderStage::Pixel),
            _ => None,
        }
    }

    pub fn flag(self) -> ShaderStageFlags {
        match self {
            ShaderStage::Vertex => ShaderStageFlags::VERTEX,
            ShaderStage::Pixel => ShaderStageFlags::PIXEL,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.section_name())
    }
}

bitflags! {
    /// Set of stages a bind point is visible to
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ShaderStageFlags: u32 {
        const VERTEX = 1 << 0;
        const PIXEL = 1 << 1;
    }
}

impl ShaderStageFlags {
    /// Stages contained in this mask, in compile order
    pub fn stages(self) -> impl Iterator<Item = ShaderStage> {
        ShaderStage::ALL.into_iter().filter(move |stage| self.contains(stage.flag()))
    }
}

/// What kind of resource a bind point refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingKind {
    /// `cbuffer`, bound with b registers
    ConstantBuffer,
    /// `Texture2D`, bound with t registers
    Texture,
    /// `StructuredBuffer<T>`, bound with t registers
    StructuredBuffer,
}

/// One binding as reported by a single stage's reflection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBinding {
    pub name: String,
    pub stage: ShaderStage,
    pub slot: u32,
    pub kind: BindingKind,
}

/// A named resource resolved to its native per-stage register slots
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BindPoint {
    pub stages: ShaderStageFlags,
    pub kind: BindingKind,
    pub vertex_slot: Option<u32>,
    pub pixel_slot: Option<u32>,
}

impl BindPoint {
    fn new(kind: BindingKind) -> Self {
        Self {
            stages: ShaderStageFlags::empty(),
            kind,
            vertex_slot: None,
            pixel_slot: None,
        }
    }

    /// Slot used by `stage`, if the resource is visible to it
    pub fn slot(&self, stage: ShaderStage) -> Option<u32> {
        if !self.stages.contains(stage.flag()) {
            return None;
        }
        match stage {
            ShaderStage::Vertex => self.vertex_slot,
            ShaderStage::Pixel => self.pixel_slot,
        }
    }

    /// (stage, slot) pairs to bind, in compile order
    pub fn stage_slots(&self) -> impl Iterator<Item = (ShaderStage, u32)> + '_ {
        self.stages.stages().filter_map(move |stage| self.slot(stage).map(|slot| (stage, slot)))
    }

    pub fn is_used_by(&self, stage: ShaderStage) -> bool {
        self.stages.contains(stage.flag())
    }
}

/// Bind points of a shader, keyed by resource name
#[derive(Debug, Clone, Default)]
pub struct BindPointTable {
    entries: FxHashMap<String, BindPoint>,
}

impl BindPointTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge all raw bindings collected from the compiled stages
    pub fn from_bindings(bindings: &[RawBinding]) -> Self {
        let mut table = Self::new();
        for binding in bindings {
            table.insert(&binding.name, binding.stage, binding.slot, binding.kind);
        }
        table
    }

    /// Add or merge one binding
    ///
    /// Re-inserting a name ORs the stage bit into the existing mask and sets
    /// that stage's slot. When the kinds disagree the first one is kept and the
    /// disagreeing stage is left out of the entry.
    pub fn insert(&mut self, name: &str, stage: ShaderStage, slot: u32, kind: BindingKind) {
        let entry = self.entries
            .entry(name.to_string())
            .or_insert_with(|| BindPoint::new(kind));

        if entry.kind != kind {
            crate::engine_warn!("ember3d::shader",
                "Bind point '{}' is a {:?} in one stage and a {:?} in the {} stage, keeping {:?}",
                name, entry.kind, kind, stage, entry.kind);
            return;
        }

        entry.stages |= stage.flag();
        match stage {
            ShaderStage::Vertex => entry.vertex_slot = Some(slot),
            ShaderStage::Pixel => entry.pixel_slot = Some(slot),
        }
    }

    pub fn get(&self, name: &str) -> Option<&BindPoint> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BindPoint)> {
        self.entries.iter().map(|(name, bp)| (name.as_str(), bp))
    }
}

#[cfg(test)]
#[path = "bind_point_tests.rs"]
mod tests;
