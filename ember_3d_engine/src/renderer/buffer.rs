/// Buffer trait and buffer descriptor

use std::any::Any;
use crate::error::{Error, Result};

/// What a buffer is bound as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferKind {
    /// Vertex buffer with `stride` bytes per vertex
    Vertex { stride: u32 },
    /// 32-bit index buffer
    Index,
    /// Constant buffer, size must be a multiple of 16
    Constant,
    /// Structured buffer read through a shader resource view
    Structured { stride: u32 },
}

/// Size of one index in bytes
pub const INDEX_SIZE: u32 = 4;

/// Descriptor for creating a buffer
#[derive(Debug, Clone)]
pub struct BufferDesc {
    pub kind: BufferKind,
    /// Size in bytes
    pub size: u64,
    /// Initial content, at most `size` bytes
    pub data: Option<Vec<u8>>,
}

impl BufferDesc {
    pub fn vertex(stride: u32, data: &[u8]) -> Self {
        Self { kind: BufferKind::Vertex { stride }, size: data.len() as u64, data: Some(data.to_vec()) }
    }

    pub fn index(indices: &[u32]) -> Self {
        let bytes: &[u8] = bytemuck::cast_slice(indices);
        Self { kind: BufferKind::Index, size: bytes.len() as u64, data: Some(bytes.to_vec()) }
    }

    /// Constant buffer of `size` bytes, rounded up to a multiple of 16
    pub fn constant(size: u64) -> Self {
        Self { kind: BufferKind::Constant, size: size.div_ceil(16) * 16, data: None }
    }

    pub fn structured(stride: u32, count: u32) -> Self {
        Self {
            kind: BufferKind::Structured { stride },
            size: stride as u64 * count as u64,
            data: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.size == 0 {
            return Err(Error::InvalidResource("Buffer size must be > 0".to_string()));
        }
        match self.kind {
            BufferKind::Constant if self.size % 16 != 0 => {
                return Err(Error::InvalidResource(format!(
                    "Constant buffer size must be a multiple of 16 (got {})", self.size
                )));
            }
            BufferKind::Vertex { stride } | BufferKind::Structured { stride } => {
                if stride == 0 || self.size % stride as u64 != 0 {
                    return Err(Error::InvalidResource(format!(
                        "Buffer size {} is not a multiple of stride {}", self.size, stride
                    )));
                }
            }
            BufferKind::Index if self.size % INDEX_SIZE as u64 != 0 => {
                return Err(Error::InvalidResource(format!(
                    "Index buffer size {} is not a multiple of {}", self.size, INDEX_SIZE
                )));
            }
            _ => {}
        }
        if let Some(data) = &self.data {
            if data.len() as u64 > self.size {
                return Err(Error::InvalidResource(format!(
                    "Initial data ({} bytes) larger than buffer ({} bytes)", data.len(), self.size
                )));
            }
        }
        Ok(())
    }
}

/// Read-only properties of a created buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferInfo {
    pub kind: BufferKind,
    pub size: u64,
}

impl BufferInfo {
    /// Number of vertices, indices or structured elements the buffer holds
    pub fn element_count(&self) -> u32 {
        let stride = match self.kind {
            BufferKind::Vertex { stride } | BufferKind::Structured { stride } => stride,
            BufferKind::Index => INDEX_SIZE,
            BufferKind::Constant => return 1,
        };
        (self.size / stride.max(1) as u64) as u32
    }

    /// Check that `len` bytes at `offset` fit in the buffer
    pub fn check_range(&self, offset: u64, len: usize) -> Result<()> {
        match offset.checked_add(len as u64) {
            Some(end) if end <= self.size => Ok(()),
            _ => Err(Error::InvalidResource(format!(
                "Buffer update of {} bytes at offset {} exceeds buffer size {}",
                len, offset, self.size
            ))),
        }
    }
}

/// GPU buffer, CPU-writable
///
/// The native buffer is released when the last reference is dropped.
pub trait Buffer: Send + Sync {
    fn info(&self) -> &BufferInfo;

    /// Write `data` at byte `offset`
    fn update(&self, offset: u64, data: &[u8]) -> Result<()>;

    /// Backend downcast access
    fn as_any(&self) -> &dyn Any;
}

#[cfg(test)]
#[path = "buffer_tests.rs"]
mod tests;
