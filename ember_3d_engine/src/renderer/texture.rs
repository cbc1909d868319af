/// Texture trait, texture descriptor, and texture formats

use std::any::Any;
use crate::error::{Error, Result};

/// Texture and render target pixel format
///
/// Depth formats can be bound as depth/stencil attachments and sampled
/// through their depth channel. Stencil cannot be sampled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(non_camel_case_types)]
pub enum TextureFormat {
    // 8 bit components normalized
    R8_UNORM,
    RG8_UNORM,
    RGBA8_UNORM,
    R8_SNORM,
    RG8_SNORM,
    RGBA8_SNORM,

    // 8 bit components int
    R8_UINT,
    RG8_UINT,
    RGBA8_UINT,
    R8_SINT,
    RG8_SINT,
    RGBA8_SINT,

    // 16 bit components normalized
    R16_UNORM,
    RG16_UNORM,
    RGBA16_UNORM,
    R16_SNORM,
    RG16_SNORM,
    RGBA16_SNORM,

    // 16 bit components int
    R16_UINT,
    RG16_UINT,
    RGBA16_UINT,
    R16_SINT,
    RG16_SINT,
    RGBA16_SINT,

    // 16 bit components float
    R16_FLOAT,
    RG16_FLOAT,
    RGBA16_FLOAT,

    // 32 bit components int
    R32_UINT,
    RG32_UINT,
    RGBA32_UINT,
    R32_SINT,
    RG32_SINT,
    RGBA32_SINT,

    // 32 bit components float
    R32_FLOAT,
    RG32_FLOAT,
    RGBA32_FLOAT,

    // depth stencil
    D16_UNORM,
    D24_UNORM_S8_UINT,
    D32_FLOAT,
    D32_FLOAT_S8_UINT,
}

impl TextureFormat {
    /// Depth or depth/stencil format
    pub fn is_depth_stencil(self) -> bool {
        matches!(
            self,
            TextureFormat::D16_UNORM
                | TextureFormat::D24_UNORM_S8_UINT
                | TextureFormat::D32_FLOAT
                | TextureFormat::D32_FLOAT_S8_UINT
        )
    }

    pub fn has_stencil(self) -> bool {
        matches!(self, TextureFormat::D24_UNORM_S8_UINT | TextureFormat::D32_FLOAT_S8_UINT)
    }

    /// Size of one texel in bytes
    pub fn bytes_per_pixel(self) -> u32 {
        use TextureFormat::*;
        match self {
            R8_UNORM | R8_SNORM | R8_UINT | R8_SINT => 1,
            RG8_UNORM | RG8_SNORM | RG8_UINT | RG8_SINT => 2,
            RGBA8_UNORM | RGBA8_SNORM | RGBA8_UINT | RGBA8_SINT => 4,

            R16_UNORM | R16_SNORM | R16_UINT | R16_SINT | R16_FLOAT => 2,
            RG16_UNORM | RG16_SNORM | RG16_UINT | RG16_SINT | RG16_FLOAT => 4,
            RGBA16_UNORM | RGBA16_SNORM | RGBA16_UINT | RGBA16_SINT | RGBA16_FLOAT => 8,

            R32_UINT | R32_SINT | R32_FLOAT => 4,
            RG32_UINT | RG32_SINT | RG32_FLOAT => 8,
            RGBA32_UINT | RGBA32_SINT | RGBA32_FLOAT => 16,

            D16_UNORM => 2,
            D24_UNORM_S8_UINT | D32_FLOAT => 4,
            // 32-bit depth, 8-bit stencil, 24 bits unused
            D32_FLOAT_S8_UINT => 8,
        }
    }
}

// ===== TEXTURE DESC =====

/// Descriptor for creating a sampled texture
#[derive(Debug, Clone)]
pub struct TextureDesc {
    pub width: u32,
    pub height: u32,
    pub format: TextureFormat,
    /// Tightly packed rows, `width * height * bytes_per_pixel` bytes
    pub data: Option<Vec<u8>>,
}

impl TextureDesc {
    /// Expected size of the initial data in bytes
    pub fn data_size(&self) -> u64 {
        self.width as u64 * self.height as u64 * self.format.bytes_per_pixel() as u64
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidResource(format!(
                "Texture size must be non-zero (got {}x{})", self.width, self.height
            )));
        }
        if self.format.is_depth_stencil() {
            return Err(Error::InvalidResource(format!(
                "{:?} is a depth format, create a render target instead", self.format
            )));
        }
        if let Some(data) = &self.data {
            if data.len() as u64 != self.data_size() {
                return Err(Error::InvalidResource(format!(
                    "Texture data is {} bytes, expected {} for {}x{} {:?}",
                    data.len(), self.data_size(), self.width, self.height, self.format
                )));
            }
        }
        Ok(())
    }
}

// ===== TEXTURE INFO =====

/// Read-only properties of a created texture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureInfo {
    pub width: u32,
    pub height: u32,
    pub format: TextureFormat,
}

// ===== TEXTURE TRAIT =====

/// Sampled texture resource
///
/// The native texture is released when the last reference is dropped.
pub trait Texture: Send + Sync {
    fn info(&self) -> &TextureInfo;

    /// Replace the whole texture content
    fn update(&self, data: &[u8]) -> Result<()>;

    /// Backend downcast access
    fn as_any(&self) -> &dyn Any;
}

#[cfg(test)]
#[path = "texture_tests.rs"]
mod tests;
