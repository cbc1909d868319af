/// Conversions between engine enums and their D3D11 / DXGI counterparts

use ember_3d_engine::ember3d::render::{FilterMode, TextureFormat, WrapMode};
use ember_3d_engine::ember3d::shader::{ComponentType, CullMode, DepthTest, VertexFormat};
use windows::Win32::Graphics::Direct3D::{
    D3D_REGISTER_COMPONENT_FLOAT32, D3D_REGISTER_COMPONENT_SINT32, D3D_REGISTER_COMPONENT_TYPE,
    D3D_REGISTER_COMPONENT_UINT32,
};
use windows::Win32::Graphics::Direct3D11::*;
use windows::Win32::Graphics::Dxgi::Common::*;

pub(crate) fn dxgi_format(format: TextureFormat) -> DXGI_FORMAT {
    use TextureFormat::*;
    match format {
        R8_UNORM => DXGI_FORMAT_R8_UNORM,
        RG8_UNORM => DXGI_FORMAT_R8G8_UNORM,
        RGBA8_UNORM => DXGI_FORMAT_R8G8B8A8_UNORM,
        R8_SNORM => DXGI_FORMAT_R8_SNORM,
        RG8_SNORM => DXGI_FORMAT_R8G8_SNORM,
        RGBA8_SNORM => DXGI_FORMAT_R8G8B8A8_SNORM,
        R8_UINT => DXGI_FORMAT_R8_UINT,
        RG8_UINT => DXGI_FORMAT_R8G8_UINT,
        RGBA8_UINT => DXGI_FORMAT_R8G8B8A8_UINT,
        R8_SINT => DXGI_FORMAT_R8_SINT,
        RG8_SINT => DXGI_FORMAT_R8G8_SINT,
        RGBA8_SINT => DXGI_FORMAT_R8G8B8A8_SINT,
        R16_UNORM => DXGI_FORMAT_R16_UNORM,
        RG16_UNORM => DXGI_FORMAT_R16G16_UNORM,
        RGBA16_UNORM => DXGI_FORMAT_R16G16B16A16_UNORM,
        R16_SNORM => DXGI_FORMAT_R16_SNORM,
        RG16_SNORM => DXGI_FORMAT_R16G16_SNORM,
        RGBA16_SNORM => DXGI_FORMAT_R16G16B16A16_SNORM,
        R16_UINT => DXGI_FORMAT_R16_UINT,
        RG16_UINT => DXGI_FORMAT_R16G16_UINT,
        RGBA16_UINT => DXGI_FORMAT_R16G16B16A16_UINT,
        R16_SINT => DXGI_FORMAT_R16_SINT,
        RG16_SINT => DXGI_FORMAT_R16G16_SINT,
        RGBA16_SINT => DXGI_FORMAT_R16G16B16A16_SINT,
        R16_FLOAT => DXGI_FORMAT_R16_FLOAT,
        RG16_FLOAT => DXGI_FORMAT_R16G16_FLOAT,
        RGBA16_FLOAT => DXGI_FORMAT_R16G16B16A16_FLOAT,
        R32_UINT => DXGI_FORMAT_R32_UINT,
        RG32_UINT => DXGI_FORMAT_R32G32_UINT,
        RGBA32_UINT => DXGI_FORMAT_R32G32B32A32_UINT,
        R32_SINT => DXGI_FORMAT_R32_SINT,
        RG32_SINT => DXGI_FORMAT_R32G32_SINT,
        RGBA32_SINT => DXGI_FORMAT_R32G32B32A32_SINT,
        R32_FLOAT => DXGI_FORMAT_R32_FLOAT,
        RG32_FLOAT => DXGI_FORMAT_R32G32_FLOAT,
        RGBA32_FLOAT => DXGI_FORMAT_R32G32B32A32_FLOAT,
        D16_UNORM => DXGI_FORMAT_D16_UNORM,
        D24_UNORM_S8_UINT => DXGI_FORMAT_D24_UNORM_S8_UINT,
        D32_FLOAT => DXGI_FORMAT_D32_FLOAT,
        D32_FLOAT_S8_UINT => DXGI_FORMAT_D32_FLOAT_S8X24_UINT,
    }
}

/// Formats of a depth target: (texture, depth-stencil view, shader resource view)
///
/// The texture is typeless so it can be both written as depth and sampled.
pub(crate) fn depth_formats(format: TextureFormat) -> Option<(DXGI_FORMAT, DXGI_FORMAT, DXGI_FORMAT)> {
    use TextureFormat::*;
    match format {
        D16_UNORM => Some((DXGI_FORMAT_R16_TYPELESS, DXGI_FORMAT_D16_UNORM, DXGI_FORMAT_R16_UNORM)),
        D24_UNORM_S8_UINT => Some((
            DXGI_FORMAT_R24G8_TYPELESS,
            DXGI_FORMAT_D24_UNORM_S8_UINT,
            DXGI_FORMAT_R24_UNORM_X8_TYPELESS,
        )),
        D32_FLOAT => Some((DXGI_FORMAT_R32_TYPELESS, DXGI_FORMAT_D32_FLOAT, DXGI_FORMAT_R32_FLOAT)),
        D32_FLOAT_S8_UINT => Some((
            DXGI_FORMAT_R32G8X24_TYPELESS,
            DXGI_FORMAT_D32_FLOAT_S8X24_UINT,
            DXGI_FORMAT_R32_FLOAT_X8X24_TYPELESS,
        )),
        _ => None,
    }
}

pub(crate) fn vertex_format(format: VertexFormat) -> DXGI_FORMAT {
    use VertexFormat::*;
    match format {
        Unknown => DXGI_FORMAT_UNKNOWN,
        R32_UINT => DXGI_FORMAT_R32_UINT,
        R32_SINT => DXGI_FORMAT_R32_SINT,
        R32_FLOAT => DXGI_FORMAT_R32_FLOAT,
        R32G32_UINT => DXGI_FORMAT_R32G32_UINT,
        R32G32_SINT => DXGI_FORMAT_R32G32_SINT,
        R32G32_FLOAT => DXGI_FORMAT_R32G32_FLOAT,
        R32G32B32_UINT => DXGI_FORMAT_R32G32B32_UINT,
        R32G32B32_SINT => DXGI_FORMAT_R32G32B32_SINT,
        R32G32B32_FLOAT => DXGI_FORMAT_R32G32B32_FLOAT,
        R32G32B32A32_UINT => DXGI_FORMAT_R32G32B32A32_UINT,
        R32G32B32A32_SINT => DXGI_FORMAT_R32G32B32A32_SINT,
        R32G32B32A32_FLOAT => DXGI_FORMAT_R32G32B32A32_FLOAT,
    }
}

pub(crate) fn component_type(component: D3D_REGISTER_COMPONENT_TYPE) -> ComponentType {
    match component {
        D3D_REGISTER_COMPONENT_UINT32 => ComponentType::Uint32,
        D3D_REGISTER_COMPONENT_SINT32 => ComponentType::Sint32,
        D3D_REGISTER_COMPONENT_FLOAT32 => ComponentType::Float32,
        _ => ComponentType::Unknown,
    }
}

pub(crate) fn address_mode(wrap: WrapMode) -> D3D11_TEXTURE_ADDRESS_MODE {
    match wrap {
        WrapMode::Repeat => D3D11_TEXTURE_ADDRESS_WRAP,
        WrapMode::MirroredRepeat => D3D11_TEXTURE_ADDRESS_MIRROR,
        WrapMode::Clamp => D3D11_TEXTURE_ADDRESS_CLAMP,
    }
}

/// Native filter for a min/mag pair; mips follow the mag filter
pub(crate) fn filter(min: FilterMode, mag: FilterMode) -> D3D11_FILTER {
    match (min, mag) {
        (FilterMode::Anisotropic, _) | (_, FilterMode::Anisotropic) => D3D11_FILTER_ANISOTROPIC,
        (FilterMode::Point, FilterMode::Point) => D3D11_FILTER_MIN_MAG_MIP_POINT,
        (FilterMode::Point, FilterMode::Linear) => D3D11_FILTER_MIN_POINT_MAG_MIP_LINEAR,
        (FilterMode::Linear, FilterMode::Point) => D3D11_FILTER_MIN_LINEAR_MAG_MIP_POINT,
        (FilterMode::Linear, FilterMode::Linear) => D3D11_FILTER_MIN_MAG_MIP_LINEAR,
    }
}

pub(crate) fn cull_mode(cull: CullMode) -> D3D11_CULL_MODE {
    match cull {
        CullMode::None => D3D11_CULL_NONE,
        CullMode::Front => D3D11_CULL_FRONT,
        CullMode::Back => D3D11_CULL_BACK,
    }
}

pub(crate) fn comparison(test: DepthTest) -> D3D11_COMPARISON_FUNC {
    match test {
        DepthTest::Never => D3D11_COMPARISON_NEVER,
        DepthTest::Equal => D3D11_COMPARISON_EQUAL,
        DepthTest::NotEqual => D3D11_COMPARISON_NOT_EQUAL,
        DepthTest::Less => D3D11_COMPARISON_LESS,
        DepthTest::LessEqual => D3D11_COMPARISON_LESS_EQUAL,
        DepthTest::Greater => D3D11_COMPARISON_GREATER,
        DepthTest::GreaterEqual => D3D11_COMPARISON_GREATER_EQUAL,
        DepthTest::Always => D3D11_COMPARISON_ALWAYS,
    }
}

#[cfg(test)]
#[path = "d3d11_format_tests.rs"]
mod tests;
