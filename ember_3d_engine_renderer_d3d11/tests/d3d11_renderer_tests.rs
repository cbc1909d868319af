//! GPU tests for the D3D11 renderer backend
//!
//! All tests require a D3D11 capable GPU and are marked with #[ignore].
//!
//! Run with: cargo test --test d3d11_renderer_tests -- --ignored

#![cfg(windows)]

use ember_3d_engine::ember3d::render::{
    Blitter, Buffer, BufferDesc, FilterMode, FrameBuffer, RenderCommand, RenderTarget,
    RenderTargetDesc, Renderer, RendererConfig, Sampler, SamplerDesc, ShaderProgram, SwapChain,
    SwapChainDesc, Texture, TextureDesc, TextureFormat, WrapMode,
};
use ember_3d_engine::ember3d::resource::MeshBuilder;
use ember_3d_engine::ember3d::shader::Shader;
use ember_3d_engine::glam::Vec4;
use ember_3d_engine_renderer_d3d11::D3D11Renderer;
use std::sync::Arc;
use winit::event_loop::EventLoop;
use winit::window::Window;

const TEST_SHADER: &str = r#"
#section config
CullMode = Back
DepthTest = LessEqual

#section common
cbuffer Frame
{
    float4 tint;
};

struct VSOut
{
    float4 position : SV_POSITION;
    float2 uv : TEXCOORD0;
};

#section vertex
VSOut main(float4 position : POSITION, float3 normal : NORMAL, float3 tangent : TANGENT, float2 uv : TEXCOORD0)
{
    VSOut o;
    o.position = position * tint.w;
    o.uv = uv;
    return o;
}

#section pixel
StaticSampler albedoSampler = StaticSampler(repeat, repeat, linear, linear);
Texture2D albedo;

float4 main(VSOut i) : SV_TARGET
{
    return albedo.Sample(albedoSampler, i.uv) * tint;
}
"#;

/// Helper to create a hidden test window
#[allow(deprecated)]
fn create_test_window() -> (Window, EventLoop<()>) {
    let event_loop = EventLoop::new().unwrap();
    let window_attrs = Window::default_attributes()
        .with_title("D3D11 Renderer Test")
        .with_inner_size(winit::dpi::PhysicalSize::new(800, 600))
        .with_visible(false);
    let window = event_loop.create_window(window_attrs).unwrap();
    (window, event_loop)
}

fn create_renderer() -> D3D11Renderer {
    D3D11Renderer::new(RendererConfig::default()).unwrap()
}

// ============================================================================
// TEXTURE & RENDER TARGET TESTS
// ============================================================================

#[test]
#[ignore] // Requires GPU
fn test_d3d11_create_texture_with_data() {
    let mut renderer = create_renderer();

    let texture = renderer
        .create_texture(TextureDesc {
            width: 4,
            height: 4,
            format: TextureFormat::RGBA8_UNORM,
            data: Some((0..64).collect()),
        })
        .unwrap();

    assert_eq!(texture.info().width, 4);
    assert_eq!(texture.info().format, TextureFormat::RGBA8_UNORM);
    assert!(texture.update(&[255u8; 64]).is_ok());
    assert!(texture.update(&[0u8; 8]).is_err());
}

#[test]
#[ignore] // Requires GPU
fn test_d3d11_create_color_and_depth_targets() {
    let mut renderer = create_renderer();

    let color = renderer
        .create_render_target(RenderTargetDesc::new(320, 240, TextureFormat::RGBA16_FLOAT))
        .unwrap();
    assert!(!color.is_depth_stencil());

    for format in [
        TextureFormat::D16_UNORM,
        TextureFormat::D24_UNORM_S8_UINT,
        TextureFormat::D32_FLOAT,
        TextureFormat::D32_FLOAT_S8_UINT,
    ] {
        let depth = renderer.create_render_target(RenderTargetDesc::new(320, 240, format)).unwrap();
        assert!(depth.is_depth_stencil());
        assert_eq!(depth.width(), 320);
    }
}

// ============================================================================
// BUFFER TESTS
// ============================================================================

#[test]
#[ignore] // Requires GPU
fn test_d3d11_buffer_updates() {
    let mut renderer = create_renderer();

    let constant = renderer.create_buffer(BufferDesc::constant(64)).unwrap();
    assert!(constant.update(16, &[1u8; 16]).is_ok());
    assert!(constant.update(60, &[1u8; 8]).is_err());

    let vertices = renderer.create_buffer(BufferDesc::vertex(12, &[0u8; 36])).unwrap();
    assert!(vertices.update(12, &[2u8; 12]).is_ok());

    let structured = renderer.create_buffer(BufferDesc::structured(16, 8)).unwrap();
    assert_eq!(structured.info().element_count(), 8);
    assert!(structured.update(0, &[3u8; 128]).is_ok());
}

// ============================================================================
// SAMPLER TESTS
// ============================================================================

#[test]
#[ignore] // Requires GPU
fn test_d3d11_identical_samplers_are_shared() {
    let mut renderer = create_renderer();
    let desc = SamplerDesc {
        wrap_u: WrapMode::Clamp,
        wrap_v: WrapMode::MirroredRepeat,
        min_filter: FilterMode::Point,
        mag_filter: FilterMode::Linear,
    };

    let a = renderer.create_sampler(&desc).unwrap();
    let b = renderer.create_sampler(&desc).unwrap();
    let c = renderer.create_sampler(&SamplerDesc::default()).unwrap();

    assert!(Arc::ptr_eq(&a, &b));
    assert!(!Arc::ptr_eq(&a, &c));
    assert_eq!(*a.desc(), desc);
}

// ============================================================================
// SHADER TESTS
// ============================================================================

#[test]
#[ignore] // Requires GPU
fn test_d3d11_shader_from_source() {
    let mut renderer = create_renderer();
    let shader = Shader::from_source(&mut renderer, TEST_SHADER).unwrap();

    // One cbuffer from the common section, used by both stages
    let frame = shader.bind_point("Frame").unwrap();
    assert!(frame.vertex_slot.is_some());
    assert!(frame.pixel_slot.is_some());

    assert!(shader.bind_point("albedo").is_some());
    assert_eq!(shader.samplers().len(), 1);
    assert_eq!(shader.input_layout().len(), 4);
    assert!(shader.program().has_pixel_stage());
}

#[test]
#[ignore] // Requires GPU
fn test_d3d11_shader_compile_error() {
    let mut renderer = create_renderer();
    let source = "#section vertex\nfloat4 main() : SV_POSITION { return missing; }\n";
    assert!(Shader::from_source(&mut renderer, source).is_err());
}

// ============================================================================
// FRAME TESTS
// ============================================================================

#[test]
#[ignore] // Requires GPU
fn test_d3d11_render_to_frame_buffer_and_blit() {
    let (window, _event_loop) = create_test_window();
    let mut renderer = create_renderer();

    let mut swap_chain = renderer
        .create_swap_chain(&window, SwapChainDesc { width: 800, height: 600, ..Default::default() })
        .unwrap();

    let color = renderer
        .create_render_target(RenderTargetDesc::new(800, 600, TextureFormat::RGBA8_UNORM))
        .unwrap();
    let depth = renderer
        .create_render_target(RenderTargetDesc::new(800, 600, TextureFormat::D24_UNORM_S8_UINT))
        .unwrap();
    let frame_buffer = FrameBuffer::new(vec![color.clone(), depth]);

    let shader = Shader::from_source(&mut renderer, TEST_SHADER).unwrap();
    let texture = renderer
        .create_texture(TextureDesc { width: 1, height: 1, format: TextureFormat::RGBA8_UNORM, data: Some(vec![255; 4]) })
        .unwrap();
    let frame_constants = renderer.create_buffer(BufferDesc::constant(16)).unwrap();
    frame_constants.update(0, bytemuck::cast_slice(&[1.0f32, 1.0, 1.0, 1.0])).unwrap();
    let quad = MeshBuilder::screen_quad().build(&mut renderer).unwrap();
    let blitter = Blitter::new(&mut renderer).unwrap();

    {
        let cmd = renderer.command_list();
        RenderCommand::set_frame_buffer(cmd, &frame_buffer).unwrap();
        RenderCommand::clear_frame_buffer(cmd, &frame_buffer, Vec4::new(0.1, 0.2, 0.3, 1.0), 1.0).unwrap();
        RenderCommand::set_shader(cmd, &shader).unwrap();
        RenderCommand::set_constant_buffer_by_name(cmd, &shader, "Frame", frame_constants.as_ref()).unwrap();
        RenderCommand::set_texture_by_name(cmd, &shader, "albedo", texture.as_ref()).unwrap();
        RenderCommand::draw_mesh(cmd, &quad).unwrap();

        blitter.blit_to_swap_chain(cmd, color.as_ref(), swap_chain.as_ref()).unwrap();
    }

    swap_chain.present().unwrap();

    let stats = renderer.stats();
    assert_eq!(stats.draw_calls, 2);
    assert_eq!(stats.triangles, 4);
}

#[test]
#[ignore] // Requires GPU
fn test_d3d11_swap_chain_resize() {
    let (window, _event_loop) = create_test_window();
    let mut renderer = create_renderer();

    let mut swap_chain = renderer.create_swap_chain(&window, SwapChainDesc::default()).unwrap();
    swap_chain.resize(640, 480).unwrap();
    assert_eq!(swap_chain.width(), 640);
    assert_eq!(swap_chain.height(), 480);

    // Minimized window keeps the current size
    swap_chain.resize(0, 0).unwrap();
    assert_eq!(swap_chain.width(), 640);

    swap_chain.set_vsync(false);
    RenderCommand::set_swap_chain(renderer.command_list(), swap_chain.as_ref()).unwrap();
    RenderCommand::clear_swap_chain(renderer.command_list(), swap_chain.as_ref(), Vec4::ZERO).unwrap();
    swap_chain.present().unwrap();
}
