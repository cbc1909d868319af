/// ShaderProgram - D3D11 vertex/pixel shader pair with its fixed-function state

use ember_3d_engine::ember3d::{
    Result,
    render::ShaderProgram as RendererShaderProgram,
    shader::{CompiledShader, InputElement, ShaderConfig, VertexFormat},
};
use ember_3d_engine::{engine_bail, engine_err};
use std::any::Any;
use std::ffi::CString;
use windows::core::PCSTR;
use windows::Win32::Foundation::{FALSE, TRUE};
use windows::Win32::Graphics::Direct3D11::*;

use crate::d3d11_context::{created, GpuContext};
use crate::d3d11_format::{comparison, cull_mode, vertex_format};

pub struct D3D11ShaderProgram {
    pub(crate) vertex_shader: ID3D11VertexShader,
    pub(crate) pixel_shader: Option<ID3D11PixelShader>,
    /// None when the vertex stage takes no inputs
    pub(crate) input_layout: Option<ID3D11InputLayout>,
    pub(crate) rasterizer_state: ID3D11RasterizerState,
    pub(crate) depth_stencil_state: ID3D11DepthStencilState,
    config: ShaderConfig,
}

unsafe impl Send for D3D11ShaderProgram {}
unsafe impl Sync for D3D11ShaderProgram {}

impl D3D11ShaderProgram {
    pub(crate) fn new(ctx: &GpuContext, compiled: &CompiledShader) -> Result<Self> {
        let Some(vs_bytecode) = compiled.vertex_bytecode.as_deref() else {
            engine_bail!("ember3d::d3d11", "Cannot create a shader program without vertex bytecode");
        };

        let mut vertex_shader = None;
        unsafe {
            ctx.device
                .CreateVertexShader(vs_bytecode, None, Some(&mut vertex_shader))
                .map_err(|e| engine_err!("ember3d::d3d11", "CreateVertexShader failed: {}", e))?;
        }
        let vertex_shader = created(vertex_shader, "CreateVertexShader")?;

        let pixel_shader = match compiled.pixel_bytecode.as_deref() {
            Some(ps_bytecode) => {
                let mut pixel_shader = None;
                unsafe {
                    ctx.device
                        .CreatePixelShader(ps_bytecode, None, Some(&mut pixel_shader))
                        .map_err(|e| engine_err!("ember3d::d3d11", "CreatePixelShader failed: {}", e))?;
                }
                Some(created(pixel_shader, "CreatePixelShader")?)
            }
            None => None,
        };

        let input_layout = if compiled.input_layout.is_empty() {
            None
        } else {
            Some(create_input_layout(ctx, &compiled.input_layout, vs_bytecode)?)
        };

        Ok(Self {
            vertex_shader,
            pixel_shader,
            input_layout,
            rasterizer_state: create_rasterizer_state(ctx, &compiled.config)?,
            depth_stencil_state: create_depth_stencil_state(ctx, &compiled.config)?,
            config: compiled.config,
        })
    }
}

fn create_input_layout(
    ctx: &GpuContext,
    elements: &[InputElement],
    vs_bytecode: &[u8],
) -> Result<ID3D11InputLayout> {
    // Semantic names must outlive the CreateInputLayout call
    let names = elements
        .iter()
        .map(|element| {
            CString::new(element.semantic_name.as_str()).map_err(|_| {
                engine_err!("ember3d::d3d11", "Invalid semantic name '{}'", element.semantic_name)
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let mut descs = Vec::with_capacity(elements.len());
    for (element, name) in elements.iter().zip(&names) {
        if element.format == VertexFormat::Unknown {
            engine_bail!(
                "ember3d::d3d11",
                "Vertex input {}{} has no supported format",
                element.semantic_name, element.semantic_index
            );
        }
        descs.push(D3D11_INPUT_ELEMENT_DESC {
            SemanticName: PCSTR(name.as_ptr() as _),
            SemanticIndex: element.semantic_index,
            Format: vertex_format(element.format),
            InputSlot: 0,
            AlignedByteOffset: D3D11_APPEND_ALIGNED_ELEMENT,
            InputSlotClass: D3D11_INPUT_PER_VERTEX_DATA,
            InstanceDataStepRate: 0,
        });
    }

    let mut input_layout = None;
    unsafe {
        ctx.device
            .CreateInputLayout(&descs, vs_bytecode, Some(&mut input_layout))
            .map_err(|e| engine_err!("ember3d::d3d11", "CreateInputLayout failed: {}", e))?;
    }
    created(input_layout, "CreateInputLayout")
}

fn create_rasterizer_state(ctx: &GpuContext, config: &ShaderConfig) -> Result<ID3D11RasterizerState> {
    let desc = D3D11_RASTERIZER_DESC {
        FillMode: D3D11_FILL_SOLID,
        CullMode: cull_mode(config.cull_mode),
        FrontCounterClockwise: TRUE,
        DepthBias: 0,
        DepthBiasClamp: 0.0,
        SlopeScaledDepthBias: 0.0,
        DepthClipEnable: FALSE,
        ScissorEnable: FALSE,
        MultisampleEnable: FALSE,
        AntialiasedLineEnable: FALSE,
    };

    let mut state = None;
    unsafe {
        ctx.device
            .CreateRasterizerState(&desc, Some(&mut state))
            .map_err(|e| engine_err!("ember3d::d3d11", "CreateRasterizerState failed: {}", e))?;
    }
    created(state, "CreateRasterizerState")
}

fn create_depth_stencil_state(ctx: &GpuContext, config: &ShaderConfig) -> Result<ID3D11DepthStencilState> {
    let desc = D3D11_DEPTH_STENCIL_DESC {
        DepthEnable: TRUE,
        DepthWriteMask: D3D11_DEPTH_WRITE_MASK_ALL,
        DepthFunc: comparison(config.depth_test),
        StencilEnable: FALSE,
        StencilReadMask: 0,
        StencilWriteMask: 0,
        FrontFace: Default::default(),
        BackFace: Default::default(),
    };

    let mut state = None;
    unsafe {
        ctx.device
            .CreateDepthStencilState(&desc, Some(&mut state))
            .map_err(|e| engine_err!("ember3d::d3d11", "CreateDepthStencilState failed: {}", e))?;
    }
    created(state, "CreateDepthStencilState")
}

impl RendererShaderProgram for D3D11ShaderProgram {
    fn config(&self) -> &ShaderConfig {
        &self.config
    }

    fn has_pixel_stage(&self) -> bool {
        self.pixel_shader.is_some()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
