/// Blitter - copies a render target onto the swap chain with a screen quad

use std::sync::Arc;

use crate::error::Result;
use crate::renderer::{CommandList, RenderCommand, RenderTarget, Renderer, SwapChain};
use crate::resource::{Mesh, MeshBuilder};
use crate::shader::Shader;

/// Name of the source texture in `BLIT_SHADER_SOURCE`
pub const BLIT_TEXTURE_NAME: &str = "blitTexture";

pub const BLIT_SHADER_SOURCE: &str = r#"
CullMode = None
DepthTest = Always

#section common
struct VSOut
{
    float4 position : SV_POSITION;
    float2 uv : TEXCOORD0;
};

#section vertex
VSOut main(float4 position : POSITION, float3 normal : NORMAL, float3 tangent : TANGENT, float2 uv : TEXCOORD0)
{
    VSOut output;
    output.position = position;
    output.uv = uv;
    return output;
}

#section pixel
StaticSampler blitSampler = StaticSampler(clamp, clamp, linear, linear);
Texture2D blitTexture;

float4 main(VSOut input) : SV_TARGET
{
    return blitTexture.Sample(blitSampler, input.uv);
}
"#;

pub struct Blitter {
    shader: Arc<Shader>,
    quad: Mesh,
}

impl Blitter {
    pub fn new(renderer: &mut dyn Renderer) -> Result<Blitter> {
        let shader = Shader::from_source(renderer, BLIT_SHADER_SOURCE)?;
        let quad = MeshBuilder::screen_quad().build(renderer)?;
        crate::engine_debug!("ember3d::Blitter", "Blit shader and screen quad created");
        Ok(Blitter { shader, quad })
    }

    pub fn shader(&self) -> &Arc<Shader> {
        &self.shader
    }

    /// Draw `source` stretched over the whole back buffer
    ///
    /// Leaves the swap chain bound as the current target.
    pub fn blit_to_swap_chain(
        &self,
        cmd: &mut dyn CommandList,
        source: &dyn RenderTarget,
        swap_chain: &dyn SwapChain,
    ) -> Result<()> {
        RenderCommand::set_swap_chain(cmd, swap_chain)?;
        RenderCommand::set_shader(cmd, &self.shader)?;
        RenderCommand::set_render_target_texture_by_name(cmd, &self.shader, BLIT_TEXTURE_NAME, source)?;
        RenderCommand::draw_mesh(cmd, &self.quad)
    }
}

#[cfg(test)]
#[path = "blitter_tests.rs"]
mod tests;
