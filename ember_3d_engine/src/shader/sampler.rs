//! `StaticSampler` declarations
//!
//! ```text
//! 0             1    2 3             4 5 6 7 8 9   10 11  12 13
//! StaticSampler name = StaticSampler ( U , V , Min ,  Mag )  ;
//! ```

use crate::renderer::{SamplerDesc, WrapMode, FilterMode};
use crate::shader::bind_point::ShaderStage;

/// Keyword that starts a static sampler line
pub const STATIC_SAMPLER_KEYWORD: &str = "StaticSampler";

const NAME: usize = 1;
const EQUALS: usize = 2;
const CONSTRUCTOR: usize = 3;
const OPEN_PAREN: usize = 4;
const WRAP_U: usize = 5;
const WRAP_V: usize = 7;
const MIN_FILTER: usize = 9;
const MAG_FILTER: usize = 11;
const CLOSE_PAREN: usize = 12;
const COMMAS: [usize; 3] = [6, 8, 10];

/// A sampler declared in shader source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SamplerDeclaration {
    pub name: String,
    pub desc: SamplerDesc,
    /// Stage the sampler was resolved for, set by the compiler
    pub stage: Option<ShaderStage>,
    /// Register assigned by the native compiler, `None` when the stage never reads it
    pub slot: Option<u32>,
}

impl SamplerDeclaration {
    pub fn new(name: &str, desc: SamplerDesc) -> Self {
        Self {
            name: name.to_string(),
            desc,
            stage: None,
            slot: None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.stage.is_some() && self.slot.is_some()
    }

    /// Declaration line handed to the native compiler in place of the `StaticSampler` line
    pub fn native_declaration(&self) -> String {
        format!("SamplerState {};", self.name)
    }
}

/// Parse a wrap keyword, unknown keywords clamp
pub fn parse_wrap_mode(token: &str) -> WrapMode {
    match token {
        "repeat" => WrapMode::Repeat,
        "repeatMirror" | "repeatMiror" | "mirror" => WrapMode::MirroredRepeat,
        "clamp" => WrapMode::Clamp,
        other => {
            crate::engine_warn!("ember3d::shader",
                "Unknown sampler wrap mode '{}', using clamp", other);
            WrapMode::Clamp
        }
    }
}

/// Parse a filter keyword, unknown keywords filter linearly
pub fn parse_filter_mode(token: &str) -> FilterMode {
    match token {
        "point" => FilterMode::Point,
        "linear" => FilterMode::Linear,
        "anisotropic" => FilterMode::Anisotropic,
        other => {
            crate::engine_warn!("ember3d::shader",
                "Unknown sampler filter '{}', using linear", other);
            FilterMode::Linear
        }
    }
}

/// Build a declaration from the tokens of a `StaticSampler` line
///
/// Returns `None` when the line does not have the positional shape above.
/// The trailing `;` is optional.
pub fn parse_static_sampler(tokens: &[String]) -> Option<SamplerDeclaration> {
    if tokens.len() <= CLOSE_PAREN
        || tokens[0] != STATIC_SAMPLER_KEYWORD
        || tokens[EQUALS] != "="
        || tokens[CONSTRUCTOR] != STATIC_SAMPLER_KEYWORD
        || tokens[OPEN_PAREN] != "("
        || COMMAS.iter().any(|&i| tokens[i] != ",")
        || tokens[CLOSE_PAREN] != ")"
    {
        return None;
    }

    let desc = SamplerDesc {
        wrap_u: parse_wrap_mode(&tokens[WRAP_U]),
        wrap_v: parse_wrap_mode(&tokens[WRAP_V]),
        min_filter: parse_filter_mode(&tokens[MIN_FILTER]),
        mag_filter: parse_filter_mode(&tokens[MAG_FILTER]),
    };

    Some(SamplerDeclaration::new(&tokens[NAME], desc))
}

#[cfg(test)]
#[path = "sampler_tests.rs"]
mod tests;
