//! `#section config` parsing
//!
//! ```text
//! #section config
//! // comments are skipped
//! CullMode = Back;
//! DepthTest = LessEqual;
//! ```

use crate::shader::tokenizer::tokenize;

/// Triangle faces discarded by the rasterizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CullMode {
    #[default]
    None,
    Front,
    Back,
}

/// Depth comparison function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DepthTest {
    Never,
    Equal,
    NotEqual,
    #[default]
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Always,
}

/// Fixed-function state requested by a shader
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ShaderConfig {
    pub cull_mode: CullMode,
    pub depth_test: DepthTest,
}

impl CullMode {
    fn from_keyword(value: &str) -> Option<CullMode> {
        match value.to_ascii_lowercase().as_str() {
            "none" => Some(CullMode::None),
            "front" => Some(CullMode::Front),
            "back" => Some(CullMode::Back),
            _ => None,
        }
    }
}

impl DepthTest {
    fn from_keyword(value: &str) -> Option<DepthTest> {
        match value.to_ascii_lowercase().as_str() {
            "never" => Some(DepthTest::Never),
            "equal" => Some(DepthTest::Equal),
            "notequal" => Some(DepthTest::NotEqual),
            "less" => Some(DepthTest::Less),
            "lessequal" => Some(DepthTest::LessEqual),
            "greater" => Some(DepthTest::Greater),
            "greaterequal" => Some(DepthTest::GreaterEqual),
            "always" => Some(DepthTest::Always),
            _ => None,
        }
    }
}

impl ShaderConfig {
    /// Parse the text of a config section
    ///
    /// Unknown keys and values are reported and leave the default in place.
    pub fn parse(text: &str) -> ShaderConfig {
        let mut config = ShaderConfig::default();

        for line in text.lines() {
            if line.trim_start().starts_with("//") {
                continue;
            }
            let tokens = tokenize(line);
            if tokens.is_empty() {
                continue;
            }
            if tokens.len() < 3 || tokens[1] != "=" {
                crate::engine_warn!("ember3d::shader",
                    "Ignoring malformed config line '{}'", line.trim());
                continue;
            }

            let (key, value) = (tokens[0].as_str(), tokens[2].as_str());
            match key.to_ascii_lowercase().as_str() {
                "cullmode" => match CullMode::from_keyword(value) {
                    Some(mode) => config.cull_mode = mode,
                    None => crate::engine_warn!("ember3d::shader",
                        "Unknown CullMode '{}', keeping {:?}", value, config.cull_mode),
                },
                "depthtest" => match DepthTest::from_keyword(value) {
                    Some(test) => config.depth_test = test,
                    None => crate::engine_warn!("ember3d::shader",
                        "Unknown DepthTest '{}', keeping {:?}", value, config.depth_test),
                },
                _ => crate::engine_warn!("ember3d::shader",
                    "Unknown config key '{}'", key),
            }
        }

        config
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
