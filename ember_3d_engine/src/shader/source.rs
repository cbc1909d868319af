//! Source partitioner
//!
//! Splits one shader source into named sections. Text before the first
//! `#section` directive belongs to `config`. `StaticSampler` lines are turned
//! into sampler declarations and replaced with a plain `SamplerState` line.
//! Sampler declarations in `config` are rejected and dropped.

use crate::shader::bind_point::ShaderStage;
use crate::shader::sampler::{parse_static_sampler, SamplerDeclaration, STATIC_SAMPLER_KEYWORD};
use crate::shader::tokenizer::tokenize;

pub const SECTION_DIRECTIVE: &str = "#section";
pub const CONFIG_SECTION: &str = "config";
pub const COMMON_SECTION: &str = "common";

/// Named block of shader source and the samplers declared in it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSection {
    pub name: String,
    pub source: String,
    pub samplers: Vec<SamplerDeclaration>,
}

impl ShaderSection {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            source: String::new(),
            samplers: Vec::new(),
        }
    }

    fn declare_sampler(&mut self, declaration: SamplerDeclaration) {
        match self.samplers.iter_mut().find(|s| s.name == declaration.name) {
            Some(existing) => {
                crate::engine_warn!("ember3d::shader",
                    "Sampler '{}' declared twice in section '{}', keeping the last one",
                    declaration.name, self.name);
                *existing = declaration;
            }
            None => self.samplers.push(declaration),
        }
    }
}

/// Shader source split into sections, in order of first appearance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSource {
    sections: Vec<ShaderSection>,
}

impl ShaderSource {
    pub fn parse(text: &str) -> ShaderSource {
        let mut sections = vec![ShaderSection::new(CONFIG_SECTION)];
        let mut current = 0;

        for (index, line) in text.lines().enumerate() {
            let tokens = tokenize(line);
            let Some(first) = tokens.first() else {
                continue;
            };

            if first == SECTION_DIRECTIVE {
                match tokens.get(1) {
                    Some(name) => {
                        current = match sections.iter().position(|s| &s.name == name) {
                            Some(existing) => existing,
                            None => {
                                sections.push(ShaderSection::new(name));
                                sections.len() - 1
                            }
                        };
                    }
                    None => {
                        crate::engine_error!("ember3d::shader",
                            "Line {}: '#section' without a section name", index + 1);
                    }
                }
            } else if first == STATIC_SAMPLER_KEYWORD {
                let section = &mut sections[current];
                if section.name == CONFIG_SECTION {
                    crate::engine_error!("ember3d::shader",
                        "Line {}: StaticSampler is not allowed in the config section, declare it in 'common' or a stage section",
                        index + 1);
                    continue;
                }
                match parse_static_sampler(&tokens) {
                    Some(declaration) => {
                        section.source.push_str(&declaration.native_declaration());
                        section.source.push('\n');
                        section.declare_sampler(declaration);
                    }
                    None => {
                        crate::engine_error!("ember3d::shader",
                            "Line {}: malformed StaticSampler declaration '{}'", index + 1, line.trim());
                        section.source.push_str(line);
                        section.source.push('\n');
                    }
                }
            } else {
                let section = &mut sections[current];
                section.source.push_str(line);
                section.source.push('\n');
            }
        }

        ShaderSource { sections }
    }

    pub fn sections(&self) -> &[ShaderSection] {
        &self.sections
    }

    pub fn section(&self, name: &str) -> Option<&ShaderSection> {
        self.sections.iter().find(|s| s.name == name)
    }

    pub fn config_text(&self) -> &str {
        self.section(CONFIG_SECTION).map(|s| s.source.as_str()).unwrap_or("")
    }

    /// Sections that are neither `config` nor `common` and name no known stage
    pub fn unknown_sections(&self) -> impl Iterator<Item = &ShaderSection> {
        self.sections.iter().filter(|s| {
            s.name != CONFIG_SECTION
                && s.name != COMMON_SECTION
                && ShaderStage::from_section_name(&s.name).is_none()
        })
    }

    /// Full source for a stage: `common` text followed by the stage's own text
    ///
    /// Returns `None` when the source has no section for this stage.
    pub fn assemble(&self, stage: ShaderStage) -> Option<String> {
        let section = self.section(stage.section_name())?;
        let mut assembled = self.section(COMMON_SECTION)
            .map(|common| common.source.clone())
            .unwrap_or_default();
        assembled.push_str(&section.source);
        Some(assembled)
    }

    /// Samplers visible to a stage (from `common` and the stage section), tagged with the stage
    ///
    /// A name declared in both keeps the stage section's declaration.
    pub fn stage_samplers(&self, stage: ShaderStage) -> Vec<SamplerDeclaration> {
        let mut samplers: Vec<SamplerDeclaration> = Vec::new();
        let sections = [COMMON_SECTION, stage.section_name()];
        for section in sections.iter().filter_map(|name| self.section(name)) {
            for declaration in &section.samplers {
                let mut declaration = declaration.clone();
                declaration.stage = Some(stage);
                match samplers.iter_mut().find(|s| s.name == declaration.name) {
                    Some(shadowed) => *shadowed = declaration,
                    None => samplers.push(declaration),
                }
            }
        }
        samplers
    }
}

#[cfg(test)]
#[path = "source_tests.rs"]
mod tests;
