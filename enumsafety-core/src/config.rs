//! Configuration loading from enumsafety.toml.
//!
//! Every key is optional; anything left out keeps the default (all checks
//! on, keyword `enum`, plain output).

use anyhow::Result;
use serde::Deserialize;
use std::{fs, path::Path};

use crate::advisor::AdvisoryConfig;
use crate::analyzer::AnalysisConfig;
use crate::constraints::ConstraintConfig;
use crate::detection::DetectionConfig;
use crate::error::EnumSafetyError;

pub const CONFIG_FILE: &str = "enumsafety.toml";

/// Main configuration structure for enumsafety.toml.
#[derive(Debug, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct EnumSafetyConfig {
    pub keyword: Option<String>,
    #[serde(default)]
    pub detection: DetectionSection,
    #[serde(default)]
    pub constraints: ConstraintSection,
    #[serde(default)]
    pub advisories: AdvisorySection,
    pub output: Option<OutputConfig>,
}

#[derive(Debug, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DetectionSection {
    pub constants: Option<bool>,
    pub suffix: Option<bool>,
    pub inline_comment: Option<bool>,
    pub preceding_comment: Option<bool>,
    pub named_comment: Option<bool>,
}

#[derive(Debug, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConstraintSection {
    pub min_constants: Option<bool>,
    pub same_block: Option<bool>,
    pub same_file: Option<bool>,
    pub exclusive_block: Option<bool>,
    pub proximity: Option<bool>,
}

#[derive(Debug, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct AdvisorySection {
    pub narrowing: Option<bool>,
    pub string_method: Option<bool>,
    pub unmarshal_method: Option<bool>,
}

/// Output format configuration.
#[derive(Debug, Deserialize, Default, PartialEq)]
pub struct OutputConfig {
    /// Output format: "plain" or "json".
    pub format: Option<String>,
}

impl EnumSafetyConfig {
    /// Overlay the file's settings on the defaults.
    pub fn to_analysis_config(&self) -> AnalysisConfig {
        let mut detection = DetectionConfig::default();
        let d = &self.detection;
        detection.constants = d.constants.unwrap_or(detection.constants);
        detection.suffix = d.suffix.unwrap_or(detection.suffix);
        detection.inline_comment = d.inline_comment.unwrap_or(detection.inline_comment);
        detection.preceding_comment = d.preceding_comment.unwrap_or(detection.preceding_comment);
        detection.named_comment = d.named_comment.unwrap_or(detection.named_comment);
        if let Some(keyword) = &self.keyword {
            detection.keyword = keyword.clone();
        }

        let c = &self.constraints;
        let defaults = ConstraintConfig::default();
        let constraints = ConstraintConfig {
            min_constants: c.min_constants.unwrap_or(defaults.min_constants),
            same_block: c.same_block.unwrap_or(defaults.same_block),
            same_file: c.same_file.unwrap_or(defaults.same_file),
            exclusive_block: c.exclusive_block.unwrap_or(defaults.exclusive_block),
            proximity: c.proximity.unwrap_or(defaults.proximity),
        };

        let a = &self.advisories;
        let defaults = AdvisoryConfig::default();
        let advisories = AdvisoryConfig {
            narrowing: a.narrowing.unwrap_or(defaults.narrowing),
            string_method: a.string_method.unwrap_or(defaults.string_method),
            unmarshal_method: a.unmarshal_method.unwrap_or(defaults.unmarshal_method),
        };

        AnalysisConfig {
            detection,
            constraints,
            advisories,
        }
    }

    /// True when `[output] format = "json"`.
    pub fn wants_json(&self) -> bool {
        self.output
            .as_ref()
            .and_then(|o| o.format.as_deref())
            .is_some_and(|f| f.eq_ignore_ascii_case("json"))
    }
}

/// Loads enumsafety.toml from `dir` if it exists.
pub fn load_config(dir: &Path) -> Result<Option<EnumSafetyConfig>> {
    let path = dir.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(None);
    }
    load_config_file(&path).map(Some)
}

/// Loads an explicitly named configuration file.
///
/// Both unreadable and malformed files surface as
/// [`EnumSafetyError::Config`], so callers can tell them apart from input
/// errors with `is_config_error()`.
pub fn load_config_file(path: &Path) -> Result<EnumSafetyConfig> {
    let content = fs::read_to_string(path)
        .map_err(|e| EnumSafetyError::config(path, format!("failed to read: {}", e)))?;
    let cfg = toml::from_str(&content)
        .map_err(|e| EnumSafetyError::config(path, format!("invalid configuration: {}", e)))?;
    Ok(cfg)
}
