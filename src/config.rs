//
//  config.rs
//  urltrace
//

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::analysis::{default_patterns, AnalysisOptions, Analyzer, CallPattern, JoinRule};
use crate::error::{Result, UrlTraceError};

/// Default config file name looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "urltrace.toml";

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrlTraceConfig {
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub scan: ScanConfig,
    /// Call shapes to report. Replaces the built-in set when present.
    #[serde(default = "default_patterns")]
    pub patterns: Vec<CallPattern>,
}

/// Resolution settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub join_rule: JoinRule,
    /// Text rendered for unresolved endpoints.
    #[serde(default = "default_placeholder")]
    pub placeholder: String,
}

/// Directory scanning settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Files larger than this are skipped.
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: u64,
    /// Extra directory names to skip, on top of the built-in list.
    #[serde(default)]
    pub ignore_dirs: Vec<String>,
}

fn default_placeholder() -> String {
    crate::analysis::DEFAULT_PLACEHOLDER.to_string()
}

fn default_max_file_bytes() -> u64 {
    1024 * 1024
}

impl Default for UrlTraceConfig {
    fn default() -> Self {
        Self {
            analysis: AnalysisConfig::default(),
            scan: ScanConfig::default(),
            patterns: default_patterns(),
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            join_rule: JoinRule::default(),
            placeholder: default_placeholder(),
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            max_file_bytes: default_max_file_bytes(),
            ignore_dirs: Vec::new(),
        }
    }
}

impl UrlTraceConfig {
    /// Load and validate config from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&contents)
            .map_err(|e| UrlTraceError::ConfigError(path.to_path_buf(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from `path` if it exists, falling back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_toml(contents: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    pub fn validate(&self) -> Result<()> {
        self.patterns.iter().try_for_each(CallPattern::validate)
    }

    pub fn analysis_options(&self) -> AnalysisOptions {
        AnalysisOptions {
            join_rule: self.analysis.join_rule,
            placeholder: self.analysis.placeholder.clone(),
        }
    }

    pub fn analyzer(&self) -> Analyzer {
        Analyzer::new(self.patterns.clone(), self.analysis_options())
    }
}
