//! Configuration management for the evaluation suite
//!
//! Loads benchmark and output settings from TOML files.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::tasks::{PromptOptions, Variant};

/// Instruction appended after the choices unless configured otherwise
pub const DEFAULT_POST_PROMPT: &str =
    "\nAnswer with the option's letter from the given choices directly.";

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub benchmark: BenchmarkConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Benchmark selection and prompt settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkConfig {
    #[serde(default)]
    pub variant: Variant,
    /// Seed for the no-match fallback; unseeded runs draw from entropy
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_post_prompt")]
    pub post_prompt: Option<String>,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            variant: Variant::default(),
            seed: None,
            post_prompt: default_post_prompt(),
        }
    }
}

impl BenchmarkConfig {
    pub fn prompt_options(&self) -> PromptOptions {
        PromptOptions {
            post_prompt: self.post_prompt.clone(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    #[serde(default = "default_true")]
    pub generate_json: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            generate_json: true,
        }
    }
}

fn default_true() -> bool { true }
fn default_output_dir() -> String { "results/runs".to_string() }
fn default_post_prompt() -> Option<String> { Some(DEFAULT_POST_PROMPT.to_string()) }

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load from default config location or return defaults
    pub fn load_or_default() -> Self {
        let config_paths = [
            "config/eval.toml",
            "../config/eval.toml",
            "mcq-eval/config/eval.toml",
        ];

        for path in &config_paths {
            if let Ok(config) = Self::from_file(path) {
                tracing::info!("Loaded configuration from {}", path);
                return config;
            }
        }

        tracing::info!("Using default configuration");
        Self::default()
    }

    /// Save configuration to a TOML file
    pub fn save_toml<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))?;
        fs::write(path, content)?;
        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),
}
