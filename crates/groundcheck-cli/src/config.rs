//! Scoring run configuration.
//!
//! Precedence, lowest to highest: built-in defaults, the optional YAML
//! config file, CLI flags.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use groundcheck_core::DEFAULT_SUPPORT_THRESHOLD;

pub const DEFAULT_PROVIDER: &str = "fastembed";
pub const DEFAULT_MODEL: &str = "all-minilm-l6-v2";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("threshold must be within [-1, 1], got {0}")]
    ThresholdOutOfRange(f32),
}

/// Configuration for a scoring run.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EvalConfig {
    /// Embedding provider kind, e.g. "fastembed" or "hash".
    pub provider: String,

    /// Model name handed to the provider.
    pub model: String,

    /// Support threshold for the unsupported-claim rate.
    pub threshold: f32,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            provider: DEFAULT_PROVIDER.to_string(),
            model: DEFAULT_MODEL.to_string(),
            threshold: DEFAULT_SUPPORT_THRESHOLD,
        }
    }
}

impl EvalConfig {
    /// Load configuration from a YAML file. Missing fields keep their
    /// defaults; unknown fields are rejected.
    pub fn from_yaml_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_yaml(&text).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(text)
    }

    /// Apply CLI flag overrides, the highest-precedence layer.
    pub fn with_overrides(
        mut self,
        provider: Option<String>,
        model: Option<String>,
        threshold: Option<f32>,
    ) -> Result<Self, ConfigError> {
        if let Some(provider) = provider {
            self.provider = provider;
        }
        if let Some(model) = model {
            self.model = model;
        }
        if let Some(threshold) = threshold {
            self.threshold = threshold;
        }
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(-1.0..=1.0).contains(&self.threshold) {
            return Err(ConfigError::ThresholdOutOfRange(self.threshold));
        }
        Ok(())
    }

    /// Provider configuration handed to the embedder factory.
    pub fn provider_config(&self) -> serde_json::Value {
        serde_json::json!({ "model": self.model })
    }
}
