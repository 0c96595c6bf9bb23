//! Settings Models
//!
//! Studio configuration and settings data structures.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::utils::paths::default_data_dir;

/// Thresholds for sampling large sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamplingConfig {
    /// Sources shorter than this are returned whole (~3500 tokens at 15000)
    pub max_chars: usize,
    /// Maximum number of chunks sampled from a large source
    pub max_chunks: usize,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            max_chars: 15000,
            max_chunks: 12,
        }
    }
}

/// Studio configuration stored in config.json
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudioConfig {
    /// Root for projects, sources and studio artifacts
    pub data_dir: PathBuf,
    /// Prefix of every public URL handed back to the orchestrator
    pub api_base: String,
    /// Aspect ratio used when an image tool call does not give one
    #[serde(default = "default_aspect_ratio")]
    pub default_aspect_ratio: String,
    #[serde(default)]
    pub sampling: SamplingConfig,
}

fn default_aspect_ratio() -> String {
    "16:9".to_string()
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            api_base: "/api/v1".to_string(),
            default_aspect_ratio: default_aspect_ratio(),
            sampling: SamplingConfig::default(),
        }
    }
}

/// Settings update request (partial update)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigUpdate {
    pub data_dir: Option<PathBuf>,
    pub api_base: Option<String>,
    pub default_aspect_ratio: Option<String>,
    pub max_chars: Option<usize>,
    pub max_chunks: Option<usize>,
}

impl StudioConfig {
    /// Apply a partial update to the configuration
    pub fn apply_update(&mut self, update: ConfigUpdate) {
        if let Some(data_dir) = update.data_dir {
            self.data_dir = data_dir;
        }
        if let Some(api_base) = update.api_base {
            self.api_base = api_base;
        }
        if let Some(ratio) = update.default_aspect_ratio {
            self.default_aspect_ratio = ratio;
        }
        if let Some(max_chars) = update.max_chars {
            self.sampling.max_chars = max_chars;
        }
        if let Some(max_chunks) = update.max_chunks {
            self.sampling.max_chunks = max_chunks;
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.data_dir.as_os_str().is_empty() {
            return Err("data_dir must not be empty".to_string());
        }

        if self.api_base.is_empty() {
            return Err("api_base must not be empty".to_string());
        }
        if self.api_base.ends_with('/') {
            return Err(format!(
                "api_base must not end with '/': {}",
                self.api_base
            ));
        }

        if !is_aspect_ratio(&self.default_aspect_ratio) {
            return Err(format!(
                "Invalid default_aspect_ratio: {}. Expected W:H, e.g. '16:9'",
                self.default_aspect_ratio
            ));
        }

        if self.sampling.max_chars < 1000 {
            return Err("sampling.max_chars must be at least 1000".to_string());
        }
        if self.sampling.max_chunks == 0 {
            return Err("sampling.max_chunks must be at least 1".to_string());
        }

        Ok(())
    }
}

fn is_aspect_ratio(value: &str) -> bool {
    match value.split_once(':') {
        Some((w, h)) => {
            matches!(w.parse::<u32>(), Ok(n) if n > 0) && matches!(h.parse::<u32>(), Ok(n) if n > 0)
        }
        None => false,
    }
}
