//! JSON Configuration Management
//!
//! Handles reading and writing the studio configuration file.

use std::fs;
use std::path::{Path, PathBuf};

use crate::models::settings::{ConfigUpdate, StudioConfig};
use crate::utils::error::{AppError, AppResult};
use crate::utils::paths::{default_data_dir, ensure_dir};

/// Configuration service for managing studio settings
#[derive(Debug)]
pub struct ConfigService {
    config_path: PathBuf,
    config: StudioConfig,
}

impl ConfigService {
    /// Load `~/.studio-agents/config.json`, creating it with defaults if absent.
    pub fn new() -> AppResult<Self> {
        Self::open(default_data_dir().join("config.json"))
    }

    /// Load the config at `config_path`, creating it with defaults if absent.
    pub fn open(config_path: impl Into<PathBuf>) -> AppResult<Self> {
        let config_path = config_path.into();
        if let Some(parent) = config_path.parent() {
            ensure_dir(parent)?;
        }

        let config = if config_path.exists() {
            Self::load_from_file(&config_path)?
        } else {
            let default_config = StudioConfig::default();
            Self::save_to_file(&config_path, &default_config)?;
            default_config
        };

        Ok(Self {
            config_path,
            config,
        })
    }

    /// Load configuration from a file
    fn load_from_file(path: &Path) -> AppResult<StudioConfig> {
        let content = fs::read_to_string(path)?;
        let config: StudioConfig = serde_json::from_str(&content)?;
        config.validate().map_err(AppError::validation)?;
        Ok(config)
    }

    /// Save configuration to a file with pretty formatting
    fn save_to_file(path: &Path, config: &StudioConfig) -> AppResult<()> {
        config.validate().map_err(AppError::validation)?;
        let content = serde_json::to_string_pretty(config)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Get the current configuration
    pub fn get_config(&self) -> &StudioConfig {
        &self.config
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Update the configuration with a partial update. The stored config is
    /// only replaced when the updated one validates.
    pub fn update_config(&mut self, update: ConfigUpdate) -> AppResult<StudioConfig> {
        let mut next = self.config.clone();
        next.apply_update(update);
        Self::save_to_file(&self.config_path, &next)?;
        self.config = next;
        Ok(self.config.clone())
    }

    /// Reload configuration from disk
    pub fn reload(&mut self) -> AppResult<()> {
        self.config = Self::load_from_file(&self.config_path)?;
        Ok(())
    }

    /// Reset configuration to defaults
    pub fn reset(&mut self) -> AppResult<()> {
        self.config = StudioConfig::default();
        Self::save_to_file(&self.config_path, &self.config)
    }
}
