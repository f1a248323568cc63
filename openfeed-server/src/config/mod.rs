//! Configuration module for openfeed-server.
//!
//! Handles loading configuration from a TOML file with CLI overrides.
//! Configuration is load-once: nothing here reconfigures at runtime.

pub mod file;

use crate::config::file::FileConfig;
use std::net::SocketAddr;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("validation error: {0}")]
    Validation(String),
}

/// Configuration loader that handles the complete loading process.
pub struct ConfigLoader {
    config_path: std::path::PathBuf,
    listen_override: Option<SocketAddr>,
}

impl ConfigLoader {
    /// Create a new config loader.
    pub fn new(config_path: impl AsRef<Path>, listen_override: Option<SocketAddr>) -> Self {
        Self {
            config_path: config_path.as_ref().to_path_buf(),
            listen_override,
        }
    }

    /// Load and process the configuration.
    ///
    /// Reads the TOML file, applies CLI overrides, then validates the
    /// result. A missing file is an error; an empty file is a valid
    /// all-defaults configuration.
    pub fn load(&self) -> Result<FileConfig, ConfigError> {
        let config_content = std::fs::read_to_string(&self.config_path)?;
        let mut file_config: FileConfig = toml::from_str(&config_content)?;

        if let Some(listen) = self.listen_override {
            file_config.server.listen = listen;
        }

        // Validate the configuration
        self.validate(&file_config)?;

        Ok(file_config)
    }

    fn validate(&self, config: &FileConfig) -> Result<(), ConfigError> {
        // The poll ticker cannot be built with a zero period.
        if config.monitor.poll_interval_ms == 0 {
            return Err(ConfigError::Validation(
                "monitor.poll_interval_ms must be greater than zero".to_string(),
            ));
        }
        // A zero-row page turns every poll cycle into a no-op.
        if config.monitor.page_size == 0 {
            return Err(ConfigError::Validation(
                "monitor.page_size must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
