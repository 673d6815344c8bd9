//! Configuration module for docmerge.
//!
//! This module provides all configuration types and loading functionality.
//! Configuration is loaded from YAML files; command-line flags override it.

mod client;
mod logging;
mod relay;

pub use client::ClientSettings;
pub use logging::{LogFormat, LogLevel, LogOutput, LoggingConfig};
pub use relay::RelayConfig;

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::DocMergeError;

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Merge service client configuration.
    pub client: ClientSettings,

    /// Relay server configuration.
    pub relay: RelayConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

impl Config {
    /// Loads configuration from an optional path.
    /// If path is None, uses default search paths.
    pub fn load<P: AsRef<Path>>(path: Option<P>) -> Result<Self, DocMergeError> {
        match path {
            Some(p) => Self::load_from_path(p),
            None => {
                let default_paths = [
                    "/etc/docmerge/config.yaml",
                    "/etc/docmerge/config.yml",
                    "docmerge.yaml",
                    "docmerge.yml",
                ];

                for path in &default_paths {
                    if Path::new(path).exists() {
                        return Self::load_from_path(path);
                    }
                }

                Ok(Self::default())
            }
        }
    }

    /// Loads configuration from a YAML file.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, DocMergeError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            DocMergeError::config_with_source(
                format!("Failed to read config file '{}'", path.as_ref().display()),
                e,
            )
        })?;

        Self::load_from_str(&content)
    }

    /// Loads configuration from a YAML string.
    pub fn load_from_str(content: &str) -> Result<Self, DocMergeError> {
        let config: Config = serde_yaml::from_str(content)
            .map_err(|e| DocMergeError::config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Validates configuration.
    pub fn validate(&self) -> Result<(), DocMergeError> {
        let base_url = self.client.base_url.trim();
        if base_url.is_empty() {
            return Err(DocMergeError::config("client.base_url must not be empty"));
        }
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(DocMergeError::config(format!(
                "client.base_url must start with http:// or https://, got '{}'",
                base_url
            )));
        }

        if self.client.timeout_seconds == 0 {
            return Err(DocMergeError::config("client.timeout_seconds must be > 0"));
        }

        if self.relay.port == 0 {
            return Err(DocMergeError::config("relay.port must be > 0"));
        }

        if self.logging.output == LogOutput::File && self.logging.file_path.is_none() {
            return Err(DocMergeError::config(
                "logging.file_path is required when output is file",
            ));
        }

        Ok(())
    }
}
