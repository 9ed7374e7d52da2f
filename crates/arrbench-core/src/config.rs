//! Benchmark configuration.
//!
//! A TOML document selects which storage methods are built and how hard the
//! gzip variants compress:
//!
//! ```toml
//! [methods]
//! enabled = ["csv", "npy", "mat"]
//!
//! [compression]
//! level = 6
//! ```
//!
//! Values are merged over the defaults with `figment`. The core reads no
//! environment variables.

use figment::{
    providers::{Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

use crate::catalog::MethodKind;
use crate::durable::Compression;

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to parse configuration.
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Invalid configuration value.
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue {
        /// Configuration key that failed validation.
        key: String,
        /// Validation error message.
        message: String,
    },
}

/// `[methods]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MethodsConfig {
    /// Storage methods to build, in run order.
    pub enabled: Vec<MethodKind>,
}

impl Default for MethodsConfig {
    fn default() -> Self {
        Self {
            enabled: MethodKind::ALL.to_vec(),
        }
    }
}

/// `[compression]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressionConfig {
    /// gzip level for the `*_gzip` methods, 0-9.
    pub level: u32,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            level: Compression::DEFAULT_GZIP_LEVEL,
        }
    }
}

/// Main benchmark configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct BenchConfig {
    /// Method selection.
    pub methods: MethodsConfig,
    /// Compression settings.
    pub compression: CompressionConfig,
}

impl BenchConfig {
    /// Loads configuration from a TOML file merged over the defaults.
    ///
    /// A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not parse.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Toml::file(path.as_ref()))
            .extract()
            .map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Creates a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Toml::string(toml_str))
            .extract()
            .map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error for an empty or duplicated method list, or a gzip
    /// level above 9.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.methods.enabled.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "methods.enabled".to_string(),
                message: "at least one method must be enabled".to_string(),
            });
        }

        let mut seen = HashSet::new();
        if let Some(dup) = self.methods.enabled.iter().find(|kind| !seen.insert(**kind)) {
            return Err(ConfigError::InvalidValue {
                key: "methods.enabled".to_string(),
                message: format!("'{}' is listed more than once", dup.as_str()),
            });
        }

        if self.compression.level > 9 {
            return Err(ConfigError::InvalidValue {
                key: "compression.level".to_string(),
                message: format!("value {} is out of range [0, 9]", self.compression.level),
            });
        }

        Ok(())
    }

    /// Serializes the configuration to TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}
