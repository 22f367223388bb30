//! Bridge configuration.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Tunables for a [`Bridge`](crate::Bridge).
///
/// Every field has a default, so an empty JSON object is a valid config:
///
/// ```rust
/// use ocbridge::BridgeConfig;
///
/// let config = BridgeConfig::from_json(r#"{ "max_depth": 32 }"#).unwrap();
/// assert_eq!(config.max_depth, 32);
/// assert_eq!(config.index_pair_probe_limit, 4096);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BridgeConfig {
    /// Deepest container nesting converted in either direction.
    pub max_depth: usize,
    /// Indices `0..limit` probed when reading an index pair set back.
    pub index_pair_probe_limit: usize,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            max_depth: 256,
            index_pair_probe_limit: 4096,
        }
    }
}

/// Errors loading a [`BridgeConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {message}")]
    Invalid { message: String },
}

impl BridgeConfig {
    /// Parse a config from JSON text.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: BridgeConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 {
            return Err(ConfigError::Invalid {
                message: "max_depth must be at least 1".to_string(),
            });
        }
        if self.index_pair_probe_limit == 0 {
            return Err(ConfigError::Invalid {
                message: "index_pair_probe_limit must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
