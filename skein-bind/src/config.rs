use std::path::Path;

use serde::{Deserialize, Serialize};
use skein_types::constants::{
    DEFAULT_FEE, DEFAULT_GAS_LIMIT, DEFAULT_VALUE, READ_ONLY_PREFIX, SCHEMA_METHOD,
};
use skein_types::primitives::{Amount, Gas};

use crate::error::BindError;

/// File name written by [`BindingConfig::init`].
pub const CONFIG_FILE_NAME: &str = "skein.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingConfig {
    #[serde(default)]
    pub schema: SchemaConfig,
    #[serde(default)]
    pub send: SendConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaConfig {
    /// Dry-run method that returns the contract schema.
    pub method: String,
    /// Method names with this prefix are bound as reads.
    pub read_only_prefix: String,
    /// Also bind the constants section, after the methods section.
    #[serde(default)]
    pub include_constants: bool,
}

/// Parameters attached to every state-mutating call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendConfig {
    pub gas_limit: Gas,
    pub fee: u64,
    pub value: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            method: SCHEMA_METHOD.to_string(),
            read_only_prefix: READ_ONLY_PREFIX.to_string(),
            include_constants: false,
        }
    }
}

impl Default for SendConfig {
    fn default() -> Self {
        Self {
            gas_limit: DEFAULT_GAS_LIMIT,
            fee: DEFAULT_FEE as u64,
            value: DEFAULT_VALUE as u64,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl SendConfig {
    pub fn fee(&self) -> Amount {
        Amount::from(self.fee)
    }

    pub fn value(&self) -> Amount {
        Amount::from(self.value)
    }
}

impl BindingConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self, BindError> {
        let contents = std::fs::read_to_string(path).map_err(|e| BindError::Config {
            reason: format!("failed to read config file '{}': {}", path, e),
        })?;
        let config: BindingConfig = toml::from_str(&contents).map_err(|e| BindError::Config {
            reason: format!("failed to parse config file '{}': {}", path, e),
        })?;
        Ok(config)
    }

    /// Write a default configuration file into the given directory.
    pub fn init(dir: &str) -> Result<(), BindError> {
        let dir_path = Path::new(dir);
        if !dir_path.exists() {
            std::fs::create_dir_all(dir_path)?;
        }

        let config = BindingConfig::default();
        let toml_str = toml::to_string_pretty(&config).map_err(|e| BindError::Config {
            reason: format!("failed to serialize default config: {}", e),
        })?;

        std::fs::write(dir_path.join(CONFIG_FILE_NAME), toml_str)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BindingConfig::default();
        assert_eq!(config.schema.method, "get_schema");
        assert_eq!(config.schema.read_only_prefix, "get_");
        assert!(!config.schema.include_constants);
        assert_eq!(config.send.gas_limit, 100_000);
        assert_eq!(config.send.fee(), 0);
        assert_eq!(config.send.value(), 0);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let config = BindingConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let deserialized: BindingConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(deserialized, config);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: BindingConfig =
            toml::from_str("[send]\ngas_limit = 5\nfee = 1\nvalue = 2\n").unwrap();
        assert_eq!(config.send.gas_limit, 5);
        assert_eq!(config.send.fee(), 1);
        assert_eq!(config.schema.method, "get_schema");
    }

    #[test]
    fn test_init_creates_config_file() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().to_str().unwrap();
        BindingConfig::init(dir).unwrap();

        let config_path = tmp.path().join(CONFIG_FILE_NAME);
        assert!(config_path.exists());

        let config = BindingConfig::load(config_path.to_str().unwrap()).unwrap();
        assert_eq!(config, BindingConfig::default());
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = BindingConfig::load("/nonexistent/path/skein.toml");
        assert!(matches!(result, Err(BindError::Config { .. })));
    }
}
