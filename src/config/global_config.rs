//! Global configuration management
//!
//! Provides defaults for the CLI stored in ~/.merkleproof/config.toml

use crate::core::error::{MerkleError, Result};
use crate::core::hash::HashAlgorithm;
use crate::proofs::merkle::OddNodePolicy;
use directories::UserDirs;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

/// Directory under the home directory holding the config file
pub const CONFIG_DIR_NAME: &str = ".merkleproof";

/// Config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Global configuration for merkleproof
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Tree construction defaults
    #[serde(default)]
    pub merkle: MerkleConfig,
    /// Output defaults
    #[serde(default)]
    pub output: OutputConfig,
    /// Custom configuration values
    #[serde(flatten)]
    pub custom: BTreeMap<String, ConfigValue>,
}

/// Tree construction configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MerkleConfig {
    /// Hash function for leaves and interior nodes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<HashAlgorithm>,
    /// Handling of the trailing node of odd levels
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub odd_node: Option<OddNodePolicy>,
}

/// Output configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Default proof output format
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<OutputFormat>,
}

/// How proofs are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human readable, colored
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
    /// Solidity variable declarations
    Solidity,
    /// One 0x-prefixed sibling digest per line
    Hex,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
            OutputFormat::Solidity => "solidity",
            OutputFormat::Hex => "hex",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = MerkleError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "solidity" | "sol" => Ok(OutputFormat::Solidity),
            "hex" => Ok(OutputFormat::Hex),
            other => Err(MerkleError::configuration(format!(
                "output.format must be one of text, json, solidity, hex (got {})",
                other
            ))),
        }
    }
}

/// Configuration value types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    String(String),
    Number(i64),
    Boolean(bool),
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::String(s) => f.write_str(s),
            ConfigValue::Number(n) => write!(f, "{}", n),
            ConfigValue::Boolean(b) => write!(f, "{}", b),
        }
    }
}

impl ConfigValue {
    /// Parse a command-line value, preferring booleans and numbers over strings
    pub fn parse(raw: &str) -> Self {
        if let Ok(b) = raw.parse::<bool>() {
            ConfigValue::Boolean(b)
        } else if let Ok(n) = raw.parse::<i64>() {
            ConfigValue::Number(n)
        } else {
            ConfigValue::String(raw.to_string())
        }
    }
}

/// Configuration key for setting values
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigKey {
    MerkleHash,
    MerkleOddNode,
    OutputFormat,
    Custom(String),
}

impl ConfigKey {
    pub fn parse(key: &str) -> Self {
        match key {
            "merkle.hash" => ConfigKey::MerkleHash,
            "merkle.odd_node" => ConfigKey::MerkleOddNode,
            "output.format" => ConfigKey::OutputFormat,
            _ => ConfigKey::Custom(key.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ConfigKey::MerkleHash => "merkle.hash",
            ConfigKey::MerkleOddNode => "merkle.odd_node",
            ConfigKey::OutputFormat => "output.format",
            ConfigKey::Custom(key) => key,
        }
    }
}

impl GlobalConfig {
    /// Load configuration from `path`, falling back to defaults if it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: GlobalConfig = toml::from_str(&content).map_err(|e| {
            MerkleError::configuration(format!("Failed to parse {}: {}", path.display(), e))
        })?;

        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Save configuration to `path`, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| MerkleError::configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the path to the global configuration file
    pub fn get_config_path() -> Result<PathBuf> {
        let user_dirs = UserDirs::new().ok_or(MerkleError::HomeDirectoryNotFound)?;
        Ok(user_dirs
            .home_dir()
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME))
    }

    /// An explicit path if given, otherwise the default location
    pub fn resolve_path(explicit: Option<&Path>) -> Result<PathBuf> {
        match explicit {
            Some(path) => Ok(path.to_path_buf()),
            None => Self::get_config_path(),
        }
    }

    /// Get a configuration value
    pub fn get(&self, key: &ConfigKey) -> Option<ConfigValue> {
        match key {
            ConfigKey::MerkleHash => self
                .merkle
                .hash
                .map(|alg| ConfigValue::String(alg.to_string())),
            ConfigKey::MerkleOddNode => self
                .merkle
                .odd_node
                .map(|policy| ConfigValue::String(policy.to_string())),
            ConfigKey::OutputFormat => self
                .output
                .format
                .map(|format| ConfigValue::String(format.to_string())),
            ConfigKey::Custom(key) => self.custom.get(key).cloned(),
        }
    }

    /// Set a configuration value
    pub fn set(&mut self, key: ConfigKey, value: ConfigValue) -> Result<()> {
        match key {
            ConfigKey::MerkleHash => {
                let ConfigValue::String(name) = value else {
                    return Err(MerkleError::configuration("merkle.hash must be a string"));
                };
                self.merkle.hash = Some(name.parse()?);
            },
            ConfigKey::MerkleOddNode => {
                let ConfigValue::String(name) = value else {
                    return Err(MerkleError::configuration("merkle.odd_node must be a string"));
                };
                self.merkle.odd_node = Some(name.parse()?);
            },
            ConfigKey::OutputFormat => {
                let ConfigValue::String(name) = value else {
                    return Err(MerkleError::configuration("output.format must be a string"));
                };
                self.output.format = Some(name.parse()?);
            },
            ConfigKey::Custom(key_name) => {
                if key_name.starts_with("merkle.") || key_name.starts_with("output.") {
                    return Err(MerkleError::configuration(format!(
                        "Unknown configuration key: {}",
                        key_name
                    )));
                }
                self.custom.insert(key_name, value);
            },
        }
        Ok(())
    }

    /// Unset a configuration value
    pub fn unset(&mut self, key: &ConfigKey) {
        match key {
            ConfigKey::MerkleHash => self.merkle.hash = None,
            ConfigKey::MerkleOddNode => self.merkle.odd_node = None,
            ConfigKey::OutputFormat => self.output.format = None,
            ConfigKey::Custom(key_name) => {
                self.custom.remove(key_name);
            },
        }
    }

    /// List all configuration values
    pub fn list(&self) -> Vec<(String, String)> {
        let mut entries: Vec<(String, String)> = [
            ConfigKey::MerkleHash,
            ConfigKey::MerkleOddNode,
            ConfigKey::OutputFormat,
        ]
        .iter()
        .filter_map(|key| self.get(key).map(|value| (key.as_str().to_string(), value.to_string())))
        .collect();

        for (key, value) in &self.custom {
            entries.push((key.clone(), value.to_string()));
        }

        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    /// Hash algorithm with fallback to the default
    pub fn hash_algorithm(&self) -> HashAlgorithm {
        self.merkle.hash.unwrap_or_default()
    }

    /// Odd node policy with fallback to the default
    pub fn odd_node_policy(&self) -> OddNodePolicy {
        self.merkle.odd_node.unwrap_or_default()
    }

    /// Output format with fallback to the default
    pub fn output_format(&self) -> OutputFormat {
        self.output.format.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = GlobalConfig::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, GlobalConfig::default());
        assert_eq!(config.hash_algorithm(), HashAlgorithm::Keccak256);
        assert_eq!(config.odd_node_policy(), OddNodePolicy::CarryForward);
        assert_eq!(config.output_format(), OutputFormat::Text);
    }

    #[test]
    fn test_set_save_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);

        let mut config = GlobalConfig::default();
        config
            .set(ConfigKey::parse("merkle.hash"), ConfigValue::parse("sha3-256"))
            .unwrap();
        config
            .set(ConfigKey::parse("merkle.odd_node"), ConfigValue::parse("duplicate"))
            .unwrap();
        config
            .set(ConfigKey::parse("output.format"), ConfigValue::parse("solidity"))
            .unwrap();
        config
            .set(ConfigKey::parse("project.name"), ConfigValue::parse("lab7"))
            .unwrap();
        config.save_to(&path).unwrap();

        let loaded = GlobalConfig::load_from(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.hash_algorithm(), HashAlgorithm::Sha3_256);
        assert_eq!(loaded.odd_node_policy(), OddNodePolicy::Duplicate);
        assert_eq!(loaded.output_format(), OutputFormat::Solidity);
        assert_eq!(
            loaded.list(),
            vec![
                ("merkle.hash".to_string(), "sha3-256".to_string()),
                ("merkle.odd_node".to_string(), "duplicate".to_string()),
                ("output.format".to_string(), "solidity".to_string()),
                ("project.name".to_string(), "lab7".to_string()),
            ]
        );
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let mut config = GlobalConfig::default();
        assert!(config
            .set(ConfigKey::MerkleHash, ConfigValue::parse("md5"))
            .is_err());
        assert!(config
            .set(ConfigKey::MerkleHash, ConfigValue::Number(256))
            .is_err());
        assert!(config
            .set(ConfigKey::parse("merkle.depth"), ConfigValue::Number(3))
            .is_err());
        assert_eq!(config, GlobalConfig::default());
    }

    #[test]
    fn test_unset() {
        let mut config = GlobalConfig::default();
        config
            .set(ConfigKey::MerkleHash, ConfigValue::parse("sha256"))
            .unwrap();
        config.unset(&ConfigKey::MerkleHash);
        assert_eq!(config.get(&ConfigKey::MerkleHash), None);
    }

    #[test]
    fn test_malformed_file_is_a_configuration_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[merkle]\nhash = \"md5\"\n").unwrap();
        assert!(matches!(
            GlobalConfig::load_from(&path),
            Err(MerkleError::ConfigurationError { .. })
        ));
    }
}
