//! Global configuration management for merkleproof
//!
//! Stores CLI defaults (hash algorithm, odd node policy, output format) in
//! ~/.merkleproof/config.toml

pub mod global_config;

// Re-export commonly used items
pub use global_config::{ConfigKey, ConfigValue, GlobalConfig, MerkleConfig, OutputConfig, OutputFormat};
