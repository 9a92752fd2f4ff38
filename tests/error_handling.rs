//! Error types and their formatting
//!
//! Tests the error system and ensures parse failures carry the offending input.

use merkleproof::config::{ConfigKey, ConfigValue, GlobalConfig, OutputFormat};
use merkleproof::core::error::*;
use merkleproof::{HashAlgorithm, LeafSet, OddNodePolicy};

#[test]
fn test_index_out_of_range_display() {
    let error = MerkleError::index_out_of_range(7, 4);
    let message = error.to_string();
    assert!(message.contains("7"));
    assert!(message.contains("4 leaves"));
}

#[test]
fn test_error_from_io() {
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
    let error: MerkleError = io_error.into();
    assert!(matches!(error, MerkleError::Io(_)));
}

#[test]
fn test_unknown_names_are_reported() {
    match "blake3".parse::<HashAlgorithm>() {
        Err(MerkleError::UnknownHashAlgorithm { name }) => assert_eq!(name, "blake3"),
        other => panic!("Expected UnknownHashAlgorithm, got {:?}", other),
    }

    match "pad-left".parse::<OddNodePolicy>() {
        Err(MerkleError::UnknownOddNodePolicy { name }) => assert_eq!(name, "pad-left"),
        other => panic!("Expected UnknownOddNodePolicy, got {:?}", other),
    }

    assert!(matches!(
        "yaml".parse::<OutputFormat>(),
        Err(MerkleError::ConfigurationError { .. })
    ));
}

#[test]
fn test_name_aliases() {
    assert_eq!("KECCAK".parse::<HashAlgorithm>().unwrap(), HashAlgorithm::Keccak256);
    assert_eq!("sha3_256".parse::<HashAlgorithm>().unwrap(), HashAlgorithm::Sha3_256);
    assert_eq!("carry_forward".parse::<OddNodePolicy>().unwrap(), OddNodePolicy::CarryForward);
    assert_eq!("sol".parse::<OutputFormat>().unwrap(), OutputFormat::Solidity);
}

#[test]
fn test_bad_leaf_hex_names_the_input() {
    let error = LeafSet::from_hex(["0xdeadbeef"]).unwrap_err();
    match error {
        MerkleError::InvalidHash { input } => assert_eq!(input, "0xdeadbeef"),
        other => panic!("Expected InvalidHash, got {:?}", other),
    }
}

#[test]
fn test_config_type_mismatch() {
    let mut config = GlobalConfig::default();
    let error = config
        .set(ConfigKey::MerkleHash, ConfigValue::Boolean(true))
        .unwrap_err();
    assert!(error.to_string().contains("merkle.hash must be a string"));
}

#[test]
fn test_malformed_config_file() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("config.toml");
    std::fs::write(&path, "[merkle]\nhash = \"md5\"\n").unwrap();

    let error = GlobalConfig::load_from(&path).unwrap_err();
    assert!(matches!(error, MerkleError::ConfigurationError { .. }));
    assert!(error.to_string().contains("config.toml"));
}

#[test]
fn test_result_type_alias() {
    fn parse_root(hex: &str) -> Result<merkleproof::Hash> {
        merkleproof::Hash::from_hex(hex).map_err(|_| MerkleError::invalid_hash(hex))
    }

    assert!(parse_root(&"ab".repeat(32)).is_ok());
    match parse_root("xyz") {
        Err(MerkleError::InvalidHash { input }) => assert_eq!(input, "xyz"),
        other => panic!("Expected InvalidHash, got {:?}", other),
    }
}
