//! Error types for merkleproof

use thiserror::Error;

/// Main error type for tree construction, proof generation and I/O around them
#[derive(Error, Debug)]
pub enum MerkleError {
    /// Tree construction errors
    #[error("Cannot build a merkle tree from zero leaves")]
    EmptyInput,

    /// Proof generation errors
    #[error("Leaf index {index} out of range for tree with {leaf_count} leaves")]
    IndexOutOfRange { index: usize, leaf_count: usize },

    #[error("Invalid proof format: {reason}")]
    InvalidProofFormat { reason: String },

    /// Input parsing errors
    #[error("Invalid hash: {input}")]
    InvalidHash { input: String },

    #[error("Unknown hash algorithm: {name} (expected sha256, sha3-256 or keccak256)")]
    UnknownHashAlgorithm { name: String },

    #[error("Unknown odd node policy: {name} (expected carry-forward or duplicate)")]
    UnknownOddNodePolicy { name: String },

    /// Configuration errors
    #[error("Configuration error: {reason}")]
    ConfigurationError { reason: String },

    #[error("Home directory not found")]
    HomeDirectoryNotFound,

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    #[error("JSON serialization error: {0}")]
    JsonSerialization(#[from] serde_json::Error),
}

impl MerkleError {
    /// Create a new index out of range error
    pub fn index_out_of_range(index: usize, leaf_count: usize) -> Self {
        Self::IndexOutOfRange { index, leaf_count }
    }

    /// Create a new invalid proof format error
    pub fn invalid_proof_format(reason: impl Into<String>) -> Self {
        Self::InvalidProofFormat {
            reason: reason.into(),
        }
    }

    /// Create a new invalid hash error
    pub fn invalid_hash(input: impl Into<String>) -> Self {
        Self::InvalidHash {
            input: input.into(),
        }
    }

    /// Create a new configuration error
    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::ConfigurationError {
            reason: reason.into(),
        }
    }
}

/// Result type alias for merkleproof operations
pub type Result<T> = std::result::Result<T, MerkleError>;
