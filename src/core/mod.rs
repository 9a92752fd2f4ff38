//! Core types and utilities for merkleproof
//!
//! This module contains the digest type, the pluggable hash functions and
//! the error type shared by the tree builder, the proof engine and the CLI.

pub mod types;
pub mod error;
pub mod hash;

// Re-export commonly used items
pub use types::{Hash, LeafHash, RootHash, HASH_SIZE};
pub use error::{MerkleError, Result};
pub use hash::{
    keccak256, sha256, HashAlgorithm, Keccak256Hasher, MerkleHasher, Sha256Hasher, Sha3Hasher,
};
