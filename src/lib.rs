//! merkleproof - Merkle trees and inclusion proofs
//!
//! merkleproof builds a binary hash tree over an ordered list of leaf digests,
//! generates inclusion proofs for any leaf by index, and verifies a proof
//! against a claimed root. Proofs export to the shapes on-chain verifiers
//! expect: fixed-width sibling bytes, `0x` hex lists and Solidity literals.
//!
//! # Core Features
//!
//! - **Carry-forward trees**: the unpaired trailing node of an odd level moves up unchanged
//! - **Pluggable hashing**: Keccak-256, SHA3-256 and SHA-256 behind one trait
//! - **Self-describing proofs**: leaf count and sibling sides travel with the path
//! - **Stateless verification**: proofs check against a root with no access to the tree
//!
//! # Example Usage
//!
//! ```rust
//! use merkleproof::{HashAlgorithm, LeafSet, MerkleTree};
//!
//! let hasher = HashAlgorithm::Keccak256;
//! let leaves = LeafSet::from_records(["alice -> bob", "bob -> dave", "carol -> eve"], &hasher);
//! let tree = MerkleTree::from_leaf_set(&leaves, &hasher)?;
//!
//! let proof = tree.generate_proof(2)?;
//! assert!(proof.verify(&hasher, &tree.root(), &leaves[2], 2));
//! # Ok::<(), merkleproof::MerkleError>(())
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod proofs;

// Re-export commonly used types
pub use core::{
    error::{MerkleError, Result},
    hash::{HashAlgorithm, MerkleHasher},
    types::Hash,
};

pub use proofs::{
    leaves::LeafSet,
    merkle::{MerkleTree, OddNodePolicy},
    proof::{verify_path, Proof, ProofPosition},
};

/// Current version of merkleproof
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
