//! Merkle tree construction and inclusion proofs
//!
//! This module builds binary hash trees over ordered leaf digests, derives
//! inclusion proofs for any leaf by index, and verifies proofs against a
//! claimed root.

pub mod export;
pub mod leaves;
pub mod merkle;
pub mod proof;

// Re-export commonly used items
pub use export::{decode_siblings, encode_siblings, SolidityBlock, SolidityProof};
pub use leaves::LeafSet;
pub use merkle::{MerkleTree, OddNodePolicy, PathStep, PathWalk};
pub use proof::{verify_path, Proof, ProofElement, ProofGenerator, ProofPosition};
