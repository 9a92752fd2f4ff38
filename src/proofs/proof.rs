//! Proof generation and verification

use crate::core::{error::*, hash::MerkleHasher, types::*};
use crate::proofs::merkle::{MerkleTree, OddNodePolicy, PathWalk};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Version tag written into serialized proofs
pub const PROOF_FORMAT_VERSION: &str = "1.0";

/// A single element in a merkle proof path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofElement {
    /// Hash of the sibling node
    pub hash: Hash,
    /// Whether the sibling is on the left or right
    pub position: ProofPosition,
}

/// Position of a sibling in a merkle proof
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProofPosition {
    /// Sibling is the left operand: `H(sibling ++ current)`
    Left,
    /// Sibling is the right operand: `H(current ++ sibling)`
    Right,
}

impl ProofElement {
    fn combine(&self, hasher: &impl MerkleHasher, current: &Hash) -> Hash {
        match self.position {
            ProofPosition::Left => hasher.hash_pair(&self.hash, current),
            ProofPosition::Right => hasher.hash_pair(current, &self.hash),
        }
    }
}

/// Inclusion proof for one leaf
///
/// Holds no reference to the tree it came from. The leaf count and odd node
/// policy let a verifier replay the exact walk used to generate the path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proof {
    /// Version of the proof format
    pub version: String,
    /// Index of the proven leaf
    pub leaf_index: usize,
    /// Number of leaves in the tree
    pub leaf_count: usize,
    /// Leaf digest at generation time
    pub leaf: LeafHash,
    /// Root of the tree the proof was generated from
    pub root: RootHash,
    /// Odd node policy of that tree
    pub odd_node: OddNodePolicy,
    /// Proof path elements, leaf to root
    pub path: Vec<ProofElement>,
}

impl Proof {
    pub fn new(
        leaf_index: usize,
        leaf_count: usize,
        leaf: LeafHash,
        root: RootHash,
        odd_node: OddNodePolicy,
        path: Vec<ProofElement>,
    ) -> Self {
        Self {
            version: PROOF_FORMAT_VERSION.to_string(),
            leaf_index,
            leaf_count,
            leaf,
            root,
            odd_node,
            path,
        }
    }

    /// Number of sibling digests in the path
    pub fn len(&self) -> usize {
        self.path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// Sibling digests in generation order, without positions
    pub fn siblings(&self) -> Vec<Hash> {
        self.path.iter().map(|element| element.hash).collect()
    }

    /// Check that `leaf` at `leaf_index` hashes up to `root` along this path
    ///
    /// Never fails: any inconsistency between the arguments and the proof
    /// yields `false`.
    pub fn verify(
        &self,
        hasher: &impl MerkleHasher,
        root: &Hash,
        leaf: &Hash,
        leaf_index: usize,
    ) -> bool {
        if leaf_index != self.leaf_index {
            debug!(
                expected = self.leaf_index,
                got = leaf_index,
                "proof was generated for a different leaf index"
            );
            return false;
        }

        let mut elements = self.path.iter();
        let mut current = *leaf;

        for step in PathWalk::new(leaf_index, self.leaf_count, self.odd_node) {
            let Some((_, expected_position)) = step.sibling else {
                continue;
            };
            let Some(element) = elements.next() else {
                debug!(level = step.level, "proof path is shorter than the tree walk");
                return false;
            };
            if element.position != expected_position {
                debug!(level = step.level, "sibling position disagrees with leaf index");
                return false;
            }
            if step.is_self_paired() && element.hash != current {
                debug!(level = step.level, "self-paired sibling is not the followed node");
                return false;
            }
            current = element.combine(hasher, &current);
            trace!(level = step.level, hash = %current, "combined");
        }

        if elements.next().is_some() {
            debug!("proof path is longer than the tree walk");
            return false;
        }

        leaf_index < self.leaf_count && current == *root
    }

    /// Verify against the root recorded in the proof itself
    pub fn verify_self_contained(&self, hasher: &impl MerkleHasher) -> bool {
        self.verify(hasher, &self.root, &self.leaf, self.leaf_index)
    }

    /// Serialize proof to JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(MerkleError::JsonSerialization)
    }

    /// Deserialize proof from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let proof: Proof = serde_json::from_str(json)?;
        proof.check_version()?;
        Ok(proof)
    }

    /// Serialize proof to a compact binary form
    pub fn to_binary(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    /// Deserialize proof from its compact binary form
    pub fn from_binary(bytes: &[u8]) -> Result<Self> {
        let proof: Proof = bincode::deserialize(bytes)?;
        proof.check_version()?;
        Ok(proof)
    }

    fn check_version(&self) -> Result<()> {
        if self.version != PROOF_FORMAT_VERSION {
            return Err(MerkleError::invalid_proof_format(format!(
                "unsupported proof version {} (expected {})",
                self.version, PROOF_FORMAT_VERSION
            )));
        }
        Ok(())
    }
}

/// Verify a bare sibling list, deriving every position from the leaf index
///
/// This is the check a remote verifier can run on the fixed-width wire form,
/// given the leaf count and odd node policy of the tree.
pub fn verify_path(
    hasher: &impl MerkleHasher,
    siblings: &[Hash],
    root: &Hash,
    leaf: &Hash,
    leaf_index: usize,
    leaf_count: usize,
    policy: OddNodePolicy,
) -> bool {
    if leaf_index >= leaf_count {
        return false;
    }

    let mut remaining = siblings.iter();
    let mut current = *leaf;

    for step in PathWalk::new(leaf_index, leaf_count, policy) {
        let Some((_, position)) = step.sibling else {
            continue;
        };
        let Some(sibling) = remaining.next() else {
            return false;
        };
        if step.is_self_paired() && *sibling != current {
            return false;
        }
        current = ProofElement {
            hash: *sibling,
            position,
        }
        .combine(hasher, &current);
    }

    remaining.next().is_none() && current == *root
}

/// Proof generator bound to one tree and the hasher it was built with
pub struct ProofGenerator<'a, H: MerkleHasher> {
    tree: &'a MerkleTree,
    hasher: &'a H,
}

impl<'a, H: MerkleHasher> ProofGenerator<'a, H> {
    /// Create a new proof generator
    pub fn new(tree: &'a MerkleTree, hasher: &'a H) -> Self {
        Self { tree, hasher }
    }

    /// Generate a proof for a leaf index
    pub fn prove_index(&self, leaf_index: usize) -> Result<Proof> {
        self.tree.generate_proof(leaf_index)
    }

    /// Generate a proof for the first leaf equal to `leaf`
    pub fn prove_leaf(&self, leaf: &Hash) -> Result<Option<Proof>> {
        self.tree
            .find_leaf(leaf)
            .map(|index| self.tree.generate_proof(index))
            .transpose()
    }

    /// Hash a raw record and generate a proof for it, if it is in the tree
    pub fn prove_record(&self, record: &[u8]) -> Result<Option<Proof>> {
        self.prove_leaf(&self.hasher.hash(record))
    }

    /// Generate and self-check a proof for every leaf
    ///
    /// Returns each proof with the outcome of verifying it against the tree root.
    pub fn prove_all(&self) -> Vec<(Proof, bool)> {
        self.tree
            .generate_all_proofs()
            .into_iter()
            .map(|proof| {
                let valid = self.tree.verify_proof(
                    self.hasher,
                    &proof,
                    proof.leaf,
                    proof.leaf_index,
                );
                (proof, valid)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::hash::{keccak256, Keccak256Hasher};

    fn tree_of(records: &[&str]) -> (MerkleTree, Vec<Hash>) {
        let leaves: Vec<Hash> = records.iter().map(|r| keccak256(r.as_bytes())).collect();
        let tree = MerkleTree::build(&leaves, &Keccak256Hasher::new()).unwrap();
        (tree, leaves)
    }

    #[test]
    fn test_positions_match_parity() {
        let (tree, _) = tree_of(&["a", "b", "c", "d"]);
        let proof = tree.generate_proof(2).unwrap();
        assert_eq!(proof.path[0].position, ProofPosition::Right);
        assert_eq!(proof.path[1].position, ProofPosition::Left);
    }

    #[test]
    fn test_flipped_position_fails() {
        let hasher = Keccak256Hasher::new();
        let (tree, leaves) = tree_of(&["a", "b", "c", "d"]);
        let mut proof = tree.generate_proof(1).unwrap();
        proof.path[0].position = ProofPosition::Right;
        assert!(!proof.verify(&hasher, &tree.root(), &leaves[1], 1));
    }

    #[test]
    fn test_truncated_and_extended_paths_fail() {
        let hasher = Keccak256Hasher::new();
        let (tree, leaves) = tree_of(&["a", "b", "c", "d", "e"]);
        let proof = tree.generate_proof(0).unwrap();

        let mut short = proof.clone();
        short.path.pop();
        assert!(!short.verify(&hasher, &tree.root(), &leaves[0], 0));

        let mut long = proof.clone();
        long.path.push(long.path[0]);
        assert!(!long.verify(&hasher, &tree.root(), &leaves[0], 0));

        assert!(proof.verify(&hasher, &tree.root(), &leaves[0], 0));
    }

    #[test]
    fn test_verify_path_matches_tagged_verify() {
        let hasher = Keccak256Hasher::new();
        let (tree, leaves) = tree_of(&["a", "b", "c", "d", "e", "f", "g"]);
        for (i, leaf) in leaves.iter().enumerate() {
            let proof = tree.generate_proof(i).unwrap();
            assert!(verify_path(
                &hasher,
                &proof.siblings(),
                &tree.root(),
                leaf,
                i,
                leaves.len(),
                OddNodePolicy::CarryForward
            ));
        }
    }

    #[test]
    fn test_json_roundtrip_and_version_check() {
        let (tree, _) = tree_of(&["a", "b", "c"]);
        let proof = tree.generate_proof(2).unwrap();

        let json = proof.to_json().unwrap();
        assert!(json.contains("\"carry-forward\""));
        assert!(json.contains("\"left\""));
        assert_eq!(Proof::from_json(&json).unwrap(), proof);

        let mut future = proof.clone();
        future.version = "9.9".to_string();
        let json = serde_json::to_string(&future).unwrap();
        assert!(matches!(
            Proof::from_json(&json),
            Err(MerkleError::InvalidProofFormat { .. })
        ));
    }

    #[test]
    fn test_binary_roundtrip() {
        let (tree, _) = tree_of(&["a", "b", "c", "d", "e"]);
        let proof = tree.generate_proof(4).unwrap();
        let bytes = proof.to_binary().unwrap();
        assert_eq!(Proof::from_binary(&bytes).unwrap(), proof);
        assert!(Proof::from_binary(&bytes[..bytes.len() / 2]).is_err());
    }

    #[test]
    fn test_generator_finds_records() {
        let hasher = Keccak256Hasher::new();
        let (tree, _) = tree_of(&["alice -> bob", "bob -> dave", "carol -> alice", "dave -> bob"]);
        let generator = ProofGenerator::new(&tree, &hasher);

        let proof = generator.prove_record(b"dave -> bob").unwrap().unwrap();
        assert_eq!(proof.leaf_index, 3);
        assert!(proof.verify_self_contained(&hasher));

        assert!(generator.prove_record(b"mallory -> eve").unwrap().is_none());
        assert!(generator.prove_all().iter().all(|(_, valid)| *valid));
    }
}
