//! Ordered leaf digests a tree is built over

use crate::core::{error::*, hash::MerkleHasher, types::*};
use std::ops::Index;

/// Ordered, immutable sequence of leaf digests
///
/// The position of a digest in the set is its leaf index, which is the only
/// identity proofs refer to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafSet {
    leaves: Vec<LeafHash>,
}

impl LeafSet {
    /// Hash each raw record into a leaf, preserving order
    pub fn from_records<I, R>(records: I, hasher: &impl MerkleHasher) -> Self
    where
        I: IntoIterator<Item = R>,
        R: AsRef<[u8]>,
    {
        let leaves = records
            .into_iter()
            .map(|record| hasher.hash(record.as_ref()))
            .collect();
        Self { leaves }
    }

    /// Adopt already-hashed leaf digests
    pub fn from_hashes(hashes: impl Into<Vec<Hash>>) -> Self {
        Self {
            leaves: hashes.into(),
        }
    }

    /// Parse leaf digests from hex strings (`0x` prefix optional)
    pub fn from_hex<I, S>(digests: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let leaves = digests
            .into_iter()
            .map(|s| {
                Hash::from_hex(s.as_ref()).map_err(|_| MerkleError::invalid_hash(s.as_ref()))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { leaves })
    }

    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&LeafHash> {
        self.leaves.get(index)
    }

    /// Index of the first leaf equal to `hash`
    pub fn position(&self, hash: &Hash) -> Option<usize> {
        self.leaves.iter().position(|leaf| leaf == hash)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LeafHash> {
        self.leaves.iter()
    }

    pub fn as_slice(&self) -> &[LeafHash] {
        &self.leaves
    }

    pub fn into_vec(self) -> Vec<LeafHash> {
        self.leaves
    }
}

impl Index<usize> for LeafSet {
    type Output = LeafHash;

    fn index(&self, index: usize) -> &Self::Output {
        &self.leaves[index]
    }
}

impl<'a> IntoIterator for &'a LeafSet {
    type Item = &'a LeafHash;
    type IntoIter = std::slice::Iter<'a, LeafHash>;

    fn into_iter(self) -> Self::IntoIter {
        self.leaves.iter()
    }
}

impl From<Vec<Hash>> for LeafSet {
    fn from(leaves: Vec<Hash>) -> Self {
        Self { leaves }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::hash::{keccak256, HashAlgorithm};

    #[test]
    fn test_from_records_preserves_order() {
        let records = ["alice -> bob", "bob -> dave", "carol -> alice"];
        let leaves = LeafSet::from_records(records, &HashAlgorithm::Keccak256);

        assert_eq!(leaves.len(), 3);
        for (i, record) in records.iter().enumerate() {
            assert_eq!(leaves[i], keccak256(record.as_bytes()));
        }
        assert_eq!(leaves.position(&keccak256(b"bob -> dave")), Some(1));
    }

    #[test]
    fn test_from_hex_reports_offending_input() {
        let good = keccak256(b"x").to_prefixed_hex();
        let parsed = LeafSet::from_hex([good.as_str()]).unwrap();
        assert_eq!(parsed[0], keccak256(b"x"));

        match LeafSet::from_hex([good.as_str(), "0x1234"]) {
            Err(MerkleError::InvalidHash { input }) => assert_eq!(input, "0x1234"),
            other => panic!("Expected InvalidHash, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_set() {
        let leaves = LeafSet::from_hashes(Vec::<Hash>::new());
        assert!(leaves.is_empty());
        assert_eq!(leaves.get(0), None);
    }
}
