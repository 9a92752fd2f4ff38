//! Merkle tree implementation

use crate::core::{error::*, hash::MerkleHasher, types::*};
use crate::proofs::leaves::LeafSet;
use crate::proofs::proof::{Proof, ProofElement, ProofPosition};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Levels with at least this many pairs are hashed on the rayon pool
const PARALLEL_PAIR_THRESHOLD: usize = 1024;

/// What happens to the trailing node of an odd-length level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum OddNodePolicy {
    /// Append the node to the next level unchanged
    #[default]
    CarryForward,
    /// Append `H(node ++ node)` to the next level
    Duplicate,
}

impl OddNodePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            OddNodePolicy::CarryForward => "carry-forward",
            OddNodePolicy::Duplicate => "duplicate",
        }
    }
}

impl fmt::Display for OddNodePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OddNodePolicy {
    type Err = MerkleError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "carry-forward" | "carry_forward" | "carry" => Ok(OddNodePolicy::CarryForward),
            "duplicate" | "dup" => Ok(OddNodePolicy::Duplicate),
            _ => Err(MerkleError::UnknownOddNodePolicy {
                name: s.to_string(),
            }),
        }
    }
}

/// Number of nodes in the level above one of `width` nodes
pub fn parent_level_width(width: usize) -> usize {
    width / 2 + width % 2
}

/// One level of the leaf-to-root walk followed by proof generation and verification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathStep {
    /// Level the followed node lives on (0 = leaves)
    pub level: usize,
    /// Index of the followed node within that level
    pub index: usize,
    /// Sibling index and the side it sits on, if this level contributes a proof element
    pub sibling: Option<(usize, ProofPosition)>,
}

impl PathStep {
    /// True when the followed node is paired with itself under [`OddNodePolicy::Duplicate`]
    pub fn is_self_paired(&self) -> bool {
        matches!(self.sibling, Some((sibling, _)) if sibling == self.index)
    }
}

/// Replays the index-halving walk from a leaf to just below the root
///
/// Level widths are derived from the leaf count alone, so the walk knows when
/// the followed node is the unpaired trailing node of an odd level.
#[derive(Debug, Clone)]
pub struct PathWalk {
    index: usize,
    width: usize,
    level: usize,
    policy: OddNodePolicy,
}

impl PathWalk {
    pub fn new(leaf_index: usize, leaf_count: usize, policy: OddNodePolicy) -> Self {
        Self {
            index: leaf_index,
            width: leaf_count,
            level: 0,
            policy,
        }
    }
}

impl Iterator for PathWalk {
    type Item = PathStep;

    fn next(&mut self) -> Option<PathStep> {
        if self.width <= 1 || self.index >= self.width {
            return None;
        }

        let index = self.index;
        let sibling = if index % 2 == 1 {
            Some((index - 1, ProofPosition::Left))
        } else if index + 1 < self.width {
            Some((index + 1, ProofPosition::Right))
        } else {
            match self.policy {
                OddNodePolicy::CarryForward => None,
                OddNodePolicy::Duplicate => Some((index, ProofPosition::Right)),
            }
        };

        let step = PathStep {
            level: self.level,
            index,
            sibling,
        };

        self.index /= 2;
        self.width = parent_level_width(self.width);
        self.level += 1;

        Some(step)
    }
}

/// Merkle tree for generating proofs
///
/// Built once from a leaf sequence and read-only afterwards. Rebuild from the
/// full leaf sequence to add leaves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerkleTree {
    /// All levels of the tree (leaves at index 0, root level last)
    levels: Vec<Vec<Hash>>,
    /// Policy the tree was built with
    odd_node: OddNodePolicy,
}

impl MerkleTree {
    /// Build a tree with the default carry-forward policy
    pub fn build(leaves: &[Hash], hasher: &impl MerkleHasher) -> Result<Self> {
        Self::build_with(leaves, hasher, OddNodePolicy::default())
    }

    /// Build a tree from a [`LeafSet`] with the default carry-forward policy
    pub fn from_leaf_set(leaves: &LeafSet, hasher: &impl MerkleHasher) -> Result<Self> {
        Self::build(leaves.as_slice(), hasher)
    }

    /// Build a tree, combining pairs left to right and resolving odd levels with `policy`
    pub fn build_with(
        leaves: &[Hash],
        hasher: &impl MerkleHasher,
        policy: OddNodePolicy,
    ) -> Result<Self> {
        if leaves.is_empty() {
            return Err(MerkleError::EmptyInput);
        }

        let mut levels = vec![leaves.to_vec()];
        while let Some(current) = levels.last().filter(|level| level.len() > 1) {
            let next = combine_level(current, hasher, policy);
            levels.push(next);
        }

        let tree = Self {
            levels,
            odd_node: policy,
        };

        debug!(
            leaves = tree.leaf_count(),
            height = tree.height(),
            policy = %policy,
            root = %tree.root(),
            "built merkle tree"
        );

        Ok(tree)
    }

    /// Root hash of the tree
    pub fn root(&self) -> Hash {
        // build_with never produces an empty level list or an empty top level
        self.levels[self.levels.len() - 1][0]
    }

    /// All levels, leaves first
    pub fn levels(&self) -> &[Vec<Hash>] {
        &self.levels
    }

    pub fn leaves(&self) -> &[Hash] {
        &self.levels[0]
    }

    pub fn leaf_count(&self) -> usize {
        self.levels[0].len()
    }

    /// Number of levels, including the leaf level and the root level
    pub fn height(&self) -> usize {
        self.levels.len()
    }

    pub fn odd_node_policy(&self) -> OddNodePolicy {
        self.odd_node
    }

    /// Index of the first leaf equal to `leaf`
    pub fn find_leaf(&self, leaf: &Hash) -> Option<usize> {
        self.leaves().iter().position(|candidate| candidate == leaf)
    }

    /// Generate a proof for a specific leaf index
    pub fn generate_proof(&self, leaf_index: usize) -> Result<Proof> {
        let leaf_count = self.leaf_count();
        if leaf_index >= leaf_count {
            return Err(MerkleError::index_out_of_range(leaf_index, leaf_count));
        }

        let path = PathWalk::new(leaf_index, leaf_count, self.odd_node)
            .filter_map(|step| {
                step.sibling.map(|(sibling, position)| ProofElement {
                    hash: self.levels[step.level][sibling],
                    position,
                })
            })
            .collect();

        Ok(Proof::new(
            leaf_index,
            leaf_count,
            self.leaves()[leaf_index],
            self.root(),
            self.odd_node,
            path,
        ))
    }

    /// Generate one proof per leaf, in leaf order
    pub fn generate_all_proofs(&self) -> Vec<Proof> {
        (0..self.leaf_count())
            .filter_map(|index| self.generate_proof(index).ok())
            .collect()
    }

    /// Verify a proof against this tree's root
    pub fn verify_proof(
        &self,
        hasher: &impl MerkleHasher,
        proof: &Proof,
        leaf_hash: Hash,
        leaf_index: usize,
    ) -> bool {
        proof.verify(hasher, &self.root(), &leaf_hash, leaf_index)
    }
}

fn combine_level(level: &[Hash], hasher: &impl MerkleHasher, policy: OddNodePolicy) -> Vec<Hash> {
    let paired = &level[..level.len() - level.len() % 2];

    let mut next: Vec<Hash> = if paired.len() / 2 >= PARALLEL_PAIR_THRESHOLD {
        paired
            .par_chunks_exact(2)
            .map(|pair| hasher.hash_pair(&pair[0], &pair[1]))
            .collect()
    } else {
        paired
            .chunks_exact(2)
            .map(|pair| hasher.hash_pair(&pair[0], &pair[1]))
            .collect()
    };

    if level.len() % 2 == 1 {
        let last = level[level.len() - 1];
        next.push(match policy {
            OddNodePolicy::CarryForward => last,
            OddNodePolicy::Duplicate => hasher.hash_pair(&last, &last),
        });
    }

    next
}
