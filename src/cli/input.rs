//! Reading records and building trees for CLI commands

use crate::cli::context::CliContext;
use crate::cli::TreeInputArgs;
use crate::config::GlobalConfig;
use crate::core::{error::MerkleError, hash::HashAlgorithm, types::Hash};
use crate::proofs::{LeafSet, MerkleTree, OddNodePolicy, Proof};
use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info};

/// Hash algorithm and odd node policy after applying flags over config
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeSettings {
    pub hash: HashAlgorithm,
    pub odd_node: OddNodePolicy,
}

impl TreeSettings {
    /// Command-line flags win over config values, which win over defaults
    pub fn resolve(args: &TreeInputArgs, config: &GlobalConfig) -> Self {
        Self {
            hash: args.hash.unwrap_or_else(|| config.hash_algorithm()),
            odd_node: args.odd_node.unwrap_or_else(|| config.odd_node_policy()),
        }
    }
}

/// Records, their leaves and the tree built over them
pub struct LoadedTree {
    /// Raw records as given, or hex digests when `--hashed` was used
    pub records: Vec<String>,
    /// Whether records were given as leaf digests
    pub hashed: bool,
    pub leaves: LeafSet,
    pub tree: MerkleTree,
    pub settings: TreeSettings,
}

impl LoadedTree {
    /// Label for a leaf in human output
    pub fn record_label(&self, index: usize) -> &str {
        self.records.get(index).map(String::as_str).unwrap_or("")
    }
}

/// Proof file written by `prove --format json` and read by `verify`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProofDocument {
    /// Hash algorithm the tree was built with
    pub hash: HashAlgorithm,
    /// Original record, when the leaf came from one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record: Option<String>,
    #[serde(flatten)]
    pub proof: Proof,
}

impl ProofDocument {
    /// Load a proof file holding one document, or the array `prove --all` writes
    ///
    /// From an array, the document for `index` is picked; `index` may be
    /// omitted only when the array has a single entry.
    pub fn load(path: &Path, index: Option<usize>) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read proof file {}", path.display()))?;
        Self::parse(&content, index)
            .with_context(|| format!("Failed to parse proof file {}", path.display()))
    }

    fn parse(content: &str, index: Option<usize>) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(content)?;
        if !value.is_array() {
            return Ok(serde_json::from_value(value)?);
        }

        let documents: Vec<ProofDocument> = serde_json::from_value(value)?;
        debug!(count = documents.len(), "proof file holds several proofs");
        match (index, documents.len()) {
            (_, 0) => bail!("proof file contains no proofs"),
            (None, 1) => documents
                .into_iter()
                .next()
                .context("proof file contains no proofs"),
            (None, count) => bail!("proof file contains {} proofs; choose one with --index", count),
            (Some(index), _) => documents
                .into_iter()
                .find(|document| document.proof.leaf_index == index)
                .ok_or_else(|| anyhow!("proof file has no proof for leaf {}", index)),
        }
    }
}

/// Collect records from positional arguments and `--input`
pub fn read_records(args: &TreeInputArgs) -> Result<Vec<String>> {
    let mut records = args.records.clone();

    if let Some(path) = &args.input {
        let lines = if path.as_os_str() == "-" {
            read_lines(io::stdin().lock())?
        } else {
            let file = std::fs::File::open(path)
                .with_context(|| format!("Failed to open input file {}", path.display()))?;
            read_lines(BufReader::new(file))?
        };
        records.extend(lines);
    }

    if records.is_empty() {
        return Err(MerkleError::EmptyInput)
            .context("No records given; pass them as arguments or with --input");
    }

    Ok(records)
}

/// Non-empty lines with line endings stripped
fn read_lines(reader: impl BufRead) -> Result<Vec<String>> {
    let mut lines = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let line = line.trim_end_matches('\r');
        if !line.trim().is_empty() {
            lines.push(line.to_string());
        }
    }
    Ok(lines)
}

/// Read records, hash them and build the tree
pub fn load_tree(args: &TreeInputArgs) -> Result<LoadedTree> {
    let config = CliContext::load_config()?;
    let settings = TreeSettings::resolve(args, &config);
    let records = read_records(args)?;

    let leaves = if args.hashed {
        LeafSet::from_hex(&records)?
    } else {
        LeafSet::from_records(&records, &settings.hash)
    };

    debug!(
        records = records.len(),
        hash = %settings.hash,
        odd_node = %settings.odd_node,
        "building tree"
    );
    let tree = MerkleTree::build_with(leaves.as_slice(), &settings.hash, settings.odd_node)?;
    info!(leaves = tree.leaf_count(), root = %tree.root(), "tree ready");

    Ok(LoadedTree {
        records,
        hashed: args.hashed,
        leaves,
        tree,
        settings,
    })
}

/// Parse a hex digest given on the command line
pub fn parse_hash(value: &str, what: &str) -> Result<Hash> {
    Hash::from_hex(value)
        .map_err(|_| MerkleError::invalid_hash(value))
        .with_context(|| format!("Invalid {}", what))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_read_lines_skips_blank_and_strips_cr() {
        let input = Cursor::new("alice -> bob\r\n\n  \nbob -> dave\n");
        assert_eq!(
            read_lines(input).unwrap(),
            vec!["alice -> bob".to_string(), "bob -> dave".to_string()]
        );
    }

    #[test]
    fn test_flags_override_config() {
        let mut config = GlobalConfig::default();
        config.merkle.hash = Some(HashAlgorithm::Sha256);
        config.merkle.odd_node = Some(OddNodePolicy::Duplicate);

        let args = TreeInputArgs {
            hash: Some(HashAlgorithm::Sha3_256),
            ..Default::default()
        };
        let settings = TreeSettings::resolve(&args, &config);
        assert_eq!(settings.hash, HashAlgorithm::Sha3_256);
        assert_eq!(settings.odd_node, OddNodePolicy::Duplicate);
    }

    fn documents(count: usize) -> Vec<ProofDocument> {
        let hasher = HashAlgorithm::Keccak256;
        let records: Vec<String> = (0..count).map(|i| format!("record-{}", i)).collect();
        let leaves = LeafSet::from_records(&records, &hasher);
        let tree = MerkleTree::from_leaf_set(&leaves, &hasher).unwrap();
        tree.generate_all_proofs()
            .into_iter()
            .zip(records)
            .map(|(proof, record)| ProofDocument {
                hash: hasher,
                record: Some(record),
                proof,
            })
            .collect()
    }

    #[test]
    fn test_proof_file_with_single_document() {
        let json = serde_json::to_string(&documents(3)[1]).unwrap();
        let document = ProofDocument::parse(&json, None).unwrap();
        assert_eq!(document.proof.leaf_index, 1);
        assert_eq!(document.record.as_deref(), Some("record-1"));
    }

    #[test]
    fn test_proof_file_with_array_selects_by_index() {
        let json = serde_json::to_string(&documents(3)).unwrap();

        let document = ProofDocument::parse(&json, Some(2)).unwrap();
        assert_eq!(document.proof.leaf_index, 2);
        assert_eq!(document.record.as_deref(), Some("record-2"));

        let err = ProofDocument::parse(&json, None).unwrap_err();
        assert!(err.to_string().contains("choose one with --index"));

        let err = ProofDocument::parse(&json, Some(7)).unwrap_err();
        assert!(err.to_string().contains("no proof for leaf 7"));
    }

    #[test]
    fn test_proof_file_with_one_element_array() {
        let json = serde_json::to_string(&documents(1)).unwrap();
        assert_eq!(ProofDocument::parse(&json, None).unwrap().proof.leaf_index, 0);
        assert!(ProofDocument::parse("[]", None).is_err());
    }

    #[test]
    fn test_no_records_is_an_error() {
        let err = read_records(&TreeInputArgs::default()).unwrap_err();
        assert!(err.to_string().contains("No records given"));
    }
}
