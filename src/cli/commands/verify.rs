//! Verify command implementation

use crate::cli::context::CliContext;
use crate::cli::input::{parse_hash, ProofDocument};
use crate::core::hash::{HashAlgorithm, MerkleHasher};
use crate::proofs::proof::PROOF_FORMAT_VERSION;
use anyhow::{bail, Result};
use colored::Colorize;
use serde_json::json;
use std::path::PathBuf;
use tracing::info;

/// Execute the verify command
pub fn execute(
    proof: PathBuf,
    leaf: Option<String>,
    record: Option<String>,
    index: Option<usize>,
    root: Option<String>,
    hash: Option<HashAlgorithm>,
    json: bool,
) -> Result<()> {
    let document = ProofDocument::load(&proof, index)?;
    if document.proof.version != PROOF_FORMAT_VERSION {
        bail!(
            "Unsupported proof version {} (expected {})",
            document.proof.version,
            PROOF_FORMAT_VERSION
        );
    }

    let hasher = hash.unwrap_or(document.hash);
    let leaf = match (&leaf, &record) {
        (Some(leaf), _) => parse_hash(leaf, "leaf digest")?,
        (None, Some(record)) => hasher.hash(record.as_bytes()),
        (None, None) => document.proof.leaf,
    };
    let leaf_index = index.unwrap_or(document.proof.leaf_index);
    let root_from_proof = root.is_none();
    let root = match &root {
        Some(root) => parse_hash(root, "root")?,
        None => document.proof.root,
    };

    let valid = document.proof.verify(&hasher, &root, &leaf, leaf_index);
    info!(valid, leaf_index, root = %root, "verified proof");

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "valid": valid,
                "leaf": leaf.to_prefixed_hex(),
                "leaf_index": leaf_index,
                "root": root.to_prefixed_hex(),
                "root_from_proof": root_from_proof,
                "hash": hasher,
            }))?
        );
    } else if !CliContext::is_quiet() {
        println!("{}", "Verifying proof...".bold());
        println!("  • Proof: {}", proof.display());
        println!("  • Leaf [{}]: {}", leaf_index, leaf.to_prefixed_hex().cyan());
        println!(
            "  • Root: {}{}",
            root.to_prefixed_hex().cyan(),
            if root_from_proof {
                " (from proof file)".dimmed().to_string()
            } else {
                String::new()
            }
        );
        println!("  • Hash: {}", hasher);

        if CliContext::is_verbose() {
            for (step, element) in document.proof.path.iter().enumerate() {
                println!(
                    "    [{}] {:?} {}",
                    step,
                    element.position,
                    element.hash.to_prefixed_hex()
                );
            }
        }

        if valid {
            println!("{}", "✓ Proof verified successfully!".green());
        } else {
            println!("{}", "✗ Proof is INVALID".red().bold());
        }
    }

    if !valid {
        bail!("Proof verification failed");
    }

    Ok(())
}
