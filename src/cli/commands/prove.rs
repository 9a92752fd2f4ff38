//! Prove command implementation

use crate::cli::context::CliContext;
use crate::cli::input::{load_tree, parse_hash, LoadedTree, ProofDocument};
use crate::cli::TreeInputArgs;
use crate::config::OutputFormat;
use crate::core::hash::MerkleHasher;
use crate::proofs::export::{siblings_to_hex, SolidityBlock, SolidityProof};
use crate::proofs::{Proof, ProofPosition};
use anyhow::{anyhow, bail, Result};
use colored::Colorize;
use std::fmt::Write as _;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Execute the prove command
pub fn execute(
    input: TreeInputArgs,
    index: Option<usize>,
    record: Option<String>,
    all: bool,
    format: Option<OutputFormat>,
    output: Option<PathBuf>,
) -> Result<()> {
    let format = match format {
        Some(format) => format,
        None => CliContext::load_config()?.output_format(),
    };
    let hashed = input.hashed;
    let loaded = load_tree(&input)?;

    let proofs = if all {
        loaded.tree.generate_all_proofs()
    } else if let Some(record) = &record {
        let leaf = if hashed {
            parse_hash(record, "leaf digest")?
        } else {
            loaded.settings.hash.hash(record.as_bytes())
        };
        let leaf_index = loaded
            .tree
            .find_leaf(&leaf)
            .ok_or_else(|| anyhow!("Record not found in tree: {}", record))?;
        vec![loaded.tree.generate_proof(leaf_index)?]
    } else if let Some(index) = index {
        vec![loaded.tree.generate_proof(index)?]
    } else {
        bail!("Specify a leaf with --index or --record, or use --all");
    };

    for proof in &proofs {
        let valid = loaded
            .tree
            .verify_proof(&loaded.settings.hash, proof, proof.leaf, proof.leaf_index);
        if !valid {
            warn!(leaf_index = proof.leaf_index, "generated proof failed self-check");
            bail!("Generated proof for leaf {} does not verify", proof.leaf_index);
        }
    }
    debug!(count = proofs.len(), %format, "generated proofs");

    let rendered = match format {
        OutputFormat::Text => render_text(&loaded, &proofs)?,
        OutputFormat::Json => render_json(&loaded, &proofs, all)?,
        OutputFormat::Solidity => render_solidity(&proofs, all),
        OutputFormat::Hex => render_hex(&proofs, all)?,
    };

    match output {
        Some(path) => {
            std::fs::write(&path, &rendered)?;
            if !CliContext::is_quiet() {
                eprintln!(
                    "{} Wrote {} proof(s) to {}",
                    "✓".green(),
                    proofs.len(),
                    path.display().to_string().cyan()
                );
            }
        },
        None => print!("{}", rendered),
    }

    Ok(())
}

fn document_for(loaded: &LoadedTree, proof: &Proof) -> ProofDocument {
    ProofDocument {
        hash: loaded.settings.hash,
        record: (!loaded.hashed).then(|| loaded.record_label(proof.leaf_index).to_string()),
        proof: proof.clone(),
    }
}

fn render_json(loaded: &LoadedTree, proofs: &[Proof], all: bool) -> Result<String> {
    let documents: Vec<ProofDocument> = proofs
        .iter()
        .map(|proof| document_for(loaded, proof))
        .collect();

    let mut out = if all {
        serde_json::to_string_pretty(&documents)?
    } else {
        serde_json::to_string_pretty(&documents[0])?
    };
    out.push('\n');
    Ok(out)
}

fn render_solidity(proofs: &[Proof], all: bool) -> String {
    if all {
        SolidityBlock(proofs).to_string()
    } else {
        format!("{}\n", SolidityProof::new(&proofs[0]))
    }
}

fn render_hex(proofs: &[Proof], all: bool) -> Result<String> {
    let mut out = String::new();
    for proof in proofs {
        if all {
            writeln!(out, "# leaf {}", proof.leaf_index)?;
        }
        for sibling in siblings_to_hex(proof) {
            writeln!(out, "{}", sibling)?;
        }
    }
    Ok(out)
}

fn render_text(loaded: &LoadedTree, proofs: &[Proof]) -> Result<String> {
    let mut out = String::new();
    let root = loaded.tree.root();

    for proof in proofs {
        writeln!(out)?;
        writeln!(
            out,
            "{}",
            format!("Proof for leaf {}", proof.leaf_index).green().bold()
        )?;
        writeln!(out, "{}", "═".repeat(50).green())?;
        if !loaded.hashed {
            writeln!(
                out,
                "{}: {}",
                "Record".bold(),
                loaded.record_label(proof.leaf_index)
            )?;
        }
        writeln!(out, "{}: {}", "Leaf".bold(), proof.leaf.to_prefixed_hex().cyan())?;
        writeln!(out, "{}: {}", "Root".bold(), root.to_prefixed_hex().cyan())?;
        writeln!(out, "{}: {}", "Path Length".bold(), proof.len())?;

        for (step, element) in proof.path.iter().enumerate() {
            let side = match element.position {
                ProofPosition::Left => "left ",
                ProofPosition::Right => "right",
            };
            writeln!(
                out,
                "  {} [{}] {} {}",
                "•".cyan(),
                step,
                side.dimmed(),
                element.hash.to_prefixed_hex()
            )?;
        }
        writeln!(out, "{}: {}", "Verification".bold(), "✓ VALID".green())?;
    }

    Ok(out)
}
