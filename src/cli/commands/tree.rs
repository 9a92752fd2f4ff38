//! Tree command implementation

use crate::cli::context::CliContext;
use crate::cli::input::{load_tree, LoadedTree};
use crate::cli::TreeInputArgs;
use anyhow::Result;
use colored::Colorize;
use serde_json::json;
use tabled::{Table, Tabled};

/// One node of the tree for display
#[derive(Tabled)]
struct NodeRow {
    #[tabled(rename = "Level")]
    level: usize,
    #[tabled(rename = "Index")]
    index: usize,
    #[tabled(rename = "Hash")]
    hash: String,
    #[tabled(rename = "Record")]
    record: String,
}

/// Execute the tree command
pub fn execute(input: TreeInputArgs, json: bool) -> Result<()> {
    let loaded = load_tree(&input)?;

    if json {
        show_tree_json(&loaded)
    } else {
        show_tree_human(&loaded);
        Ok(())
    }
}

fn show_tree_json(loaded: &LoadedTree) -> Result<()> {
    let levels: Vec<Vec<String>> = loaded
        .tree
        .levels()
        .iter()
        .map(|level| level.iter().map(|hash| hash.to_prefixed_hex()).collect())
        .collect();

    println!(
        "{}",
        serde_json::to_string_pretty(&json!({
            "root": loaded.tree.root().to_prefixed_hex(),
            "hash": loaded.settings.hash,
            "odd_node": loaded.settings.odd_node,
            "records": loaded.records,
            "levels": levels,
        }))?
    );
    Ok(())
}

fn show_tree_human(loaded: &LoadedTree) {
    let verbose = CliContext::is_verbose();

    let rows: Vec<NodeRow> = loaded
        .tree
        .levels()
        .iter()
        .enumerate()
        .flat_map(|(level, nodes)| {
            nodes.iter().enumerate().map(move |(index, hash)| NodeRow {
                level,
                index,
                hash: if verbose {
                    hash.to_prefixed_hex()
                } else {
                    format!("0x{}...", &hash.to_hex()[..16])
                },
                record: if level == 0 {
                    loaded.record_label(index).to_string()
                } else {
                    String::new()
                },
            })
        })
        .collect();

    println!();
    println!("{}", "Merkle Tree".bold());
    println!("{}", "═══════════".bold());
    println!();
    println!("{}", Table::new(rows));
    println!();
    println!(
        "{}: {}",
        "Root Hash".bold(),
        loaded.tree.root().to_prefixed_hex().cyan()
    );
    println!(
        "  • {} leaves, {} levels, {}, odd nodes: {}",
        loaded.tree.leaf_count(),
        loaded.tree.height(),
        loaded.settings.hash,
        loaded.settings.odd_node
    );
}
