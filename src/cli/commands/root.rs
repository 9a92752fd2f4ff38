//! Root command implementation

use crate::cli::context::CliContext;
use crate::cli::input::load_tree;
use crate::cli::TreeInputArgs;
use anyhow::Result;
use colored::Colorize;
use serde_json::json;

/// Execute the root command
pub fn execute(input: TreeInputArgs, json: bool, hash_only: bool) -> Result<()> {
    let loaded = load_tree(&input)?;
    let root = loaded.tree.root();

    if hash_only {
        println!("{}", root.to_prefixed_hex());
        return Ok(());
    }

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "root": root.to_prefixed_hex(),
                "leaf_count": loaded.tree.leaf_count(),
                "height": loaded.tree.height(),
                "hash": loaded.settings.hash,
                "odd_node": loaded.settings.odd_node,
            }))?
        );
        return Ok(());
    }

    if CliContext::is_quiet() {
        println!("{}", root.to_prefixed_hex());
        return Ok(());
    }

    println!("{}", "Merkle Root".green().bold());
    println!("{}", "═".repeat(50).green());
    println!("{}: {}", "Root Hash".bold(), root.to_prefixed_hex().cyan());
    println!("{}: {}", "Leaves".bold(), loaded.tree.leaf_count());
    println!("{}: {}", "Levels".bold(), loaded.tree.height());
    println!("{}: {}", "Hash".bold(), loaded.settings.hash);
    println!("{}: {}", "Odd Nodes".bold(), loaded.settings.odd_node);

    Ok(())
}
