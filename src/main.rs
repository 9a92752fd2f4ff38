//! merkleproof CLI
//!
//! Command-line interface for building Merkle trees and inclusion proofs.

use anyhow::Result;
use clap::Parser;
use merkleproof::cli::context::CliContext;
use merkleproof::cli::{commands, Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG wins over the verbosity flags
    let default_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.color.as_str() {
        "always" => colored::control::set_override(true),
        "never" => colored::control::set_override(false),
        _ => {},
    }

    CliContext::set(CliContext {
        verbose: cli.verbose,
        quiet: cli.quiet,
        config_path: cli.config.clone(),
    });

    match cli.command {
        Commands::Root {
            input,
            json,
            hash_only,
        } => commands::root::execute(input, json, hash_only),
        Commands::Tree { input, json } => commands::tree::execute(input, json),
        Commands::Prove {
            input,
            index,
            record,
            all,
            format,
            output,
        } => commands::prove::execute(input, index, record, all, format, output),
        Commands::Verify {
            proof,
            leaf,
            record,
            index,
            root,
            hash,
            json,
        } => commands::verify::execute(proof, leaf, record, index, root, hash, json),
        Commands::Config {
            key,
            value,
            list,
            unset,
            show_origin,
            json,
        } => commands::config::execute(key, value, list, unset, show_origin, json),
        Commands::Completion { shell } => commands::completion::execute(shell),
    }
}
