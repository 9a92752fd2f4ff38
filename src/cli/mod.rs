//! Command-line interface for merkleproof

use crate::config::OutputFormat;
use crate::core::hash::HashAlgorithm;
use crate::proofs::merkle::OddNodePolicy;
use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

pub mod commands;
pub mod context;
pub mod input;

/// merkleproof - Merkle trees and inclusion proofs
#[derive(Parser)]
#[command(
    name = "merkleproof",
    version,
    about = "Build Merkle trees over records and generate inclusion proofs",
    long_about = "Builds a binary Merkle tree over an ordered list of records, prints its root, and generates or verifies inclusion proofs suitable for on-chain verification."
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output: auto, always, never
    #[arg(long, default_value = "auto", global = true)]
    pub color: String,

    /// Path to config file (default: ~/.merkleproof/config.toml)
    #[arg(long, global = true, env = "MERKLEPROOF_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where leaves come from and how the tree is built
#[derive(Args, Debug, Clone, Default)]
pub struct TreeInputArgs {
    /// Records to use as leaves, in order
    pub records: Vec<String>,

    /// Read records from a file, one per line ("-" for stdin)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Treat records as hex leaf digests instead of hashing them
    #[arg(long)]
    pub hashed: bool,

    /// Hash algorithm (overrides merkle.hash)
    #[arg(long, value_enum)]
    pub hash: Option<HashAlgorithm>,

    /// Odd node handling (overrides merkle.odd_node)
    #[arg(long, value_enum)]
    pub odd_node: Option<OddNodePolicy>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the root hash of a tree
    Root {
        #[command(flatten)]
        input: TreeInputArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Show only the root hash
        #[arg(long)]
        hash_only: bool,
    },

    /// Print every level of a tree
    Tree {
        #[command(flatten)]
        input: TreeInputArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate inclusion proofs
    Prove {
        #[command(flatten)]
        input: TreeInputArgs,

        /// Leaf index to prove
        #[arg(long, conflicts_with_all = ["record", "all"])]
        index: Option<usize>,

        /// Prove the first leaf matching this record
        #[arg(long, conflicts_with = "all")]
        record: Option<String>,

        /// Prove every leaf
        #[arg(long)]
        all: bool,

        /// Output format (overrides output.format)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Write the proof to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Verify an inclusion proof
    Verify {
        /// Proof file written by `prove --format json`
        #[arg(short, long)]
        proof: PathBuf,

        /// Leaf digest to check (default: the leaf recorded in the proof)
        #[arg(long, conflicts_with = "record")]
        leaf: Option<String>,

        /// Raw record to hash and check
        #[arg(long)]
        record: Option<String>,

        /// Leaf index to check; also picks the entry from a `prove --all` file
        #[arg(long)]
        index: Option<usize>,

        /// Expected root (default: the root recorded in the proof)
        #[arg(long)]
        root: Option<String>,

        /// Hash algorithm (default: the one recorded in the proof)
        #[arg(long, value_enum)]
        hash: Option<HashAlgorithm>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Get and set configuration values
    Config {
        /// Configuration key to get/set
        key: Option<String>,

        /// Configuration value to set
        value: Option<String>,

        /// List all configuration values
        #[arg(short, long)]
        list: bool,

        /// Unset a configuration value
        #[arg(long)]
        unset: bool,

        /// Show configuration file location
        #[arg(long)]
        show_origin: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completion for
        #[arg(value_enum)]
        shell: Shell,
    },
}
