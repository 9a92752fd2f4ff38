//! CLI command implementations

pub mod completion;
pub mod config;
pub mod prove;
pub mod root;
pub mod tree;
pub mod verify;
