//! CLI context for storing global options during command execution

use crate::config::GlobalConfig;
use crate::core::error::Result;
use std::cell::RefCell;
use std::path::PathBuf;

thread_local! {
    static CLI_CONTEXT: RefCell<Option<CliContext>> = const { RefCell::new(None) };
}

/// Context containing global CLI options
#[derive(Debug, Clone, Default)]
pub struct CliContext {
    pub verbose: bool,
    pub quiet: bool,
    /// Explicit config file from `--config` or `MERKLEPROOF_CONFIG`
    pub config_path: Option<PathBuf>,
}

impl CliContext {
    /// Set the global CLI context for the current thread
    pub fn set(context: CliContext) {
        CLI_CONTEXT.with(|c| {
            *c.borrow_mut() = Some(context);
        });
    }

    /// Get the current CLI context
    pub fn get() -> Option<CliContext> {
        CLI_CONTEXT.with(|c| c.borrow().clone())
    }

    /// Check if verbose mode is enabled
    pub fn is_verbose() -> bool {
        Self::get().map(|ctx| ctx.verbose).unwrap_or(false)
    }

    /// Check if quiet mode is enabled
    pub fn is_quiet() -> bool {
        Self::get().map(|ctx| ctx.quiet).unwrap_or(false)
    }

    /// Config file in effect for this invocation
    pub fn config_path() -> Result<PathBuf> {
        let explicit = Self::get().and_then(|ctx| ctx.config_path);
        GlobalConfig::resolve_path(explicit.as_deref())
    }

    /// Load the config file in effect, or defaults if it does not exist
    pub fn load_config() -> Result<GlobalConfig> {
        GlobalConfig::load_from(&Self::config_path()?)
    }
}
