//! cli
//!
//! Command-line interface layer for gitgate.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Load configuration and construct collaborators
//! - Delegate to command handlers
//!
//! # Architecture
//!
//! The CLI layer is thin. It parses arguments via clap and dispatches to
//! handlers; all gating decisions live in [`crate::serve`] so they stay
//! testable without a process environment.

pub mod args;
pub mod commands;

pub use args::Cli;

use std::path::PathBuf;

use anyhow::Result;

use crate::ui::output::Verbosity;

/// Execution context derived from global CLI flags.
#[derive(Debug, Clone)]
pub struct Context {
    /// Explicit config file path, if given.
    pub config_path: Option<PathBuf>,
    /// Output verbosity.
    pub verbosity: Verbosity,
}

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();

    let ctx = Context {
        config_path: cli.config.clone(),
        verbosity: Verbosity::from_flags(cli.quiet, cli.debug),
    };

    commands::dispatch(cli.command, &ctx)
}
