//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--config <path>`: Use this config file instead of the search order
//! - `--debug`: Enable debug output
//! - `--quiet` / `-q`: Minimal output

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// gitgate - SSH forced-command gateway for git access control
#[derive(Parser, Debug)]
#[command(name = "gitgate")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Use this config file instead of the default search order
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve one git command as the forced command for an SSH session.
    ///
    /// Reads the attempted command from $SSH_ORIGINAL_COMMAND, checks it
    /// against the access policy, and on success replaces this process
    /// with `git shell -c <rewritten command>`.
    Serve {
        /// The authenticated user this session belongs to
        user: String,
    },

    /// Regenerate gitweb and git-daemon artifacts from current config.
    Refresh,
}
