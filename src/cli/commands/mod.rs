//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Loads configuration and builds collaborators
//! 2. Calls into the library for the actual work
//! 3. Formats output and maps errors for the exit path
//!
//! Handlers do NOT make gating decisions directly; that lives in
//! [`crate::serve`].

mod refresh;
mod serve_cmd;

// Re-export command functions for testing and direct invocation
pub use refresh::refresh;
pub use serve_cmd::serve;

use anyhow::Result;

use crate::cli::args::Command;
use crate::cli::Context;

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Serve { user } => serve_cmd::serve(ctx, &user),
        Command::Refresh => refresh::refresh(ctx),
    }
}
