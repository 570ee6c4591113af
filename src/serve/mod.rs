//! serve
//!
//! The command validation and access-control gateway.
//!
//! # Architecture
//!
//! One inbound SSH session gives the gateway one raw command string and one
//! authenticated user. The pipeline is strictly staged, and each stage can
//! only narrow what the next one sees:
//!
//! 1. [`parse`] - verb recognition against fixed enumerations
//! 2. [`crate::core::types::RepoPath::parse_quoted`] - the path grammar
//! 3. [`access`] - policy probing in least-privilege order
//! 4. [`crate::repo::provision`] - on-demand creation for first writes
//! 5. [`rewrite`] - reassembly of the trusted command for handoff
//!
//! # Invariants
//!
//! - Validation failures touch neither the filesystem nor the policy store
//! - Access failures cause no mutation
//! - The repository is only ever created after a write was authorized
//! - The client's argument text never survives into the rewritten command
//!
//! # Example
//!
//! ```no_run
//! use gitgate::core::config::Config;
//! use gitgate::policy::FilePolicy;
//! use gitgate::serve::{serve, ServeOutcome};
//! use gitgate::ui::output::Verbosity;
//!
//! let config = Config::load(None).unwrap();
//! let policy = FilePolicy::new(config.clone());
//! match serve(&config, &policy, "alice", "git-upload-pack 'myproj'", Verbosity::Normal) {
//!     Ok(ServeOutcome::Handoff(handoff)) => println!("exec: {}", handoff.command),
//!     Ok(ServeOutcome::Ignored) => {}
//!     Err(e) => eprintln!("denied: {e}"),
//! }
//! ```

pub mod access;
pub mod parse;

pub use parse::{GatewayCommand, VerbKind, COMMANDS_READONLY, COMMANDS_WRITE};

use std::path::Path;

use thiserror::Error;

use crate::core::config::Config;
use crate::core::types::{AccessMode, RepoPath};
use crate::policy::AccessPolicy;
use crate::repo::{self, ProvisionError};
use crate::ui::output::{self, Verbosity};

/// Errors from serving one command.
///
/// The set is closed: every rejection a command can meet is one of these,
/// and each is terminal for the request. Messages are intentionally static;
/// context for auditing (user, verb, path) travels in the audit record, not
/// in text echoed back over the transport.
#[derive(Debug, Error)]
pub enum ServeError {
    /// An embedded newline could smuggle a second command past the forced
    /// command. Detected before anything else.
    #[error("command may not contain newline")]
    CommandMayNotContainNewline,

    /// The verb is not in the read or write enumeration.
    #[error("unknown command denied")]
    UnknownCommand,

    /// The argument failed the quoted-path grammar.
    #[error("arguments to command look dangerous")]
    UnsafeArguments,

    /// No grant of any mode matched. The most general denial.
    #[error("repository read access denied")]
    ReadAccessDenied,

    /// Only a readonly grant matched, but the verb writes.
    #[error("repository write access denied")]
    WriteAccessDenied,

    /// Access was authorized but the repository could not be prepared.
    /// Reported distinctly so operators can tell "not allowed" from
    /// "allowed but provisioning failed".
    #[error("failed to provision repository: {0}")]
    Provision(#[from] ProvisionError),
}

impl ServeError {
    /// Stable tag for audit records.
    pub fn kind(&self) -> &'static str {
        match self {
            ServeError::CommandMayNotContainNewline => "command-may-not-contain-newline",
            ServeError::UnknownCommand => "unknown-command",
            ServeError::UnsafeArguments => "unsafe-arguments",
            ServeError::ReadAccessDenied => "read-access-denied",
            ServeError::WriteAccessDenied => "write-access-denied",
            ServeError::Provision(_) => "provision-failed",
        }
    }
}

/// A fully authorized, rewritten command ready for handoff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Handoff {
    /// The trusted command string for the execution engine.
    pub command: String,
    /// The verb, preserved unchanged from the client request.
    pub verb: String,
    /// The validated repository path the client asked for.
    pub path: RepoPath,
    /// The access mode that granted the request.
    pub mode: AccessMode,
    /// Whether this invocation created the repository on disk.
    pub provisioned: bool,
}

/// The disposition of one inbound command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServeOutcome {
    /// Authorized; hand `Handoff::command` to the execution engine.
    Handoff(Handoff),
    /// The input was not a verb+path command. Benign; nothing to execute.
    Ignored,
}

/// Serve one command: validate, authorize, provision if needed, rewrite.
///
/// This function owns no process state. It reads and writes the filesystem
/// only through provisioning, which runs strictly after a write has been
/// authorized.
pub fn serve(
    config: &Config,
    policy: &dyn AccessPolicy,
    user: &str,
    command: &str,
    verbosity: Verbosity,
) -> Result<ServeOutcome, ServeError> {
    let Some(cmd) = parse::parse(command)? else {
        return Ok(ServeOutcome::Ignored);
    };

    let path = RepoPath::parse_quoted(&cmd.args).map_err(|_| ServeError::UnsafeArguments)?;

    let (location, mode) = access::resolve(policy, user, cmd.kind, &path, verbosity)?;

    let full_path = location.full_path();
    let mut provisioned = false;
    if cmd.kind == VerbKind::Write && !full_path.exists() {
        // The config refers to this repository and the user is authorized
        // to push to it; create it on the fly.
        provisioned = repo::provision(config, &location)?;
        if provisioned {
            output::debug(
                format!("provisioned new repository at {}", full_path.display()),
                verbosity,
            );
        }
    }

    let command = rewrite(&cmd.verb, &full_path);
    Ok(ServeOutcome::Handoff(Handoff {
        command,
        verb: cmd.verb,
        path,
        mode,
        provisioned,
    }))
}

/// Reassemble the trusted command string from the preserved verb and the
/// resolved absolute path.
///
/// The client-supplied argument is discarded entirely; the path embedded
/// here came from the policy store and the server's own configuration, so
/// no injected content can survive into the executed command.
pub fn rewrite(verb: &str, full_path: &Path) -> String {
    format!("{} '{}'", verb, full_path.display())
}
