//! gitgate - SSH forced-command gateway for git access control
//!
//! gitgate sits between sshd and git-shell on a shared git host. A
//! restricted account's `authorized_keys` forces every session through
//! `gitgate serve <user>`; the gateway validates the command the client
//! attempted, enforces the access policy, provisions repositories on first
//! authorized write, and execs git-shell with a rewritten, trusted command.
//!
//! # Architecture
//!
//! The codebase follows a strict layered architecture:
//!
//! - [`cli`] - Command-line interface layer (parses args, delegates to serve)
//! - [`serve`] - Parse, validate, authorize, and rewrite one command
//! - [`policy`] - Access policy seam and its implementations
//! - [`repo`] - On-demand repository provisioning
//! - [`export`] - Generated gitweb/daemon artifacts
//! - [`core`] - Domain types, configuration, audit journal
//! - [`ui`] - Diagnostics output
//!
//! # Correctness Invariants
//!
//! gitgate maintains the following invariants:
//!
//! 1. Client-supplied text reaches the filesystem only after grammar
//!    validation, and never survives into the executed command
//! 2. Access modes are probed writable-first, so write-capable users are
//!    never downgraded and read-only writers get a specific denial
//! 3. Repositories are created only after a write was authorized
//! 4. Every serve decision is appended to the audit journal

pub mod cli;
pub mod core;
pub mod export;
pub mod policy;
pub mod repo;
pub mod serve;
pub mod ui;
