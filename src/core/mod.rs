//! core
//!
//! Core domain types, configuration, and audit journaling.
//!
//! # Modules
//!
//! - [`types`] - Strong types: RepoPath, AccessMode, UtcTimestamp
//! - [`config`] - Configuration schema and loading
//! - [`audit`] - Append-only audit journal for serve decisions
//!
//! # Design Principles
//!
//! - Strong typing prevents invalid states at compile time
//! - Untrusted input is validated once, at construction
//! - All configuration is explicit; no ambient process state

pub mod audit;
pub mod config;
pub mod types;
