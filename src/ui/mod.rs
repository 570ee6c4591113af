//! ui
//!
//! User-facing output utilities.
//!
//! # Modules
//!
//! - [`output`] - Output formatting and display
//!
//! # Design
//!
//! All diagnostics go through this module so quiet/debug behavior is
//! consistent. Because the gateway's stdout may be wired straight into a
//! git client, diagnostics are written to stderr only.

pub mod output;
