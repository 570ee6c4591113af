//! policy
//!
//! Access policy seam for the gateway.
//!
//! # Design
//!
//! The serving core never inspects policy storage; it asks a single
//! question through the [`AccessPolicy`] trait: may `user` touch `path` in
//! `mode`, and if so, where does that path live on disk? Absence of a grant
//! is an ordinary `None`, not an error; the resolver turns it into the
//! right denial.
//!
//! # Implementations
//!
//! - [`file::FilePolicy`] - grants read from the gateway config file
//! - [`mock::MockPolicy`] - in-memory grants with a recorded probe trail,
//!   for deterministic tests
//!
//! # Example
//!
//! ```
//! use gitgate::core::types::{AccessMode, RepoPath};
//! use gitgate::policy::{AccessPolicy, ResolvedLocation};
//! use gitgate::policy::mock::MockPolicy;
//! use std::path::PathBuf;
//!
//! let policy = MockPolicy::new();
//! policy.grant(
//!     "alice",
//!     AccessMode::Readonly,
//!     "myproj",
//!     ResolvedLocation::new(PathBuf::from("/srv/git"), "myproj"),
//! );
//!
//! let path = RepoPath::new("myproj").unwrap();
//! assert!(policy.resolve("alice", AccessMode::Readonly, &path).is_some());
//! assert!(policy.resolve("bob", AccessMode::Readonly, &path).is_none());
//! ```

pub mod file;
pub mod mock;

pub use file::FilePolicy;
pub use mock::MockPolicy;

use std::path::{Path, PathBuf};

use crate::core::types::{AccessMode, RepoPath};

/// The canonical on-disk location a granted path maps to.
///
/// `relative` never ends with the `.git` suffix; the constructor strips as
/// many as it finds, and [`ResolvedLocation::full_path`] appends it exactly
/// once. This keeps double-suffixing impossible regardless of how the
/// policy store spells its entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLocation {
    root: PathBuf,
    relative: String,
}

impl ResolvedLocation {
    /// Create a resolved location, normalizing away trailing `.git`
    /// suffixes.
    pub fn new(root: PathBuf, relative: impl Into<String>) -> Self {
        let mut relative = relative.into();
        while relative.ends_with(".git") {
            relative.truncate(relative.len() - ".git".len());
        }
        Self { root, relative }
    }

    /// The root directory repositories live under.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The relative path, without the `.git` suffix.
    pub fn relative(&self) -> &str {
        &self.relative
    }

    /// The absolute on-disk repository path, with the `.git` suffix.
    pub fn full_path(&self) -> PathBuf {
        self.root.join(format!("{}.git", self.relative))
    }
}

/// The access-control policy consumed by the serving core.
pub trait AccessPolicy {
    /// Resolve `(user, mode, path)` to a location, or `None` when no grant
    /// matches. Must be free of side effects; the serving core probes
    /// multiple modes per request.
    fn resolve(&self, user: &str, mode: AccessMode, path: &RepoPath) -> Option<ResolvedLocation>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_path_appends_suffix_once() {
        let loc = ResolvedLocation::new(PathBuf::from("/srv/git"), "myproj");
        assert_eq!(loc.full_path(), PathBuf::from("/srv/git/myproj.git"));
    }

    #[test]
    fn git_suffix_stripped_at_construction() {
        let loc = ResolvedLocation::new(PathBuf::from("/srv/git"), "myproj.git");
        assert_eq!(loc.relative(), "myproj");
        assert_eq!(loc.full_path(), PathBuf::from("/srv/git/myproj.git"));
    }

    #[test]
    fn repeated_git_suffixes_all_stripped() {
        let loc = ResolvedLocation::new(PathBuf::from("/srv/git"), "a.git.git");
        assert_eq!(loc.relative(), "a");
        assert_eq!(loc.full_path(), PathBuf::from("/srv/git/a.git"));
    }

    #[test]
    fn nested_relative_paths() {
        let loc = ResolvedLocation::new(PathBuf::from("/srv/git"), "team/myproj");
        assert_eq!(loc.full_path(), PathBuf::from("/srv/git/team/myproj.git"));
    }
}
