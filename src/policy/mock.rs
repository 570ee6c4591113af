//! policy::mock
//!
//! Mock access policy for deterministic testing.
//!
//! # Design
//!
//! Grants live in memory and every probe is recorded, so tests can assert
//! not just the outcome but the order in which the resolver consulted the
//! policy (the writable / writeable / readonly sequence is a contract).
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
//!     AccessMode::Writable,
//!     "myproj",
//!     ResolvedLocation::new(PathBuf::from("/srv/git"), "myproj"),
//! );
//!
//! let path = RepoPath::new("myproj").unwrap();
//! assert!(policy.resolve("alice", AccessMode::Writable, &path).is_some());
//! assert_eq!(policy.probes(), vec![("alice".into(), AccessMode::Writable, "myproj".into())]);
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::core::types::{AccessMode, RepoPath};

use super::{AccessPolicy, ResolvedLocation};

/// Mock policy for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping.
#[derive(Debug, Clone, Default)]
pub struct MockPolicy {
    inner: Arc<Mutex<MockPolicyInner>>,
}

#[derive(Debug, Default)]
struct MockPolicyInner {
    /// Grants keyed by (user, mode spelling, path).
    grants: HashMap<(String, &'static str, String), ResolvedLocation>,
    /// Every probe the resolver made, in order.
    probes: Vec<(String, AccessMode, String)>,
}

impl MockPolicy {
    /// Create an empty mock policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a grant.
    pub fn grant(&self, user: &str, mode: AccessMode, path: &str, location: ResolvedLocation) {
        let mut inner = self.inner.lock().unwrap();
        inner
            .grants
            .insert((user.into(), mode.as_str(), path.into()), location);
    }

    /// The probes made so far, in order.
    pub fn probes(&self) -> Vec<(String, AccessMode, String)> {
        self.inner.lock().unwrap().probes.clone()
    }

    /// The modes probed so far, in order. Convenience for order assertions.
    pub fn probed_modes(&self) -> Vec<AccessMode> {
        self.inner
            .lock()
            .unwrap()
            .probes
            .iter()
            .map(|(_, mode, _)| *mode)
            .collect()
    }
}

impl AccessPolicy for MockPolicy {
    fn resolve(&self, user: &str, mode: AccessMode, path: &RepoPath) -> Option<ResolvedLocation> {
        let mut inner = self.inner.lock().unwrap();
        inner
            .probes
            .push((user.into(), mode, path.as_str().into()));
        inner
            .grants
            .get(&(user.into(), mode.as_str(), path.as_str().into()))
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn location() -> ResolvedLocation {
        ResolvedLocation::new(PathBuf::from("/srv/git"), "myproj")
    }

    #[test]
    fn grant_resolves_for_exact_tuple_only() {
        let policy = MockPolicy::new();
        policy.grant("alice", AccessMode::Writable, "myproj", location());

        let path = RepoPath::new("myproj").unwrap();
        assert!(policy
            .resolve("alice", AccessMode::Writable, &path)
            .is_some());
        assert!(policy
            .resolve("alice", AccessMode::Readonly, &path)
            .is_none());
        assert!(policy.resolve("bob", AccessMode::Writable, &path).is_none());
    }

    #[test]
    fn probes_are_recorded_in_order() {
        let policy = MockPolicy::new();
        let path = RepoPath::new("myproj").unwrap();

        policy.resolve("alice", AccessMode::Writable, &path);
        policy.resolve("alice", AccessMode::Readonly, &path);

        assert_eq!(
            policy.probed_modes(),
            vec![AccessMode::Writable, AccessMode::Readonly]
        );
    }
}
