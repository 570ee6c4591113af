//! serve::access
//!
//! Access resolution with least-privilege mode probing.
//!
//! # Probing order
//!
//! The policy is consulted mode by mode, in a fixed order that must not be
//! reordered:
//!
//! 1. `writable` - write access is always sufficient, including for reads
//! 2. `writeable` - the popular misspelling; honored, with a warning, so
//!    non-conforming policy data keeps working while operators fix it
//! 3. `readonly` - consulted only after both write probes miss
//!
//! The order is what guarantees a write-capable user is never downgraded to
//! read-only treatment, and that a read-only user attempting a push gets
//! the specific `WriteAccessDenied` rather than a generic denial.

use crate::core::types::{AccessMode, RepoPath};
use crate::policy::{AccessPolicy, ResolvedLocation};
use crate::ui::output::{self, Verbosity};

use super::parse::VerbKind;
use super::ServeError;

/// The write-mode probe sequence. Evaluated in order with short-circuit;
/// the flag marks modes whose success must be warned about.
const WRITE_PROBES: [(AccessMode, bool); 2] = [
    (AccessMode::Writable, false),
    (AccessMode::WriteableLegacy, true),
];

/// Resolve access for one parsed command.
///
/// Returns the location from whichever probe succeeded, along with the
/// mode that granted it.
///
/// # Errors
///
/// - [`ServeError::ReadAccessDenied`] when no probe matches at all
/// - [`ServeError::WriteAccessDenied`] when only `readonly` matches but the
///   verb is a write verb
pub fn resolve(
    policy: &dyn AccessPolicy,
    user: &str,
    kind: VerbKind,
    path: &RepoPath,
    verbosity: Verbosity,
) -> Result<(ResolvedLocation, AccessMode), ServeError> {
    for (mode, warn_on_match) in WRITE_PROBES {
        if let Some(location) = policy.resolve(user, mode, path) {
            if warn_on_match {
                output::warn(
                    format!(
                        "grant for repository '{path}' uses \"writeable\"; should be \"writable\""
                    ),
                    verbosity,
                );
            }
            return Ok((location, mode));
        }
    }

    let location = policy
        .resolve(user, AccessMode::Readonly, path)
        .ok_or(ServeError::ReadAccessDenied)?;

    if kind == VerbKind::Write {
        return Err(ServeError::WriteAccessDenied);
    }

    Ok((location, AccessMode::Readonly))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::MockPolicy;
    use std::path::PathBuf;

    fn location() -> ResolvedLocation {
        ResolvedLocation::new(PathBuf::from("/srv/git"), "myproj")
    }

    fn path() -> RepoPath {
        RepoPath::new("myproj").unwrap()
    }

    fn quiet() -> Verbosity {
        Verbosity::Quiet
    }

    #[test]
    fn writable_grant_short_circuits() {
        let policy = MockPolicy::new();
        policy.grant("alice", AccessMode::Writable, "myproj", location());

        let (_, mode) =
            resolve(&policy, "alice", VerbKind::Write, &path(), quiet()).expect("granted");
        assert_eq!(mode, AccessMode::Writable);
        assert_eq!(policy.probed_modes(), vec![AccessMode::Writable]);
    }

    #[test]
    fn write_access_is_sufficient_for_reads() {
        let policy = MockPolicy::new();
        policy.grant("alice", AccessMode::Writable, "myproj", location());

        let (_, mode) =
            resolve(&policy, "alice", VerbKind::Read, &path(), quiet()).expect("granted");
        assert_eq!(mode, AccessMode::Writable);
    }

    #[test]
    fn legacy_misspelling_honored_after_writable_misses() {
        let policy = MockPolicy::new();
        policy.grant("carol", AccessMode::WriteableLegacy, "myproj", location());

        let (_, mode) =
            resolve(&policy, "carol", VerbKind::Write, &path(), quiet()).expect("granted");
        assert_eq!(mode, AccessMode::WriteableLegacy);
        assert_eq!(
            policy.probed_modes(),
            vec![AccessMode::Writable, AccessMode::WriteableLegacy]
        );
    }

    #[test]
    fn readonly_probe_comes_last() {
        let policy = MockPolicy::new();
        policy.grant("bob", AccessMode::Readonly, "myproj", location());

        let (_, mode) =
            resolve(&policy, "bob", VerbKind::Read, &path(), quiet()).expect("granted");
        assert_eq!(mode, AccessMode::Readonly);
        assert_eq!(
            policy.probed_modes(),
            vec![
                AccessMode::Writable,
                AccessMode::WriteableLegacy,
                AccessMode::Readonly
            ]
        );
    }

    #[test]
    fn no_grant_at_all_is_read_denial() {
        let policy = MockPolicy::new();

        // The most general denial, regardless of requested verb
        let err = resolve(&policy, "mallory", VerbKind::Read, &path(), quiet()).unwrap_err();
        assert!(matches!(err, ServeError::ReadAccessDenied));

        let err = resolve(&policy, "mallory", VerbKind::Write, &path(), quiet()).unwrap_err();
        assert!(matches!(err, ServeError::ReadAccessDenied));
    }

    #[test]
    fn readonly_holder_attempting_write_gets_specific_denial() {
        let policy = MockPolicy::new();
        policy.grant("bob", AccessMode::Readonly, "myproj", location());

        let err = resolve(&policy, "bob", VerbKind::Write, &path(), quiet()).unwrap_err();
        assert!(matches!(err, ServeError::WriteAccessDenied));
    }
}
