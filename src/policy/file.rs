//! policy::file
//!
//! Config-file-backed access policy.
//!
//! Grants come from the `[groups.<name>]` sections of the gateway config:
//! a user gets access to a path in a given mode when some group lists the
//! user under `members` and the path under the list for that mode. The
//! `writeable` list is kept separate from `writable` so the resolver can
//! tell a legacy-spelled grant apart and warn about it.
//!
//! A configured entry may carry a `.git` suffix; resolution strips it, so
//! `writable = ["myproj.git"]` and `writable = ["myproj"]` grant the same
//! repository.

use crate::core::config::Config;
use crate::core::types::{AccessMode, RepoPath};

use super::{AccessPolicy, ResolvedLocation};

/// Access policy backed by the gateway configuration file.
#[derive(Debug, Clone)]
pub struct FilePolicy {
    config: Config,
}

impl FilePolicy {
    /// Build a policy view over a loaded configuration.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// The configuration this policy reads grants from.
    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl AccessPolicy for FilePolicy {
    fn resolve(&self, user: &str, mode: AccessMode, path: &RepoPath) -> Option<ResolvedLocation> {
        for group in self.config.groups.values() {
            if !group.members.iter().any(|m| m == user) {
                continue;
            }
            let grants = match mode {
                AccessMode::Writable => &group.writable,
                AccessMode::WriteableLegacy => &group.writeable,
                AccessMode::Readonly => &group.readonly,
            };
            for entry in grants {
                let entry_path = entry.strip_suffix(".git").unwrap_or(entry);
                if entry_path == path.as_str() {
                    return Some(ResolvedLocation::new(
                        self.config.repository_root.clone(),
                        entry_path,
                    ));
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::ConfigDoc;
    use std::path::PathBuf;

    fn policy_from(toml_text: &str) -> FilePolicy {
        let doc: ConfigDoc = toml::from_str(toml_text).expect("parse config");
        FilePolicy::new(Config::from_doc(doc).expect("resolve config"))
    }

    fn path(s: &str) -> RepoPath {
        RepoPath::new(s).expect("valid path")
    }

    const BASIC: &str = r#"
        [gateway]
        repository_root = "/srv/git/repositories"

        [groups.devs]
        members = ["alice", "bob"]
        writable = ["myproj"]
        readonly = ["docs"]

        [groups.legacy]
        members = ["carol"]
        writeable = ["oldproj"]

        [groups.mirrors]
        members = ["daemon-user"]
        readonly = ["myproj", "archive.git"]
    "#;

    #[test]
    fn member_with_writable_grant() {
        let policy = policy_from(BASIC);
        let loc = policy
            .resolve("alice", AccessMode::Writable, &path("myproj"))
            .expect("grant");
        assert_eq!(loc.root(), PathBuf::from("/srv/git/repositories"));
        assert_eq!(loc.relative(), "myproj");
    }

    #[test]
    fn non_member_denied() {
        let policy = policy_from(BASIC);
        assert!(policy
            .resolve("mallory", AccessMode::Writable, &path("myproj"))
            .is_none());
    }

    #[test]
    fn mode_lists_are_disjoint_lookups() {
        let policy = policy_from(BASIC);
        // alice can write myproj but has no readonly grant for it in `devs`
        assert!(policy
            .resolve("alice", AccessMode::Readonly, &path("myproj"))
            .is_none());
        // and docs is readonly, not writable
        assert!(policy
            .resolve("alice", AccessMode::Writable, &path("docs"))
            .is_none());
        assert!(policy
            .resolve("alice", AccessMode::Readonly, &path("docs"))
            .is_some());
    }

    #[test]
    fn legacy_spelling_only_matches_legacy_mode() {
        let policy = policy_from(BASIC);
        assert!(policy
            .resolve("carol", AccessMode::Writable, &path("oldproj"))
            .is_none());
        assert!(policy
            .resolve("carol", AccessMode::WriteableLegacy, &path("oldproj"))
            .is_some());
    }

    #[test]
    fn git_suffixed_entry_resolves_stripped() {
        let policy = policy_from(BASIC);
        let loc = policy
            .resolve("daemon-user", AccessMode::Readonly, &path("archive"))
            .expect("grant");
        assert_eq!(loc.relative(), "archive");
        assert_eq!(
            loc.full_path(),
            PathBuf::from("/srv/git/repositories/archive.git")
        );
    }

    #[test]
    fn grant_found_across_groups() {
        let policy = policy_from(BASIC);
        // myproj is writable for devs and readonly for mirrors
        assert!(policy
            .resolve("daemon-user", AccessMode::Readonly, &path("myproj"))
            .is_some());
        assert!(policy
            .resolve("daemon-user", AccessMode::Writable, &path("myproj"))
            .is_none());
    }

    #[test]
    fn unknown_path_denied() {
        let policy = policy_from(BASIC);
        assert!(policy
            .resolve("alice", AccessMode::Writable, &path("otherproj"))
            .is_none());
    }
}
