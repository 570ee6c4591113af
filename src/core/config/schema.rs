//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Sections
//!
//! - `[gateway]` - filesystem layout: where repositories live, where
//!   generated artifacts and the audit journal go
//! - `[groups.<name>]` - access grants: members plus per-mode path lists
//! - `[repos.<path>]` - per-repository metadata consumed by the artifact
//!   generators (gitweb description, daemon export)
//!
//! # Validation
//!
//! Grant lists are plain strings rather than [`RepoPath`] values because a
//! configured entry may carry a trailing `.git` suffix; the policy layer
//! strips it during resolution. Everything else is validated after parsing.
//!
//! [`RepoPath`]: crate::core::types::RepoPath

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration document.
///
/// # Example
///
/// ```toml
/// [gateway]
/// repository_root = "~/repositories"
/// generated_files_dir = "~/gitgate"
///
/// [groups.devs]
/// members = ["alice", "bob"]
/// writable = ["myproj"]
/// readonly = ["docs"]
///
/// [repos."myproj"]
/// description = "Main project"
/// gitweb = true
/// daemon = true
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigDoc {
    /// Filesystem layout settings.
    #[serde(default)]
    pub gateway: GatewaySection,

    /// Access grant groups, keyed by group name.
    #[serde(default)]
    pub groups: BTreeMap<String, GroupSection>,

    /// Per-repository metadata, keyed by repository path (without `.git`).
    #[serde(default)]
    pub repos: BTreeMap<String, RepoSection>,
}

/// The `[gateway]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewaySection {
    /// Directory under which all served repositories live.
    /// Defaults to `~/repositories`.
    #[serde(default)]
    pub repository_root: Option<PathBuf>,

    /// Directory for generated artifacts (`projects.list`).
    /// Defaults to `~/gitgate`.
    #[serde(default)]
    pub generated_files_dir: Option<PathBuf>,

    /// Directory for the audit journal. Defaults to
    /// `<generated_files_dir>/audit`.
    #[serde(default)]
    pub audit_dir: Option<PathBuf>,
}

/// A `[groups.<name>]` section: one named set of users and their grants.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GroupSection {
    /// User names belonging to this group.
    #[serde(default)]
    pub members: Vec<String>,

    /// Paths this group may push to.
    #[serde(default)]
    pub writable: Vec<String>,

    /// Legacy misspelling of `writable`. Honored, but serving a grant that
    /// only matches here produces a warning.
    #[serde(default)]
    pub writeable: Vec<String>,

    /// Paths this group may fetch from.
    #[serde(default)]
    pub readonly: Vec<String>,
}

/// A `[repos.<path>]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RepoSection {
    /// Text written to the repository's `description` file for gitweb.
    #[serde(default)]
    pub description: Option<String>,

    /// Include this repository in the generated gitweb project list.
    #[serde(default)]
    pub gitweb: bool,

    /// Mark this repository exportable by git-daemon.
    #[serde(default)]
    pub daemon: bool,
}
