//! export
//!
//! Generated artifacts for web browsing and daemon export.
//!
//! # Artifacts
//!
//! - `<repo>.git/description` - gitweb description text, from the repo's
//!   config section
//! - `<generated_files_dir>/projects.list` - the gitweb project list:
//!   every gitweb-enabled repository that exists on disk
//! - `<repo>.git/git-daemon-export-ok` - presence marks the repository
//!   exportable by git-daemon; regeneration also removes the marker from
//!   repositories that lost the flag
//!
//! # When this runs
//!
//! Provisioning regenerates everything after creating a new repository, and
//! `gitgate refresh` regenerates on demand after config edits. All three
//! operations are full rewrites driven by current config plus the on-disk
//! repository set, so they are idempotent.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::config::Config;

/// Errors from artifact generation.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write '{path}': {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to remove '{path}': {source}")]
    RemoveError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to scan repository root '{path}': {source}")]
    ScanError {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// A repository found under the root: its config name and on-disk path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoundRepo {
    /// Relative name without the `.git` suffix, e.g. `team/myproj`.
    pub name: String,
    /// Absolute path of the `.git` directory.
    pub path: PathBuf,
}

/// Walk the repository root for `.git` directories.
///
/// Recursion stops at a repository boundary; a `.git` directory's contents
/// are never scanned for nested repositories. Symlinked directories are
/// not followed. A missing root yields an empty set rather than an error,
/// since a fresh host has no repositories yet.
pub fn walk_repos(root: &Path) -> Result<Vec<FoundRepo>, ExportError> {
    let mut found = Vec::new();
    if root.is_dir() {
        walk_into(root, root, &mut found)?;
    }
    found.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(found)
}

fn walk_into(root: &Path, dir: &Path, found: &mut Vec<FoundRepo>) -> Result<(), ExportError> {
    let entries = fs::read_dir(dir).map_err(|source| ExportError::ScanError {
        path: dir.to_path_buf(),
        source,
    })?;
    for entry in entries {
        let entry = entry.map_err(|source| ExportError::ScanError {
            path: dir.to_path_buf(),
            source,
        })?;
        let file_type = entry.file_type().map_err(|source| ExportError::ScanError {
            path: dir.to_path_buf(),
            source,
        })?;
        // file_type does not follow symlinks, so a linked directory is
        // skipped rather than traversed; this also breaks link cycles.
        if !file_type.is_dir() {
            continue;
        }
        let path = entry.path();
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if let Some(stem) = name.strip_suffix(".git") {
            let mut relative = path
                .parent()
                .and_then(|p| p.strip_prefix(root).ok())
                .map(|p| p.to_string_lossy().into_owned())
                .unwrap_or_default();
            if relative.is_empty() {
                relative = stem.to_string();
            } else {
                relative = format!("{relative}/{stem}");
            }
            found.push(FoundRepo {
                name: relative,
                path,
            });
        } else {
            walk_into(root, &path, found)?;
        }
    }
    Ok(())
}

/// Write gitweb description files for repositories that have one
/// configured and exist on disk.
pub fn set_descriptions(config: &Config) -> Result<(), ExportError> {
    for repo in walk_repos(&config.repository_root)? {
        let Some(section) = config.repos.get(&repo.name) else {
            continue;
        };
        let Some(description) = &section.description else {
            continue;
        };
        let path = repo.path.join("description");
        let mut text = description.clone();
        if !text.ends_with('\n') {
            text.push('\n');
        }
        fs::write(&path, text).map_err(|source| ExportError::WriteError { path, source })?;
    }
    Ok(())
}

/// Regenerate the gitweb project list at `output`.
///
/// The list holds every gitweb-enabled repository that exists on disk, one
/// `<name>.git` per line. Written to a temporary sibling and renamed so
/// gitweb never sees a half-written list.
pub fn generate_project_list(config: &Config, output: &Path) -> Result<(), ExportError> {
    let mut lines = String::new();
    for repo in walk_repos(&config.repository_root)? {
        let enabled = config
            .repos
            .get(&repo.name)
            .map(|section| section.gitweb)
            .unwrap_or(false);
        if enabled {
            lines.push_str(&repo.name);
            lines.push_str(".git\n");
        }
    }

    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent).map_err(|source| ExportError::WriteError {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let tmp = output.with_extension("list.tmp");
    fs::write(&tmp, lines).map_err(|source| ExportError::WriteError {
        path: tmp.clone(),
        source,
    })?;
    fs::rename(&tmp, output).map_err(|source| ExportError::WriteError {
        path: output.to_path_buf(),
        source,
    })?;
    Ok(())
}

/// Synchronize `git-daemon-export-ok` markers with the config.
///
/// Creates the marker in daemon-enabled repositories and removes it from
/// repositories that are no longer enabled, so revoking daemon access in
/// config actually revokes it on disk at the next regeneration.
pub fn set_export_ok(config: &Config) -> Result<(), ExportError> {
    for repo in walk_repos(&config.repository_root)? {
        let enabled = config
            .repos
            .get(&repo.name)
            .map(|section| section.daemon)
            .unwrap_or(false);
        let marker = repo.path.join("git-daemon-export-ok");
        if enabled {
            fs::write(&marker, b"").map_err(|source| ExportError::WriteError {
                path: marker.clone(),
                source,
            })?;
        } else if marker.exists() {
            fs::remove_file(&marker).map_err(|source| ExportError::RemoveError {
                path: marker.clone(),
                source,
            })?;
        }
    }
    Ok(())
}
