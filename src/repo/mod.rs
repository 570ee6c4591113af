//! repo
//!
//! On-demand repository provisioning.
//!
//! # Architecture
//!
//! The first authorized push to a configured-but-missing repository creates
//! it: leading directories with restrictive permissions, then a bare
//! repository via git2 (the single doorway to git in this crate), then a
//! refresh of the gitweb and git-daemon artifacts so the new repository is
//! immediately visible to both.
//!
//! # Concurrency
//!
//! Two SSH sessions can race to first-push the same new path. Provisioning
//! serializes per repository with a blocking OS-level advisory lock keyed
//! by the target path, and re-checks existence under the lock, so both
//! invocations succeed and exactly one initializes.
//!
//! # Invariants
//!
//! - Provisioning runs only after a write was authorized (enforced by the
//!   caller in [`crate::serve`])
//! - Directory creation and initialization are idempotent; a failed
//!   invocation self-heals when the same command is retried
//! - The `.git` suffix is appended exactly once, by
//!   [`ResolvedLocation::full_path`]
//!
//! [`ResolvedLocation::full_path`]: crate::policy::ResolvedLocation::full_path

use std::fs::{DirBuilder, File, OpenOptions};
use std::os::unix::fs::DirBuilderExt;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use thiserror::Error;

use crate::core::config::Config;
use crate::export::{self, ExportError};
use crate::policy::ResolvedLocation;

/// Mode for directories leading up to a repository. Group can traverse,
/// others cannot see anything.
const DIR_MODE: u32 = 0o750;

/// Errors from provisioning.
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// Failed to create a leading directory.
    #[error("failed to create directory '{path}': {source}")]
    CreateDirs {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to take the per-path provisioning lock.
    #[error("failed to lock '{path}' for provisioning: {source}")]
    Lock {
        path: PathBuf,
        source: std::io::Error,
    },

    /// libgit2 refused to initialize the repository.
    #[error("failed to initialize repository '{path}': {message}")]
    Init { path: PathBuf, message: String },

    /// The repository was created but artifact regeneration failed.
    #[error(transparent)]
    Export(#[from] ExportError),
}

/// An exclusive per-repository provisioning lock.
///
/// Unlike a fail-fast lock, acquisition blocks: a second first-push for the
/// same path should wait for the winner and then find the repository
/// already initialized, not error out. Released on drop (RAII).
#[derive(Debug)]
pub struct ProvisionLock {
    file: Option<File>,
}

impl ProvisionLock {
    /// Acquire the lock guarding `repo_path`, blocking until it is free.
    ///
    /// The lock file lives next to the repository (`<name>.git.lock`); its
    /// parent directory must already exist. Stale lock files are harmless
    /// and reused.
    pub fn acquire(repo_path: &Path) -> Result<Self, ProvisionError> {
        let lock_path = lock_path_for(repo_path);
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|source| ProvisionError::Lock {
                path: lock_path.clone(),
                source,
            })?;

        file.lock_exclusive()
            .map_err(|source| ProvisionError::Lock {
                path: lock_path,
                source,
            })?;

        Ok(Self { file: Some(file) })
    }

    /// Release the lock explicitly. Also happens on drop.
    pub fn release(&mut self) {
        if let Some(file) = self.file.take() {
            let _ = file.unlock();
        }
    }
}

impl Drop for ProvisionLock {
    fn drop(&mut self) {
        self.release();
    }
}

fn lock_path_for(repo_path: &Path) -> PathBuf {
    let mut name = repo_path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".lock");
    repo_path.with_file_name(name)
}

/// Provision the repository at `location` if it does not exist yet.
///
/// Returns `true` when this invocation performed the initialization,
/// `false` when the repository already existed (including when a
/// concurrent invocation won the race while we waited on the lock).
///
/// On a fresh initialization the gitweb and git-daemon artifacts are
/// regenerated so the new repository shows up in the project list and the
/// daemon export set.
pub fn provision(config: &Config, location: &ResolvedLocation) -> Result<bool, ProvisionError> {
    let full_path = location.full_path();
    if full_path.exists() {
        return Ok(false);
    }

    if let Some(parent) = full_path.parent() {
        DirBuilder::new()
            .recursive(true)
            .mode(DIR_MODE)
            .create(parent)
            .map_err(|source| ProvisionError::CreateDirs {
                path: parent.to_path_buf(),
                source,
            })?;
    }

    let _lock = ProvisionLock::acquire(&full_path)?;
    if full_path.exists() {
        // Another session initialized it while we waited.
        return Ok(false);
    }

    init_bare(&full_path)?;

    export::set_descriptions(config)?;
    export::generate_project_list(config, &config.project_list_path())?;
    export::set_export_ok(config)?;

    Ok(true)
}

/// Initialize an empty bare repository at `path`.
///
/// Safe to call when the parent directories already exist; reinitializing
/// an existing repository is a no-op rather than an error, which keeps the
/// operation idempotent under retries.
pub fn init_bare(path: &Path) -> Result<(), ProvisionError> {
    let mut opts = git2::RepositoryInitOptions::new();
    opts.bare(true);
    opts.no_reinit(false);
    git2::Repository::init_opts(path, &opts).map_err(|e| ProvisionError::Init {
        path: path.to_path_buf(),
        message: e.message().to_string(),
    })?;
    Ok(())
}
