//! core::config
//!
//! Configuration loading for the gateway.
//!
//! # Locations
//!
//! Searched in order:
//! 1. `$GITGATE_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/gitgate/config.toml`
//! 3. `~/.gitgate.toml`
//!
//! If no file exists the defaults apply: repositories under
//! `~/repositories`, generated artifacts under `~/gitgate`. The original
//! implementation leaned on a chdir-to-home plus relative paths; here all
//! paths are resolved once at load time and carried explicitly, so the
//! serving core never touches process-global state.
//!
//! # Path expansion
//!
//! A leading `~/` in any configured path is expanded against the home
//! directory. Other paths are used as written.
//!
//! # Example
//!
//! ```no_run
//! use gitgate::core::config::Config;
//!
//! let config = Config::load(None).unwrap();
//! println!("serving repositories from {}", config.repository_root.display());
//! ```

pub mod schema;

pub use schema::{ConfigDoc, GatewaySection, GroupSection, RepoSection};

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("cannot determine home directory for default paths")]
    NoHomeDir,
}

/// Resolved gateway configuration.
///
/// All paths are absolute (or at least fully expanded) by the time this
/// struct exists.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory under which all served repositories live.
    pub repository_root: PathBuf,
    /// Directory for generated artifacts.
    pub generated_files_dir: PathBuf,
    /// Directory for the audit journal.
    pub audit_dir: PathBuf,
    /// Access grant groups by name.
    pub groups: BTreeMap<String, GroupSection>,
    /// Per-repository metadata by path.
    pub repos: BTreeMap<String, RepoSection>,
}

impl Config {
    /// Load configuration, optionally from an explicit path.
    ///
    /// An explicit path that does not exist is an error; otherwise the
    /// search order documented on the module applies, falling back to
    /// defaults when nothing is found.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(p) => Some(p.to_path_buf()),
            None => Self::find_config_file(),
        };

        let doc = match path {
            Some(path) => {
                let text = fs::read_to_string(&path).map_err(|source| ConfigError::ReadError {
                    path: path.clone(),
                    source,
                })?;
                toml::from_str(&text).map_err(|e| ConfigError::ParseError {
                    path,
                    message: e.to_string(),
                })?
            }
            None => ConfigDoc::default(),
        };

        Self::from_doc(doc)
    }

    /// Build a resolved config from a parsed document, applying defaults
    /// and `~/` expansion.
    pub fn from_doc(doc: ConfigDoc) -> Result<Self, ConfigError> {
        let repository_root = match doc.gateway.repository_root {
            Some(p) => expand_home(&p)?,
            None => home()?.join("repositories"),
        };
        let generated_files_dir = match doc.gateway.generated_files_dir {
            Some(p) => expand_home(&p)?,
            None => home()?.join("gitgate"),
        };
        let audit_dir = match doc.gateway.audit_dir {
            Some(p) => expand_home(&p)?,
            None => generated_files_dir.join("audit"),
        };

        Ok(Self {
            repository_root,
            generated_files_dir,
            audit_dir,
            groups: doc.groups,
            repos: doc.repos,
        })
    }

    /// Path of the generated gitweb project list.
    pub fn project_list_path(&self) -> PathBuf {
        self.generated_files_dir.join("projects.list")
    }

    /// Locate a config file per the documented search order.
    fn find_config_file() -> Option<PathBuf> {
        if let Ok(p) = std::env::var("GITGATE_CONFIG") {
            return Some(PathBuf::from(p));
        }
        if let Some(xdg) = dirs::config_dir() {
            let candidate = xdg.join("gitgate").join("config.toml");
            if candidate.exists() {
                return Some(candidate);
            }
        }
        if let Some(home) = dirs::home_dir() {
            let candidate = home.join(".gitgate.toml");
            if candidate.exists() {
                return Some(candidate);
            }
        }
        None
    }
}

fn home() -> Result<PathBuf, ConfigError> {
    dirs::home_dir().ok_or(ConfigError::NoHomeDir)
}

/// Expand a leading `~/` against the home directory.
fn expand_home(path: &Path) -> Result<PathBuf, ConfigError> {
    match path.strip_prefix("~") {
        Ok(rest) => Ok(home()?.join(rest)),
        Err(_) => Ok(path.to_path_buf()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, contents: &str) -> PathBuf {
        let path = dir.path().join("config.toml");
        fs::write(&path, contents).expect("write config");
        path
    }

    #[test]
    fn explicit_path_loads() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"
            [gateway]
            repository_root = "/srv/git/repositories"
            generated_files_dir = "/srv/git/generated"
            "#,
        );

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(
            config.repository_root,
            PathBuf::from("/srv/git/repositories")
        );
        assert_eq!(
            config.project_list_path(),
            PathBuf::from("/srv/git/generated/projects.list")
        );
        // audit_dir defaults under generated_files_dir
        assert_eq!(config.audit_dir, PathBuf::from("/srv/git/generated/audit"));
    }

    #[test]
    fn explicit_missing_path_is_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.toml");
        let result = Config::load(Some(&missing));
        assert!(matches!(result, Err(ConfigError::ReadError { .. })));
    }

    #[test]
    fn parse_error_reports_path() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "not valid toml [[[");
        let err = Config::load(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn defaults_are_home_relative() {
        let config = Config::from_doc(ConfigDoc::default()).unwrap();
        let home = dirs::home_dir().unwrap();
        assert_eq!(config.repository_root, home.join("repositories"));
        assert_eq!(config.generated_files_dir, home.join("gitgate"));
        assert_eq!(config.audit_dir, home.join("gitgate").join("audit"));
    }

    #[test]
    fn tilde_expansion() {
        let doc: ConfigDoc = toml::from_str(
            r#"
            [gateway]
            repository_root = "~/repos"
            "#,
        )
        .unwrap();
        let config = Config::from_doc(doc).unwrap();
        assert_eq!(
            config.repository_root,
            dirs::home_dir().unwrap().join("repos")
        );
    }

    #[test]
    fn groups_and_repos_carried_through() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"
            [gateway]
            repository_root = "/srv/git/repositories"

            [groups.devs]
            members = ["alice"]
            writable = ["myproj"]

            [repos."myproj"]
            daemon = true
            "#,
        );
        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.groups["devs"].members, vec!["alice"]);
        assert!(config.repos["myproj"].daemon);
    }
}
