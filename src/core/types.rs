//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`RepoPath`] - Validated relative repository path
//! - [`AccessMode`] - Access mode probed against the policy store
//! - [`UtcTimestamp`] - RFC3339 timestamp for audit records
//!
//! # Validation
//!
//! [`RepoPath`] enforces validity at construction time. A value that exists
//! has already passed the path grammar, so downstream code (the command
//! rewriter included) never needs to re-check it. Invalid values cannot be
//! represented.
//!
//! # Examples
//!
//! ```
//! use gitgate::core::types::RepoPath;
//!
//! // Valid constructions
//! let path = RepoPath::new("team/myproj").unwrap();
//! assert_eq!(path.as_str(), "team/myproj");
//!
//! // The quoted form used on the wire strips leading slashes
//! let quoted = RepoPath::parse_quoted("'/myproj'").unwrap();
//! assert_eq!(quoted.as_str(), "myproj");
//!
//! // Invalid constructions fail at creation time
//! assert!(RepoPath::new("../etc/passwd").is_err());
//! assert!(RepoPath::parse_quoted("'a'; rm -rf /").is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid repository path: {0}")]
    InvalidRepoPath(String),
}

/// A validated relative repository path.
///
/// Repository paths are the only client-controlled text that survives into
/// filesystem operations, so the grammar is deliberately strict:
///
/// - Non-empty, no leading `/` (leading slashes are stripped by
///   [`RepoPath::parse_quoted`] before validation)
/// - Segments separated by single `/`
/// - Each segment starts with an ASCII alphanumeric character
/// - Remaining segment characters limited to `[A-Za-z0-9@._-]`
///
/// This rules out `..` traversal (a segment cannot start with `.`), shell
/// metacharacters, quoting, and whitespace in one pass.
///
/// # Example
///
/// ```
/// use gitgate::core::types::RepoPath;
///
/// // Valid paths
/// assert!(RepoPath::new("myproj").is_ok());
/// assert!(RepoPath::new("team/sub-proj.ext").is_ok());
/// assert!(RepoPath::new("user@host/repo_1").is_ok());
///
/// // Invalid paths
/// assert!(RepoPath::new("").is_err());
/// assert!(RepoPath::new("/abs").is_err());
/// assert!(RepoPath::new("a//b").is_err());
/// assert!(RepoPath::new("a/../b").is_err());
/// assert!(RepoPath::new("has space").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RepoPath(String);

impl RepoPath {
    /// Create a new validated repository path.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidRepoPath` if the string violates the path
    /// grammar.
    pub fn new(path: impl Into<String>) -> Result<Self, TypeError> {
        let path = path.into();
        Self::validate(&path)?;
        Ok(Self(path))
    }

    /// Parse the single-quoted argument form used on the command line.
    ///
    /// The argument must be exactly `'<path>'` with no content before or
    /// after the quotes. Any run of leading slashes inside the quotes is
    /// stripped before the grammar is applied, matching how clients often
    /// write `'/myproj'` for a repository served from the root.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidRepoPath` for unmatched quotes, trailing
    /// content, or an interior that violates the grammar.
    ///
    /// # Example
    ///
    /// ```
    /// use gitgate::core::types::RepoPath;
    ///
    /// assert_eq!(RepoPath::parse_quoted("'myproj'").unwrap().as_str(), "myproj");
    /// assert_eq!(RepoPath::parse_quoted("'//a/b'").unwrap().as_str(), "a/b");
    ///
    /// assert!(RepoPath::parse_quoted("myproj").is_err());
    /// assert!(RepoPath::parse_quoted("'myproj' extra").is_err());
    /// ```
    pub fn parse_quoted(arg: &str) -> Result<Self, TypeError> {
        let interior = arg
            .strip_prefix('\'')
            .and_then(|s| s.strip_suffix('\''))
            .ok_or_else(|| TypeError::InvalidRepoPath("argument must be single-quoted".into()))?;

        // A quote inside the interior means the framing above matched the
        // wrong pair, e.g. `'a'; rm -rf '/'`.
        if interior.contains('\'') {
            return Err(TypeError::InvalidRepoPath(
                "argument contains embedded quote".into(),
            ));
        }

        let stripped = interior.trim_start_matches('/');
        Self::new(stripped)
    }

    /// Validate a path against the repository path grammar.
    fn validate(path: &str) -> Result<(), TypeError> {
        if path.is_empty() {
            return Err(TypeError::InvalidRepoPath("path cannot be empty".into()));
        }

        for segment in path.split('/') {
            if segment.is_empty() {
                return Err(TypeError::InvalidRepoPath(
                    "path cannot contain empty segments".into(),
                ));
            }

            let mut chars = segment.chars();
            // First character of every segment must be alphanumeric; this is
            // what excludes `.`, `..`, and option-looking `-foo` segments.
            match chars.next() {
                Some(c) if c.is_ascii_alphanumeric() => {}
                _ => {
                    return Err(TypeError::InvalidRepoPath(
                        "path segment must start with an alphanumeric character".into(),
                    ));
                }
            }

            for c in chars {
                if !(c.is_ascii_alphanumeric() || matches!(c, '@' | '.' | '_' | '-')) {
                    return Err(TypeError::InvalidRepoPath(format!(
                        "path segment contains disallowed character '{}'",
                        c.escape_default()
                    )));
                }
            }
        }

        Ok(())
    }

    /// Get the path as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RepoPath {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<RepoPath> for String {
    fn from(path: RepoPath) -> Self {
        path.0
    }
}

impl AsRef<str> for RepoPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RepoPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An access mode probed against the policy store.
///
/// Probing order is significant (see the access resolver): write modes are
/// tried before `readonly`, and the legacy misspelling is honored but
/// reported so operators can fix their policy data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessMode {
    /// Normal write access.
    Writable,
    /// The popular misspelling of `writable`. Honored identically, but the
    /// resolver logs a warning when a grant only matches this spelling.
    WriteableLegacy,
    /// Read-only access.
    Readonly,
}

impl AccessMode {
    /// The exact spelling used in policy data for this mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessMode::Writable => "writable",
            AccessMode::WriteableLegacy => "writeable",
            AccessMode::Readonly => "readonly",
        }
    }

    /// Whether this mode authorizes write operations.
    pub fn grants_write(&self) -> bool {
        matches!(self, AccessMode::Writable | AccessMode::WriteableLegacy)
    }
}

impl std::fmt::Display for AccessMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A UTC timestamp in RFC3339 format.
///
/// # Example
///
/// ```
/// use gitgate::core::types::UtcTimestamp;
///
/// let now = UtcTimestamp::now();
/// println!("Current time: {}", now);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtcTimestamp(chrono::DateTime<chrono::Utc>);

impl UtcTimestamp {
    /// Create a timestamp for the current moment.
    pub fn now() -> Self {
        Self(chrono::Utc::now())
    }

    /// Create a timestamp from a chrono DateTime.
    pub fn from_datetime(dt: chrono::DateTime<chrono::Utc>) -> Self {
        Self(dt)
    }

    /// Get the underlying datetime.
    pub fn as_datetime(&self) -> &chrono::DateTime<chrono::Utc> {
        &self.0
    }
}

impl std::fmt::Display for UtcTimestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}
