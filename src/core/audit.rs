//! core::audit
//!
//! Audit journal for serve decisions.
//!
//! Every inbound command produces exactly one record: who asked, what verb
//! and path they attempted, and how the gateway disposed of the request.
//! Denials carry the error tag, so operators can distinguish "not allowed"
//! from "allowed but provisioning failed" without re-reading raw client
//! input.
//!
//! # Crash Safety
//!
//! Records are appended as single JSON lines and flushed with fsync before
//! `append` returns. A crash mid-invocation leaves the journal with every
//! record that was acknowledged, and a torn trailing line at worst.
//!
//! # Storage
//!
//! - `<audit_dir>/serve.jsonl` - append-only journal, one JSON object per line
//!
//! # Usage
//!
//! ```no_run
//! use gitgate::core::audit::{AuditLog, AuditRecord, Disposition};
//! use std::path::Path;
//!
//! let mut log = AuditLog::open(Path::new("/srv/git/gitgate/audit")).unwrap();
//! log.append(&AuditRecord::new(
//!     "alice",
//!     Some("git-upload-pack".into()),
//!     Some("myproj".into()),
//!     Disposition::Served {
//!         mode: "readonly".into(),
//!         provisioned: false,
//!     },
//! )).unwrap();
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::core::types::UtcTimestamp;

/// Errors from audit journal operations.
#[derive(Debug, Error)]
pub enum AuditError {
    /// I/O error reading or writing the journal.
    #[error("audit i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("audit json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// How the gateway disposed of one inbound command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Disposition {
    /// The command was authorized and rewritten for handoff.
    Served {
        /// Policy spelling of the access mode that granted the request.
        mode: String,
        /// Whether this invocation created the repository on disk.
        provisioned: bool,
    },
    /// The command was rejected; `error` is the stable error tag.
    Denied { error: String },
    /// The input was not a verb+path command; ignored as benign.
    Ignored,
}

/// One audit journal record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRecord {
    /// Unique record id.
    pub id: String,
    /// When the decision was made.
    pub timestamp: UtcTimestamp,
    /// The authenticated user the forced command ran for.
    pub user: String,
    /// The verb that was attempted, when parsing got that far.
    pub verb: Option<String>,
    /// The validated path that was attempted, when validation got that far.
    pub path: Option<String>,
    /// The outcome.
    pub disposition: Disposition,
}

impl AuditRecord {
    /// Build a record stamped with a fresh id and the current time.
    pub fn new(
        user: impl Into<String>,
        verb: Option<String>,
        path: Option<String>,
        disposition: Disposition,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            timestamp: UtcTimestamp::now(),
            user: user.into(),
            verb,
            path,
            disposition,
        }
    }
}

/// Append-only audit journal.
#[derive(Debug)]
pub struct AuditLog {
    path: PathBuf,
    file: File,
}

impl AuditLog {
    /// Open (creating if necessary) the journal under `audit_dir`.
    pub fn open(audit_dir: &Path) -> Result<Self, AuditError> {
        fs::create_dir_all(audit_dir)?;
        let path = audit_dir.join("serve.jsonl");
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self { path, file })
    }

    /// Path of the journal file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record, fsynced before returning.
    pub fn append(&mut self, record: &AuditRecord) -> Result<(), AuditError> {
        let mut line = serde_json::to_vec(record)?;
        line.push(b'\n');
        self.file.write_all(&line)?;
        self.file.flush()?;
        self.file.sync_data()?;
        Ok(())
    }

    /// Read every record back, skipping a torn trailing line if present.
    pub fn read_all(audit_dir: &Path) -> Result<Vec<AuditRecord>, AuditError> {
        let path = audit_dir.join("serve.jsonl");
        let file = File::open(&path)?;
        let reader = BufReader::new(file);
        let mut records = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str(&line) {
                Ok(record) => records.push(record),
                // A torn final line from a crash is tolerated; anything
                // else in the middle would also land here, which read-side
                // tooling accepts over refusing the whole journal.
                Err(_) => continue,
            }
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record(user: &str, disposition: Disposition) -> AuditRecord {
        AuditRecord::new(
            user,
            Some("git-upload-pack".into()),
            Some("myproj".into()),
            disposition,
        )
    }

    #[test]
    fn open_creates_directory_and_file() {
        let temp = TempDir::new().unwrap();
        let audit_dir = temp.path().join("nested").join("audit");

        let log = AuditLog::open(&audit_dir).expect("open");
        assert!(log.path().exists());
        assert!(log.path().ends_with("serve.jsonl"));
    }

    #[test]
    fn append_then_read_roundtrip() {
        let temp = TempDir::new().unwrap();
        let mut log = AuditLog::open(temp.path()).expect("open");

        let served = record(
            "alice",
            Disposition::Served {
                mode: "writable".into(),
                provisioned: true,
            },
        );
        let denied = record(
            "mallory",
            Disposition::Denied {
                error: "read-access-denied".into(),
            },
        );
        log.append(&served).expect("append served");
        log.append(&denied).expect("append denied");

        let records = AuditLog::read_all(temp.path()).expect("read");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], served);
        assert_eq!(records[1], denied);
    }

    #[test]
    fn append_survives_reopen() {
        let temp = TempDir::new().unwrap();
        {
            let mut log = AuditLog::open(temp.path()).expect("open");
            log.append(&record("alice", Disposition::Ignored))
                .expect("append");
        }
        {
            let mut log = AuditLog::open(temp.path()).expect("reopen");
            log.append(&record("bob", Disposition::Ignored))
                .expect("append");
        }

        let records = AuditLog::read_all(temp.path()).expect("read");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].user, "alice");
        assert_eq!(records[1].user, "bob");
    }

    #[test]
    fn torn_trailing_line_is_skipped() {
        let temp = TempDir::new().unwrap();
        let mut log = AuditLog::open(temp.path()).expect("open");
        log.append(&record("alice", Disposition::Ignored))
            .expect("append");

        // Simulate a crash mid-write
        let mut file = OpenOptions::new()
            .append(true)
            .open(temp.path().join("serve.jsonl"))
            .unwrap();
        file.write_all(b"{\"id\":\"trunc").unwrap();

        let records = AuditLog::read_all(temp.path()).expect("read");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].user, "alice");
    }

    #[test]
    fn disposition_tags_are_stable() {
        let json = serde_json::to_string(&Disposition::Denied {
            error: "unsafe-arguments".into(),
        })
        .unwrap();
        assert!(json.contains("\"kind\":\"denied\""));

        let json = serde_json::to_string(&Disposition::Ignored).unwrap();
        assert!(json.contains("\"kind\":\"ignored\""));
    }
}
