//! serve command - gate one SSH-delivered git command and hand off

use std::os::unix::process::CommandExt;
use std::process::Command as ProcessCommand;

use anyhow::{Context as _, Result};

use crate::cli::Context;
use crate::core::audit::{AuditLog, AuditRecord, Disposition};
use crate::core::config::Config;
use crate::core::types::RepoPath;
use crate::policy::FilePolicy;
use crate::serve::{self, parse, ServeError, ServeOutcome};
use crate::ui::output;

/// Serve the command in `$SSH_ORIGINAL_COMMAND` for `user`.
///
/// On success this replaces the current process image with
/// `git shell -c <rewritten>`, so it only returns on failure or when there
/// was nothing to serve. The environment marker `GITGATE_USER` identifies
/// the authenticated user to hooks run by the spawned process.
pub fn serve(ctx: &Context, user: &str) -> Result<()> {
    let config =
        Config::load(ctx.config_path.as_deref()).context("failed to load configuration")?;

    let Some(raw) = std::env::var_os("SSH_ORIGINAL_COMMAND") else {
        // Interactive login attempt or misconfigured authorized_keys;
        // benign either way.
        output::debug(
            "no SSH_ORIGINAL_COMMAND in environment; nothing to serve",
            ctx.verbosity,
        );
        return Ok(());
    };
    let raw = raw.to_string_lossy().into_owned();
    output::debug(format!("got command {raw:?}"), ctx.verbosity);

    let policy = FilePolicy::new(config.clone());
    let result = serve::serve(&config, &policy, user, &raw, ctx.verbosity);

    audit(ctx, &config, user, &raw, &result);

    match result {
        Ok(ServeOutcome::Handoff(handoff)) => {
            output::debug(format!("serving {}", handoff.command), ctx.verbosity);
            // exec only returns on failure
            let err = ProcessCommand::new("git")
                .arg("shell")
                .arg("-c")
                .arg(&handoff.command)
                .env("GITGATE_USER", user)
                .exec();
            Err(anyhow::Error::new(err).context("cannot execute git-shell"))
        }
        Ok(ServeOutcome::Ignored) => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Record the decision in the audit journal.
///
/// Best-effort: a serve decision already made is not reversed because the
/// journal could not be written, but the failure is surfaced on stderr.
fn audit(
    ctx: &Context,
    config: &Config,
    user: &str,
    raw: &str,
    result: &Result<ServeOutcome, ServeError>,
) {
    let disposition = match result {
        Ok(ServeOutcome::Handoff(handoff)) => Disposition::Served {
            mode: handoff.mode.as_str().to_string(),
            provisioned: handoff.provisioned,
        },
        Ok(ServeOutcome::Ignored) => Disposition::Ignored,
        Err(e) => Disposition::Denied {
            error: e.kind().to_string(),
        },
    };
    let (verb, path) = attempted(raw);
    let record = AuditRecord::new(user, verb, path, disposition);

    let appended = AuditLog::open(&config.audit_dir).and_then(|mut log| log.append(&record));
    if let Err(e) = appended {
        output::warn(format!("audit journal write failed: {e}"), ctx.verbosity);
    }
}

/// Best-effort extraction of the attempted verb and path for the audit
/// record. Only values that passed validation are recorded; raw
/// unvalidated input stays out of the journal.
fn attempted(raw: &str) -> (Option<String>, Option<String>) {
    match parse::parse(raw) {
        Ok(Some(cmd)) => {
            let path = RepoPath::parse_quoted(&cmd.args)
                .ok()
                .map(|p| p.as_str().to_string());
            (Some(cmd.verb), path)
        }
        _ => (None, None),
    }
}
