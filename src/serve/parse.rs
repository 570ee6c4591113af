//! serve::parse
//!
//! Command parsing for the gateway.
//!
//! The raw `SSH_ORIGINAL_COMMAND` string is untrusted. Parsing does three
//! things before anything else looks at it:
//!
//! 1. Rejects embedded newlines, which would smuggle a second command
//!    through the forced-command mechanism.
//! 2. Splits verb from argument on the first whitespace run, normalizing
//!    the two-token `git <subverb>` form to a single verb.
//! 3. Checks the verb against two fixed, disjoint enumerations (read and
//!    write). Anything else is denied.
//!
//! Input with no whitespace at all is not a verb+path command; the parser
//! reports that as `Ok(None)` and the caller treats it as benign
//! non-command input rather than a denial.

use super::ServeError;

/// The read-only verbs the gateway recognizes.
pub const COMMANDS_READONLY: [&str; 4] = [
    "git-upload-pack",
    "git upload-pack",
    "git-upload-archive",
    "git upload-archive",
];

/// The write verbs the gateway recognizes.
pub const COMMANDS_WRITE: [&str; 2] = ["git-receive-pack", "git receive-pack"];

/// Whether a verb reads from or writes to the repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerbKind {
    Read,
    Write,
}

/// A recognized verb plus its still-unvalidated argument string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayCommand {
    /// The normalized verb, e.g. `git-upload-pack` or `git upload-pack`.
    pub verb: String,
    /// Read or write, per the verb enumerations.
    pub kind: VerbKind,
    /// Everything after the verb. Not yet path-validated.
    pub args: String,
}

/// Parse a raw command string.
///
/// Returns `Ok(None)` when the input does not have the verb+argument shape
/// at all (no whitespace); this is the only non-error way out that is not a
/// [`GatewayCommand`].
///
/// # Errors
///
/// - [`ServeError::CommandMayNotContainNewline`] for any embedded newline
/// - [`ServeError::UnknownCommand`] for unrecognized verbs, including a
///   `git` compound with no argument after the subverb
pub fn parse(command: &str) -> Result<Option<GatewayCommand>, ServeError> {
    if command.contains('\n') {
        return Err(ServeError::CommandMayNotContainNewline);
    }

    let Some((verb, rest)) = split_first_word(command) else {
        return Ok(None);
    };

    let (verb, args) = if verb == "git" {
        // All known "git foo" commands take one argument, so the compound
        // form requires both a subverb and something after it.
        let Some((subverb, rest)) = split_first_word(rest) else {
            return Err(ServeError::UnknownCommand);
        };
        (format!("git {}", subverb), rest)
    } else {
        (verb.to_string(), rest)
    };

    let kind = if COMMANDS_WRITE.contains(&verb.as_str()) {
        VerbKind::Write
    } else if COMMANDS_READONLY.contains(&verb.as_str()) {
        VerbKind::Read
    } else {
        return Err(ServeError::UnknownCommand);
    };

    Ok(Some(GatewayCommand {
        verb,
        kind,
        args: args.to_string(),
    }))
}

/// Split off the first whitespace-delimited word, discarding the
/// whitespace run that follows it. Returns `None` when there is no word
/// followed by further content.
fn split_first_word(s: &str) -> Option<(&str, &str)> {
    let s = s.trim_start();
    let split_at = s.find(char::is_whitespace)?;
    let (head, rest) = s.split_at(split_at);
    let rest = rest.trim_start();
    if rest.is_empty() {
        return None;
    }
    Some((head, rest))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_verb_parses() {
        let cmd = parse("git-upload-pack 'myproj'").unwrap().unwrap();
        assert_eq!(cmd.verb, "git-upload-pack");
        assert_eq!(cmd.kind, VerbKind::Read);
        assert_eq!(cmd.args, "'myproj'");
    }

    #[test]
    fn write_verb_parses() {
        let cmd = parse("git-receive-pack 'myproj'").unwrap().unwrap();
        assert_eq!(cmd.verb, "git-receive-pack");
        assert_eq!(cmd.kind, VerbKind::Write);
    }

    #[test]
    fn compound_verb_normalized() {
        let cmd = parse("git upload-pack 'myproj'").unwrap().unwrap();
        assert_eq!(cmd.verb, "git upload-pack");
        assert_eq!(cmd.kind, VerbKind::Read);
        assert_eq!(cmd.args, "'myproj'");

        let cmd = parse("git receive-pack 'myproj'").unwrap().unwrap();
        assert_eq!(cmd.verb, "git receive-pack");
        assert_eq!(cmd.kind, VerbKind::Write);
    }

    #[test]
    fn whitespace_runs_are_collapsed() {
        let cmd = parse("git-upload-pack    'myproj'").unwrap().unwrap();
        assert_eq!(cmd.args, "'myproj'");

        let cmd = parse("  git   upload-pack   'myproj'").unwrap().unwrap();
        assert_eq!(cmd.verb, "git upload-pack");
        assert_eq!(cmd.args, "'myproj'");
    }

    #[test]
    fn newline_rejected_before_anything_else() {
        assert!(matches!(
            parse("git-upload-pack 'a'\ngit-receive-pack 'b'"),
            Err(ServeError::CommandMayNotContainNewline)
        ));
        // Even an otherwise shapeless input is rejected on newline first
        assert!(matches!(
            parse("\n"),
            Err(ServeError::CommandMayNotContainNewline)
        ));
    }

    #[test]
    fn no_whitespace_is_not_a_command() {
        assert_eq!(parse("git-upload-pack").unwrap(), None);
        assert_eq!(parse("deadbeef").unwrap(), None);
        assert_eq!(parse("").unwrap(), None);
        assert_eq!(parse("   ").unwrap(), None);
        // a lone "git" has no subverb to split; same shape
        assert_eq!(parse("git").unwrap(), None);
        assert_eq!(parse("git   ").unwrap(), None);
    }

    #[test]
    fn bare_compound_rejected() {
        // "git foo" with nothing after the subverb is a malformed compound
        assert!(matches!(
            parse("git upload-pack"),
            Err(ServeError::UnknownCommand)
        ));
    }

    #[test]
    fn unknown_verbs_rejected() {
        assert!(matches!(
            parse("git-evil-pack 'myproj'"),
            Err(ServeError::UnknownCommand)
        ));
        assert!(matches!(
            parse("rm -rf /"),
            Err(ServeError::UnknownCommand)
        ));
        assert!(matches!(
            parse("git evil 'myproj'"),
            Err(ServeError::UnknownCommand)
        ));
        // enumeration matching is exact, not prefix
        assert!(matches!(
            parse("git-upload-packx 'myproj'"),
            Err(ServeError::UnknownCommand)
        ));
    }

    #[test]
    fn verb_enumerations_are_disjoint() {
        for verb in COMMANDS_READONLY {
            assert!(!COMMANDS_WRITE.contains(&verb));
        }
    }
}
