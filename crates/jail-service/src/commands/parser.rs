//! Text command parser
//!
//! Grammar:
//!
//! ```text
//! [prefix] jail   <user>... [reason:|reason=] <text>
//! [prefix] unjail <user>... [reason:|reason=] <text>
//! [prefix] jailcheck
//! [prefix] scanprofiles
//! ```
//!
//! A user is a mention (`<@id>`, `<@!id>`) or a raw id. Without a `reason:`
//! marker, leading users are taken greedily and the rest is the reason.

use jail_core::Snowflake;
use thiserror::Error;

/// Prefixes accepted besides the configured one
const BUILTIN_PREFIXES: &[&str] = &["[p]", "!", ".", "?"];

const REASON_MARKERS: &[&str] = &["reason:", "reason="];

/// A parsed moderation command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Jail { targets: Vec<Snowflake>, reason: String },
    Unjail { targets: Vec<Snowflake>, reason: String },
    JailCheck,
    ScanProfiles,
}

impl Command {
    /// Command name as typed
    pub fn name(&self) -> &'static str {
        match self {
            Self::Jail { .. } => "jail",
            Self::Unjail { .. } => "unjail",
            Self::JailCheck => "jailcheck",
            Self::ScanProfiles => "scanprofiles",
        }
    }
}

/// Parse errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Empty command")]
    Empty,

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Not a user mention or id: {0}")]
    InvalidTarget(String),

    #[error("At least one user is required")]
    NoTargets,

    #[error("A reason is required")]
    MissingReason,
}

/// Parse a user mention or raw id
pub fn parse_target(token: &str) -> Option<Snowflake> {
    let raw = token
        .strip_prefix("<@")
        .and_then(|rest| rest.strip_suffix('>'))
        .map_or(token, |inner| inner.strip_prefix('!').unwrap_or(inner));
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Snowflake::parse(raw).ok()
}

fn strip_prefix<'a>(input: &'a str, configured: &str) -> &'a str {
    if !configured.is_empty() {
        if let Some(rest) = input.strip_prefix(configured) {
            return rest;
        }
    }
    BUILTIN_PREFIXES
        .iter()
        .find_map(|p| input.strip_prefix(p))
        .unwrap_or(input)
}

/// Split at the first reason marker, case-insensitively
fn split_reason(args: &str) -> Option<(&str, &str)> {
    let lower = args.to_ascii_lowercase();
    REASON_MARKERS
        .iter()
        .filter_map(|marker| lower.find(marker).map(|at| (at, marker.len())))
        .min_by_key(|(at, _)| *at)
        .map(|(at, len)| (&args[..at], &args[at + len..]))
}

fn parse_targets_and_reason(args: &str) -> Result<(Vec<Snowflake>, String), ParseError> {
    let (targets, reason) = if let Some((head, reason)) = split_reason(args) {
        let targets = head
            .split_whitespace()
            .map(|t| parse_target(t).ok_or_else(|| ParseError::InvalidTarget(t.to_string())))
            .collect::<Result<Vec<_>, _>>()?;
        (targets, reason.trim().to_string())
    } else {
        let tokens: Vec<&str> = args.split_whitespace().collect();
        let targets: Vec<Snowflake> = tokens.iter().map_while(|t| parse_target(t)).collect();
        let reason = tokens[targets.len()..].join(" ");
        (targets, reason)
    };

    if targets.is_empty() {
        return Err(ParseError::NoTargets);
    }
    if reason.is_empty() {
        return Err(ParseError::MissingReason);
    }
    Ok((targets, reason))
}

/// Parse a chat message into a command
pub fn parse_command(input: &str, prefix: &str) -> Result<Command, ParseError> {
    let body = strip_prefix(input.trim(), prefix).trim_start();
    let (name, args) = body.split_once(char::is_whitespace).unwrap_or((body, ""));
    if name.is_empty() {
        return Err(ParseError::Empty);
    }

    match name.to_ascii_lowercase().as_str() {
        "jail" => {
            let (targets, reason) = parse_targets_and_reason(args)?;
            Ok(Command::Jail { targets, reason })
        }
        "unjail" => {
            let (targets, reason) = parse_targets_and_reason(args)?;
            Ok(Command::Unjail { targets, reason })
        }
        "jailcheck" => Ok(Command::JailCheck),
        "scanprofiles" => Ok(Command::ScanProfiles),
        other => Err(ParseError::UnknownCommand(other.to_string())),
    }
}
