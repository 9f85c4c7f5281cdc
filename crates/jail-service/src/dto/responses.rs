//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize` for JSON output.
//! Snowflake IDs are serialized as strings for JavaScript compatibility.
//! Each command report can also render the chat reply the host runtime posts.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use jail_core::Snowflake;
use serde::Serialize;
use uuid::Uuid;

use crate::services::ServiceError;

// ============================================================================
// Common Response Types
// ============================================================================

/// Per-member failure inside a batch
#[derive(Debug, Clone, Serialize)]
pub struct MemberFailure {
    pub user_id: Snowflake,
    pub code: String,
    pub message: String,
}

impl MemberFailure {
    pub fn new(user_id: Snowflake, err: &ServiceError) -> Self {
        Self {
            user_id,
            code: err.error_code().to_string(),
            message: err.to_string(),
        }
    }

    fn reply_line(&self, action: &str) -> String {
        if self.code == "UNKNOWN_MEMBER" {
            format!("<@{}> is not a member of this guild.", self.user_id)
        } else {
            format!("Failed to {action} <@{}>: {}", self.user_id, self.message)
        }
    }
}

// ============================================================================
// Jail
// ============================================================================

/// A member this invocation jailed
#[derive(Debug, Clone, Serialize)]
pub struct JailedMember {
    pub user_id: Snowflake,
    pub username: String,
    pub roles_removed: Vec<Snowflake>,
    pub messages_purged: usize,
    /// Transcript file on disk, when messages were captured
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcript: Option<String>,
    pub logged: bool,
}

/// A target that already held a jail role
#[derive(Debug, Clone, Serialize)]
pub struct AlreadyJailed {
    pub user_id: Snowflake,
    pub username: String,
    pub prior_log_links: Vec<String>,
}

/// Outcome of a jail command
#[derive(Debug, Clone, Serialize)]
pub struct JailReport {
    pub invocation_id: Uuid,
    pub guild_id: Snowflake,
    pub jailed: Vec<JailedMember>,
    pub already_jailed: Vec<AlreadyJailed>,
    pub failures: Vec<MemberFailure>,
    /// Targets dropped by the per-command cap
    pub targets_dropped: usize,
}

impl JailReport {
    pub fn new(guild_id: Snowflake) -> Self {
        Self {
            invocation_id: Uuid::new_v4(),
            guild_id,
            jailed: Vec::new(),
            already_jailed: Vec::new(),
            failures: Vec::new(),
            targets_dropped: 0,
        }
    }

    /// Chat reply summarizing the run
    pub fn reply(&self) -> String {
        let mut lines = Vec::new();
        for member in &self.already_jailed {
            let mut line = format!("<@{}> is already jailed.", member.user_id);
            if !member.prior_log_links.is_empty() {
                line.push_str("\nPrevious jail logs: ");
                line.push_str(&member.prior_log_links.join("\n"));
            }
            lines.push(line);
        }
        lines.extend(self.failures.iter().map(|f| f.reply_line("jail")));
        if !self.jailed.is_empty() {
            lines.push("Jailed.".to_string());
        }
        if lines.is_empty() {
            lines.push("Nobody was jailed.".to_string());
        }
        lines.join("\n")
    }
}

// ============================================================================
// Unjail
// ============================================================================

/// A member this invocation released
#[derive(Debug, Clone, Serialize)]
pub struct ReleasedMember {
    pub user_id: Snowflake,
    pub username: String,
    pub roles_removed: Vec<Snowflake>,
    pub default_role_granted: bool,
    pub logged: bool,
}

/// Outcome of an unjail command
#[derive(Debug, Clone, Serialize)]
pub struct UnjailReport {
    pub invocation_id: Uuid,
    pub guild_id: Snowflake,
    pub released: Vec<ReleasedMember>,
    /// Targets that held no jail role; nothing was done to them
    pub not_jailed: Vec<Snowflake>,
    pub failures: Vec<MemberFailure>,
    pub targets_dropped: usize,
}

impl UnjailReport {
    pub fn new(guild_id: Snowflake) -> Self {
        Self {
            invocation_id: Uuid::new_v4(),
            guild_id,
            released: Vec::new(),
            not_jailed: Vec::new(),
            failures: Vec::new(),
            targets_dropped: 0,
        }
    }

    pub fn reply(&self) -> String {
        if self.released.is_empty() && self.failures.is_empty() {
            return "No specified users are currently jailed.".to_string();
        }
        let mut lines: Vec<String> = self
            .released
            .iter()
            .map(|m| format!("<@{}> has been unjailed.", m.user_id))
            .collect();
        lines.extend(self.failures.iter().map(|f| f.reply_line("unjail")));
        lines.join("\n")
    }
}

// ============================================================================
// Jailcheck
// ============================================================================

/// Outcome of a jail consistency sweep
#[derive(Debug, Clone, Serialize)]
pub struct JailCheckReport {
    pub invocation_id: Uuid,
    pub guild_id: Snowflake,
    /// Holders of the jail role inspected
    pub members_checked: usize,
    /// Holders that had extra roles removed
    pub members_processed: usize,
    pub roles_removed: usize,
    pub failures: usize,
}

impl JailCheckReport {
    pub fn new(guild_id: Snowflake) -> Self {
        Self {
            invocation_id: Uuid::new_v4(),
            guild_id,
            members_checked: 0,
            members_processed: 0,
            roles_removed: 0,
            failures: 0,
        }
    }

    pub fn reply(&self) -> String {
        format!(
            "Jail role check complete.\nMembers Processed: {}\nTotal Roles Removed: {}",
            self.members_processed, self.roles_removed
        )
    }
}

// ============================================================================
// Profile scan
// ============================================================================

/// A member whose name or profile matched suspicious keywords
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuspiciousProfile {
    pub user_id: Snowflake,
    pub username: String,
    /// Matched keywords, upper-case, sorted, no duplicates
    pub keywords: Vec<String>,
}

/// How the scan report reached the guild
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportDelivery {
    /// Nothing flagged, nothing posted
    NotNeeded,
    Attachment,
    /// File upload failed; a truncated text version was posted
    Inline,
    Failed,
}

/// Outcome of a profile keyword scan
#[derive(Debug, Clone, Serialize)]
pub struct ProfileScanReport {
    pub invocation_id: Uuid,
    pub guild_id: Snowflake,
    pub members_scanned: usize,
    pub flagged: Vec<SuspiciousProfile>,
    /// Channel the report was posted to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivered_to: Option<Snowflake>,
    pub delivery: ReportDelivery,
}

impl ProfileScanReport {
    pub fn new(guild_id: Snowflake) -> Self {
        Self {
            invocation_id: Uuid::new_v4(),
            guild_id,
            members_scanned: 0,
            flagged: Vec::new(),
            delivered_to: None,
            delivery: ReportDelivery::NotNeeded,
        }
    }

    /// Body of `suspicious_profiles_report.txt`
    pub fn report_text(&self) -> String {
        let mut out = String::from("Found users with suspicious keywords in their profile:\n");
        for profile in &self.flagged {
            let _ = writeln!(
                out,
                "• {} (ID: {}): {}",
                profile.username,
                profile.user_id,
                profile.keywords.join(", ")
            );
        }
        out
    }

    pub fn reply(&self) -> String {
        if self.flagged.is_empty() {
            "Scan complete. No users found with suspicious keywords.".to_string()
        } else {
            format!(
                "Scan complete. Found {} user(s) with suspicious keywords. Report attached.",
                self.flagged.len()
            )
        }
    }
}

// ============================================================================
// Text commands
// ============================================================================

/// Report of whichever command a text command ran
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "command", content = "report", rename_all = "snake_case")]
pub enum CommandOutcome {
    Jail(JailReport),
    Unjail(UnjailReport),
    Jailcheck(JailCheckReport),
    ScanProfiles(ProfileScanReport),
}

impl CommandOutcome {
    pub fn reply(&self) -> String {
        match self {
            Self::Jail(r) => r.reply(),
            Self::Unjail(r) => r.reply(),
            Self::Jailcheck(r) => r.reply(),
            Self::ScanProfiles(r) => r.reply(),
        }
    }
}

/// Response to a text command
#[derive(Debug, Clone, Serialize)]
pub struct CommandResponse {
    /// Text the host runtime posts back in the invoking channel
    pub reply: String,
    #[serde(flatten)]
    pub outcome: CommandOutcome,
}

impl From<CommandOutcome> for CommandResponse {
    fn from(outcome: CommandOutcome) -> Self {
        Self {
            reply: outcome.reply(),
            outcome,
        }
    }
}

// ============================================================================
// Health Responses
// ============================================================================

/// Basic health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub checks: ReadinessChecks,
}

/// Configuration summary reported by the readiness probe
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessChecks {
    pub allowed_guilds: usize,
    pub purge_categories: usize,
    pub transcript_dir: String,
    pub auth_enabled: bool,
}

impl ReadinessResponse {
    pub fn ready(checks: ReadinessChecks) -> Self {
        let status = if checks.allowed_guilds > 0 { "ready" } else { "not_ready" };
        Self {
            status: status.to_string(),
            timestamp: Utc::now(),
            checks,
        }
    }
}
