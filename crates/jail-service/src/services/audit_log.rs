//! Audit log
//!
//! Formats moderation log entries and posts them to the configured log
//! channel. Posting is best-effort: a missing or foreign log channel, or a
//! failed send, is logged and reported as `false`.

use chrono::{DateTime, Utc};
use jail_core::{Channel, ClientResult, GuildMember, Message, OutgoingMessage, Snowflake};
use tracing::{debug, instrument, warn};

use super::context::ServiceContext;
use super::retry::retry_on_rate_limit;

/// Discord renders this as a localized full date and time
pub fn discord_timestamp(at: DateTime<Utc>) -> String {
    format!("<t:{}:F>", at.timestamp())
}

/// Entry for a member jailed by a moderator
pub fn jailed_entry(member: &GuildMember, actor: &GuildMember, at: DateTime<Utc>, reason: &str) -> String {
    format!(
        "🔒 User Jailed:\n• User: {} (ID: {})\n• Jailed By: {} (ID: {})\n• Timestamp: {}\n• Reason: {}",
        member.mention(),
        member.user_id,
        actor.username,
        actor.user_id,
        discord_timestamp(at),
        reason
    )
}

/// Entry for a member released by a moderator
pub fn released_entry(member: &GuildMember, actor: &GuildMember, at: DateTime<Utc>, reason: &str) -> String {
    format!(
        "🔓 User Released:\n• User: {} (ID: {})\n• Released by: {} (ID: {})\n• Timestamp: {}\n• Reason for releasing: {}",
        member.mention(),
        member.user_id,
        actor.username,
        actor.user_id,
        discord_timestamp(at),
        reason
    )
}

/// Entry for a fresh account jailed on join
pub fn spam_prevention_entry(member: &GuildMember, account_age_days: i64, at: DateTime<Utc>) -> String {
    format!(
        "🚫 Spam Prevention:\n• User: {} (ID: {})\n• Account Age: {} days\n• Jailed at: {}",
        member.mention(),
        member.user_id,
        account_age_days,
        discord_timestamp(at)
    )
}

/// Entry for roles stripped because the jail role was added
pub fn auto_strip_entry(member: &GuildMember, role_names: &str) -> String {
    format!(
        "🔒 Automatic Role Removal:\n• User: {} (ID: {})\n• Roles Removed: {}\n• Reason: Jail role added",
        member.mention(),
        member.user_id,
        role_names
    )
}

/// Entry for roles stripped by a jailcheck sweep
pub fn manual_enforcement_entry(member: &GuildMember, role_names: &str, actor: &GuildMember) -> String {
    format!(
        "🔒 Manual Jail Role Enforcement:\n• User: {} (ID: {})\n• Roles Removed: {}\n• Initiated by: {} (ID: {})",
        member.mention(),
        member.user_id,
        role_names,
        actor.username,
        actor.user_id
    )
}

/// Whether a log message is a jail entry with `member_id` as the jailed user
pub fn is_jail_entry_for(content: &str, member_id: Snowflake) -> bool {
    content.contains(&format!("(ID: {member_id})\n• Jailed By:"))
}

/// Audit log service
pub struct AuditLog<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AuditLog<'a> {
    /// Create a new AuditLog
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Resolve the log channel for a guild
    ///
    /// `None` when the channel does not exist or belongs to another guild.
    #[instrument(skip(self))]
    pub async fn log_channel(&self, guild_id: Snowflake) -> Option<Channel> {
        let channel_id = self.ctx.jail_config().log_channel_id;
        let client = self.ctx.client();

        let resolved = self
            .ctx
            .log_channels()
            .get_or_resolve(guild_id, || async move {
                match client.fetch_channel(channel_id).await {
                    Ok(channel) if channel.belongs_to(guild_id) => Ok(Some(channel)),
                    Ok(_) => {
                        debug!(guild_id = %guild_id, channel_id = %channel_id, "Log channel is not in this guild");
                        Ok(None)
                    }
                    Err(e) if e.is_not_found() => Ok(None),
                    Err(e) => Err(e),
                }
            })
            .await;

        match resolved {
            Ok(channel) => channel,
            Err(e) => {
                warn!(guild_id = %guild_id, error = %e, "Failed to resolve log channel");
                None
            }
        }
    }

    /// Post with the rate-limit retry discipline
    pub async fn send_with_retry(&self, channel_id: Snowflake, message: &OutgoingMessage) -> ClientResult<Message> {
        let client = self.ctx.client();
        retry_on_rate_limit(self.ctx.purge_config(), "send", || {
            client.send_message(channel_id, message)
        })
        .await
    }

    /// Post an entry to the guild's log channel
    ///
    /// Returns `true` when the entry was delivered.
    #[instrument(skip(self, message))]
    pub async fn post(&self, guild_id: Snowflake, message: OutgoingMessage) -> bool {
        let Some(channel) = self.log_channel(guild_id).await else {
            return false;
        };

        match self.send_with_retry(channel.id, &message).await {
            Ok(_) => true,
            Err(e) => {
                if e.is_not_found() {
                    self.ctx.log_channels().invalidate(guild_id);
                }
                warn!(guild_id = %guild_id, channel_id = %channel.id, error = %e, "Failed to post log entry");
                false
            }
        }
    }

    /// Links to the most recent jail entries for a member
    #[instrument(skip(self))]
    pub async fn prior_jail_links(&self, guild_id: Snowflake, member_id: Snowflake) -> Vec<String> {
        let Some(channel) = self.log_channel(guild_id).await else {
            return Vec::new();
        };
        let config = self.ctx.jail_config();

        match self
            .ctx
            .client()
            .channel_history(channel.id, config.prior_log_scan_limit)
            .await
        {
            Ok(history) => history
                .iter()
                .filter(|m| is_jail_entry_for(&m.content, member_id))
                .take(config.prior_log_links)
                .map(|m| m.jump_url(guild_id))
                .collect(),
            Err(e) => {
                warn!(guild_id = %guild_id, error = %e, "Failed to read log channel history");
                Vec::new()
            }
        }
    }
}
