//! Jail service
//!
//! Quarantines members: grants the jail role, strips their other roles, purges
//! their recent messages from the monitored categories, keeps a transcript
//! and posts a log entry. Members are processed concurrently and a failure
//! on one never affects the others.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use futures::stream::{self, StreamExt};
use jail_core::{Channel, GuildMember, OutgoingMessage, Role, Snowflake};
use tracing::{info, instrument, warn};

use crate::dto::{AlreadyJailed, JailReport, JailRequest, JailedMember, MemberFailure};

use super::audit_log::{jailed_entry, AuditLog};
use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::permission::{Moderator, PermissionService};
use super::purge::PurgeService;
use super::roles::RoleService;

/// Members handled at once inside one command
pub(crate) const MEMBER_CONCURRENCY: usize = 10;

/// Deduplicate targets preserving order and cap them at `max`
///
/// Returns the kept targets and how many were dropped by the cap.
pub fn prepare_targets(ids: &[Snowflake], max: usize) -> (Vec<Snowflake>, usize) {
    let mut seen = HashSet::new();
    let unique: Vec<Snowflake> = ids.iter().copied().filter(|id| seen.insert(*id)).collect();
    let dropped = unique.len().saturating_sub(max);
    (unique.into_iter().take(max).collect(), dropped)
}

/// Trimmed reason, or a validation error when blank
pub(crate) fn require_reason(reason: &str) -> ServiceResult<&str> {
    let reason = reason.trim();
    if reason.is_empty() {
        return Err(ServiceError::validation("A reason is required"));
    }
    Ok(reason)
}

/// Fetch targets concurrently, pairing each id with its lookup result
pub(crate) async fn fetch_targets(
    ctx: &ServiceContext,
    guild_id: Snowflake,
    targets: Vec<Snowflake>,
) -> Vec<(Snowflake, ServiceResult<GuildMember>)> {
    let client = ctx.client();
    stream::iter(targets)
        .map(|user_id| async move {
            let result = client.fetch_member(guild_id, user_id).await.map_err(ServiceError::from);
            (user_id, result)
        })
        .buffered(MEMBER_CONCURRENCY)
        .collect()
        .await
}

/// Jail service
pub struct JailService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> JailService<'a> {
    /// Create a new JailService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Jail the requested members
    ///
    /// Fails before touching anyone when the guild is not allow-listed, the
    /// actor is not a moderator, the reason is blank or the jail role is
    /// missing. Everything after that is reported per member.
    #[instrument(skip(self, request), fields(actor_id = %request.actor_id, targets = request.user_ids.len()))]
    pub async fn jail(&self, guild_id: Snowflake, request: JailRequest) -> ServiceResult<JailReport> {
        let reason = require_reason(&request.reason)?;
        let moderator = PermissionService::new(self.ctx)
            .authorize(guild_id, request.actor_id)
            .await?;
        let role_service = RoleService::new(self.ctx);
        let jail_role = role_service
            .jail_role(guild_id, Some(&moderator.guild_roles))
            .await?;

        let _permit = self.ctx.limiter().acquire(guild_id).await?;

        let config = self.ctx.jail_config();
        let (targets, dropped) = prepare_targets(&request.user_ids, config.max_targets);
        let mut report = JailReport::new(guild_id);
        report.targets_dropped = dropped;

        let jail_roles = config.jail_roles();
        let mut already = Vec::new();
        let mut pending = Vec::new();
        for (user_id, result) in fetch_targets(self.ctx, guild_id, targets).await {
            match result {
                Ok(member) if member.has_any_role(&jail_roles) => already.push(member),
                Ok(member) => pending.push(member),
                Err(e) => report.failures.push(MemberFailure::new(user_id, &e)),
            }
        }

        let audit = AuditLog::new(self.ctx);
        report.already_jailed = join_all(already.iter().map(|member| {
            let audit = &audit;
            async move {
                AlreadyJailed {
                    user_id: member.user_id,
                    username: member.username.clone(),
                    prior_log_links: audit.prior_jail_links(guild_id, member.user_id).await,
                }
            }
        }))
        .await;

        if !pending.is_empty() {
            let channels = PurgeService::new(self.ctx).purge_channels(guild_id).await;
            let now = Utc::now();

            let results: Vec<(Snowflake, ServiceResult<JailedMember>)> = stream::iter(pending)
                .map(|member| {
                    let (moderator, jail_role, channels) = (&moderator, &jail_role, &channels);
                    async move {
                        let user_id = member.user_id;
                        let result = self
                            .jail_member(member, moderator, jail_role, channels, reason, now)
                            .await;
                        (user_id, result)
                    }
                })
                .buffer_unordered(MEMBER_CONCURRENCY)
                .collect()
                .await;

            for (user_id, result) in results {
                match result {
                    Ok(jailed) => report.jailed.push(jailed),
                    Err(e) => {
                        warn!(guild_id = %guild_id, member_id = %user_id, error = %e, "Failed to jail member");
                        role_service.invalidate_on_missing(guild_id, &e);
                        report.failures.push(MemberFailure::new(user_id, &e));
                    }
                }
            }
            report.jailed.sort_by_key(|m| m.user_id);
        }

        info!(
            guild_id = %guild_id,
            actor_id = %request.actor_id,
            jailed = report.jailed.len(),
            already_jailed = report.already_jailed.len(),
            failures = report.failures.len(),
            "Jail command finished"
        );
        Ok(report)
    }

    /// Jail one member that holds no jail role yet
    #[instrument(skip_all, fields(guild_id = %member.guild_id, member_id = %member.user_id))]
    async fn jail_member(
        &self,
        member: GuildMember,
        moderator: &Moderator,
        jail_role: &Role,
        channels: &[Channel],
        reason: &str,
        now: DateTime<Utc>,
    ) -> ServiceResult<JailedMember> {
        let audit_reason = format!("Jailed by {}: {reason}", moderator.member.username);

        // Jail role first: a failed strip must not leave the member roleless
        self.ctx
            .client()
            .grant_role(member.guild_id, member.user_id, jail_role.id, &audit_reason)
            .await?;
        let roles_removed = RoleService::new(self.ctx)
            .strip_roles(&member, &[jail_role.id], &audit_reason)
            .await?;

        let purged = PurgeService::new(self.ctx)
            .purge_member(member.user_id, channels)
            .await;

        let transcript = match self.ctx.transcripts().write(member.user_id, &purged, now).await {
            Ok(transcript) => transcript,
            Err(e) => {
                warn!(member_id = %member.user_id, error = %e, "Failed to write transcript");
                None
            }
        };

        let mut entry = OutgoingMessage::text(jailed_entry(&member, &moderator.member, now, reason));
        if let Some(transcript) = &transcript {
            entry = entry.with_attachment(transcript.attachment());
        }
        let logged = AuditLog::new(self.ctx).post(member.guild_id, entry).await;

        info!(
            roles_removed = roles_removed.len(),
            messages_purged = purged.len(),
            "Member jailed"
        );

        Ok(JailedMember {
            user_id: member.user_id,
            username: member.username,
            roles_removed,
            messages_purged: purged.len(),
            transcript: transcript.map(|t| t.path.display().to_string()),
            logged,
        })
    }
}
