//! Unjail service
//!
//! Releases jailed members back to the default member role. Targets that
//! hold no jail role are reported and left alone.

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use jail_core::{GuildMember, OutgoingMessage, Snowflake};
use tracing::{info, instrument, warn};

use crate::dto::{MemberFailure, ReleasedMember, UnjailReport, UnjailRequest};

use super::audit_log::{released_entry, AuditLog};
use super::context::ServiceContext;
use super::error::ServiceResult;
use super::jail::{fetch_targets, prepare_targets, require_reason, MEMBER_CONCURRENCY};
use super::permission::{Moderator, PermissionService};
use super::roles::RoleService;

/// Unjail service
pub struct UnjailService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> UnjailService<'a> {
    /// Create a new UnjailService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Release the requested members
    #[instrument(skip(self, request), fields(actor_id = %request.actor_id, targets = request.user_ids.len()))]
    pub async fn unjail(&self, guild_id: Snowflake, request: UnjailRequest) -> ServiceResult<UnjailReport> {
        let reason = require_reason(&request.reason)?;
        let moderator = PermissionService::new(self.ctx)
            .authorize(guild_id, request.actor_id)
            .await?;
        RoleService::new(self.ctx)
            .jail_role(guild_id, Some(&moderator.guild_roles))
            .await?;

        let _permit = self.ctx.limiter().acquire(guild_id).await?;

        let config = self.ctx.jail_config();
        let (targets, dropped) = prepare_targets(&request.user_ids, config.max_targets);
        let mut report = UnjailReport::new(guild_id);
        report.targets_dropped = dropped;

        let jail_roles = config.jail_roles();
        let mut jailed = Vec::new();
        for (user_id, result) in fetch_targets(self.ctx, guild_id, targets).await {
            match result {
                Ok(member) if member.has_any_role(&jail_roles) => jailed.push(member),
                Ok(_) => report.not_jailed.push(user_id),
                Err(e) => report.failures.push(MemberFailure::new(user_id, &e)),
            }
        }

        let now = Utc::now();
        let results: Vec<(Snowflake, ServiceResult<ReleasedMember>)> = stream::iter(jailed)
            .map(|member| {
                let moderator = &moderator;
                async move {
                    let user_id = member.user_id;
                    (user_id, self.release_member(member, moderator, reason, now).await)
                }
            })
            .buffer_unordered(MEMBER_CONCURRENCY)
            .collect()
            .await;

        for (user_id, result) in results {
            match result {
                Ok(released) => report.released.push(released),
                Err(e) => {
                    warn!(guild_id = %guild_id, member_id = %user_id, error = %e, "Failed to release member");
                    report.failures.push(MemberFailure::new(user_id, &e));
                }
            }
        }
        report.released.sort_by_key(|m| m.user_id);

        info!(
            guild_id = %guild_id,
            actor_id = %request.actor_id,
            released = report.released.len(),
            not_jailed = report.not_jailed.len(),
            failures = report.failures.len(),
            "Unjail command finished"
        );
        Ok(report)
    }

    #[instrument(skip_all, fields(guild_id = %member.guild_id, member_id = %member.user_id))]
    async fn release_member(
        &self,
        member: GuildMember,
        moderator: &Moderator,
        reason: &str,
        now: DateTime<Utc>,
    ) -> ServiceResult<ReleasedMember> {
        let default_role = self.ctx.jail_config().default_member_role_id;
        let audit_reason = format!("Released by {}: {reason}", moderator.member.username);

        let roles_removed = RoleService::new(self.ctx)
            .strip_roles(&member, &[default_role], &audit_reason)
            .await?;

        let default_role_granted = !member.has_role(default_role);
        if default_role_granted {
            self.ctx
                .client()
                .grant_role(member.guild_id, member.user_id, default_role, &audit_reason)
                .await?;
        }

        let entry = released_entry(&member, &moderator.member, now, reason);
        let logged = AuditLog::new(self.ctx)
            .post(member.guild_id, OutgoingMessage::text(entry))
            .await;

        info!(roles_removed = roles_removed.len(), "Member released");

        Ok(ReleasedMember {
            user_id: member.user_id,
            username: member.username,
            roles_removed,
            default_role_granted,
            logged,
        })
    }
}
