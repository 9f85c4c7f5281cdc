//! Jailcheck service
//!
//! Sweeps every holder of the jail role and removes roles they should not
//! have. Per-member failures are logged and counted.

use futures::stream::{self, StreamExt};
use jail_core::{role_names, GuildMember, OutgoingMessage, Snowflake};
use tracing::{info, instrument, warn};

use crate::dto::{ActorRequest, JailCheckReport};

use super::audit_log::{manual_enforcement_entry, AuditLog};
use super::context::ServiceContext;
use super::error::ServiceResult;
use super::jail::MEMBER_CONCURRENCY;
use super::permission::{Moderator, PermissionService};
use super::roles::RoleService;

/// Jailcheck service
pub struct JailCheckService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> JailCheckService<'a> {
    /// Create a new JailCheckService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Enforce the jail invariant on every current holder of the jail role
    #[instrument(skip(self, request), fields(actor_id = %request.actor_id))]
    pub async fn jailcheck(&self, guild_id: Snowflake, request: ActorRequest) -> ServiceResult<JailCheckReport> {
        let moderator = PermissionService::new(self.ctx)
            .authorize(guild_id, request.actor_id)
            .await?;
        let jail_role = RoleService::new(self.ctx)
            .jail_role(guild_id, Some(&moderator.guild_roles))
            .await?;

        let holders: Vec<GuildMember> = self
            .ctx
            .client()
            .list_members(guild_id)
            .await?
            .into_iter()
            .filter(|m| m.has_role(jail_role.id))
            .collect();

        let mut report = JailCheckReport::new(guild_id);
        report.members_checked = holders.len();

        let results: Vec<ServiceResult<usize>> = stream::iter(holders)
            .map(|member| {
                let (moderator, keep) = (&moderator, jail_role.id);
                async move { self.enforce(member, moderator, keep).await }
            })
            .buffer_unordered(MEMBER_CONCURRENCY)
            .collect()
            .await;

        for result in results {
            match result {
                Ok(0) => {}
                Ok(removed) => {
                    report.members_processed += 1;
                    report.roles_removed += removed;
                }
                Err(_) => report.failures += 1,
            }
        }

        info!(
            guild_id = %guild_id,
            members_checked = report.members_checked,
            members_processed = report.members_processed,
            roles_removed = report.roles_removed,
            failures = report.failures,
            "Jail role check complete"
        );
        Ok(report)
    }

    /// Strip one holder; returns how many roles were removed
    async fn enforce(&self, member: GuildMember, moderator: &Moderator, jail_role_id: Snowflake) -> ServiceResult<usize> {
        let removed = RoleService::new(self.ctx)
            .strip_roles(&member, &[jail_role_id], "Jail role enforcement")
            .await
            .inspect_err(|e| {
                warn!(guild_id = %member.guild_id, member_id = %member.user_id, error = %e, "Jailcheck failed for member");
            })?;

        if !removed.is_empty() {
            let names = role_names(&moderator.guild_roles, &removed);
            let entry = manual_enforcement_entry(&member, &names, &moderator.member);
            AuditLog::new(self.ctx)
                .post(member.guild_id, OutgoingMessage::text(entry))
                .await;
        }
        Ok(removed.len())
    }
}
