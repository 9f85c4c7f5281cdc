//! Guard service - passive member event handling
//!
//! Fresh accounts joining with no roles are jailed on sight, and any member
//! who gains the jail role is stripped of everything else.

use chrono::{Duration, Utc};
use jail_core::{role_names, GuildEvent, MemberJoinedEvent, MemberUpdatedEvent, OutgoingMessage, Snowflake};
use tracing::{debug, info, instrument, warn};

use super::audit_log::{auto_strip_entry, spam_prevention_entry, AuditLog};
use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::roles::RoleService;

/// What handling an event did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    /// Guild not allow-listed or the event is not relevant
    Ignored,
    AutoJailed { user_id: Snowflake, account_age_days: i64 },
    RolesStripped { user_id: Snowflake, roles_removed: Vec<Snowflake> },
    /// Relevant, but nothing had to change
    NoChange,
}

/// Guard service
pub struct GuardService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> GuardService<'a> {
    /// Create a new GuardService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Dispatch a forwarded gateway event
    pub async fn handle(&self, event: &GuildEvent) -> ServiceResult<EventOutcome> {
        if !self.ctx.jail_config().is_guild_allowed(event.guild_id()) {
            debug!(guild_id = %event.guild_id(), event = event.event_type(), "Event from guild outside allow-list");
            return Ok(EventOutcome::Ignored);
        }
        match event {
            GuildEvent::MemberJoined(e) => self.on_member_joined(e).await,
            GuildEvent::MemberUpdated(e) => self.on_member_updated(e).await,
        }
    }

    /// Jail accounts younger than the threshold that joined with no roles
    #[instrument(skip_all, fields(guild_id = %event.member.guild_id, member_id = %event.member.user_id))]
    pub async fn on_member_joined(&self, event: &MemberJoinedEvent) -> ServiceResult<EventOutcome> {
        let member = &event.member;
        let config = self.ctx.jail_config();
        let now = Utc::now();
        let age = member.account_age(now);

        if age >= Duration::days(config.new_account_days) || member.effective_role_count() > config.auto_jail_max_roles {
            return Ok(EventOutcome::NoChange);
        }

        let jail_role = match RoleService::new(self.ctx).jail_role(member.guild_id, None).await {
            Ok(role) => role,
            Err(ServiceError::ConfigurationMissing(what)) => {
                warn!(missing = %what, "Cannot auto-jail without a jail role, event dropped");
                return Ok(EventOutcome::Ignored);
            }
            Err(e) => return Err(e),
        };

        let account_age_days = age.num_days();
        let audit_reason = format!("Spam prevention: account is {account_age_days} days old");
        if let Err(e) = self
            .ctx
            .client()
            .grant_role(member.guild_id, member.user_id, jail_role.id, &audit_reason)
            .await
        {
            let err = ServiceError::from(e);
            RoleService::new(self.ctx).invalidate_on_missing(member.guild_id, &err);
            return Err(err);
        }

        let entry = spam_prevention_entry(member, account_age_days, now);
        AuditLog::new(self.ctx)
            .post(member.guild_id, OutgoingMessage::text(entry))
            .await;

        info!(account_age_days, "New account jailed on join");
        Ok(EventOutcome::AutoJailed {
            user_id: member.user_id,
            account_age_days,
        })
    }

    /// Strip every other role from a member who just gained the jail role
    #[instrument(skip_all, fields(guild_id = %event.after.guild_id, member_id = %event.after.user_id))]
    pub async fn on_member_updated(&self, event: &MemberUpdatedEvent) -> ServiceResult<EventOutcome> {
        let jail_role_id = self.ctx.jail_config().jail_role_id;
        if !event.role_added(jail_role_id) {
            return Ok(EventOutcome::Ignored);
        }

        let member = &event.after;
        let roles_removed = RoleService::new(self.ctx)
            .strip_roles(member, &[jail_role_id], "Jail role added")
            .await?;
        if roles_removed.is_empty() {
            return Ok(EventOutcome::NoChange);
        }

        let guild_roles = match self.ctx.client().fetch_roles(member.guild_id).await {
            Ok(roles) => roles,
            Err(e) => {
                warn!(error = %e, "Failed to fetch role names for log entry");
                Vec::new()
            }
        };
        let entry = auto_strip_entry(member, &role_names(&guild_roles, &roles_removed));
        AuditLog::new(self.ctx)
            .post(member.guild_id, OutgoingMessage::text(entry))
            .await;

        info!(roles_removed = roles_removed.len(), "Roles stripped after jail role was added");
        Ok(EventOutcome::RolesStripped {
            user_id: member.user_id,
            roles_removed,
        })
    }
}
