//! Permission service
//!
//! Gates moderation commands: the guild must be allow-listed and the actor
//! must hold BAN_MEMBERS (ADMINISTRATOR implies it) or the gate role. The
//! guild owner holds every permission.

use jail_core::{GuildMember, Permissions, Role, Snowflake};
use tracing::{debug, instrument};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// An actor that passed the moderator check, with the guild roles fetched for it
#[derive(Debug, Clone)]
pub struct Moderator {
    pub member: GuildMember,
    pub guild_roles: Vec<Role>,
}

/// Combined permissions of a member, @everyone included
pub fn member_permissions(member: &GuildMember, roles: &[Role], owner_id: Snowflake) -> Permissions {
    if member.user_id == owner_id {
        return Permissions::all();
    }
    Permissions::combine(
        roles
            .iter()
            .filter(|r| r.is_everyone() || member.has_role(r.id))
            .map(|r| r.permissions),
    )
}

/// Whether `member` may run moderation commands
pub fn is_moderator(member: &GuildMember, roles: &[Role], gate_role_id: Snowflake, owner_id: Snowflake) -> bool {
    member.has_role(gate_role_id) || member_permissions(member, roles, owner_id).has(Permissions::BAN_MEMBERS)
}

/// Permission service for access control
pub struct PermissionService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> PermissionService<'a> {
    /// Create a new PermissionService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Fail unless the guild is allow-listed
    pub fn require_allowed_guild(&self, guild_id: Snowflake) -> ServiceResult<()> {
        if self.ctx.jail_config().is_guild_allowed(guild_id) {
            Ok(())
        } else {
            Err(ServiceError::GuildNotAllowed(guild_id))
        }
    }

    /// Check the allow-list and the actor's moderator status
    #[instrument(skip(self))]
    pub async fn authorize(&self, guild_id: Snowflake, actor_id: Snowflake) -> ServiceResult<Moderator> {
        self.require_allowed_guild(guild_id)?;

        let member = match self.ctx.client().fetch_member(guild_id, actor_id).await {
            Ok(member) => member,
            Err(e) if e.is_not_found() => {
                return Err(ServiceError::permission_denied("guild membership"));
            }
            Err(e) => return Err(e.into()),
        };
        let guild_roles = self.ctx.client().fetch_roles(guild_id).await?;
        let owner_id = self.ctx.client().fetch_guild_owner(guild_id).await?;

        if !is_moderator(&member, &guild_roles, self.ctx.jail_config().gate_role_id, owner_id) {
            debug!(guild_id = %guild_id, actor_id = %actor_id, "Moderator check failed");
            return Err(ServiceError::permission_denied(Permissions::BAN_MEMBERS.list().join(", ")));
        }

        Ok(Moderator { member, guild_roles })
    }
}
