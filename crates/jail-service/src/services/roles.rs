//! Role service
//!
//! Resolves the guild's jail role (looked up once per guild and cached until
//! a grant reports it gone) and strips members down to a set of kept roles.

use jail_core::{DomainError, GuildMember, Role, Snowflake};
use tracing::{debug, instrument, warn};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Role service
pub struct RoleService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> RoleService<'a> {
    /// Create a new RoleService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// The guild's jail role, `ConfigurationMissing` when it does not exist
    ///
    /// `known_roles` skips the lookup when the caller already fetched them.
    #[instrument(skip(self, known_roles))]
    pub async fn jail_role(&self, guild_id: Snowflake, known_roles: Option<&[Role]>) -> ServiceResult<Role> {
        let jail_role_id = self.ctx.jail_config().jail_role_id;
        let client = self.ctx.client();

        let role = self
            .ctx
            .jail_roles()
            .get_or_resolve(guild_id, || async move {
                let roles = match known_roles {
                    Some(roles) => roles.to_vec(),
                    None => client.fetch_roles(guild_id).await?,
                };
                Ok::<_, ServiceError>(roles.into_iter().find(|r| r.id == jail_role_id))
            })
            .await?;

        role.ok_or_else(|| {
            warn!(guild_id = %guild_id, role_id = %jail_role_id, "Jail role not found");
            ServiceError::configuration_missing(format!("jail role {jail_role_id}"))
        })
    }

    /// Forget the cached jail role after a grant reported it missing
    pub fn invalidate_on_missing(&self, guild_id: Snowflake, err: &ServiceError) {
        if matches!(err, ServiceError::Domain(DomainError::RoleNotFound(_))) {
            self.ctx.jail_roles().invalidate(guild_id);
        }
    }

    /// Revoke every role of `member` except `keep` and @everyone
    ///
    /// Roles deleted meanwhile are skipped. The first other failure stops the
    /// strip and is returned; roles already revoked stay revoked.
    #[instrument(skip(self, member, reason), fields(guild_id = %member.guild_id, member_id = %member.user_id))]
    pub async fn strip_roles(
        &self,
        member: &GuildMember,
        keep: &[Snowflake],
        reason: &str,
    ) -> ServiceResult<Vec<Snowflake>> {
        let mut removed = Vec::new();
        for role_id in member.roles_except(keep) {
            match self
                .ctx
                .client()
                .revoke_role(member.guild_id, member.user_id, role_id, reason)
                .await
            {
                Ok(()) => removed.push(role_id),
                Err(DomainError::RoleNotFound(_)) => {
                    debug!(role_id = %role_id, "Role vanished before revoke");
                }
                Err(e) => return Err(e.into()),
            }
        }
        Ok(removed)
    }
}
