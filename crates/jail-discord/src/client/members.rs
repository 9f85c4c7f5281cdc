//! Guild, member, role and profile endpoints

use jail_core::entities::{GuildMember, Role, UserProfile};
use jail_core::error::DomainError;
use jail_core::traits::ClientResult;
use jail_core::value_objects::Snowflake;
use reqwest::Method;
use tracing::instrument;

use crate::http::error::{UNKNOWN_GUILD, UNKNOWN_ROLE};
use crate::mappers::{member_from_model, role_from_model};
use crate::models::{GuildModel, MemberModel, RoleModel, UserProfileModel};

use super::HttpGuildClient;

/// Maximum page size of `GET /guilds/{id}/members`
const MEMBER_PAGE_SIZE: usize = 1000;

fn guild_or_member_not_found(guild_id: Snowflake, user_id: Snowflake) -> impl FnOnce(Option<u32>) -> DomainError {
    move |code| match code {
        Some(UNKNOWN_GUILD) => DomainError::GuildNotFound(guild_id),
        _ => DomainError::MemberNotFound(user_id),
    }
}

impl HttpGuildClient {
    #[instrument(skip(self))]
    pub(super) async fn get_member(&self, guild_id: Snowflake, user_id: Snowflake) -> ClientResult<GuildMember> {
        let model: MemberModel = self
            .rest
            .get(
                &format!("/guilds/{guild_id}/members/{user_id}"),
                guild_or_member_not_found(guild_id, user_id),
            )
            .await?;
        member_from_model(guild_id, model).ok_or(DomainError::MemberNotFound(user_id))
    }

    /// Walk the member list in pages ordered by user id
    #[instrument(skip(self))]
    pub(super) async fn get_all_members(&self, guild_id: Snowflake) -> ClientResult<Vec<GuildMember>> {
        let mut members = Vec::new();
        let mut after = Snowflake::new(0);

        loop {
            let limit = MEMBER_PAGE_SIZE.to_string();
            let after_param = after.to_string();
            let page: Vec<MemberModel> = self
                .rest
                .get_query(
                    &format!("/guilds/{guild_id}/members"),
                    &[("limit", limit.as_str()), ("after", after_param.as_str())],
                    |_| DomainError::GuildNotFound(guild_id),
                )
                .await?;

            let page_len = page.len();
            for model in page {
                if let Some(member) = member_from_model(guild_id, model) {
                    after = after.max(member.user_id);
                    members.push(member);
                }
            }

            if page_len < MEMBER_PAGE_SIZE {
                break;
            }
        }

        tracing::debug!(guild_id = %guild_id, count = members.len(), "Fetched guild members");
        Ok(members)
    }

    #[instrument(skip(self))]
    pub(super) async fn get_guild_owner(&self, guild_id: Snowflake) -> ClientResult<Snowflake> {
        let model: GuildModel = self
            .rest
            .get(&format!("/guilds/{guild_id}"), |_| DomainError::GuildNotFound(guild_id))
            .await?;
        Ok(model.owner_id)
    }

    #[instrument(skip(self))]
    pub(super) async fn get_roles(&self, guild_id: Snowflake) -> ClientResult<Vec<Role>> {
        let models: Vec<RoleModel> = self
            .rest
            .get(&format!("/guilds/{guild_id}/roles"), |_| DomainError::GuildNotFound(guild_id))
            .await?;
        Ok(models.into_iter().map(|m| role_from_model(guild_id, m)).collect())
    }

    /// `PUT` grants, `DELETE` revokes
    #[instrument(skip(self, reason))]
    pub(super) async fn modify_member_role(
        &self,
        method: Method,
        guild_id: Snowflake,
        user_id: Snowflake,
        role_id: Snowflake,
        reason: &str,
    ) -> ClientResult<()> {
        let path = format!("/guilds/{guild_id}/members/{user_id}/roles/{role_id}");
        let on_not_found = move |code| match code {
            Some(UNKNOWN_ROLE) => DomainError::RoleNotFound(role_id),
            Some(UNKNOWN_GUILD) => DomainError::GuildNotFound(guild_id),
            _ => DomainError::MemberNotFound(user_id),
        };

        if method == Method::PUT {
            self.rest.put_empty(&path, Some(reason), on_not_found).await
        } else {
            self.rest.delete(&path, Some(reason), on_not_found).await
        }
    }

    /// Profiles are not always visible to bots; hidden profiles yield `None`
    #[instrument(skip(self))]
    pub(super) async fn get_profile(&self, user_id: Snowflake) -> ClientResult<Option<UserProfile>> {
        let result: ClientResult<UserProfileModel> = self
            .rest
            .get(&format!("/users/{user_id}/profile"), |_| {
                DomainError::NotFound(format!("profile of {user_id}"))
            })
            .await;

        match result {
            Ok(model) => Ok(Some(model.into())),
            Err(e) if e.is_not_found() || e.is_authorization() => Ok(None),
            Err(DomainError::HttpError { status: 401, .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
