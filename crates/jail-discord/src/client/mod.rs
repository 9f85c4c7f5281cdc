//! `GuildClient` implementation over the Discord REST API
//!
//! Each submodule adds the inherent methods for one resource family;
//! the trait impl below only delegates.

mod channels;
mod members;
mod messages;

use async_trait::async_trait;
use jail_common::DiscordConfig;
use jail_core::entities::{Channel, GuildMember, Message, OutgoingMessage, Role, UserProfile};
use jail_core::traits::{ClientResult, GuildClient, PurgeOutcome};
use jail_core::value_objects::Snowflake;
use reqwest::Method;

use crate::http::{RestClient, RestConfig};

/// Discord REST implementation of GuildClient
#[derive(Debug, Clone)]
pub struct HttpGuildClient {
    rest: RestClient,
}

impl HttpGuildClient {
    /// Create a new HttpGuildClient
    pub fn new(rest: RestClient) -> Self {
        Self { rest }
    }

    /// Build the REST client from application config
    pub fn from_config(config: &DiscordConfig) -> ClientResult<Self> {
        Ok(Self::new(RestClient::new(&RestConfig::from(config))?))
    }
}

#[async_trait]
impl GuildClient for HttpGuildClient {
    async fn fetch_member(&self, guild_id: Snowflake, user_id: Snowflake) -> ClientResult<GuildMember> {
        self.get_member(guild_id, user_id).await
    }

    async fn list_members(&self, guild_id: Snowflake) -> ClientResult<Vec<GuildMember>> {
        self.get_all_members(guild_id).await
    }

    async fn grant_role(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        role_id: Snowflake,
        reason: &str,
    ) -> ClientResult<()> {
        self.modify_member_role(Method::PUT, guild_id, user_id, role_id, reason)
            .await
    }

    async fn revoke_role(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        role_id: Snowflake,
        reason: &str,
    ) -> ClientResult<()> {
        self.modify_member_role(Method::DELETE, guild_id, user_id, role_id, reason)
            .await
    }

    async fn fetch_profile(&self, user_id: Snowflake) -> ClientResult<Option<UserProfile>> {
        self.get_profile(user_id).await
    }

    async fn fetch_guild_owner(&self, guild_id: Snowflake) -> ClientResult<Snowflake> {
        self.get_guild_owner(guild_id).await
    }

    async fn fetch_roles(&self, guild_id: Snowflake) -> ClientResult<Vec<Role>> {
        self.get_roles(guild_id).await
    }

    async fn fetch_channel(&self, channel_id: Snowflake) -> ClientResult<Channel> {
        self.get_channel(channel_id).await
    }

    async fn list_channels(&self, guild_id: Snowflake) -> ClientResult<Vec<Channel>> {
        self.get_guild_channels(guild_id).await
    }

    async fn list_active_threads(&self, guild_id: Snowflake) -> ClientResult<Vec<Channel>> {
        self.get_active_threads(guild_id).await
    }

    async fn send_message(&self, channel_id: Snowflake, message: &OutgoingMessage) -> ClientResult<Message> {
        self.create_message(channel_id, message).await
    }

    async fn channel_history(&self, channel_id: Snowflake, limit: usize) -> ClientResult<Vec<Message>> {
        self.get_history(channel_id, limit).await
    }

    async fn purge_authored_by(&self, channel_id: Snowflake, author_id: Snowflake, limit: usize) -> PurgeOutcome {
        self.purge_author(channel_id, author_id, limit).await
    }
}
