//! Guild client trait (port) - the capabilities the service needs from the chat platform
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! (`jail-discord` in production, an in-memory fake in tests) provides it.

use async_trait::async_trait;

use crate::entities::{Channel, GuildMember, Message, OutgoingMessage, Role, UserProfile};
use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Result type for client operations
pub type ClientResult<T> = Result<T, DomainError>;

/// Messages removed by one purge pass over a channel
///
/// A pass can stop part-way; `deleted` still lists everything removed
/// before `error` was hit.
#[derive(Debug, Default)]
pub struct PurgeOutcome {
    pub deleted: Vec<Message>,
    pub error: Option<DomainError>,
}

impl PurgeOutcome {
    pub fn complete(deleted: Vec<Message>) -> Self {
        Self { deleted, error: None }
    }

    pub fn interrupted(deleted: Vec<Message>, error: DomainError) -> Self {
        Self {
            deleted,
            error: Some(error),
        }
    }

    /// Nothing deleted
    pub fn failed(error: DomainError) -> Self {
        Self::interrupted(Vec::new(), error)
    }
}

#[async_trait]
pub trait GuildClient: Send + Sync {
    // ------------------------------------------------------------------------
    // Members
    // ------------------------------------------------------------------------

    /// Fetch a single member, `MemberNotFound` if the user is not in the guild
    async fn fetch_member(&self, guild_id: Snowflake, user_id: Snowflake) -> ClientResult<GuildMember>;

    /// List every member of the guild
    async fn list_members(&self, guild_id: Snowflake) -> ClientResult<Vec<GuildMember>>;

    /// Grant a role to a member
    async fn grant_role(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        role_id: Snowflake,
        reason: &str,
    ) -> ClientResult<()>;

    /// Revoke a role from a member
    async fn revoke_role(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        role_id: Snowflake,
        reason: &str,
    ) -> ClientResult<()>;

    /// Fetch profile text for a user, `None` when the platform hides it
    async fn fetch_profile(&self, user_id: Snowflake) -> ClientResult<Option<UserProfile>>;

    /// Id of the guild's owner, who holds every permission
    async fn fetch_guild_owner(&self, guild_id: Snowflake) -> ClientResult<Snowflake>;

    // ------------------------------------------------------------------------
    // Roles
    // ------------------------------------------------------------------------

    /// List all roles of the guild
    async fn fetch_roles(&self, guild_id: Snowflake) -> ClientResult<Vec<Role>>;

    // ------------------------------------------------------------------------
    // Channels
    // ------------------------------------------------------------------------

    /// Fetch a channel by id
    async fn fetch_channel(&self, channel_id: Snowflake) -> ClientResult<Channel>;

    /// List the guild's channels (threads excluded)
    async fn list_channels(&self, guild_id: Snowflake) -> ClientResult<Vec<Channel>>;

    /// List the guild's active threads
    async fn list_active_threads(&self, guild_id: Snowflake) -> ClientResult<Vec<Channel>>;

    // ------------------------------------------------------------------------
    // Messages
    // ------------------------------------------------------------------------

    /// Post a message, optionally with one file attached
    async fn send_message(&self, channel_id: Snowflake, message: &OutgoingMessage) -> ClientResult<Message>;

    /// Most recent messages of a channel, newest first
    async fn channel_history(&self, channel_id: Snowflake, limit: usize) -> ClientResult<Vec<Message>>;

    /// Delete messages by `author_id` among the `limit` most recent ones
    ///
    /// Returns the deleted messages oldest first, with the error that ended
    /// the pass early if there was one.
    async fn purge_authored_by(&self, channel_id: Snowflake, author_id: Snowflake, limit: usize) -> PurgeOutcome;
}
