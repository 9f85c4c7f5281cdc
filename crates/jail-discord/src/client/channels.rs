//! Channel and thread endpoints

use jail_core::entities::Channel;
use jail_core::error::DomainError;
use jail_core::traits::ClientResult;
use jail_core::value_objects::Snowflake;
use tracing::instrument;

use crate::models::{ActiveThreadsModel, ChannelModel};

use super::HttpGuildClient;

impl HttpGuildClient {
    #[instrument(skip(self))]
    pub(super) async fn get_channel(&self, channel_id: Snowflake) -> ClientResult<Channel> {
        let model: ChannelModel = self
            .rest
            .get(&format!("/channels/{channel_id}"), |_| DomainError::ChannelNotFound(channel_id))
            .await?;
        Ok(model.into())
    }

    #[instrument(skip(self))]
    pub(super) async fn get_guild_channels(&self, guild_id: Snowflake) -> ClientResult<Vec<Channel>> {
        let models: Vec<ChannelModel> = self
            .rest
            .get(&format!("/guilds/{guild_id}/channels"), |_| DomainError::GuildNotFound(guild_id))
            .await?;
        Ok(models
            .into_iter()
            .map(|m| {
                let mut channel = Channel::from(m);
                channel.guild_id.get_or_insert(guild_id);
                channel
            })
            .collect())
    }

    #[instrument(skip(self))]
    pub(super) async fn get_active_threads(&self, guild_id: Snowflake) -> ClientResult<Vec<Channel>> {
        let list: ActiveThreadsModel = self
            .rest
            .get(&format!("/guilds/{guild_id}/threads/active"), |_| {
                DomainError::GuildNotFound(guild_id)
            })
            .await?;
        Ok(list.threads.into_iter().map(Channel::from).collect())
    }
}
