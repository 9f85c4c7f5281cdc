//! Channel and thread payloads

use jail_core::Snowflake;
use serde::{Deserialize, Serialize};

/// `Channel` object (threads included)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelModel {
    pub id: Snowflake,
    #[serde(rename = "type")]
    pub kind: u8,
    #[serde(default)]
    pub guild_id: Option<Snowflake>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub parent_id: Option<Snowflake>,
}

/// Response of `GET /guilds/{id}/threads/active`
#[derive(Debug, Clone, Deserialize)]
pub struct ActiveThreadsModel {
    #[serde(default)]
    pub threads: Vec<ChannelModel>,
}
