//! Message payloads, inbound and outbound

use chrono::{DateTime, Utc};
use jail_core::Snowflake;
use serde::{Deserialize, Serialize};

use super::UserModel;

/// `Message` object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageModel {
    pub id: Snowflake,
    pub channel_id: Snowflake,
    #[serde(default)]
    pub guild_id: Option<Snowflake>,
    pub author: UserModel,
    #[serde(default)]
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// JSON part of `POST /channels/{id}/messages`
#[derive(Debug, Clone, Serialize)]
pub struct CreateMessageModel {
    pub content: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<AttachmentRefModel>,
    pub allowed_mentions: AllowedMentionsModel,
}

/// Links `files[n]` in a multipart body to its metadata
#[derive(Debug, Clone, Serialize)]
pub struct AttachmentRefModel {
    pub id: u32,
    pub filename: String,
}

/// Mentions in log entries must never ping anyone
#[derive(Debug, Clone, Default, Serialize)]
pub struct AllowedMentionsModel {
    pub parse: Vec<String>,
}

/// Body of `POST /channels/{id}/messages/bulk-delete`
#[derive(Debug, Clone, Serialize)]
pub struct BulkDeleteModel {
    pub messages: Vec<Snowflake>,
}
