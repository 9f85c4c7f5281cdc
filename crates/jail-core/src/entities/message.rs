//! Message entity and outgoing message payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// Discord caps message content at this many characters
pub const MAX_MESSAGE_LENGTH: usize = 2000;

/// Message entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: Snowflake,
    pub channel_id: Snowflake,
    pub guild_id: Option<Snowflake>,
    pub author_id: Snowflake,
    pub author_name: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Create a new Message
    pub fn new(
        id: Snowflake,
        channel_id: Snowflake,
        author_id: Snowflake,
        author_name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id,
            channel_id,
            guild_id: None,
            author_id,
            author_name: author_name.into(),
            content: content.into(),
            created_at: Utc::now(),
        }
    }

    /// Link that opens this message in the Discord client
    pub fn jump_url(&self, guild_id: Snowflake) -> String {
        format!(
            "https://discord.com/channels/{}/{}/{}",
            self.guild_id.unwrap_or(guild_id),
            self.channel_id,
            self.id
        )
    }
}

/// File attached to an outgoing message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageAttachment {
    pub filename: String,
    pub data: Vec<u8>,
}

impl MessageAttachment {
    pub fn new(filename: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            data: data.into(),
        }
    }
}

/// Message the service wants to post
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMessage {
    pub content: String,
    pub attachment: Option<MessageAttachment>,
}

impl OutgoingMessage {
    /// Plain text message
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            attachment: None,
        }
    }

    /// Attach a file
    #[must_use]
    pub fn with_attachment(mut self, attachment: MessageAttachment) -> Self {
        self.attachment = Some(attachment);
        self
    }
}

/// Truncate to at most `max_chars` characters, marking the cut with an ellipsis
pub fn truncate_content(content: &str, max_chars: usize) -> String {
    if content.chars().count() <= max_chars {
        return content.to_string();
    }
    let keep = max_chars.saturating_sub(1);
    let mut out: String = content.chars().take(keep).collect();
    out.push('…');
    out
}
