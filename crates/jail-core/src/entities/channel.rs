//! Channel entity - text channels, categories, and threads

use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// Channel type, numbered as in the Discord API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ChannelType {
    /// Guild text channel
    #[default]
    GuildText,
    /// Direct message between users
    Dm,
    GuildVoice,
    /// Guild category for organizing channels
    GuildCategory,
    GuildAnnouncement,
    AnnouncementThread,
    PublicThread,
    PrivateThread,
    GuildStageVoice,
    GuildForum,
    /// Anything this service does not care about
    Other,
}

impl ChannelType {
    /// Get the numeric value used by the API
    #[must_use]
    pub fn as_u8(self) -> u8 {
        match self {
            Self::GuildText => 0,
            Self::Dm => 1,
            Self::GuildVoice => 2,
            Self::GuildCategory => 4,
            Self::GuildAnnouncement => 5,
            Self::AnnouncementThread => 10,
            Self::PublicThread => 11,
            Self::PrivateThread => 12,
            Self::GuildStageVoice => 13,
            Self::GuildForum => 15,
            Self::Other => u8::MAX,
        }
    }

    /// Threads of any kind
    #[must_use]
    pub fn is_thread(self) -> bool {
        matches!(
            self,
            Self::AnnouncementThread | Self::PublicThread | Self::PrivateThread
        )
    }
}

impl From<u8> for ChannelType {
    fn from(value: u8) -> Self {
        match value {
            0 => Self::GuildText,
            1 => Self::Dm,
            2 => Self::GuildVoice,
            4 => Self::GuildCategory,
            5 => Self::GuildAnnouncement,
            10 => Self::AnnouncementThread,
            11 => Self::PublicThread,
            12 => Self::PrivateThread,
            13 => Self::GuildStageVoice,
            15 => Self::GuildForum,
            _ => Self::Other,
        }
    }
}

/// Channel entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub id: Snowflake,
    pub guild_id: Option<Snowflake>,
    pub name: Option<String>,
    pub channel_type: ChannelType,
    /// Category for channels, parent channel for threads
    pub parent_id: Option<Snowflake>,
}

impl Channel {
    /// Create a new guild text channel
    #[must_use]
    pub fn new_text(id: Snowflake, guild_id: Snowflake, name: impl Into<String>) -> Self {
        Self {
            id,
            guild_id: Some(guild_id),
            name: Some(name.into()),
            channel_type: ChannelType::GuildText,
            parent_id: None,
        }
    }

    /// Create a new category channel
    #[must_use]
    pub fn new_category(id: Snowflake, guild_id: Snowflake, name: impl Into<String>) -> Self {
        Self {
            channel_type: ChannelType::GuildCategory,
            ..Self::new_text(id, guild_id, name)
        }
    }

    /// Create a public thread under `parent_id`
    #[must_use]
    pub fn new_thread(id: Snowflake, guild_id: Snowflake, parent_id: Snowflake, name: impl Into<String>) -> Self {
        Self {
            channel_type: ChannelType::PublicThread,
            parent_id: Some(parent_id),
            ..Self::new_text(id, guild_id, name)
        }
    }

    /// Move channel into a category
    #[must_use]
    pub fn in_category(mut self, category_id: Snowflake) -> Self {
        self.parent_id = Some(category_id);
        self
    }

    /// Guild text or announcement channel (not a thread)
    #[inline]
    #[must_use]
    pub fn is_text(&self) -> bool {
        matches!(
            self.channel_type,
            ChannelType::GuildText | ChannelType::GuildAnnouncement
        )
    }

    /// Check if this is a category
    #[inline]
    #[must_use]
    pub fn is_category(&self) -> bool {
        matches!(self.channel_type, ChannelType::GuildCategory)
    }

    /// Check if this is a thread
    #[inline]
    #[must_use]
    pub fn is_thread(&self) -> bool {
        self.channel_type.is_thread()
    }

    /// Check if the channel belongs to the given guild
    #[inline]
    #[must_use]
    pub fn belongs_to(&self, guild_id: Snowflake) -> bool {
        self.guild_id == Some(guild_id)
    }

    /// Get display name (channel name or its id)
    #[must_use]
    pub fn display_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| self.id.to_string())
    }
}
