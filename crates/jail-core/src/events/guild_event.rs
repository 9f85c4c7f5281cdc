//! Guild events - gateway events forwarded by the host bot runtime
//!
//! Only the member events the moderation service reacts to are modelled.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::GuildMember;
use crate::value_objects::Snowflake;

/// Events the service handles passively
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GuildEvent {
    MemberJoined(MemberJoinedEvent),
    MemberUpdated(MemberUpdatedEvent),
}

impl GuildEvent {
    /// Get the event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::MemberJoined(_) => "MEMBER_JOINED",
            Self::MemberUpdated(_) => "MEMBER_UPDATED",
        }
    }

    /// Guild the event happened in
    pub fn guild_id(&self) -> Snowflake {
        match self {
            Self::MemberJoined(e) => e.member.guild_id,
            Self::MemberUpdated(e) => e.after.guild_id,
        }
    }

    /// Get the timestamp of the event
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::MemberJoined(e) => e.timestamp,
            Self::MemberUpdated(e) => e.timestamp,
        }
    }
}

/// A user joined the guild
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberJoinedEvent {
    pub member: GuildMember,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

impl MemberJoinedEvent {
    pub fn new(member: GuildMember) -> Self {
        Self {
            member,
            timestamp: Utc::now(),
        }
    }
}

/// A member's roles (or other attributes) changed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberUpdatedEvent {
    pub before: GuildMember,
    pub after: GuildMember,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

impl MemberUpdatedEvent {
    pub fn new(before: GuildMember, after: GuildMember) -> Self {
        Self {
            before,
            after,
            timestamp: Utc::now(),
        }
    }

    /// True when `role_id` is absent before and present after
    pub fn role_added(&self, role_id: Snowflake) -> bool {
        !self.before.has_role(role_id) && self.after.has_role(role_id)
    }
}
