//! # jail-core
//!
//! Domain layer containing entities, value objects, the guild client port, and guild events.
//! This crate has zero dependencies on infrastructure (HTTP client, web framework, etc.).

pub mod entities;
pub mod error;
pub mod events;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    role_names, truncate_content, Channel, ChannelType, GuildMember, Message, MessageAttachment,
    OutgoingMessage, Role, UserProfile, MAX_MESSAGE_LENGTH,
};
pub use error::DomainError;
pub use events::{GuildEvent, MemberJoinedEvent, MemberUpdatedEvent};
pub use traits::{ClientResult, GuildClient, PurgeOutcome};
pub use value_objects::{Permissions, Snowflake, SnowflakeParseError};
