//! Domain entities - guild objects the moderation service reads and mutates

mod channel;
mod member;
mod message;
mod profile;
mod role;

pub use channel::{Channel, ChannelType};
pub use member::GuildMember;
pub use message::{
    truncate_content, Message, MessageAttachment, OutgoingMessage, MAX_MESSAGE_LENGTH,
};
pub use profile::UserProfile;
pub use role::{role_names, Role};
