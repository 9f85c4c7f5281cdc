//! Guild events consumed by the service

mod guild_event;

pub use guild_event::{GuildEvent, MemberJoinedEvent, MemberUpdatedEvent};
