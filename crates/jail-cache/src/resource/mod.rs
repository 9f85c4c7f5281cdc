//! Lazily resolved per-guild resources.

mod guild_resource;

pub use guild_resource::{GuildResourceCache, SharedResourceCache};
