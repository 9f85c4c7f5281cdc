//! # jail-cache
//!
//! In-memory, per-guild state shared by moderation commands.
//!
//! ## Features
//!
//! - **Resource cache**: lazily resolved per-guild objects (jail role, log channel)
//!   with explicit invalidation when a cached id stops resolving
//! - **Command limiter**: per-guild semaphore bounding concurrent jail/unjail runs
//!
//! ## Example
//!
//! ```ignore
//! use jail_cache::{CommandLimiter, GuildResourceCache};
//!
//! let roles: GuildResourceCache<Role> = GuildResourceCache::new("jail_role");
//! let role = roles.get_or_resolve(guild_id, || find_jail_role(guild_id)).await?;
//!
//! let limiter = CommandLimiter::new(5);
//! let _permit = limiter.acquire(guild_id).await?;
//! ```

pub mod limiter;
pub mod resource;

pub use limiter::{CommandLimiter, LimiterError, LimiterResult};
pub use resource::{GuildResourceCache, SharedResourceCache};
