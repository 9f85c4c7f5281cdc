//! Per-guild command concurrency limiter.
//!
//! Each guild gets its own semaphore; a moderation command holds one permit
//! for its whole run. Callers beyond the limit wait in FIFO order.

use std::sync::Arc;

use dashmap::DashMap;
use jail_core::Snowflake;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Error type for limiter operations
#[derive(Debug, thiserror::Error)]
pub enum LimiterError {
    #[error("Command limiter for guild {0} is closed")]
    Closed(Snowflake),
}

/// Result type for limiter operations
pub type LimiterResult<T> = Result<T, LimiterError>;

/// Bounds simultaneous commands per guild
#[derive(Debug)]
pub struct CommandLimiter {
    permits: usize,
    guilds: DashMap<Snowflake, Arc<Semaphore>>,
}

impl CommandLimiter {
    /// Create a limiter allowing `permits` concurrent commands per guild
    #[must_use]
    pub fn new(permits: usize) -> Self {
        Self {
            permits: permits.max(1),
            guilds: DashMap::new(),
        }
    }

    fn semaphore(&self, guild_id: Snowflake) -> Arc<Semaphore> {
        self.guilds
            .entry(guild_id)
            .or_insert_with(|| Arc::new(Semaphore::new(self.permits)))
            .clone()
    }

    /// Wait for a permit; dropping the permit releases the slot
    pub async fn acquire(&self, guild_id: Snowflake) -> LimiterResult<OwnedSemaphorePermit> {
        let semaphore = self.semaphore(guild_id);
        if semaphore.available_permits() == 0 {
            tracing::debug!(guild_id = %guild_id, "Command limit reached, queuing");
        }
        semaphore
            .acquire_owned()
            .await
            .map_err(|_| LimiterError::Closed(guild_id))
    }

    /// Take a permit only if one is free right now
    pub fn try_acquire(&self, guild_id: Snowflake) -> Option<OwnedSemaphorePermit> {
        self.semaphore(guild_id).try_acquire_owned().ok()
    }

    /// Free permits for a guild
    #[must_use]
    pub fn available(&self, guild_id: Snowflake) -> usize {
        self.guilds
            .get(&guild_id)
            .map_or(self.permits, |s| s.available_permits())
    }

    /// Configured permits per guild
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.permits
    }
}
