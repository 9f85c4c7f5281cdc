//! Per-guild resource cache.
//!
//! Remembers lazily resolved per-guild objects (the jail role, the log
//! channel) so repeated commands skip the lookup. Entries are advisory: a
//! caller that finds a cached id no longer resolves calls `invalidate` and the
//! next access resolves again.

use std::future::Future;
use std::sync::Arc;

use dashmap::DashMap;
use jail_core::Snowflake;

/// Keyed cache of one resource kind per guild
#[derive(Debug)]
pub struct GuildResourceCache<V> {
    name: &'static str,
    entries: DashMap<Snowflake, V>,
}

impl<V> GuildResourceCache<V>
where
    V: Clone + Send + Sync,
{
    /// Create an empty cache; `name` only shows up in logs
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            entries: DashMap::new(),
        }
    }

    /// Cached value for a guild
    #[must_use]
    pub fn get(&self, guild_id: Snowflake) -> Option<V> {
        self.entries.get(&guild_id).map(|entry| entry.value().clone())
    }

    /// Store a value, replacing any previous one
    pub fn insert(&self, guild_id: Snowflake, value: V) {
        self.entries.insert(guild_id, value);
    }

    /// Drop the cached value for a guild
    pub fn invalidate(&self, guild_id: Snowflake) {
        if self.entries.remove(&guild_id).is_some() {
            tracing::debug!(cache = self.name, guild_id = %guild_id, "Cache entry invalidated");
        }
    }

    /// Return the cached value or run `resolve` and remember a found value
    ///
    /// `Ok(None)` from the resolver is not cached. Concurrent misses may
    /// resolve twice; the last writer wins.
    pub async fn get_or_resolve<F, Fut, E>(&self, guild_id: Snowflake, resolve: F) -> Result<Option<V>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Option<V>, E>>,
    {
        if let Some(value) = self.get(guild_id) {
            return Ok(Some(value));
        }

        tracing::debug!(cache = self.name, guild_id = %guild_id, "Cache miss, resolving");
        let resolved = resolve().await?;
        if let Some(value) = &resolved {
            self.insert(guild_id, value.clone());
        }
        Ok(resolved)
    }

    /// Number of cached guilds
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Shared handle
pub type SharedResourceCache<V> = Arc<GuildResourceCache<V>>;
