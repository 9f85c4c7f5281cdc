//! Service context - dependency container for services
//!
//! Holds the guild client, moderation settings, per-guild caches, the command
//! limiter and the transcript store.

use std::sync::Arc;

use jail_cache::{CommandLimiter, GuildResourceCache};
use jail_common::{AppConfig, JailConfig, PurgeConfig, TranscriptConfig};
use jail_core::{Channel, GuildClient, Role};

use super::transcript::TranscriptStore;

/// Service context containing all dependencies
///
/// Cheap to clone; every field is behind an `Arc`.
#[derive(Clone)]
pub struct ServiceContext {
    // Platform access
    client: Arc<dyn GuildClient>,

    // Settings
    jail: Arc<JailConfig>,
    purge: Arc<PurgeConfig>,

    // Per-guild state
    jail_roles: Arc<GuildResourceCache<Role>>,
    log_channels: Arc<GuildResourceCache<Channel>>,
    limiter: Arc<CommandLimiter>,

    // Files
    transcripts: Arc<TranscriptStore>,
}

impl ServiceContext {
    /// Create a new service context
    pub fn new(
        client: Arc<dyn GuildClient>,
        jail: JailConfig,
        purge: PurgeConfig,
        transcripts: TranscriptStore,
    ) -> Self {
        let limiter = CommandLimiter::new(jail.command_concurrency);
        Self {
            client,
            jail: Arc::new(jail),
            purge: Arc::new(purge),
            jail_roles: Arc::new(GuildResourceCache::new("jail_role")),
            log_channels: Arc::new(GuildResourceCache::new("log_channel")),
            limiter: Arc::new(limiter),
            transcripts: Arc::new(transcripts),
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Get the guild client
    pub fn client(&self) -> &dyn GuildClient {
        self.client.as_ref()
    }

    /// Get a shared handle to the guild client
    pub fn client_arc(&self) -> Arc<dyn GuildClient> {
        Arc::clone(&self.client)
    }

    /// Moderation settings
    pub fn jail_config(&self) -> &JailConfig {
        &self.jail
    }

    /// Purge retry settings
    pub fn purge_config(&self) -> &PurgeConfig {
        &self.purge
    }

    /// Cached jail role per guild
    pub fn jail_roles(&self) -> &GuildResourceCache<Role> {
        &self.jail_roles
    }

    /// Cached log channel per guild
    pub fn log_channels(&self) -> &GuildResourceCache<Channel> {
        &self.log_channels
    }

    /// Per-guild command limiter
    pub fn limiter(&self) -> &CommandLimiter {
        &self.limiter
    }

    /// Transcript store
    pub fn transcripts(&self) -> &TranscriptStore {
        &self.transcripts
    }

    /// Get a shared handle to the transcript store
    pub fn transcripts_arc(&self) -> Arc<TranscriptStore> {
        Arc::clone(&self.transcripts)
    }
}

/// Builder for ServiceContext
pub struct ServiceContextBuilder {
    client: Option<Arc<dyn GuildClient>>,
    jail: Option<JailConfig>,
    purge: Option<PurgeConfig>,
    transcripts: Option<TranscriptConfig>,
}

impl ServiceContextBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            client: None,
            jail: None,
            purge: None,
            transcripts: None,
        }
    }

    /// Set the guild client
    pub fn client(mut self, client: Arc<dyn GuildClient>) -> Self {
        self.client = Some(client);
        self
    }

    /// Take every section from a loaded application config
    pub fn config(self, config: &AppConfig) -> Self {
        self.jail_config(config.jail.clone())
            .purge_config(config.purge.clone())
            .transcript_config(config.transcripts.clone())
    }

    /// Set moderation settings
    pub fn jail_config(mut self, config: JailConfig) -> Self {
        self.jail = Some(config);
        self
    }

    /// Set purge retry settings
    pub fn purge_config(mut self, config: PurgeConfig) -> Self {
        self.purge = Some(config);
        self
    }

    /// Set transcript storage settings
    pub fn transcript_config(mut self, config: TranscriptConfig) -> Self {
        self.transcripts = Some(config);
        self
    }

    /// Build the ServiceContext
    ///
    /// Only the client is required; missing settings fall back to defaults.
    pub fn build(self) -> super::error::ServiceResult<ServiceContext> {
        let client = self
            .client
            .ok_or_else(|| super::error::ServiceError::validation("client is required"))?;
        Ok(ServiceContext::new(
            client,
            self.jail.unwrap_or_default(),
            self.purge.unwrap_or_default(),
            TranscriptStore::new(&self.transcripts.unwrap_or_default()),
        ))
    }
}

impl Default for ServiceContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
