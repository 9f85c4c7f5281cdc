//! Shared handler state

use std::sync::Arc;

use jail_common::AppConfig;
use jail_service::ServiceContext;

/// Cloned into every request; both halves are behind `Arc`
#[derive(Clone)]
pub struct AppState {
    service_context: Arc<ServiceContext>,
    config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(service_context: ServiceContext, config: AppConfig) -> Self {
        Self {
            service_context: Arc::new(service_context),
            config: Arc::new(config),
        }
    }

    pub fn service_context(&self) -> &ServiceContext {
        &self.service_context
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Whether /api/v1 requests must carry the shared secret
    pub fn auth_enabled(&self) -> bool {
        self.config.api.shared_secret.is_some()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("allowed_guilds", &self.config.jail.allowed_guild_ids)
            .field("auth_enabled", &self.auth_enabled())
            .finish_non_exhaustive()
    }
}
