//! Configuration structs

mod app_config;

pub use app_config::{
    AppConfig, AppSettings, ConfigError, DiscordConfig, Environment, JailConfig, PurgeConfig,
    RateLimitConfig, ServerConfig, TranscriptConfig,
};
