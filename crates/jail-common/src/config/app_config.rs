//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file when
//! present). Every moderation setting has a hardcoded fallback so the service
//! starts with only `DISCORD_TOKEN` set.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use jail_core::Snowflake;
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub api: ServerConfig,
    pub discord: DiscordConfig,
    pub jail: JailConfig,
    pub purge: PurgeConfig,
    pub transcripts: TranscriptConfig,
    pub rate_limit: RateLimitConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "production" => Some(Self::Production),
            "staging" => Some(Self::Staging),
            "development" => Some(Self::Development),
            _ => None,
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Bearer secret the host runtime must present; `None` disables the check
    #[serde(default)]
    pub shared_secret: Option<String>,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Discord REST client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DiscordConfig {
    pub token: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

/// Moderation settings: distinguished roles, channels and thresholds
#[derive(Debug, Clone, Deserialize)]
pub struct JailConfig {
    pub jail_role_id: Snowflake,
    pub alt_jail_role_id: Snowflake,
    pub log_channel_id: Snowflake,
    /// Holders may run moderation commands without BAN_MEMBERS
    pub gate_role_id: Snowflake,
    /// Granted back on release
    pub default_member_role_id: Snowflake,
    pub allowed_guild_ids: Vec<Snowflake>,
    /// Channels under these categories are purged on jail
    pub purge_category_ids: Vec<Snowflake>,
    pub new_account_days: i64,
    /// Auto-jail only applies at or below this many roles, counting @everyone
    pub auto_jail_max_roles: usize,
    pub max_targets: usize,
    pub command_concurrency: usize,
    pub command_prefix: String,
    /// Log-channel messages searched for prior jail entries
    pub prior_log_scan_limit: usize,
    pub prior_log_links: usize,
}

impl JailConfig {
    #[must_use]
    pub fn is_guild_allowed(&self, guild_id: Snowflake) -> bool {
        self.allowed_guild_ids.contains(&guild_id)
    }

    /// Both jail roles
    #[must_use]
    pub fn jail_roles(&self) -> [Snowflake; 2] {
        [self.jail_role_id, self.alt_jail_role_id]
    }
}

impl Default for JailConfig {
    fn default() -> Self {
        Self {
            jail_role_id: Snowflake::new(DEFAULT_JAIL_ROLE_ID),
            alt_jail_role_id: Snowflake::new(DEFAULT_ALT_JAIL_ROLE_ID),
            log_channel_id: Snowflake::new(DEFAULT_LOG_CHANNEL_ID),
            gate_role_id: Snowflake::new(DEFAULT_GATE_ROLE_ID),
            default_member_role_id: Snowflake::new(DEFAULT_MEMBER_ROLE_ID),
            allowed_guild_ids: DEFAULT_ALLOWED_GUILD_IDS.iter().copied().map(Snowflake::new).collect(),
            purge_category_ids: DEFAULT_PURGE_CATEGORY_IDS.iter().copied().map(Snowflake::new).collect(),
            new_account_days: 90,
            auto_jail_max_roles: 1,
            max_targets: 20,
            command_concurrency: 5,
            command_prefix: "!".to_string(),
            prior_log_scan_limit: 250,
            prior_log_links: 3,
        }
    }
}

/// Purge-with-retry settings
#[derive(Debug, Clone, Deserialize)]
pub struct PurgeConfig {
    /// Most-recent messages inspected per channel
    pub limit: usize,
    /// Retries after the first attempt, rate limits only
    pub max_retries: u32,
    /// Wait used when a rate limit carries no retry interval
    pub default_backoff_secs: u64,
}

impl PurgeConfig {
    #[must_use]
    pub fn default_backoff(&self) -> Duration {
        Duration::from_secs(self.default_backoff_secs)
    }
}

impl Default for PurgeConfig {
    fn default() -> Self {
        Self {
            limit: 100,
            max_retries: 3,
            default_backoff_secs: 5,
        }
    }
}

/// Purge transcript storage
#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptConfig {
    pub dir: PathBuf,
    pub retention_days: i64,
    pub sweep_interval_secs: u64,
    /// Concurrent blocking file writes
    pub write_concurrency: usize,
}

impl TranscriptConfig {
    #[must_use]
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

impl Default for TranscriptConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(default_transcript_dir()),
            retention_days: 7,
            sweep_interval_secs: 86_400,
            write_concurrency: 10,
        }
    }
}

/// Rate limiting configuration for the HTTP surface
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,
    #[serde(default = "default_burst")]
    pub burst: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_second: default_requests_per_second(),
            burst: default_burst(),
        }
    }
}

// Hardcoded fallbacks for the production guild
const DEFAULT_JAIL_ROLE_ID: u64 = 1_245_077_976_316_379_187;
const DEFAULT_ALT_JAIL_ROLE_ID: u64 = 1_280_228_557_318_000_783;
const DEFAULT_LOG_CHANNEL_ID: u64 = 1_274_393_459_683_360_839;
const DEFAULT_GATE_ROLE_ID: u64 = 1_286_171_116_951_310_407;
const DEFAULT_MEMBER_ROLE_ID: u64 = 1_014_566_237_558_284_338;
const DEFAULT_ALLOWED_GUILD_IDS: &[u64] = &[1_014_562_212_007_915_601];
const DEFAULT_PURGE_CATEGORY_IDS: &[u64] = &[1_276_399_856_465_874_974, 1_014_562_212_544_774_204];

// Default value functions
fn default_app_name() -> String {
    "jail-service".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8088
}

fn default_api_base() -> String {
    "https://discord.com/api/v10".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_transcript_dir() -> String {
    "./data/purged_logs".to_string()
}

fn default_requests_per_second() -> u32 {
    10
}

fn default_burst() -> u32 {
    50
}

/// Read and parse a variable, `None` when unset or malformed
fn parse_var<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key).and_then(|s| s.trim().parse().ok())
}

/// Parse a comma separated list of ids
fn parse_id_list(name: &'static str, raw: &str) -> Result<Vec<Snowflake>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| Snowflake::parse(s).map_err(|_| ConfigError::InvalidValue(name, s.to_string())))
        .collect()
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if `DISCORD_TOKEN` is missing or an id is malformed
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let id = |key: &'static str, fallback: Snowflake| -> Result<Snowflake, ConfigError> {
            match lookup(key) {
                Some(raw) => Snowflake::parse(&raw).map_err(|_| ConfigError::InvalidValue(key, raw)),
                None => Ok(fallback),
            }
        };
        let ids = |key: &'static str, fallback: Vec<Snowflake>| -> Result<Vec<Snowflake>, ConfigError> {
            match lookup(key) {
                Some(raw) => parse_id_list(key, &raw),
                None => Ok(fallback),
            }
        };

        let jail_defaults = JailConfig::default();
        let purge_defaults = PurgeConfig::default();
        let transcript_defaults = TranscriptConfig::default();

        Ok(Self {
            app: AppSettings {
                name: lookup("APP_NAME").unwrap_or_else(default_app_name),
                env: lookup("APP_ENV")
                    .and_then(|s| Environment::parse(&s))
                    .unwrap_or_default(),
            },
            api: ServerConfig {
                host: lookup("API_HOST").unwrap_or_else(default_host),
                port: parse_var(&lookup, "API_PORT").unwrap_or_else(default_port),
                shared_secret: lookup("API_SHARED_SECRET").filter(|s| !s.is_empty()),
            },
            discord: DiscordConfig {
                token: lookup("DISCORD_TOKEN")
                    .filter(|s| !s.is_empty())
                    .ok_or(ConfigError::MissingVar("DISCORD_TOKEN"))?,
                api_base: lookup("DISCORD_API_BASE").unwrap_or_else(default_api_base),
                request_timeout_secs: parse_var(&lookup, "DISCORD_REQUEST_TIMEOUT_SECS")
                    .unwrap_or_else(default_request_timeout_secs),
            },
            jail: JailConfig {
                jail_role_id: id("JAIL_ROLE_ID", jail_defaults.jail_role_id)?,
                alt_jail_role_id: id("ALT_JAIL_ROLE_ID", jail_defaults.alt_jail_role_id)?,
                log_channel_id: id("LOG_CHANNEL_ID", jail_defaults.log_channel_id)?,
                gate_role_id: id("GATE_ROLE_ID", jail_defaults.gate_role_id)?,
                default_member_role_id: id(
                    "DEFAULT_MEMBER_ROLE_ID",
                    jail_defaults.default_member_role_id,
                )?,
                allowed_guild_ids: ids("ALLOWED_GUILD_IDS", jail_defaults.allowed_guild_ids)?,
                purge_category_ids: ids("PURGE_CATEGORY_IDS", jail_defaults.purge_category_ids)?,
                new_account_days: parse_var(&lookup, "NEW_ACCOUNT_DAYS").unwrap_or(jail_defaults.new_account_days),
                auto_jail_max_roles: parse_var(&lookup, "AUTO_JAIL_MAX_ROLES")
                    .unwrap_or(jail_defaults.auto_jail_max_roles),
                max_targets: parse_var(&lookup, "MAX_TARGETS").unwrap_or(jail_defaults.max_targets),
                command_concurrency: parse_var(&lookup, "COMMAND_CONCURRENCY")
                    .filter(|n: &usize| *n > 0)
                    .unwrap_or(jail_defaults.command_concurrency),
                command_prefix: lookup("COMMAND_PREFIX").unwrap_or(jail_defaults.command_prefix),
                prior_log_scan_limit: parse_var(&lookup, "PRIOR_LOG_SCAN_LIMIT")
                    .unwrap_or(jail_defaults.prior_log_scan_limit),
                prior_log_links: parse_var(&lookup, "PRIOR_LOG_LINKS").unwrap_or(jail_defaults.prior_log_links),
            },
            purge: PurgeConfig {
                limit: parse_var(&lookup, "PURGE_LIMIT").unwrap_or(purge_defaults.limit),
                max_retries: parse_var(&lookup, "PURGE_MAX_RETRIES").unwrap_or(purge_defaults.max_retries),
                default_backoff_secs: parse_var(&lookup, "RATE_LIMIT_DEFAULT_BACKOFF_SECS")
                    .unwrap_or(purge_defaults.default_backoff_secs),
            },
            transcripts: TranscriptConfig {
                dir: lookup("TRANSCRIPT_DIR").map_or(transcript_defaults.dir, PathBuf::from),
                retention_days: parse_var(&lookup, "TRANSCRIPT_RETENTION_DAYS")
                    .unwrap_or(transcript_defaults.retention_days),
                sweep_interval_secs: parse_var(&lookup, "RETENTION_SWEEP_INTERVAL_SECS")
                    .filter(|n: &u64| *n > 0)
                    .unwrap_or(transcript_defaults.sweep_interval_secs),
                write_concurrency: parse_var(&lookup, "TRANSCRIPT_WRITE_CONCURRENCY")
                    .filter(|n: &usize| *n > 0)
                    .unwrap_or(transcript_defaults.write_concurrency),
            },
            rate_limit: RateLimitConfig {
                requests_per_second: parse_var(&lookup, "RATE_LIMIT_REQUESTS_PER_SECOND")
                    .unwrap_or_else(default_requests_per_second),
                burst: parse_var(&lookup, "RATE_LIMIT_BURST").unwrap_or_else(default_burst),
            },
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
