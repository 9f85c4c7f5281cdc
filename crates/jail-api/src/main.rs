//! Jail API server entry point
//!
//! Run with:
//! ```bash
//! cargo run -p jail-api
//! ```
//!
//! Configuration is loaded from environment variables and an optional `.env`
//! file before logging starts, so the log format can follow `APP_ENV`.

use jail_common::{try_init_tracing_with_config, AppConfig, TracingConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = try_init_tracing_with_config(&TracingConfig::for_environment(config.app.env)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    info!(
        env = ?config.app.env,
        address = %config.api.address(),
        allowed_guilds = config.jail.allowed_guild_ids.len(),
        auth_enabled = config.api.shared_secret.is_some(),
        "Starting Jail API Server"
    );

    if let Err(e) = jail_api::run(config).await {
        error!(error = %e, "Server failed");
        std::process::exit(1);
    }
}
