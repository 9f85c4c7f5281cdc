//! Route definitions
//!
//! Moderation routes are mounted under /api/v1; health probes sit at the root.

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{events, health, moderation};
use crate::state::AppState;

/// Create the API router (health routes are merged separately to bypass rate limiting)
pub fn create_router() -> Router<AppState> {
    Router::new().nest("/api/v1", api_v1_routes())
}

/// Health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .merge(guild_routes())
        .route("/events", post(events::accept_event))
}

/// Per-guild moderation commands
fn guild_routes() -> Router<AppState> {
    Router::new()
        .route("/guilds/:guild_id/jail", post(moderation::jail))
        .route("/guilds/:guild_id/unjail", post(moderation::unjail))
        .route("/guilds/:guild_id/jailcheck", post(moderation::jailcheck))
        .route("/guilds/:guild_id/scan-profiles", post(moderation::scan_profiles))
        .route("/guilds/:guild_id/commands", post(moderation::run_command))
}
