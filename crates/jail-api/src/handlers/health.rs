//! Health check handlers
//!
//! Endpoints for liveness and readiness probes.

use axum::{extract::State, http::StatusCode, Json};
use jail_service::dto::{HealthResponse, ReadinessChecks, ReadinessResponse};

use crate::state::AppState;

/// Basic health check (liveness probe)
///
/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// Readiness check with a configuration summary
///
/// GET /health/ready
pub async fn readiness_check(State(state): State<AppState>) -> (StatusCode, Json<ReadinessResponse>) {
    let ctx = state.service_context();

    let response = ReadinessResponse::ready(ReadinessChecks {
        allowed_guilds: ctx.jail_config().allowed_guild_ids.len(),
        purge_categories: ctx.jail_config().purge_category_ids.len(),
        transcript_dir: ctx.transcripts().dir().display().to_string(),
        auth_enabled: state.auth_enabled(),
    });
    let status = if response.status == "ready" {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response))
}
