//! Gateway event intake
//!
//! The host runtime forwards member join and member update events. They are
//! acknowledged immediately and handled in a supervised background task.

use axum::extract::State;
use jail_core::GuildEvent;
use jail_service::services::spawn_event;
use serde::Serialize;
use tracing::debug;

use crate::extractors::{HostCaller, JsonBody};
use crate::response::Accepted;
use crate::state::AppState;

/// Acknowledgement body for a forwarded event
#[derive(Debug, Serialize)]
pub struct EventAccepted {
    pub event_type: &'static str,
    pub guild_id: String,
}

/// Accept a forwarded gateway event
///
/// POST /events
pub async fn accept_event(
    State(state): State<AppState>,
    _caller: HostCaller,
    JsonBody(event): JsonBody<GuildEvent>,
) -> Accepted<EventAccepted> {
    let accepted = EventAccepted {
        event_type: event.event_type(),
        guild_id: event.guild_id().to_string(),
    };
    debug!(event_type = accepted.event_type, guild_id = %accepted.guild_id, "Event accepted");

    spawn_event(state.service_context().clone(), event);

    Accepted(accepted)
}
