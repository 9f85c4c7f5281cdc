//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize` and `Validate` for input validation.
//! Snowflakes are accepted as strings.

use jail_core::Snowflake;
use serde::Deserialize;
use validator::{Validate, ValidationError};

fn validate_reason(reason: &str) -> Result<(), ValidationError> {
    if reason.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("A reason is required".into());
        return Err(err);
    }
    Ok(())
}

// ============================================================================
// Moderation Requests
// ============================================================================

/// Jail one or more members
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct JailRequest {
    /// Member invoking the command
    pub actor_id: Snowflake,

    #[validate(length(min = 1, message = "At least one user is required"))]
    pub user_ids: Vec<Snowflake>,

    #[validate(
        length(max = 512, message = "Reason must be at most 512 characters"),
        custom(function = "validate_reason")
    )]
    pub reason: String,

    /// Channel the command was typed in
    #[serde(default)]
    pub channel_id: Option<Snowflake>,
}

/// Release one or more members
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UnjailRequest {
    pub actor_id: Snowflake,

    #[validate(length(min = 1, message = "At least one user is required"))]
    pub user_ids: Vec<Snowflake>,

    #[validate(
        length(max = 512, message = "Reason must be at most 512 characters"),
        custom(function = "validate_reason")
    )]
    pub reason: String,

    #[serde(default)]
    pub channel_id: Option<Snowflake>,
}

/// Commands that only need the invoking member (jailcheck, scan-profiles)
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ActorRequest {
    pub actor_id: Snowflake,

    #[serde(default)]
    pub channel_id: Option<Snowflake>,
}

/// Raw chat command forwarded by the host runtime
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TextCommandRequest {
    pub actor_id: Snowflake,

    #[serde(default)]
    pub channel_id: Option<Snowflake>,

    #[validate(length(min = 1, max = 4000, message = "Command must be 1-4000 characters"))]
    pub content: String,
}
