//! Error bodies

use serde::Deserialize;

/// JSON error body returned with 4xx responses
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorModel {
    #[serde(default)]
    pub code: u32,
    #[serde(default)]
    pub message: String,
}

/// JSON body of a 429 response
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitModel {
    /// Seconds, fractional
    pub retry_after: f64,
    #[serde(default)]
    pub global: bool,
    #[serde(default)]
    pub message: String,
}
