//! Mapping of REST failures to domain errors

use std::time::Duration;

use jail_core::error::DomainError;
use reqwest::header::HeaderMap;
use reqwest::StatusCode;

use crate::models::{ApiErrorModel, RateLimitModel};

/// JSON error codes for unknown resources
pub const UNKNOWN_CHANNEL: u32 = 10003;
pub const UNKNOWN_GUILD: u32 = 10004;
pub const UNKNOWN_MEMBER: u32 = 10007;
pub const UNKNOWN_MESSAGE: u32 = 10008;
pub const UNKNOWN_ROLE: u32 = 10011;
pub const UNKNOWN_USER: u32 = 10013;

/// Convert a transport-level reqwest error
pub fn map_transport_error(e: reqwest::Error) -> DomainError {
    if e.is_decode() {
        DomainError::InternalError(format!("Malformed response body: {e}"))
    } else {
        DomainError::TransportError(e.to_string())
    }
}

/// Seconds to wait, from the JSON body or the `Retry-After` header
pub fn retry_after(headers: &HeaderMap, body: &[u8]) -> Option<Duration> {
    let from_body = serde_json::from_slice::<RateLimitModel>(body)
        .ok()
        .map(|model| model.retry_after);
    let from_header = || {
        headers
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse::<f64>().ok())
    };
    from_body
        .or_else(from_header)
        .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
}

/// Convert a non-success response into a domain error
///
/// `on_not_found` receives the JSON error code (if any) and picks the
/// matching not-found variant.
pub fn map_status_error<F>(
    status: StatusCode,
    headers: &HeaderMap,
    body: &[u8],
    on_not_found: F,
) -> DomainError
where
    F: FnOnce(Option<u32>) -> DomainError,
{
    let api_error = serde_json::from_slice::<ApiErrorModel>(body).ok();
    let code = api_error.as_ref().map(|e| e.code).filter(|c| *c != 0);
    let message = api_error
        .map(|e| e.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| String::from_utf8_lossy(body).into_owned());

    match status {
        StatusCode::TOO_MANY_REQUESTS => DomainError::RateLimited {
            retry_after: retry_after(headers, body),
        },
        StatusCode::FORBIDDEN => DomainError::MissingPermission(message),
        StatusCode::NOT_FOUND => on_not_found(code),
        _ => DomainError::HttpError {
            status: status.as_u16(),
            message,
        },
    }
}
