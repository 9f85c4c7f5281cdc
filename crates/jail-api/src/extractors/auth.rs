//! Caller authentication extractor
//!
//! The host runtime presents `Authorization: Bearer <API_SHARED_SECRET>`.
//! When no secret is configured every caller is accepted.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use jail_common::AppError;
use subtle::ConstantTimeEq;

use crate::response::ApiError;
use crate::state::AppState;

/// Marker for a request that passed the shared-secret check
#[derive(Debug, Clone, Copy)]
pub struct HostCaller;

#[async_trait]
impl<S> FromRequestParts<S> for HostCaller
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let Some(expected) = app_state.config().api.shared_secret.as_deref() else {
            return Ok(HostCaller);
        };

        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::App(AppError::MissingAuth))?;

        if !secrets_match(bearer.token(), expected) {
            tracing::warn!("Rejected request with invalid shared secret");
            return Err(ApiError::App(AppError::InvalidSecret));
        }

        Ok(HostCaller)
    }
}

/// Constant-time comparison; only the length may leak
pub fn secrets_match(presented: &str, expected: &str) -> bool {
    presented.as_bytes().ct_eq(expected.as_bytes()).into()
}
