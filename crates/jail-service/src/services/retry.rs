//! Rate-limit retry
//!
//! Only an explicit rate limit from the platform is retried. The wait is the
//! server-provided interval, or the configured default when none was sent.

use std::future::Future;

use jail_common::PurgeConfig;
use jail_core::{ClientResult, DomainError};
use tracing::warn;

/// Run `op`, retrying up to `policy.max_retries` times on `RateLimited`
///
/// Any other error, or a rate limit after the last retry, is returned as is.
pub async fn retry_on_rate_limit<T, F, Fut>(policy: &PurgeConfig, operation: &'static str, mut op: F) -> ClientResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ClientResult<T>>,
{
    let mut attempt = 0;
    loop {
        match op().await {
            Err(err) if should_retry(policy, &err, attempt) => {
                attempt += 1;
                back_off(policy, operation, &err, attempt).await;
            }
            result => return result,
        }
    }
}

/// Whether `err` still allows another attempt after `attempt` retries
pub(crate) fn should_retry(policy: &PurgeConfig, err: &DomainError, attempt: u32) -> bool {
    err.is_rate_limited() && attempt < policy.max_retries
}

/// Sleep for the server interval, or the default backoff when none was sent
pub(crate) async fn back_off(policy: &PurgeConfig, operation: &'static str, err: &DomainError, attempt: u32) {
    let wait = err.retry_after().unwrap_or_else(|| policy.default_backoff());
    warn!(
        operation,
        attempt,
        wait_ms = wait.as_millis() as u64,
        "Rate limited, retrying"
    );
    tokio::time::sleep(wait).await;
}
