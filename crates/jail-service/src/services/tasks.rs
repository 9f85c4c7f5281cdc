//! Supervised background tasks
//!
//! Event handlers and the retention sweep run detached from the caller. A
//! failing task logs its error; it never propagates.

use std::future::Future;

use jail_core::GuildEvent;
use tokio::task::JoinHandle;
use tracing::{debug, error, Instrument};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::guard::GuardService;

/// Spawn `task`, logging its error instead of returning it
pub fn spawn_supervised<T, F>(name: &'static str, task: F) -> JoinHandle<()>
where
    T: Send + 'static,
    F: Future<Output = ServiceResult<T>> + Send + 'static,
{
    let span = tracing::info_span!("task", name);
    tokio::spawn(
        async move {
            match task.await {
                Ok(_) => debug!("Task finished"),
                Err(e) => error!(error = %e, code = e.error_code(), "Task failed"),
            }
        }
        .instrument(span),
    )
}

/// Handle a forwarded gateway event in the background
pub fn spawn_event(ctx: ServiceContext, event: GuildEvent) -> JoinHandle<()> {
    spawn_supervised(event.event_type(), async move {
        GuardService::new(&ctx).handle(&event).await
    })
}
