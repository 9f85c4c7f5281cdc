//! Transcript retention sweeper
//!
//! Deletes expired transcripts once at startup and then on every interval
//! tick until shutdown is signalled.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{error, info};

use super::transcript::TranscriptStore;

/// Periodic transcript cleanup
pub struct RetentionSweeper {
    store: Arc<TranscriptStore>,
    interval: Duration,
}

impl RetentionSweeper {
    pub fn new(store: Arc<TranscriptStore>, interval: Duration) -> Self {
        Self { store, interval }
    }

    /// Run until `shutdown` flips to `true` or its sender is dropped
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(
            dir = %self.store.dir().display(),
            interval_secs = self.interval.as_secs(),
            "Transcript retention sweeper started"
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = self.store.sweep_expired(Utc::now()).await {
                        error!(error = %e, "Transcript retention sweep failed");
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        info!("Transcript retention sweeper stopped");
    }

    /// Spawn the sweeper on the runtime
    pub fn spawn(self, shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(self.run(shutdown))
    }
}
