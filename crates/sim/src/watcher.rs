//! Completion polling.
//!
//! The simulation loop and its observer never share memory; the observer
//! polls the completion store on its own schedule to reconcile what it
//! shows with what the loop recorded.

use std::time::Duration;

use ordertrail_storage::CompletionStore;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Polls the completion store until the flag is set or the watch is
/// cancelled.
pub struct CompletionWatcher<S> {
    store: S,
    poll_interval: Duration,
    cancel: CancellationToken,
}

impl<S: CompletionStore> CompletionWatcher<S> {
    /// Watcher with the reference 2 second polling interval.
    pub fn new(store: S, cancel: CancellationToken) -> Self {
        Self {
            store,
            poll_interval: Duration::from_secs(2),
            cancel,
        }
    }

    /// Set the polling interval.
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Poll until completion is observed or the watch is cancelled.
    ///
    /// Cancellation triggers one final read so a completion recorded just
    /// before the stop request is not missed. Returns whether completion
    /// was observed.
    pub async fn watch(self) -> bool {
        loop {
            match self.store.is_completed().await {
                Ok(true) => {
                    debug!("completion observed");
                    return true;
                }
                Ok(false) => {}
                Err(e) => warn!("completion check failed: {e}"),
            }

            tokio::select! {
                _ = tokio::time::sleep(self.poll_interval) => {}
                _ = self.cancel.cancelled() => {
                    return self.store.is_completed().await.unwrap_or(false);
                }
            }
        }
    }
}
