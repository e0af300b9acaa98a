//! The simulation engine - walks a delivery journey end to end.
//!
//! ```text
//! Stage -> checkpoint updates (with bounded retry) -> next stage -> ... -> completed
//! ```
//!
//! The loop is cooperative: cancellation is checked at the top of every
//! stage and checkpoint iteration, and every delay races the
//! cancellation token, so a stop request takes effect at the next
//! suspension point.

use std::time::Duration;

use ordertrail_core::{OrderId, Stage, TrackingSession, TrackingUpdate};
use ordertrail_storage::CompletionStore;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::{FaultInjector, SimConfig, SinkError, UpdateSink};

/// Errors that can escape the journey body.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// Completion store failure
    #[error("storage error: {0}")]
    Storage(#[from] ordertrail_storage::StorageError),
}

/// Terminal state of a simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The journey reached its last checkpoint and completion was recorded
    Completed,
    /// Cancelled before the journey finished; completion stays unset
    Cancelled,
    /// The loop failed unexpectedly; a final fallback update was attempted
    Failed,
}

/// Drives one tracking session from the first stage to the last.
pub struct Simulator<S, K, F> {
    store: S,
    sink: K,
    faults: F,
    config: SimConfig,
    cancel: CancellationToken,
    session: TrackingSession,
}

impl<S, K, F> Simulator<S, K, F>
where
    S: CompletionStore,
    K: UpdateSink,
    F: FaultInjector,
{
    /// Create a simulator with the reference timing.
    pub fn new(store: S, sink: K, faults: F, cancel: CancellationToken) -> Self {
        Self {
            store,
            sink,
            faults,
            config: SimConfig::default(),
            cancel,
            session: TrackingSession::new(OrderId::new()),
        }
    }

    /// Set the configuration.
    pub fn with_config(mut self, config: SimConfig) -> Self {
        self.config = config;
        self
    }

    /// The order this simulator tracks.
    pub fn order_id(&self) -> OrderId {
        self.session.order_id
    }

    /// Run the journey to a terminal state.
    ///
    /// All failures are contained here: a simulated delivery failure is
    /// retried and then degraded per checkpoint, and anything escaping
    /// the journey body is converted into a single best-effort fallback
    /// update from the last known position. Nothing is surfaced to the
    /// caller beyond the [`Outcome`].
    pub async fn run(mut self) -> Outcome {
        // A fresh run invalidates any previous completion marker.
        if let Err(e) = self.store.set_completed(false).await {
            warn!("failed to clear completion flag: {e}");
        }

        info!(order = %self.session.order_id, "starting delivery tracking");

        match self.journey().await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("delivery simulation failed: {e}");
                let update = self.current_update();
                if let Err(fe) = self.sink.deliver_fallback(&update).await {
                    error!("final fallback update failed: {fe}");
                }
                Outcome::Failed
            }
        }
    }

    async fn journey(&mut self) -> Result<Outcome, SimError> {
        for &stage in Stage::all() {
            if self.cancel.is_cancelled() {
                info!("delivery tracking cancelled");
                return Ok(Outcome::Cancelled);
            }

            self.session.enter_stage(stage);
            info!(stage = %stage, "starting stage");

            let checkpoint_count = stage.checkpoints().len();
            for index in 0..checkpoint_count {
                if self.cancel.is_cancelled() {
                    info!("delivery tracking cancelled");
                    return Ok(Outcome::Cancelled);
                }

                self.session.checkpoint_index = index;
                debug!(
                    stage = %stage,
                    index,
                    progress = self.session.progress(),
                    "reached checkpoint"
                );

                self.update_with_retry().await;

                if index + 1 < checkpoint_count
                    && !self.pause(self.config.checkpoint_delay).await
                {
                    return Ok(Outcome::Cancelled);
                }
            }

            if !stage.is_terminal() {
                debug!(stage = %stage, "waiting before next stage");
                if !self.pause(self.config.stage_transition_delay).await {
                    return Ok(Outcome::Cancelled);
                }
            }
        }

        // Keep the delivered state visible before finishing.
        if !self.pause(self.config.completion_display_delay).await {
            return Ok(Outcome::Cancelled);
        }

        self.store.set_completed(true).await?;
        info!(order = %self.session.order_id, "delivery journey complete");
        Ok(Outcome::Completed)
    }

    /// Per-checkpoint update protocol: bounded retry, then one fallback.
    ///
    /// Failures never leave this method; a checkpoint whose fallback also
    /// fails is logged and the journey moves on.
    async fn update_with_retry(&mut self) {
        self.session.retry_count = 0;

        loop {
            match self.attempt_update().await {
                Ok(()) => {
                    self.session.retry_count = 0;
                    return;
                }
                Err(e) => {
                    self.session.retry_count += 1;
                    warn!(
                        attempt = self.session.retry_count,
                        max = self.config.max_retries + 1,
                        "update delivery failed: {e}"
                    );

                    if self.session.retry_count <= self.config.max_retries {
                        if !self.pause(self.config.retry_delay).await {
                            return;
                        }
                    } else {
                        let update = self.current_update();
                        if let Err(fe) = self.sink.deliver_fallback(&update).await {
                            error!("fallback update failed: {fe}");
                        }
                        return;
                    }
                }
            }
        }
    }

    async fn attempt_update(&mut self) -> Result<(), SinkError> {
        if self.faults.should_fail() {
            return Err(SinkError::Injected);
        }
        let update = self.current_update();
        self.sink.deliver(&update).await
    }

    fn current_update(&self) -> TrackingUpdate {
        TrackingUpdate::new(
            self.session.order_id,
            self.session.stage,
            self.session.progress(),
            chrono::Utc::now(),
        )
    }

    /// Sleeps for `delay`, returning `false` if cancelled mid-sleep.
    async fn pause(&self, delay: Duration) -> bool {
        tokio::select! {
            _ = tokio::time::sleep(delay) => true,
            _ = self.cancel.cancelled() => {
                info!("delivery tracking cancelled");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use ordertrail_storage::{MemoryStore, Result as StoreResult, StorageError};

    use super::*;
    use crate::NoFaults;

    /// Sink that records deliveries and can fail the first N attempts.
    #[derive(Default)]
    struct RecordingSink {
        delivered: Mutex<Vec<TrackingUpdate>>,
        attempts: AtomicUsize,
        fallbacks: AtomicUsize,
        fail_first: AtomicUsize,
        fail_fallback: bool,
    }

    #[async_trait]
    impl UpdateSink for RecordingSink {
        async fn deliver(&self, update: &TrackingUpdate) -> Result<(), SinkError> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            if self.fail_first.load(Ordering::SeqCst) > 0 {
                self.fail_first.fetch_sub(1, Ordering::SeqCst);
                return Err(SinkError::Render("sink offline".into()));
            }
            self.delivered.lock().unwrap().push(update.clone());
            Ok(())
        }

        async fn deliver_fallback(&self, _update: &TrackingUpdate) -> Result<(), SinkError> {
            self.fallbacks.fetch_add(1, Ordering::SeqCst);
            if self.fail_fallback {
                return Err(SinkError::Render("fallback offline".into()));
            }
            Ok(())
        }
    }

    /// Sink that requests cancellation after a fixed number of deliveries.
    struct CancellingSink {
        inner: Arc<RecordingSink>,
        cancel_after: usize,
        cancel: CancellationToken,
    }

    #[async_trait]
    impl UpdateSink for CancellingSink {
        async fn deliver(&self, update: &TrackingUpdate) -> Result<(), SinkError> {
            self.inner.deliver(update).await?;
            if self.inner.delivered.lock().unwrap().len() == self.cancel_after {
                self.cancel.cancel();
            }
            Ok(())
        }

        async fn deliver_fallback(&self, update: &TrackingUpdate) -> Result<(), SinkError> {
            self.inner.deliver_fallback(update).await
        }
    }

    /// Store that counts completion writes and can fail them.
    #[derive(Default)]
    struct CountingStore {
        inner: MemoryStore,
        completions: AtomicUsize,
        fail_completion: bool,
    }

    #[async_trait]
    impl CompletionStore for CountingStore {
        async fn set_completed(&self, done: bool) -> StoreResult<()> {
            if done {
                self.completions.fetch_add(1, Ordering::SeqCst);
                if self.fail_completion {
                    return Err(StorageError::Io(std::io::Error::new(
                        std::io::ErrorKind::Other,
                        "disk full",
                    )));
                }
            }
            self.inner.set_completed(done).await
        }

        async fn is_completed(&self) -> StoreResult<bool> {
            self.inner.is_completed().await
        }
    }

    /// Injector that fails every attempt.
    struct AlwaysFail;

    impl FaultInjector for AlwaysFail {
        fn should_fail(&mut self) -> bool {
            true
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_run_emits_one_update_per_checkpoint() {
        let store = Arc::new(CountingStore::default());
        let sink = Arc::new(RecordingSink::default());
        let started = tokio::time::Instant::now();

        let sim = Simulator::new(
            store.clone(),
            sink.clone(),
            NoFaults,
            CancellationToken::new(),
        );
        let outcome = sim.run().await;

        assert_eq!(outcome, Outcome::Completed);

        let delivered = sink.delivered.lock().unwrap();
        assert_eq!(delivered.len(), 11);
        assert_eq!(delivered[0].progress, 25);
        assert_eq!(delivered[10].progress, 400);
        assert_eq!(delivered[10].stage, Stage::Delivered);
        assert_eq!(sink.fallbacks.load(Ordering::SeqCst), 0);

        // Flag set exactly once, after every update.
        assert_eq!(store.completions.load(Ordering::SeqCst), 1);
        assert!(store.is_completed().await.unwrap());

        // Reference timing: 7 checkpoint gaps of 3s, 3 stage transitions
        // of 6s, one 8s post-completion delay.
        assert_eq!(started.elapsed(), Duration::from_secs(21 + 18 + 8));
    }

    #[tokio::test(start_paused = true)]
    async fn test_updates_follow_checkpoint_order() {
        let store = Arc::new(MemoryStore::new());
        let sink = Arc::new(RecordingSink::default());

        let sim = Simulator::new(store, sink.clone(), NoFaults, CancellationToken::new());
        sim.run().await;

        let progress: Vec<u32> = sink
            .delivered
            .lock()
            .unwrap()
            .iter()
            .map(|u| u.progress)
            .collect();
        assert_eq!(
            progress,
            vec![25, 50, 75, 100, 150, 200, 250, 290, 330, 370, 400]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_before_start_emits_nothing() {
        let store = Arc::new(CountingStore::default());
        let sink = Arc::new(RecordingSink::default());
        let cancel = CancellationToken::new();
        cancel.cancel();

        let sim = Simulator::new(store.clone(), sink.clone(), NoFaults, cancel);
        let outcome = sim.run().await;

        assert_eq!(outcome, Outcome::Cancelled);
        assert!(sink.delivered.lock().unwrap().is_empty());
        assert_eq!(store.completions.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_mid_run_leaves_completion_unset() {
        let store = Arc::new(CountingStore::default());
        let inner = Arc::new(RecordingSink::default());
        let cancel = CancellationToken::new();
        let sink = CancellingSink {
            inner: inner.clone(),
            cancel_after: 5,
            cancel: cancel.clone(),
        };

        let sim = Simulator::new(store.clone(), sink, NoFaults, cancel);
        let outcome = sim.run().await;

        assert_eq!(outcome, Outcome::Cancelled);
        assert_eq!(inner.delivered.lock().unwrap().len(), 5);
        assert_eq!(store.completions.load(Ordering::SeqCst), 0);
        assert!(!store.is_completed().await.unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_sink_failures_are_retried() {
        let store = Arc::new(MemoryStore::new());
        let sink = Arc::new(RecordingSink {
            fail_first: AtomicUsize::new(2),
            ..Default::default()
        });

        let sim = Simulator::new(
            store.clone(),
            sink.clone(),
            NoFaults,
            CancellationToken::new(),
        );
        let outcome = sim.run().await;

        assert_eq!(outcome, Outcome::Completed);
        assert_eq!(sink.delivered.lock().unwrap().len(), 11);
        assert_eq!(sink.attempts.load(Ordering::SeqCst), 13);
        assert_eq!(sink.fallbacks.load(Ordering::SeqCst), 0);
        assert!(store.is_completed().await.unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_retries_fall_back_once_per_checkpoint() {
        let store = Arc::new(MemoryStore::new());
        let sink = Arc::new(RecordingSink::default());

        let sim = Simulator::new(
            store.clone(),
            sink.clone(),
            AlwaysFail,
            CancellationToken::new(),
        );
        let outcome = sim.run().await;

        // Per-checkpoint failures never abort the journey.
        assert_eq!(outcome, Outcome::Completed);
        assert!(sink.delivered.lock().unwrap().is_empty());
        assert_eq!(sink.attempts.load(Ordering::SeqCst), 0);
        assert_eq!(sink.fallbacks.load(Ordering::SeqCst), 11);
        assert!(store.is_completed().await.unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_fallback_failure_is_swallowed() {
        let store = Arc::new(MemoryStore::new());
        let sink = Arc::new(RecordingSink {
            fail_fallback: true,
            ..Default::default()
        });

        let sim = Simulator::new(
            store.clone(),
            sink.clone(),
            AlwaysFail,
            CancellationToken::new(),
        );
        let outcome = sim.run().await;

        assert_eq!(outcome, Outcome::Completed);
        assert_eq!(sink.fallbacks.load(Ordering::SeqCst), 11);
        assert!(store.is_completed().await.unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_storage_failure_triggers_final_fallback() {
        let store = Arc::new(CountingStore {
            fail_completion: true,
            ..Default::default()
        });
        let sink = Arc::new(RecordingSink::default());

        let sim = Simulator::new(
            store.clone(),
            sink.clone(),
            NoFaults,
            CancellationToken::new(),
        );
        let outcome = sim.run().await;

        assert_eq!(outcome, Outcome::Failed);
        assert_eq!(sink.delivered.lock().unwrap().len(), 11);
        // One extra fallback from the outer boundary, last known state.
        assert_eq!(sink.fallbacks.load(Ordering::SeqCst), 1);
        assert!(!store.is_completed().await.unwrap());
    }
}
