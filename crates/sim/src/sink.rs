//! Update sink abstraction.

use async_trait::async_trait;
use ordertrail_core::TrackingUpdate;

/// Errors a sink can report for one delivery attempt.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    /// Simulated delivery failure injected by the engine
    #[error("simulated delivery failure")]
    Injected,

    /// The sink could not render the update
    #[error("render error: {0}")]
    Render(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Renders delivery progress somewhere visible.
///
/// Deliveries are best-effort and at-least-once from the engine's point
/// of view: an `Err` counts as one failed attempt and feeds the retry
/// protocol, nothing more. The fallback path is an independent degraded
/// rendering used once the retry bound is exhausted.
#[async_trait]
pub trait UpdateSink: Send + Sync {
    /// Deliver a progress update on the primary path.
    async fn deliver(&self, update: &TrackingUpdate) -> Result<(), SinkError>;

    /// Deliver a progress update on the degraded fallback path.
    async fn deliver_fallback(&self, update: &TrackingUpdate) -> Result<(), SinkError>;
}

#[async_trait]
impl<T: UpdateSink + ?Sized> UpdateSink for std::sync::Arc<T> {
    async fn deliver(&self, update: &TrackingUpdate) -> Result<(), SinkError> {
        (**self).deliver(update).await
    }

    async fn deliver_fallback(&self, update: &TrackingUpdate) -> Result<(), SinkError> {
        (**self).deliver_fallback(update).await
    }
}
