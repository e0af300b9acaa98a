//! Completion store abstraction.

use async_trait::async_trait;

/// Error type for store operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur while reading or writing completion state.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Durable completion flag for a tracked delivery.
///
/// A single boolean under a fixed key with last-write-wins semantics.
/// The simulation loop is the only writer and writes are idempotent, so
/// no transactional guarantees are needed.
#[async_trait]
pub trait CompletionStore: Send + Sync {
    /// Set or clear the completion flag.
    async fn set_completed(&self, done: bool) -> Result<()>;

    /// Read the completion flag. Missing state reads as `false`.
    async fn is_completed(&self) -> Result<bool>;
}

#[async_trait]
impl<T: CompletionStore + ?Sized> CompletionStore for std::sync::Arc<T> {
    async fn set_completed(&self, done: bool) -> Result<()> {
        (**self).set_completed(done).await
    }

    async fn is_completed(&self) -> Result<bool> {
        (**self).is_completed().await
    }
}
