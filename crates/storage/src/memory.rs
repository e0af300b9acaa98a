//! In-memory completion store.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use super::{CompletionStore, Result};

/// Volatile completion store for tests and ephemeral runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    completed: AtomicBool,
}

impl MemoryStore {
    /// Create a store with the flag cleared.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CompletionStore for MemoryStore {
    async fn set_completed(&self, done: bool) -> Result<()> {
        self.completed.store(done, Ordering::SeqCst);
        Ok(())
    }

    async fn is_completed(&self) -> Result<bool> {
        Ok(self.completed.load(Ordering::SeqCst))
    }
}
