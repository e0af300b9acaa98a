//! JSON file completion store.
//!
//! Persists tracking state as a small `state.json` under a data
//! directory, so a restarted observer can still see whether the last
//! tracked delivery finished.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::debug;

use super::{CompletionStore, Result};

#[derive(Debug, Default, Serialize, Deserialize)]
struct TrackingState {
    delivery_completed: bool,
}

/// File-backed completion store.
pub struct JsonStore {
    root: PathBuf,
}

impl JsonStore {
    /// Create a store rooted at `root`, creating the directory if needed.
    pub async fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    fn state_path(&self) -> PathBuf {
        self.root.join("state.json")
    }

    async fn load_state(&self) -> Result<TrackingState> {
        match fs::read(self.state_path()).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(TrackingState::default()),
            Err(e) => Err(e.into()),
        }
    }

    async fn save_state(&self, state: &TrackingState) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(state)?;
        fs::write(self.state_path(), bytes).await?;
        Ok(())
    }
}

#[async_trait]
impl CompletionStore for JsonStore {
    async fn set_completed(&self, done: bool) -> Result<()> {
        debug!(done, "writing completion flag");
        self.save_state(&TrackingState {
            delivery_completed: done,
        })
        .await
    }

    async fn is_completed(&self) -> Result<bool> {
        Ok(self.load_state().await?.delivery_completed)
    }
}
