//! Tracking session state.

use serde::{Deserialize, Serialize};

use crate::{OrderId, Stage, Time};

/// Mutable state for one simulated delivery.
///
/// Owned and mutated only by the simulation loop; observers read
/// completion through the completion store instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackingSession {
    /// The order being tracked
    pub order_id: OrderId,

    /// Current stage in the journey
    pub stage: Stage,

    /// Position within the current stage's checkpoint list
    pub checkpoint_index: usize,

    /// Transient retry counter, reset at each checkpoint
    pub retry_count: u32,

    /// When tracking started
    pub started_at: Time,
}

impl TrackingSession {
    /// Start a fresh session at the first stage.
    pub fn new(order_id: OrderId) -> Self {
        Self {
            order_id,
            stage: Stage::first(),
            checkpoint_index: 0,
            retry_count: 0,
            started_at: chrono::Utc::now(),
        }
    }

    /// Absolute journey progress at the session's current position.
    pub fn progress(&self) -> u32 {
        self.stage.progress_at(self.checkpoint_index)
    }

    /// Move to the first checkpoint of `stage`.
    pub fn enter_stage(&mut self, stage: Stage) {
        self.stage = stage;
        self.checkpoint_index = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_starts_at_first_checkpoint() {
        let session = TrackingSession::new(OrderId::new());
        assert_eq!(session.stage, Stage::Confirmed);
        assert_eq!(session.checkpoint_index, 0);
        assert_eq!(session.retry_count, 0);
        assert_eq!(session.progress(), 25);
    }

    #[test]
    fn test_enter_stage_resets_checkpoint() {
        let mut session = TrackingSession::new(OrderId::new());
        session.checkpoint_index = 3;
        session.enter_stage(Stage::Preparing);
        assert_eq!(session.stage, Stage::Preparing);
        assert_eq!(session.checkpoint_index, 0);
        assert_eq!(session.progress(), 150);
    }

    #[test]
    fn test_session_serde_roundtrip() {
        let session = TrackingSession::new(OrderId::new());
        let json = serde_json::to_string(&session).unwrap();
        let back: TrackingSession = serde_json::from_str(&json).unwrap();
        assert_eq!(back.order_id, session.order_id);
        assert_eq!(back.stage, session.stage);
    }
}
