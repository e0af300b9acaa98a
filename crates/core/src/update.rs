//! The progress artifact handed to update sinks.

use serde::{Deserialize, Serialize};

use crate::{OrderId, Stage, Time};

/// One progress update for a tracked delivery.
///
/// Carries everything a sink needs to render the journey state without
/// reaching back into the session: stage, absolute progress, and the
/// display copy derived from them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingUpdate {
    /// The order being tracked
    pub order_id: OrderId,

    /// Stage at the time of the update
    pub stage: Stage,

    /// Absolute journey progress
    pub progress: u32,

    /// Total journey length, for scaling
    pub journey_total: u32,

    /// ETA display text, "Delivered!" once terminal
    pub eta_text: String,
}

impl TrackingUpdate {
    /// Build an update for the given position, computing ETA from `now`.
    pub fn new(order_id: OrderId, stage: Stage, progress: u32, now: Time) -> Self {
        let eta_text = match stage.eta(now) {
            Some(eta) => format!("ETA: {}", eta.format("%-I:%M %p")),
            None => "Delivered!".to_string(),
        };
        Self {
            order_id,
            stage,
            progress,
            journey_total: Stage::journey_total(),
            eta_text,
        }
    }

    /// Update title, the stage's display name.
    pub fn headline(&self) -> &'static str {
        self.stage.display_name()
    }

    /// Update body, the stage's customer-facing description.
    pub fn body(&self) -> &'static str {
        self.stage.description()
    }
}
