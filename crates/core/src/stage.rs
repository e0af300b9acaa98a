//! Delivery stage catalogue and progress arithmetic.

use serde::{Deserialize, Serialize};

use crate::Time;

/// A stage of the delivery journey.
///
/// Declaration order defines progression order. Each stage contributes a
/// fixed-length segment to the overall journey and carries the checkpoint
/// values the simulation pauses at within that segment. All stage data is
/// static; stages are cheap `Copy` values.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Stage {
    /// Order accepted by the restaurant
    Confirmed,
    /// Kitchen is preparing the order
    Preparing,
    /// Driver is on the way
    EnRoute,
    /// Order handed over to the customer
    Delivered,
}

const ALL: [Stage; 4] = [
    Stage::Confirmed,
    Stage::Preparing,
    Stage::EnRoute,
    Stage::Delivered,
];

impl Stage {
    /// All stages in progression order.
    pub fn all() -> &'static [Stage; 4] {
        &ALL
    }

    /// The first stage of every journey.
    pub fn first() -> Stage {
        ALL[0]
    }

    /// Customer-facing stage title.
    pub fn display_name(self) -> &'static str {
        match self {
            Stage::Confirmed => "Order Confirmed",
            Stage::Preparing => "Preparing Your Order",
            Stage::EnRoute => "On the Way",
            Stage::Delivered => "Delivered",
        }
    }

    /// Customer-facing stage description.
    pub fn description(self) -> &'static str {
        match self {
            Stage::Confirmed => "Your order has been confirmed and we're getting started",
            Stage::Preparing => "Our kitchen team is carefully preparing your meal",
            Stage::EnRoute => "Your driver is on their way to deliver your order",
            Stage::Delivered => "Your order has been successfully delivered. Enjoy!",
        }
    }

    /// Minutes remaining when this stage is reached. Zero marks the
    /// terminal stage.
    pub fn estimated_minutes(self) -> u32 {
        match self {
            Stage::Confirmed => 25,
            Stage::Preparing => 15,
            Stage::EnRoute => 8,
            Stage::Delivered => 0,
        }
    }

    /// Length this stage contributes to the total journey.
    pub fn segment_length(self) -> u32 {
        match self {
            Stage::Confirmed => 100,
            Stage::Preparing => 150,
            Stage::EnRoute => 120,
            Stage::Delivered => 30,
        }
    }

    /// Progress values reached within this stage's segment, in checkpoint
    /// order. Always non-empty; the last stage's final checkpoint equals
    /// its segment length.
    pub fn checkpoints(self) -> &'static [u32] {
        match self {
            Stage::Confirmed => &[25, 50, 75, 100],
            Stage::Preparing => &[50, 100, 150],
            Stage::EnRoute => &[40, 80, 120],
            Stage::Delivered => &[30],
        }
    }

    /// Coarse per-stage completion percentage, used by the degraded
    /// fallback rendering path.
    pub fn percent_complete(self) -> u8 {
        match self {
            Stage::Confirmed => 25,
            Stage::Preparing => 50,
            Stage::EnRoute => 75,
            Stage::Delivered => 100,
        }
    }

    /// The stage that follows this one, or `None` for the last stage.
    pub fn next(self) -> Option<Stage> {
        ALL.get(self.index() + 1).copied()
    }

    /// Whether this is the last stage of the journey.
    pub fn is_terminal(self) -> bool {
        self.next().is_none()
    }

    /// Sum of segment lengths of all stages strictly before this one.
    pub fn cumulative_progress(self) -> u32 {
        ALL[..self.index()].iter().map(|s| s.segment_length()).sum()
    }

    /// Absolute journey progress for a value within this stage's segment.
    pub fn total_progress(self, within_segment: u32) -> u32 {
        self.cumulative_progress() + within_segment
    }

    /// Absolute journey progress at a checkpoint index.
    ///
    /// An out-of-range index clamps to the full segment length. The
    /// simulation loop never passes one, but the clamp is part of the
    /// contract.
    pub fn progress_at(self, checkpoint_index: usize) -> u32 {
        let within = self
            .checkpoints()
            .get(checkpoint_index)
            .copied()
            .unwrap_or_else(|| self.segment_length());
        self.total_progress(within)
    }

    /// Total journey length across all segments.
    pub fn journey_total() -> u32 {
        ALL.iter().map(|s| s.segment_length()).sum()
    }

    /// Stages strictly before this one, in order. Empty for the first
    /// stage.
    pub fn completed_stages(self) -> &'static [Stage] {
        &ALL[..self.index()]
    }

    /// Estimated delivery time from `now`, or `None` once terminal.
    pub fn eta(self, now: Time) -> Option<Time> {
        if self.estimated_minutes() == 0 {
            return None;
        }
        Some(now + chrono::Duration::minutes(self.estimated_minutes() as i64))
    }

    fn index(self) -> usize {
        ALL.iter().position(|s| *s == self).unwrap_or(0)
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}
