//! Simulation timing and retry configuration.

use std::time::Duration;

/// Configuration for the delivery simulation.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Delay between checkpoints within a stage
    pub checkpoint_delay: Duration,
    /// Delay before transitioning to the next stage
    pub stage_transition_delay: Duration,
    /// Delay between update retry attempts
    pub retry_delay: Duration,
    /// How long the delivered state stays visible before the loop ends
    pub completion_display_delay: Duration,
    /// Max retry attempts per checkpoint update
    pub max_retries: u32,
    /// Probability of a simulated delivery failure per attempt
    pub failure_rate: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            checkpoint_delay: Duration::from_secs(3),
            stage_transition_delay: Duration::from_secs(6),
            retry_delay: Duration::from_secs(2),
            completion_display_delay: Duration::from_secs(8),
            max_retries: 3,
            failure_rate: 0.05,
        }
    }
}

impl SimConfig {
    /// Reference timing scaled down for quick demo runs.
    pub fn fast() -> Self {
        let reference = Self::default();
        Self {
            checkpoint_delay: reference.checkpoint_delay / 10,
            stage_transition_delay: reference.stage_transition_delay / 10,
            retry_delay: reference.retry_delay / 10,
            completion_display_delay: reference.completion_display_delay / 10,
            ..reference
        }
    }
}
