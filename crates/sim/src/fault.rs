//! Simulated delivery-failure injection.
//!
//! There is no real network in the demo; failures are injected in front
//! of the sink with a fixed probability so the retry protocol has
//! something to do.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Decides whether an update attempt should be treated as failed.
pub trait FaultInjector: Send {
    /// Returns `true` when the current attempt should fail.
    fn should_fail(&mut self) -> bool;
}

/// Never fails. Used by tests and by runs with `--failure-rate 0`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFaults;

impl FaultInjector for NoFaults {
    fn should_fail(&mut self) -> bool {
        false
    }
}

/// Fails with a fixed probability per attempt.
pub struct RandomFaults {
    rng: SmallRng,
    rate: f32,
}

impl RandomFaults {
    /// Fault injector with entropy-seeded randomness.
    pub fn new(rate: f32) -> Self {
        Self {
            rng: SmallRng::from_entropy(),
            rate,
        }
    }

    /// Deterministic injector for reproducible runs.
    pub fn seeded(rate: f32, seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            rate,
        }
    }
}

impl FaultInjector for RandomFaults {
    fn should_fail(&mut self) -> bool {
        self.rng.gen::<f32>() < self.rate
    }
}
