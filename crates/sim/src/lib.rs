//! Delivery tracking simulation engine.
//!
//! Drives a [`ordertrail_core::TrackingSession`] from the first stage to
//! the last, emitting a progress update at every checkpoint with bounded
//! retry and fallback, and recording completion through a
//! [`ordertrail_storage::CompletionStore`].

mod config;
mod engine;
mod fault;
mod sink;
mod watcher;

pub use config::SimConfig;
pub use engine::{Outcome, SimError, Simulator};
pub use fault::{FaultInjector, NoFaults, RandomFaults};
pub use sink::{SinkError, UpdateSink};
pub use watcher::CompletionWatcher;
