//! Completion-state persistence for delivery tracking.
//!
//! The simulation loop records journey completion through the
//! [`CompletionStore`] trait so an independently scheduled observer can
//! detect it after the loop's task has finished.

mod trait_;

mod json_store;
mod memory;

pub use trait_::{CompletionStore, Result, StorageError};

pub use json_store::JsonStore;
pub use memory::MemoryStore;
