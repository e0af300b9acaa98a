//! Ordertrail core data models.
//!
//! This crate defines the delivery stage catalogue, the progress
//! arithmetic over it, and the artifact types the simulation hands to
//! update sinks. Everything here is pure data; I/O lives in the
//! storage and sim crates.

#![warn(missing_docs)]

// Identity
mod id;

// Journey model
mod stage;
mod session;
mod update;

// Re-exports
pub use id::OrderId;
pub use stage::Stage;
pub use session::TrackingSession;
pub use update::TrackingUpdate;

/// Timestamp type
pub type Time = chrono::DateTime<chrono::Utc>;
