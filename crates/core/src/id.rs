//! Unique identifiers for tracked orders.

use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Unique identifier for an Order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderId(Ulid);

impl OrderId {
    /// Generate a new OrderId
    pub fn new() -> Self {
        Self(Ulid::new())
    }

    /// Short display form used in notification copy
    pub fn short(&self) -> String {
        let s = self.0.to_string();
        s[s.len() - 6..].to_string()
    }
}

impl Default for OrderId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for OrderId {
    type Err = ulid::DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}
