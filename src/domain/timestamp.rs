//! Execution-time clock values and deadlines.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Seconds since the Unix epoch, as seen by the execution environment.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Wraps a number of seconds.
    #[must_use]
    pub const fn from_secs(secs: u64) -> Self {
        Self(secs)
    }

    /// Returns the number of seconds.
    #[must_use]
    pub const fn as_secs(&self) -> u64 {
        self.0
    }

    /// Returns this timestamp shifted `secs` into the future, saturating.
    #[must_use]
    pub const fn plus_secs(&self, secs: u64) -> Self {
        Self(self.0.saturating_add(secs))
    }

    /// A deadline is missed only when the clock is strictly past it.
    #[must_use]
    pub const fn is_past(&self, deadline: Self) -> bool {
        self.0 > deadline.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t={}", self.0)
    }
}
