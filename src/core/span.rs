//! Signed split times
//!
//! Split times are absolute offsets from the start of an attempt. They are kept
//! signed so that a segment computed from out-of-order splits still compares
//! as a negative duration instead of saturating at zero.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Sub;
use std::time::Duration;

use crate::formatting::format_time;

const NANOS_PER_MILLI: i64 = 1_000_000;

/// A signed span of time with nanosecond resolution
///
/// Serializes as a bare integer of nanoseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimeSpan(i64);

impl TimeSpan {
    pub const ZERO: TimeSpan = TimeSpan(0);

    /// Create a span from a nanosecond count
    pub const fn from_nanos(nanos: i64) -> Self {
        Self(nanos)
    }

    /// Create a span from a millisecond count
    pub const fn from_millis(millis: i64) -> Self {
        Self(millis.saturating_mul(NANOS_PER_MILLI))
    }

    /// Create a span from whole seconds
    pub const fn from_secs(secs: i64) -> Self {
        Self::from_millis(secs.saturating_mul(1000))
    }

    /// Convert an unsigned duration, saturating at `i64::MAX` nanoseconds
    pub fn from_duration(duration: Duration) -> Self {
        Self(i64::try_from(duration.as_nanos()).unwrap_or(i64::MAX))
    }

    /// Convert an unsigned duration, dropping everything below a millisecond
    pub fn from_duration_millis(duration: Duration) -> Self {
        let millis = i64::try_from(duration.as_millis()).unwrap_or(i64::MAX / NANOS_PER_MILLI);
        Self::from_millis(millis)
    }

    pub const fn as_nanos(self) -> i64 {
        self.0
    }

    /// Whole milliseconds, truncated toward zero
    pub const fn as_millis(self) -> i64 {
        self.0 / NANOS_PER_MILLI
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }
}

impl Sub for TimeSpan {
    type Output = TimeSpan;

    fn sub(self, rhs: TimeSpan) -> TimeSpan {
        TimeSpan(self.0.saturating_sub(rhs.0))
    }
}

impl From<Duration> for TimeSpan {
    fn from(duration: Duration) -> Self {
        Self::from_duration(duration)
    }
}

impl fmt::Display for TimeSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_time(self.as_millis()))
    }
}
