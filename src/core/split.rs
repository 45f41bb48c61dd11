//! A single segment of a run

use serde::{Deserialize, Serialize};
use std::fmt;

use super::span::TimeSpan;
use crate::formatting::format_delta;

/// One labelled segment with its personal-best and best-segment records
///
/// `active_run_time` belongs to the attempt in progress and is never persisted.
/// A zero value means the segment has not been completed this attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Split {
    /// Segment label
    #[serde(default, alias = "Name")]
    pub name: String,
    /// Absolute time at which this segment ended in the stored PB run
    #[serde(default, alias = "PBTime")]
    pub pb_time: TimeSpan,
    /// Shortest segment-only duration ever recorded
    #[serde(default, alias = "BestSegment")]
    pub best_segment: TimeSpan,
    /// Absolute time at which this segment ended in the current attempt
    #[serde(skip)]
    pub active_run_time: TimeSpan,
}

impl Split {
    /// Create a split with no stored times
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Create a split with stored PB and best-segment times
    pub fn with_times(name: impl Into<String>, pb_time: TimeSpan, best_segment: TimeSpan) -> Self {
        Self {
            name: name.into(),
            pb_time,
            best_segment,
            active_run_time: TimeSpan::ZERO,
        }
    }

    /// Record completion of this segment at `at`, where `prev` is the
    /// completion time of the previous segment (zero for the first one).
    ///
    /// `prev > at` is not rejected; the resulting negative segment time is
    /// compared as-is.
    pub fn split(&mut self, at: TimeSpan, prev: TimeSpan) {
        self.active_run_time = at;

        let segment_time = at - prev;
        if segment_time < self.best_segment {
            log::debug!(
                "New best segment for '{}': {} ms",
                self.name,
                segment_time.as_millis()
            );
            self.best_segment = segment_time;
        }
    }

    /// Clear the attempt time, first promoting it to the PB time if `is_pb`
    pub fn restart(&mut self, is_pb: bool) {
        if is_pb {
            self.pb_time = self.active_run_time;
        }
        self.active_run_time = TimeSpan::ZERO;
    }

    /// Whether this attempt has completed the segment
    pub fn is_completed(&self) -> bool {
        !self.active_run_time.is_zero()
    }

    /// Whether the current attempt is ahead of the stored PB at this segment
    pub fn is_green(&self) -> bool {
        self.is_completed() && self.active_run_time < self.pb_time
    }

    /// The attempt time when available, otherwise the PB reference
    pub fn display_time(&self) -> TimeSpan {
        if self.is_completed() {
            self.active_run_time
        } else {
            self.pb_time
        }
    }

    /// Signed difference against the PB, empty until completed this attempt
    pub fn delta(&self) -> String {
        if !self.is_completed() {
            return String::new();
        }
        format_delta((self.active_run_time - self.pb_time).as_millis())
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_time())
    }
}
