//! User intents and the transitions they produce

use serde::{Deserialize, Serialize};
use std::fmt;

use super::span::TimeSpan;

/// The three user-facing inputs of the timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// Start the attempt, or complete the current segment
    Split,
    /// Toggle pause
    Pause,
    /// Cancel the attempt, or clear a stopped one
    Stop,
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Intent::Split => "split",
            Intent::Pause => "pause",
            Intent::Stop => "stop",
        };
        f.write_str(name)
    }
}

/// What an intent did to the time machine
///
/// Returned to the caller; the timing core never calls out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimingEvent {
    /// The clock started; no segment was completed
    Started,
    /// A segment was completed and the attempt continues
    Split {
        /// Index of the completed segment
        index: usize,
        /// Absolute attempt time of the split
        time: TimeSpan,
    },
    /// The last segment was completed and the clock stopped
    Finished {
        /// Index of the final segment, `None` for an empty split list
        index: Option<usize>,
        time: TimeSpan,
    },
    Paused,
    Resumed,
    /// The attempt was stopped before completing every segment
    Cancelled,
    /// Both machines returned to idle
    Reset {
        /// Whether the attempt just cleared set a new personal best
        personal_best: bool,
    },
    /// The intent has no effect in the current state
    Ignored,
}

impl TimingEvent {
    /// Whether the intent changed anything
    pub fn is_transition(&self) -> bool {
        !matches!(self, TimingEvent::Ignored)
    }
}
