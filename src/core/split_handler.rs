//! Ordered split list with a cursor
//!
//! ```text
//!                    split(at)          restart()
//! Idle (0)           Active(1)          Idle
//! Active(n)          Active(n+1)        Idle
//! Active(len-1)      Finished           Idle
//! Finished (len)     Finished           Idle
//! ```
//!
//! The position is derived from the cursor; it is not stored separately.
//! The split list may only be replaced while idle, since its length decides
//! how many non-idle positions exist.

use super::span::TimeSpan;
use super::split::Split;

/// Where the cursor is in the split list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerPosition {
    /// Before the first split
    Idle,
    /// Some segments completed; holds the index of the next one
    Active(usize),
    /// Every segment completed
    Finished,
}

/// Owns the splits of a run and tracks attempt progress through them
#[derive(Debug, Clone, Default)]
pub struct SplitHandler {
    splits: Vec<Split>,
    cursor: usize,
}

impl SplitHandler {
    /// Create an idle handler over the given splits
    pub fn new(splits: Vec<Split>) -> Self {
        Self { splits, cursor: 0 }
    }

    /// Replace the split list. Ignored unless idle.
    pub fn set_splits(&mut self, splits: Vec<Split>) -> bool {
        if !self.is_idle() {
            log::warn!(
                "Attempted to set splits while not idle (cursor {}); ignoring",
                self.cursor
            );
            return false;
        }
        log::debug!("Loaded {} splits", splits.len());
        self.splits = splits;
        true
    }

    /// Complete the selected segment at absolute time `at` and advance.
    /// Does nothing once finished.
    pub fn split(&mut self, at: TimeSpan) {
        if self.is_finished() {
            return;
        }

        let prev = match self.cursor {
            0 => TimeSpan::ZERO,
            n => self.splits[n - 1].active_run_time,
        };
        self.splits[self.cursor].split(at, prev);
        self.cursor += 1;
    }

    /// Clear the attempt and return to idle
    ///
    /// PB times are promoted on every split only if the attempt was complete
    /// and the final split beat its stored PB. Returns whether that happened.
    pub fn restart(&mut self) -> bool {
        let is_pb = self.is_finished() && self.splits.last().is_some_and(Split::is_green);
        if is_pb {
            log::info!("New personal best across {} splits", self.splits.len());
        }

        for split in &mut self.splits {
            split.restart(is_pb);
        }
        self.cursor = 0;
        is_pb
    }

    pub fn splits(&self) -> &[Split] {
        &self.splits
    }

    /// Index of the next segment to complete
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.splits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.splits.is_empty()
    }

    /// Before the first split
    pub fn is_idle(&self) -> bool {
        self.cursor == 0
    }

    /// Every segment completed
    pub fn is_finished(&self) -> bool {
        self.cursor >= self.splits.len()
    }

    pub fn position(&self) -> HandlerPosition {
        if self.is_idle() {
            HandlerPosition::Idle
        } else if self.is_finished() {
            HandlerPosition::Finished
        } else {
            HandlerPosition::Active(self.cursor)
        }
    }
}
