//! Coordinator for the timer and the split handler
//!
//! ```text
//!              split         pause      stop
//! Idle         Active*       -          -
//! Active       Active/Fin    Paused     Cancelled
//! Paused       -             Active     Cancelled
//! Cancelled    -             -          Idle
//! Finished     -             -          Idle
//! ```
//!
//! `*` the first split only starts the clock; it does not complete a segment.
//! The time machine is the only writer of both sub-machines, so no other
//! combination of their states is reachable.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::clock::{SharedClock, SystemClock};
use super::events::{Intent, TimingEvent};
use super::span::TimeSpan;
use super::split::Split;
use super::split_handler::SplitHandler;
use super::timer::{Timer, TimerState};

/// Composite state of the time machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MachineState {
    /// Timer idle, no segment completed
    Idle,
    /// Timer running, segments remaining
    Active,
    /// Timer paused, segments remaining
    Paused,
    /// Timer stopped before the last segment
    Cancelled,
    /// Timer stopped after the last segment
    Finished,
}

impl fmt::Display for MachineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MachineState::Idle => "idle",
            MachineState::Active => "active",
            MachineState::Paused => "paused",
            MachineState::Cancelled => "cancelled",
            MachineState::Finished => "finished",
        };
        f.write_str(name)
    }
}

/// One timer and one split handler behind the split/pause/stop intents
#[derive(Debug)]
pub struct TimeMachine {
    timer: Timer,
    handler: SplitHandler,
}

impl TimeMachine {
    /// Create an idle time machine over `splits`
    pub fn new(splits: Vec<Split>, clock: SharedClock) -> Self {
        Self {
            timer: Timer::new(clock),
            handler: SplitHandler::new(splits),
        }
    }

    /// Create an idle time machine driven by the system clock
    pub fn with_system_clock(splits: Vec<Split>) -> Self {
        Self::new(splits, SystemClock::shared())
    }

    /// Composite state derived from both sub-machines
    pub fn state(&self) -> MachineState {
        let finished = self.handler.is_finished();
        match (self.timer.state(), finished) {
            (TimerState::Idle, _) if self.handler.is_idle() => MachineState::Idle,
            (TimerState::Running, false) => MachineState::Active,
            (TimerState::Paused, false) => MachineState::Paused,
            (TimerState::Stopped, false) => MachineState::Cancelled,
            (TimerState::Stopped, true) => MachineState::Finished,
            (timer, _) => {
                debug_assert!(
                    false,
                    "unreachable state: timer {} with cursor {}/{}",
                    timer,
                    self.handler.cursor(),
                    self.handler.len()
                );
                log::error!(
                    "Inconsistent time machine (timer {}, cursor {}/{}); treating as cancelled",
                    timer,
                    self.handler.cursor(),
                    self.handler.len()
                );
                MachineState::Cancelled
            }
        }
    }

    /// Start the attempt, or complete the current segment
    pub fn split(&mut self) -> TimingEvent {
        match self.state() {
            MachineState::Idle => {
                self.timer.start();
                if self.handler.is_finished() {
                    // Nothing to split; the attempt is over as soon as it begins
                    self.timer.stop();
                    return TimingEvent::Finished {
                        index: None,
                        time: TimeSpan::ZERO,
                    };
                }
                TimingEvent::Started
            }
            MachineState::Active => {
                let now = self.timer.now();
                let time = TimeSpan::from_duration_millis(self.timer.elapsed_at(now));
                let index = self.handler.cursor();
                self.handler.split(time);
                log::debug!("Split {} at {} ms", index, time.as_millis());

                if self.handler.is_finished() {
                    self.timer.stop_at(now);
                    log::info!("Attempt finished at {}", time);
                    TimingEvent::Finished {
                        index: Some(index),
                        time,
                    }
                } else {
                    TimingEvent::Split { index, time }
                }
            }
            MachineState::Paused | MachineState::Cancelled | MachineState::Finished => {
                TimingEvent::Ignored
            }
        }
    }

    /// Toggle pause
    pub fn pause(&mut self) -> TimingEvent {
        match self.state() {
            MachineState::Active => {
                self.timer.pause();
                TimingEvent::Paused
            }
            MachineState::Paused => {
                self.timer.resume();
                TimingEvent::Resumed
            }
            MachineState::Idle | MachineState::Cancelled | MachineState::Finished => {
                TimingEvent::Ignored
            }
        }
    }

    /// Cancel the attempt, or clear a stopped one back to idle
    pub fn stop(&mut self) -> TimingEvent {
        match self.state() {
            MachineState::Active | MachineState::Paused => {
                self.timer.stop();
                log::info!("Attempt cancelled at {}", self.timer);
                TimingEvent::Cancelled
            }
            MachineState::Cancelled | MachineState::Finished => {
                self.timer.restart();
                let personal_best = self.handler.restart();
                TimingEvent::Reset { personal_best }
            }
            MachineState::Idle => TimingEvent::Ignored,
        }
    }

    /// Dispatch an intent
    pub fn apply(&mut self, intent: Intent) -> TimingEvent {
        match intent {
            Intent::Split => self.split(),
            Intent::Pause => self.pause(),
            Intent::Stop => self.stop(),
        }
    }

    /// Replace the split list. Ignored unless idle.
    pub fn set_splits(&mut self, splits: Vec<Split>) -> bool {
        if self.state() != MachineState::Idle {
            log::warn!(
                "Attempted to load splits while {}; ignoring",
                self.state()
            );
            return false;
        }
        self.handler.set_splits(splits)
    }

    pub fn splits(&self) -> &[Split] {
        self.handler.splits()
    }

    /// Index of the next segment to complete
    pub fn current_split_index(&self) -> usize {
        self.handler.cursor()
    }

    pub fn timer(&self) -> &Timer {
        &self.timer
    }

    pub fn split_handler(&self) -> &SplitHandler {
        &self.handler
    }
}
