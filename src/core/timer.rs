//! Elapsed-time state machine with pause support
//!
//! Elapsed time is banked into a ballast whenever the timer leaves the
//! running state, so a pause never loses or gains time.
//!
//! ```text
//!           start      stop       restart   pause      resume
//! Idle      Running    -          -         -          -
//! Running   -          Stopped    Idle      Paused     -
//! Paused    -          Stopped    Idle      -          Running
//! Stopped   Running    -          Idle      -          -
//! ```
//!
//! `-` is a no-op. No transition can fail.

use std::fmt;
use std::time::{Duration, Instant};

use super::clock::SharedClock;
use crate::formatting::format_time;

/// Externally visible timer state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerState {
    Idle,
    Running,
    Paused,
    Stopped,
}

impl fmt::Display for TimerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TimerState::Idle => "idle",
            TimerState::Running => "running",
            TimerState::Paused => "paused",
            TimerState::Stopped => "stopped",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy)]
enum Phase {
    Idle,
    Running { start: Instant, ballast: Duration },
    Paused { ballast: Duration },
    Stopped { ballast: Duration, end: Instant },
}

/// Stopwatch used for a single attempt
pub struct Timer {
    phase: Phase,
    clock: SharedClock,
}

impl Timer {
    /// Create an idle timer reading time from `clock`
    pub fn new(clock: SharedClock) -> Self {
        Self {
            phase: Phase::Idle,
            clock,
        }
    }

    /// Start from zero. Only effective while idle or stopped.
    pub fn start(&mut self) {
        let now = self.clock.now();
        match self.phase {
            Phase::Idle | Phase::Stopped { .. } => {
                log::debug!("Timer started");
                self.phase = Phase::Running {
                    start: now,
                    ballast: Duration::ZERO,
                };
            }
            Phase::Running { .. } | Phase::Paused { .. } => {}
        }
    }

    /// Freeze the elapsed time. Only effective while running or paused.
    pub fn stop(&mut self) {
        let now = self.clock.now();
        self.stop_at(now);
    }

    /// Freeze the elapsed time as of `now`, an instant already read from
    /// this timer's clock
    pub fn stop_at(&mut self, now: Instant) {
        match self.phase {
            Phase::Running { start, ballast } => {
                self.phase = Phase::Stopped {
                    ballast: ballast + now.saturating_duration_since(start),
                    end: now,
                };
            }
            Phase::Paused { ballast } => {
                self.phase = Phase::Stopped { ballast, end: now };
            }
            Phase::Idle | Phase::Stopped { .. } => return,
        }
        log::debug!("Timer stopped at {} ms", self.milliseconds());
    }

    /// Clear everything and return to idle
    pub fn restart(&mut self) {
        self.phase = Phase::Idle;
    }

    /// Bank the running interval. Only effective while running.
    pub fn pause(&mut self) {
        let now = self.clock.now();
        if let Phase::Running { start, ballast } = self.phase {
            self.phase = Phase::Paused {
                ballast: ballast + now.saturating_duration_since(start),
            };
            log::debug!("Timer paused at {} ms", self.milliseconds());
        }
    }

    /// Continue from the banked ballast. Only effective while paused.
    pub fn resume(&mut self) {
        let now = self.clock.now();
        if let Phase::Paused { ballast } = self.phase {
            self.phase = Phase::Running { start: now, ballast };
            log::debug!("Timer resumed");
        }
    }

    pub fn state(&self) -> TimerState {
        match self.phase {
            Phase::Idle => TimerState::Idle,
            Phase::Running { .. } => TimerState::Running,
            Phase::Paused { .. } => TimerState::Paused,
            Phase::Stopped { .. } => TimerState::Stopped,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.state() == TimerState::Idle
    }

    pub fn is_running(&self) -> bool {
        self.state() == TimerState::Running
    }

    pub fn is_paused(&self) -> bool {
        self.state() == TimerState::Paused
    }

    pub fn is_stopped(&self) -> bool {
        self.state() == TimerState::Stopped
    }

    /// Time banked from earlier running intervals
    pub fn ballast(&self) -> Duration {
        match self.phase {
            Phase::Idle => Duration::ZERO,
            Phase::Running { ballast, .. }
            | Phase::Paused { ballast }
            | Phase::Stopped { ballast, .. } => ballast,
        }
    }

    /// Instant the timer was stopped, if it is stopped
    pub fn stopped_at(&self) -> Option<Instant> {
        match self.phase {
            Phase::Stopped { end, .. } => Some(end),
            _ => None,
        }
    }

    /// Total elapsed time, sampled now
    ///
    /// Suitable for display. The instant an intent arrived is captured by the
    /// transition itself, not by a later call to this.
    pub fn elapsed(&self) -> Duration {
        match self.phase {
            Phase::Running { .. } => self.elapsed_at(self.clock.now()),
            _ => self.ballast(),
        }
    }

    /// Total elapsed time as of `now`
    pub fn elapsed_at(&self, now: Instant) -> Duration {
        match self.phase {
            Phase::Running { start, ballast } => ballast + now.saturating_duration_since(start),
            _ => self.ballast(),
        }
    }

    /// Current instant of this timer's clock
    pub fn now(&self) -> Instant {
        self.clock.now()
    }

    /// Elapsed time in whole milliseconds
    pub fn milliseconds(&self) -> u64 {
        u64::try_from(self.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

impl fmt::Display for Timer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let millis = i64::try_from(self.milliseconds()).unwrap_or(i64::MAX);
        f.write_str(&format_time(millis))
    }
}

impl fmt::Debug for Timer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timer")
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}
