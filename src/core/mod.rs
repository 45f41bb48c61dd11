//! Timing engine
//!
//! This module contains the state machines behind the timer:
//! - `Timer` - Elapsed-time stopwatch with pause support
//! - `Split` / `SplitHandler` - Per-segment records and attempt progress
//! - `TimeMachine` - Coordinator exposing the split/pause/stop intents
//!
//! Nothing in here performs I/O or holds process-wide state.

mod clock;
mod events;
mod span;
mod split;
mod split_handler;
mod time_machine;
mod timer;

pub use clock::{Clock, ManualClock, SharedClock, SystemClock};
pub use events::{Intent, TimingEvent};
pub use span::TimeSpan;
pub use split::Split;
pub use split_handler::{HandlerPosition, SplitHandler};
pub use time_machine::{MachineState, TimeMachine};
pub use timer::{Timer, TimerState};
