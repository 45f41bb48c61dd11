//! Speedrun Timer
//!
//! A split timer for speedruns: measures an attempt split into ordered
//! segments, records per-segment times, tracks best segments and promotes a
//! new personal best when a finished attempt beats the stored one.
//!
//! The crate is organised as:
//! - `core` - The timing engine (timer, splits, time machine)
//! - `run` - Run definitions and their JSON/TOML files
//! - `config` - Application configuration and key bindings
//! - `session` - Thread-safe session and the periodic display sampler

pub mod config;
pub mod core;
pub mod error;
pub mod formatting;
pub mod run;
pub mod session;

// Re-export commonly used types
pub use config::{KeyBindings, TimerConfig};
pub use crate::core::{
    Clock, HandlerPosition, Intent, MachineState, ManualClock, SharedClock, Split, SplitHandler,
    SystemClock, TimeMachine, TimeSpan, Timer, TimerState, TimingEvent,
};
pub use error::{Result, TimerError};
pub use formatting::{format_delta, format_time};
pub use run::Run;
pub use session::{DisplaySnapshot, Sampler, Session, SplitView};
