//! Thread-safe timer session
//!
//! A [`Session`] owns the loaded [`Run`] and the [`TimeMachine`] behind one
//! lock, so intents from the input path and reads from the display path never
//! race. The [`Sampler`] is the display path: a worker thread that takes a
//! snapshot at a fixed rate and hands it to a callback. It only ever reads.

use parking_lot::Mutex;
use serde::Serialize;
use std::path::Path;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::config::KeyBindings;
use crate::core::{Intent, MachineState, SharedClock, SystemClock, TimeMachine, TimingEvent};
use crate::error::{Result, TimerError};
use crate::run::Run;

/// Display state of one split
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SplitView {
    pub name: String,
    /// Attempt time if completed, otherwise the PB time
    pub time: String,
    /// Signed difference to the PB, empty if not completed
    pub delta: String,
    /// Ahead of the PB at this split
    pub green: bool,
}

/// Everything a display needs for one frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplaySnapshot {
    pub game_name: String,
    pub category: String,
    /// Formatted elapsed time
    pub clock: String,
    pub state: MachineState,
    /// Index of the next segment to complete
    pub current_split: usize,
    pub splits: Vec<SplitView>,
}

/// A loaded run and the time machine timing it
///
/// Clones share the same state.
#[derive(Clone)]
pub struct Session {
    machine: Arc<Mutex<TimeMachine>>,
    run: Arc<Mutex<Run>>,
}

impl Session {
    /// Create a session for `run` using `clock`
    pub fn new(run: Run, clock: SharedClock) -> Result<Self> {
        run.validate()?;
        let machine = TimeMachine::new(run.segments.clone(), clock);
        Ok(Self {
            machine: Arc::new(Mutex::new(machine)),
            run: Arc::new(Mutex::new(run)),
        })
    }

    /// Create a session for `run` driven by the system clock
    pub fn with_system_clock(run: Run) -> Result<Self> {
        Self::new(run, SystemClock::shared())
    }

    /// Start the attempt, or complete the current segment
    pub fn split(&self) -> TimingEvent {
        self.apply(Intent::Split)
    }

    /// Toggle pause
    pub fn pause(&self) -> TimingEvent {
        self.apply(Intent::Pause)
    }

    /// Cancel the attempt, or clear a stopped one
    pub fn stop(&self) -> TimingEvent {
        self.apply(Intent::Stop)
    }

    /// Apply an intent and fold its outcome back into the run
    pub fn apply(&self, intent: Intent) -> TimingEvent {
        let mut machine = self.machine.lock();
        let event = machine.apply(intent);
        log::debug!("{} -> {:?}", intent, event);

        match &event {
            TimingEvent::Started => {
                self.run.lock().attempts += 1;
            }
            TimingEvent::Finished { index: None, .. } => {
                // An empty run starts and finishes in one step
                self.run.lock().attempts += 1;
            }
            TimingEvent::Reset { personal_best } => {
                let mut run = self.run.lock();
                run.segments = machine.splits().to_vec();
                if *personal_best {
                    log::info!("New personal best: {}", run.personal_best());
                }
            }
            _ => {}
        }
        event
    }

    /// Map a raw key name through `keys` and apply the resulting intent
    pub fn handle_key(&self, keys: &KeyBindings, key: &str) -> Option<TimingEvent> {
        keys.intent_for(key).map(|intent| self.apply(intent))
    }

    pub fn state(&self) -> MachineState {
        self.machine.lock().state()
    }

    /// Replace the run. Only allowed while idle.
    pub fn load_run(&self, run: Run) -> Result<()> {
        run.validate()?;
        let mut machine = self.machine.lock();
        if !machine.set_splits(run.segments.clone()) {
            return Err(TimerError::AttemptInProgress);
        }
        *self.run.lock() = run;
        Ok(())
    }

    /// The run as of the last reset, ready to persist
    pub fn run(&self) -> Run {
        self.run.lock().clone()
    }

    /// Persist the run as of the last reset
    pub fn save_run(&self, path: &Path) -> Result<()> {
        self.run().save(path)
    }

    /// Take a consistent snapshot for display
    pub fn snapshot(&self) -> DisplaySnapshot {
        let (clock, state, current_split, splits) = {
            let machine = self.machine.lock();
            let splits = machine
                .splits()
                .iter()
                .map(|split| SplitView {
                    name: split.name.clone(),
                    time: split.to_string(),
                    delta: split.delta(),
                    green: split.is_green(),
                })
                .collect();
            (
                machine.timer().to_string(),
                machine.state(),
                machine.current_split_index(),
                splits,
            )
        };

        let run = self.run.lock();
        DisplaySnapshot {
            game_name: run.game_name.clone(),
            category: run.category.clone(),
            clock,
            state,
            current_split,
            splits,
        }
    }
}

// =============================================================================
// Display sampler
// =============================================================================

/// Periodic read-only refresh of a session's display snapshot
///
/// The worker thread stops when [`Sampler::stop`] is called or the sampler is
/// dropped.
pub struct Sampler {
    running: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl Sampler {
    /// Spawn a worker calling `on_frame` every `interval`
    pub fn start<F>(session: Session, interval: Duration, mut on_frame: F) -> Result<Self>
    where
        F: FnMut(DisplaySnapshot) + Send + 'static,
    {
        let running = Arc::new(AtomicBool::new(true));
        let flag = running.clone();

        let worker = thread::Builder::new()
            .name("display-sampler".to_string())
            .spawn(move || {
                log::debug!("Display sampler started ({:?} interval)", interval);
                while flag.load(Ordering::SeqCst) {
                    on_frame(session.snapshot());
                    thread::park_timeout(interval);
                }
                log::debug!("Display sampler stopped");
            })
            .map_err(TimerError::SamplerSpawn)?;

        Ok(Self {
            running,
            worker: Some(worker),
        })
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Stop the worker and wait for it to exit
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(worker) = self.worker.take() {
            worker.thread().unpark();
            if worker.join().is_err() {
                log::error!("Display sampler panicked");
            }
        }
    }
}

impl Drop for Sampler {
    fn drop(&mut self) {
        self.stop();
    }
}
