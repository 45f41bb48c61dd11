//! Run definitions
//!
//! A run is the persisted half of the timer: game, category, attempt count and
//! the segments with their PB and best-segment times. Runs are stored as JSON
//! or TOML, chosen by file extension.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::core::{Split, TimeSpan};
use crate::error::{Result, TimerError};

/// A stored run: metadata plus its ordered segments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Run {
    #[serde(default, alias = "GameName")]
    pub game_name: String,
    #[serde(default, alias = "Category")]
    pub category: String,
    /// Number of attempts started
    #[serde(default, alias = "Attempts")]
    pub attempts: u32,
    #[serde(default, alias = "Segments")]
    pub segments: Vec<Split>,
}

impl Default for Run {
    /// A run with a single unnamed segment
    fn default() -> Self {
        Self {
            game_name: String::new(),
            category: String::new(),
            attempts: 0,
            segments: vec![Split::default()],
        }
    }
}

impl Run {
    /// Create a run with the given segments
    pub fn new(game_name: impl Into<String>, category: impl Into<String>, segments: Vec<Split>) -> Self {
        Self {
            game_name: game_name.into(),
            category: category.into(),
            attempts: 0,
            segments,
        }
    }

    /// Parse and validate a run from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let run: Run = serde_json::from_str(json)?;
        run.validate()?;
        Ok(run)
    }

    /// Parse and validate a run from TOML
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let run: Run = toml::from_str(toml_str)?;
        run.validate()?;
        Ok(run)
    }

    /// Load a run file; `.toml` files are read as TOML, anything else as JSON
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| TimerError::io(path, e))?;
        let run = if is_toml(path) {
            Self::from_toml(&contents)?
        } else {
            Self::from_json(&contents)?
        };
        log::info!(
            "Loaded run '{}' ({}) with {} segments from {}",
            run.game_name,
            run.category,
            run.segments.len(),
            path.display()
        );
        Ok(run)
    }

    /// Write the run to disk in the format implied by the extension
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = if is_toml(path) {
            self.to_toml()?
        } else {
            self.to_json()?
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| TimerError::io(parent, e))?;
        }
        fs::write(path, contents).map_err(|e| TimerError::io(path, e))?;
        log::info!("Saved run to {}", path.display());
        Ok(())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check the run can be handed to a time machine
    pub fn validate(&self) -> Result<()> {
        if self.segments.is_empty() {
            return Err(TimerError::EmptyRun);
        }

        let mut last_pb = TimeSpan::ZERO;
        for (i, split) in self.segments.iter().enumerate() {
            if split.pb_time.is_negative() {
                return Err(TimerError::InvalidRun(format!(
                    "segment {} ('{}') has a negative PB time",
                    i, split.name
                )));
            }
            if split.pb_time.is_zero() {
                continue;
            }
            if split.pb_time < last_pb {
                return Err(TimerError::InvalidRun(format!(
                    "segment {} ('{}') ends before the previous segment in the PB",
                    i, split.name
                )));
            }
            last_pb = split.pb_time;
        }
        Ok(())
    }

    /// Sum of best segments, the theoretical best time for the run
    pub fn sum_of_best(&self) -> TimeSpan {
        let nanos = self
            .segments
            .iter()
            .map(|s| s.best_segment.as_nanos())
            .fold(0i64, i64::saturating_add);
        TimeSpan::from_nanos(nanos)
    }

    /// Final PB time, zero if no PB is stored
    pub fn personal_best(&self) -> TimeSpan {
        self.segments
            .last()
            .map(|s| s.pb_time)
            .unwrap_or(TimeSpan::ZERO)
    }
}

fn is_toml(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(millis: i64) -> TimeSpan {
        TimeSpan::from_millis(millis)
    }

    fn sample_run() -> Run {
        Run::new(
            "Dark Souls Remastered",
            "Any%",
            vec![
                Split::with_times("Asylum Demon", ms(154_500), ms(153_983)),
                Split::with_times("Taurus Demon", ms(400_000), ms(240_000)),
            ],
        )
    }

    #[test]
    fn test_default_run_has_one_segment() {
        let run = Run::default();
        assert_eq!(run.segments.len(), 1);
        assert!(run.segments[0].name.is_empty());
        assert!(run.validate().is_ok());
    }

    #[test]
    fn test_json_round_trip() {
        let run = sample_run();
        let parsed = Run::from_json(&run.to_json().unwrap()).unwrap();
        assert_eq!(parsed, run);
    }

    #[test]
    fn test_toml_round_trip() {
        let run = sample_run();
        let toml_str = run.to_toml().unwrap();
        assert!(toml_str.contains("[[segments]]"));
        assert_eq!(Run::from_toml(&toml_str).unwrap(), run);
    }

    #[test]
    fn test_from_toml() {
        let run = Run::from_toml(
            r#"
            game_name = "Sekiro"
            category = "Any%"
            attempts = 12

            [[segments]]
            name = "Gyoubu"
            pb_time = 300000000000

            [[segments]]
            name = "Genichiro"
            pb_time = 900000000000
            best_segment = 500000000000
        "#,
        )
        .unwrap();

        assert_eq!(run.game_name, "Sekiro");
        assert_eq!(run.attempts, 12);
        assert_eq!(run.segments[0].best_segment, TimeSpan::ZERO);
        assert_eq!(run.segments[1].best_segment, ms(500_000));
        assert_eq!(run.personal_best(), ms(900_000));
    }

    #[test]
    fn test_accepts_capitalized_json() {
        let run = Run::from_json(
            r#"{
                "GameName": "Dark Souls",
                "Category": "All Bosses",
                "Attempts": 3,
                "Segments": [{"Name": "Asylum", "PBTime": 1000000000, "BestSegment": 900000000}]
            }"#,
        )
        .unwrap();

        assert_eq!(run.game_name, "Dark Souls");
        assert_eq!(run.attempts, 3);
        assert_eq!(run.segments[0].pb_time, ms(1_000));
    }

    #[test]
    fn test_empty_run_rejected() {
        let err = Run::from_json(r#"{"game_name": "x", "segments": []}"#).unwrap_err();
        assert!(matches!(err, TimerError::EmptyRun));
    }

    #[test]
    fn test_out_of_order_pb_rejected() {
        let mut run = sample_run();
        run.segments[1].pb_time = ms(100_000);
        assert!(matches!(run.validate(), Err(TimerError::InvalidRun(_))));
    }

    #[test]
    fn test_unset_pb_times_are_skipped() {
        let mut run = sample_run();
        run.segments.insert(1, Split::new("No PB yet"));
        assert!(run.validate().is_ok());
    }

    #[test]
    fn test_sum_of_best() {
        assert_eq!(sample_run().sum_of_best(), ms(393_983));
    }

    #[test]
    fn test_save_and_load() {
        let dir = std::env::temp_dir().join(format!("speedrun-timer-run-{}", std::process::id()));
        let run = sample_run();

        for name in ["run.json", "run.toml"] {
            let path = dir.join(name);
            run.save(&path).unwrap();
            assert_eq!(Run::load(&path).unwrap(), run);
        }

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_load_missing_file() {
        let err = Run::load(Path::new("/nonexistent/speedrun-timer/run.json")).unwrap_err();
        assert!(matches!(err, TimerError::Io { .. }));
    }
}
