//! Error types for loading and saving timer data
//!
//! The timing engine itself is infallible; these errors only come from the
//! collaborators around it (files, config, worker threads).

use std::path::PathBuf;
use thiserror::Error;

/// Result type for fallible timer operations
pub type Result<T> = std::result::Result<T, TimerError>;

#[derive(Debug, Error)]
pub enum TimerError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid TOML: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("Failed to serialize TOML: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("Run has no segments")]
    EmptyRun,

    #[error("Invalid run: {0}")]
    InvalidRun(String),

    #[error("No configuration directory available")]
    NoConfigDir,

    #[error("An attempt is in progress")]
    AttemptInProgress,

    #[error("Failed to spawn display sampler: {0}")]
    SamplerSpawn(#[source] std::io::Error),
}

impl TimerError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TimerError::Io {
            path: path.into(),
            source,
        }
    }
}
