use crate::model::RunId;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("I/O error on path '{path}': {source}")]
    PathIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse configuration file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error(
        "Work directory is not configured. Set RNAFLOW_WORKDIR explicitly or ensure SCRATCH is set \
         (preferred /scratch/$USER). No $HOME fallback is allowed."
    )]
    WorkdirNotConfigured,

    #[error("Invalid configuration: {0}")]
    General(String),
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Run '{0}' not found.")]
    NotFound(RunId),

    #[error("Run record for '{run_id}' is corrupt: {source}")]
    Corrupt {
        run_id: RunId,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O error on path '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize run record: {0}")]
    Json(#[from] serde_json::Error),
}

impl StoreError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }

    /// True when no usable state exists for the run, whether the record is
    /// missing or unreadable. Callers treat both the same way.
    pub fn is_unusable_state(&self) -> bool {
        matches!(self, StoreError::NotFound(_) | StoreError::Corrupt { .. })
    }
}
