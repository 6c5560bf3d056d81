use rnaflow_core::model::RunId;
use rnaflow_core::stages::Stage;
use std::path::PathBuf;
use thiserror::Error;

/// Failures talking to the scheduler itself.
#[derive(Error, Debug)]
pub enum SlurmError {
    #[error("Command '{command}' timed out after {secs}s.")]
    Timeout { command: String, secs: u64 },

    #[error("Failed to spawn '{command}': {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },

    #[error("'{command}' returned an error: {stderr}")]
    CommandFailed { command: String, stderr: String },

    #[error("sbatch rejected the submission: {stderr}")]
    Submission { stderr: String },

    #[error("Failed to parse SLURM job ID from output: {0}")]
    JobIdParse(String),
}

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Store(#[from] rnaflow_core::errors::StoreError),

    #[error(transparent)]
    Config(#[from] rnaflow_core::errors::ConfigError),

    #[error(transparent)]
    Slurm(#[from] SlurmError),

    #[error(transparent)]
    WalkDir(#[from] walkdir::Error),

    #[error(
        "Stage '{0}' has already completed for this run. Pass the rerun confirmation to submit it again."
    )]
    RerunNotConfirmed(Stage),

    #[error("Run '{0}' already has a job in the scheduler queue. Wait for it to finish before submitting another stage.")]
    AlreadyRunning(RunId),

    #[error("Run '{0}' still has active jobs in the scheduler queue. Cancel them before deleting.")]
    RunActive(RunId),

    #[error("Stage '{stage}' requires '{missing}' to be completed first.")]
    DependencyNotMet { stage: Stage, missing: Stage },

    #[error("Validation failed for stage '{stage}': {}", .errors.join("; "))]
    Validation { stage: Stage, errors: Vec<String> },

    #[error("Submission template not found: {0}")]
    TemplateMissing(PathBuf),

    #[error("Invalid adapter type '{0}'.")]
    InvalidAdapter(String),

    #[error("I/O error on path '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PipelineError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PipelineError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
