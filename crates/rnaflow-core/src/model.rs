use crate::stages::Stage;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize, Ord, PartialOrd)]
pub struct RunId(pub String);

impl RunId {
    pub fn generate() -> Self {
        RunId(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug)]
pub struct ParseRunIdError(String);

impl fmt::Display for ParseRunIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ParseRunIdError {}

impl FromStr for RunId {
    type Err = ParseRunIdError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(ParseRunIdError("run ID must not be empty".to_string()));
        }
        Ok(RunId(s.to_string()))
    }
}

/// Coarse aggregate over the stages. Derived informally; not enforced as a
/// state machine of its own.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    #[default]
    Created,
    Running,
    Completed,
    Failed,
    Cancelled,
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunStatus::Created => write!(f, "created"),
            RunStatus::Running => write!(f, "running"),
            RunStatus::Completed => write!(f, "completed"),
            RunStatus::Failed => write!(f, "failed"),
            RunStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageStatus {
    Pending,
    Running,
    Completed,
    Failed,
    Cancelled,
}

impl fmt::Display for StageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageStatus::Pending => write!(f, "pending"),
            StageStatus::Running => write!(f, "running"),
            StageStatus::Completed => write!(f, "completed"),
            StageStatus::Failed => write!(f, "failed"),
            StageStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Status snapshot for one stage of one run. Overwritten in place on
/// re-submission; only the most recent job id is retained.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageRecord {
    pub status: StageStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl StageRecord {
    pub fn new(status: StageStatus, job_id: Option<String>) -> Self {
        Self {
            status,
            job_id,
            updated_at: Utc::now(),
        }
    }
}

/// Persisted record for one pipeline run (`state.json`).
///
/// Unknown fields are captured in `extra` and written back on save, so a
/// presentation layer may keep additional metadata in the same record
/// without this core dropping it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRecord {
    pub run_id: RunId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: RunStatus,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    pub account: String,
    #[serde(default)]
    pub parameters: BTreeMap<String, String>,
    #[serde(default)]
    pub stages: BTreeMap<String, StageRecord>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl RunRecord {
    pub fn stage(&self, stage: Stage) -> Option<&StageRecord> {
        self.stages.get(stage.name())
    }

    pub fn stage_status(&self, stage: Stage) -> Option<StageStatus> {
        self.stage(stage).map(|s| s.status)
    }

    /// Overwrites the stage slot, keeping the existing job id when the
    /// caller does not supply a new one.
    pub fn set_stage(&mut self, stage: Stage, status: StageStatus, job_id: Option<String>) {
        let job_id = job_id.or_else(|| {
            self.stages
                .get(stage.name())
                .and_then(|rec| rec.job_id.clone())
        });
        self.stages
            .insert(stage.name().to_string(), StageRecord::new(status, job_id));
        self.updated_at = Some(Utc::now());
    }

    pub fn parameter(&self, key: &str) -> Option<&str> {
        self.parameters.get(key).map(String::as_str)
    }
}

/// Scheduler-reported job state, normalized from squeue/sacct output.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SlurmState {
    Pending,
    Running,
    Completing,
    Completed,
    Failed,
    Cancelled,
    Timeout,
    Unknown,
}

impl SlurmState {
    /// Terminal as far as the scheduler is concerned. `Unknown` is not
    /// terminal: the job may simply have fallen out of both queue views
    /// momentarily.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            SlurmState::Completed | SlurmState::Failed | SlurmState::Cancelled | SlurmState::Timeout
        )
    }
}

impl fmt::Display for SlurmState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlurmState::Pending => write!(f, "PENDING"),
            SlurmState::Running => write!(f, "RUNNING"),
            SlurmState::Completing => write!(f, "COMPLETING"),
            SlurmState::Completed => write!(f, "COMPLETED"),
            SlurmState::Failed => write!(f, "FAILED"),
            SlurmState::Cancelled => write!(f, "CANCELLED"),
            SlurmState::Timeout => write!(f, "TIMEOUT"),
            SlurmState::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// Normalized result of a scheduler status query. `error` is set when the
/// job could not be located in either queue view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobReport {
    pub job_id: String,
    pub state: SlurmState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elapsed: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl JobReport {
    pub fn unknown(job_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
            state: SlurmState::Unknown,
            elapsed: None,
            exit_code: None,
            error: Some(reason.into()),
        }
    }
}
