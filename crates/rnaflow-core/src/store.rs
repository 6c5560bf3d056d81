use crate::constants::{dirs, files, params};
use crate::errors::StoreError;
use crate::model::{RunId, RunRecord, RunStatus, StageStatus};
use crate::stages::Stage;
use chrono::Utc;
use fs_err as fs;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Inputs for creating a run. The account is mandatory; everything else
/// falls back to a default.
#[derive(Debug, Clone)]
pub struct NewRun {
    pub name: Option<String>,
    pub description: Option<String>,
    pub account: String,
    pub adapter_type: Option<String>,
}

/// Filesystem-backed store of run records.
///
/// Each run owns one directory under `runs/` holding its data tree and a
/// `state.json` record. The record is the source of truth for scheduling
/// state; the directory tree is the source of truth for produced data.
#[derive(Debug, Clone)]
pub struct RunStore {
    runs_dir: PathBuf,
}

impl RunStore {
    pub fn new(runs_dir: impl Into<PathBuf>) -> Self {
        Self {
            runs_dir: runs_dir.into(),
        }
    }

    pub fn runs_dir(&self) -> &Path {
        &self.runs_dir
    }

    pub fn run_dir(&self, run_id: &RunId) -> PathBuf {
        self.runs_dir.join(run_id.as_str())
    }

    fn state_path(&self, run_id: &RunId) -> PathBuf {
        self.run_dir(run_id).join(files::STATE)
    }

    /// Allocates a new run: generates an id, creates the directory tree and
    /// writes the initial record. The tree is removed again if any step
    /// fails, so a run either exists completely or not at all.
    pub fn create(&self, new_run: NewRun) -> Result<RunRecord, StoreError> {
        let run_id = RunId::generate();
        let run_dir = self.run_dir(&run_id);

        let result = self.create_inner(&run_id, &run_dir, new_run);
        if result.is_err() {
            let _ = std::fs::remove_dir_all(&run_dir);
        }
        result
    }

    fn create_inner(
        &self,
        run_id: &RunId,
        run_dir: &Path,
        new_run: NewRun,
    ) -> Result<RunRecord, StoreError> {
        for subdir in dirs::RUN_SUBDIRS {
            let path = run_dir.join(subdir);
            fs::create_dir_all(&path).map_err(|e| StoreError::io(path, e))?;
        }

        let mut parameters = BTreeMap::new();
        parameters.insert(
            params::ADAPTER_TYPE.to_string(),
            new_run
                .adapter_type
                .unwrap_or_else(|| crate::constants::adapters::DEFAULT.to_string()),
        );

        let record = RunRecord {
            run_id: run_id.clone(),
            name: new_run.name,
            description: new_run.description,
            status: RunStatus::Created,
            created_at: Utc::now(),
            updated_at: None,
            account: new_run.account,
            parameters,
            stages: BTreeMap::new(),
            extra: serde_json::Map::new(),
        };

        self.save(&record)?;
        debug!("created run {} in {}", run_id, run_dir.display());
        Ok(record)
    }

    pub fn load(&self, run_id: &RunId) -> Result<RunRecord, StoreError> {
        let path = self.state_path(run_id);
        if !path.is_file() {
            return Err(StoreError::NotFound(run_id.clone()));
        }
        let text = fs::read_to_string(&path).map_err(|e| StoreError::io(&path, e))?;
        serde_json::from_str(&text).map_err(|source| StoreError::Corrupt {
            run_id: run_id.clone(),
            source,
        })
    }

    /// Persists the record with write-to-temp-then-rename, so a reader never
    /// observes a half-written `state.json`. Refreshes `updated_at`.
    pub fn save(&self, record: &RunRecord) -> Result<(), StoreError> {
        let run_dir = self.run_dir(&record.run_id);
        if !run_dir.is_dir() {
            return Err(StoreError::NotFound(record.run_id.clone()));
        }

        let mut record = record.clone();
        record.updated_at = Some(Utc::now());
        let json = serde_json::to_string_pretty(&record)?;

        let mut tmp = tempfile::NamedTempFile::new_in(&run_dir)
            .map_err(|e| StoreError::io(&run_dir, e))?;
        tmp.write_all(json.as_bytes())
            .map_err(|e| StoreError::io(tmp.path().to_path_buf(), e))?;

        let path = run_dir.join(files::STATE);
        tmp.persist(&path)
            .map_err(|e| StoreError::io(&path, e.error))?;
        Ok(())
    }

    /// All readable runs, newest first. Directories without a readable
    /// record are skipped with a warning rather than failing the listing.
    pub fn list(&self) -> Result<Vec<RunRecord>, StoreError> {
        if !self.runs_dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut records = Vec::new();
        let entries =
            fs::read_dir(&self.runs_dir).map_err(|e| StoreError::io(&self.runs_dir, e))?;
        for entry in entries.filter_map(|e| e.ok()) {
            if !entry.path().is_dir() {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(String::from) else {
                continue;
            };
            let run_id = RunId(name);
            match self.load(&run_id) {
                Ok(record) => records.push(record),
                Err(err) => {
                    warn!("skipping run directory '{}': {}", run_id, err);
                }
            }
        }

        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    /// Removes the run directory and everything under it.
    pub fn delete(&self, run_id: &RunId) -> Result<(), StoreError> {
        let run_dir = self.run_dir(run_id);
        if !run_dir.is_dir() {
            return Err(StoreError::NotFound(run_id.clone()));
        }
        fs::remove_dir_all(&run_dir).map_err(|e| StoreError::io(run_dir, e))
    }

    /// Load-modify-save convenience for a single stage slot.
    pub fn update_stage(
        &self,
        run_id: &RunId,
        stage: Stage,
        status: StageStatus,
        job_id: Option<String>,
    ) -> Result<RunRecord, StoreError> {
        let mut record = self.load(run_id)?;
        record.set_stage(stage, status, job_id);
        self.save(&record)?;
        Ok(record)
    }
}
