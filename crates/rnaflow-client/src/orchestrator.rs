use crate::error::{PipelineError, Result};
use crate::reconcile::{self, StageReport};
use crate::samples::{self, SampleReport};
use crate::scripts::{ScriptContext, ScriptGenerator};
use crate::slurm::SlurmClient;
use crate::validate::{self, is_stage_completed, StageValidation};
use fs_err as fs;
use rnaflow_core::config::Config;
use rnaflow_core::constants::{adapters, params};
use rnaflow_core::model::{RunId, RunRecord, RunStatus, StageStatus};
use rnaflow_core::stages::Stage;
use rnaflow_core::store::{NewRun, RunStore};
use std::path::PathBuf;
use tracing::{info, warn};
use walkdir::WalkDir;

/// Knobs for one stage submission.
#[derive(Debug, Clone, Default)]
pub struct SubmitOptions {
    /// Skip validation and dependency gating.
    pub force: bool,
    /// Allow resubmitting a stage that already completed. The stale
    /// completion marker is removed so the new job starts clean.
    pub confirm_rerun: bool,
    /// Charge account for this submission; defaults to the run's account.
    pub account: Option<String>,
}

/// Logs found for one stage's job.
#[derive(Debug, Clone, serde::Serialize)]
pub struct StageLogs {
    pub job_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stdout_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stderr_path: Option<PathBuf>,
    pub stdout: String,
    pub stderr: String,
}

/// Ties the store, script generator and scheduler client together into the
/// operations the CLI exposes.
pub struct Orchestrator {
    config: Config,
    store: RunStore,
    scripts: ScriptGenerator,
    slurm: SlurmClient,
}

impl Orchestrator {
    pub fn new(config: Config) -> Self {
        let store = RunStore::new(config.runs_dir());
        let scripts = ScriptGenerator::new(config.templates_dir(), config.generated_dir());
        let slurm = SlurmClient::new(config.slurm.clone());
        Self {
            config,
            store,
            scripts,
            slurm,
        }
    }

    /// Wires in a pre-built scheduler client. Tests use this with a
    /// scripted command runner.
    pub fn with_slurm(config: Config, slurm: SlurmClient) -> Self {
        let store = RunStore::new(config.runs_dir());
        let scripts = ScriptGenerator::new(config.templates_dir(), config.generated_dir());
        Self {
            config,
            store,
            scripts,
            slurm,
        }
    }

    pub fn store(&self) -> &RunStore {
        &self.store
    }

    pub fn create_run(&self, new_run: NewRun) -> Result<RunRecord> {
        if let Some(adapter) = &new_run.adapter_type {
            if !adapters::is_valid(adapter) {
                return Err(PipelineError::InvalidAdapter(adapter.clone()));
            }
        }
        Ok(self.store.create(new_run)?)
    }

    pub fn list_runs(&self) -> Result<Vec<RunRecord>> {
        Ok(self.store.list()?)
    }

    pub fn get_run(&self, run_id: &RunId) -> Result<RunRecord> {
        Ok(self.store.load(run_id)?)
    }

    pub fn set_adapter(&self, run_id: &RunId, adapter: &str) -> Result<RunRecord> {
        if !adapters::is_valid(adapter) {
            return Err(PipelineError::InvalidAdapter(adapter.to_string()));
        }
        let mut record = self.store.load(run_id)?;
        record
            .parameters
            .insert(params::ADAPTER_TYPE.to_string(), adapter.to_string());
        self.store.save(&record)?;
        Ok(record)
    }

    /// Deletes a run and its generated scripts. Refused while the scheduler
    /// queue still holds jobs for the run. A queue that cannot be checked
    /// blocks deletion too; removing a tree with live jobs writing into it
    /// is not recoverable.
    pub fn delete_run(&self, run_id: &RunId) -> Result<()> {
        self.store.load(run_id)?;
        if self.slurm.is_run_active(run_id)? {
            return Err(PipelineError::RunActive(run_id.clone()));
        }
        self.scripts.cleanup_run(run_id)?;
        self.store.delete(run_id)?;
        info!("deleted run {}", run_id);
        Ok(())
    }

    pub fn validate(&self, run_id: &RunId, stage: Stage) -> Result<StageValidation> {
        let record = self.store.load(run_id)?;
        let run_dir = self.store.run_dir(run_id);
        Ok(validate::validate_stage(
            stage,
            &record,
            &run_dir,
            &self.config.reference_dir(),
        ))
    }

    /// Submits one stage:
    ///
    /// 1. load the record
    /// 2. rerun gate: a completed stage needs explicit confirmation
    /// 3. readiness validation (skipped with `force`)
    /// 4. dependency gate (skipped with `force`)
    /// 5. in-flight guard: refuse while the scheduler queue still holds
    ///    any job for this run
    /// 6. clear the stale completion marker on a confirmed rerun
    /// 7. render the submission script
    /// 8. sbatch, then record the new job as running
    ///
    /// Step 6 sits after every guard on purpose. A rejected call must not
    /// touch run state, and the marker of a completed stage is run state.
    pub fn submit(&self, run_id: &RunId, stage: Stage, options: &SubmitOptions) -> Result<String> {
        let mut record = self.store.load(run_id)?;
        let run_dir = self.store.run_dir(run_id);

        let rerun = is_stage_completed(stage, &record, &run_dir);
        if rerun && !options.confirm_rerun {
            return Err(PipelineError::RerunNotConfirmed(stage));
        }

        if !options.force {
            let validation = validate::validate_stage(
                stage,
                &record,
                &run_dir,
                &self.config.reference_dir(),
            );
            if !validation.valid {
                return Err(PipelineError::Validation {
                    stage,
                    errors: validation.errors,
                });
            }
            for dep in stage.dependencies() {
                if !is_stage_completed(*dep, &record, &run_dir) {
                    return Err(PipelineError::DependencyNotMet {
                        stage,
                        missing: *dep,
                    });
                }
            }
        }

        match self.slurm.is_run_active(run_id) {
            Ok(true) => return Err(PipelineError::AlreadyRunning(run_id.clone())),
            Ok(false) => {}
            // Submission is operator-initiated and retriable; a queue the
            // client cannot see does not block it.
            Err(err) => warn!("could not check the queue for run {}: {}", run_id, err),
        }

        if rerun {
            let flag = run_dir.join(stage.completion_flag());
            if flag.is_file() {
                fs::remove_file(&flag).map_err(|e| PipelineError::io(&flag, e))?;
            }
            info!("rerun confirmed for stage {} of run {}", stage, run_id);
        }

        let account = options.account.as_deref().unwrap_or(&record.account);
        let adapter_type = record
            .parameter(params::ADAPTER_TYPE)
            .unwrap_or(adapters::DEFAULT)
            .to_string();
        let ctx = ScriptContext {
            run_id,
            account,
            base_dir: &self.config.base_dir,
            run_dir: &run_dir,
            adapter_type: &adapter_type,
        };
        let script = self.scripts.generate(stage, &ctx)?;

        let submitted = self.slurm.submit(&script)?;

        record.set_stage(stage, StageStatus::Running, Some(submitted.job_id.clone()));
        record.status = RunStatus::Running;
        self.store.save(&record)?;

        info!(
            "stage {} of run {} submitted as job {}",
            stage, run_id, submitted.job_id
        );
        Ok(submitted.job_id)
    }

    /// Reconciled status of one stage.
    pub fn stage_status(&self, run_id: &RunId, stage: Stage) -> Result<StageReport> {
        let record = self.store.load(run_id)?;
        let run_dir = self.store.run_dir(run_id);
        reconcile::resolve_stage(&self.store, &self.slurm, &record, stage, &run_dir)
    }

    /// Reconciled status of every stage, in pipeline order.
    pub fn run_status(&self, run_id: &RunId) -> Result<Vec<StageReport>> {
        let record = self.store.load(run_id)?;
        let run_dir = self.store.run_dir(run_id);
        reconcile::resolve_run(&self.store, &self.slurm, &record, &run_dir)
    }

    pub fn sample_report(&self, run_id: &RunId) -> Result<SampleReport> {
        self.store.load(run_id)?;
        Ok(samples::sample_report(&self.store.run_dir(run_id)))
    }

    /// Locates and reads the scheduler logs for a stage's most recent job.
    /// Job scripts write `*_<job_id>.out` / `.err` somewhere under the run
    /// directory; the exact subdirectory varies per stage.
    pub fn stage_logs(&self, run_id: &RunId, stage: Stage) -> Result<Option<StageLogs>> {
        let record = self.store.load(run_id)?;
        let Some(job_id) = record.stage(stage).and_then(|s| s.job_id.clone()) else {
            return Ok(None);
        };

        let run_dir = self.store.run_dir(run_id);
        let out_suffix = format!("{}.out", job_id);
        let err_suffix = format!("{}.err", job_id);
        let mut stdout_path = None;
        let mut stderr_path = None;

        for entry in WalkDir::new(&run_dir).into_iter().filter_map(|e| e.ok()) {
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(name) = entry.file_name().to_str() else {
                continue;
            };
            if name.ends_with(&out_suffix) {
                stdout_path = Some(entry.path().to_path_buf());
            } else if name.ends_with(&err_suffix) {
                stderr_path = Some(entry.path().to_path_buf());
            }
        }

        let read = |path: &Option<PathBuf>| -> String {
            match path {
                Some(p) => fs::read_to_string(p).unwrap_or_else(|e| {
                    warn!("could not read log {}: {}", p.display(), e);
                    String::new()
                }),
                None => String::new(),
            }
        };

        Ok(Some(StageLogs {
            job_id,
            stdout: read(&stdout_path),
            stderr: read(&stderr_path),
            stdout_path,
            stderr_path,
        }))
    }

    pub fn list_accounts(&self) -> Vec<String> {
        self.slurm.list_accounts()
    }

    pub fn cleanup_generated(&self, keep_recent: usize) -> Result<usize> {
        self.scripts.cleanup_old(keep_recent)
    }
}
