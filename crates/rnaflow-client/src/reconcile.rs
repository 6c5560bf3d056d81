use crate::error::Result;
use crate::slurm::SlurmClient;
use crate::validate::is_stage_completed;
use rnaflow_core::model::{JobReport, RunRecord, SlurmState, StageStatus};
use rnaflow_core::stages::Stage;
use rnaflow_core::store::RunStore;
use std::path::Path;
use tracing::info;

/// Resolved view of one stage after reconciling the run record, the on-disk
/// completion marker and the scheduler's opinion.
#[derive(Debug, Clone, serde::Serialize)]
pub struct StageReport {
    pub stage: Stage,
    pub status: StageStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduler: Option<JobReport>,
}

/// Resolves the effective status of one stage.
///
/// Precedence:
/// 1. No job recorded: the marker alone decides between completed and
///    pending; nothing is written back.
/// 2. Marker present: completed, whatever the scheduler says. The marker is
///    written by the job after verifying its own output, so it outranks
///    scheduler exit codes.
/// 3. Scheduler terminal without a marker: failed (or cancelled). A job the
///    scheduler calls COMPLETED but that never wrote its marker did not
///    produce verified output.
/// 4. Otherwise the job is treated as in flight, queued and unknown states
///    included; nothing is written back.
///
/// Terminal outcomes are healed into the store so later reads need no
/// scheduler round-trip.
pub fn resolve_stage(
    store: &RunStore,
    slurm: &SlurmClient,
    record: &RunRecord,
    stage: Stage,
    run_dir: &Path,
) -> Result<StageReport> {
    let job_id = record.stage(stage).and_then(|s| s.job_id.clone());

    let Some(job_id) = job_id else {
        let status = if is_stage_completed(stage, record, run_dir) {
            StageStatus::Completed
        } else {
            StageStatus::Pending
        };
        return Ok(StageReport {
            stage,
            status,
            job_id: None,
            scheduler: None,
        });
    };

    if run_dir.join(stage.completion_flag()).is_file() {
        heal(store, record, stage, StageStatus::Completed, &job_id)?;
        return Ok(StageReport {
            stage,
            status: StageStatus::Completed,
            job_id: Some(job_id),
            scheduler: None,
        });
    }

    let report = slurm.query_status(&job_id);
    if report.state.is_terminal() {
        let status = match report.state {
            SlurmState::Cancelled => StageStatus::Cancelled,
            // COMPLETED without a marker counts as a failure too.
            _ => StageStatus::Failed,
        };
        heal(store, record, stage, status, &job_id)?;
        return Ok(StageReport {
            stage,
            status,
            job_id: Some(job_id),
            scheduler: Some(report),
        });
    }

    Ok(StageReport {
        stage,
        status: StageStatus::Running,
        job_id: Some(job_id),
        scheduler: Some(report),
    })
}

/// Reconciles every stage of a run in pipeline order.
pub fn resolve_run(
    store: &RunStore,
    slurm: &SlurmClient,
    record: &RunRecord,
    run_dir: &Path,
) -> Result<Vec<StageReport>> {
    Stage::ALL
        .iter()
        .map(|stage| resolve_stage(store, slurm, record, *stage, run_dir))
        .collect()
}

fn heal(
    store: &RunStore,
    record: &RunRecord,
    stage: Stage,
    status: StageStatus,
    job_id: &str,
) -> Result<()> {
    if record.stage_status(stage) == Some(status) {
        return Ok(());
    }
    info!(
        "reconciled stage {} of run {} to {} (job {})",
        stage, record.run_id, status, job_id
    );
    store.update_stage(&record.run_id, stage, status, Some(job_id.to_string()))?;
    Ok(())
}
