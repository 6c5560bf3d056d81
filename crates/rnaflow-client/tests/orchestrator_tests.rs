mod harness;

use harness::{sacct_output, squeue_output, squeue_row, FakeRunner};
use rnaflow_client::error::PipelineError;
use rnaflow_client::orchestrator::{Orchestrator, SubmitOptions};
use rnaflow_client::slurm::SlurmClient;
use rnaflow_core::config::{Config, SlurmSettings};
use rnaflow_core::model::{RunId, StageStatus};
use rnaflow_core::stages::Stage;
use rnaflow_core::store::NewRun;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

struct TestEnv {
    _install: TempDir,
    _base: TempDir,
    runner: Arc<FakeRunner>,
    orch: Orchestrator,
}

fn test_env() -> TestEnv {
    let install = tempfile::tempdir().expect("tempdir");
    let base = tempfile::tempdir().expect("tempdir");

    let templates = install.path().join("slurm_templates");
    std::fs::create_dir_all(&templates).expect("templates dir");
    for stage in Stage::ALL {
        let body = format!(
            "#!/bin/bash\n\
             #SBATCH --account={{ACCOUNT}}\n\
             #SBATCH --job-name={}_{{RUN_ID}}\n\
             cd {{RUN_DIR}}\n\
             echo adapter={{ADAPTER_TYPE}} base={{BASE_DIR}}\n",
            stage.name()
        );
        std::fs::write(templates.join(stage.template_file()), body).expect("template");
    }

    let config = Config::with_dirs(install.path(), base.path());
    let runner = FakeRunner::new();
    let slurm = SlurmClient::with_runner(config.slurm.clone(), "alice", runner.clone());
    let orch = Orchestrator::with_slurm(config, slurm);

    TestEnv {
        _install: install,
        _base: base,
        runner,
        orch,
    }
}

fn new_run() -> NewRun {
    NewRun {
        name: Some("liver-vs-control".to_string()),
        description: None,
        account: "bio-lab".to_string(),
        adapter_type: None,
    }
}

fn touch(path: &Path) {
    std::fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
    std::fs::write(path, b"").expect("write");
}

fn add_raw_pair(run_dir: &Path, sample: &str) {
    touch(&run_dir.join(format!("raw/{}_1.fq.gz", sample)));
    touch(&run_dir.join(format!("raw/{}_2.fq.gz", sample)));
}

#[test]
fn test_create_run_sets_defaults() {
    let env = test_env();
    let record = env.orch.create_run(new_run()).expect("create");

    assert_eq!(record.account, "bio-lab");
    assert_eq!(record.parameter("adapter_type"), Some("NexteraPE-PE"));
    let run_dir = env.orch.store().run_dir(&record.run_id);
    assert!(run_dir.join("raw").is_dir());
    assert!(run_dir.join("state.json").is_file());
}

#[test]
fn test_create_run_rejects_unknown_adapter() {
    let env = test_env();
    let err = env
        .orch
        .create_run(NewRun {
            adapter_type: Some("MysteryAdapter".to_string()),
            ..new_run()
        })
        .unwrap_err();
    assert!(matches!(err, PipelineError::InvalidAdapter(_)));
}

#[test]
fn test_set_adapter_validates_and_persists() {
    let env = test_env();
    let record = env.orch.create_run(new_run()).expect("create");

    assert!(matches!(
        env.orch.set_adapter(&record.run_id, "NopeAdapter"),
        Err(PipelineError::InvalidAdapter(_))
    ));

    env.orch
        .set_adapter(&record.run_id, "TruSeq3-PE")
        .expect("set adapter");
    let reloaded = env.orch.get_run(&record.run_id).expect("load");
    assert_eq!(reloaded.parameter("adapter_type"), Some("TruSeq3-PE"));
}

#[test]
fn test_submit_renders_script_and_records_job() {
    let env = test_env();
    let record = env.orch.create_run(new_run()).expect("create");
    let run_dir = env.orch.store().run_dir(&record.run_id);
    add_raw_pair(&run_dir, "sampleA");

    env.runner
        .push("sbatch", FakeRunner::ok("Submitted batch job 9001\n"));

    let job_id = env
        .orch
        .submit(&record.run_id, Stage::QcRaw, &SubmitOptions::default())
        .expect("submit");
    assert_eq!(job_id, "9001");

    let reloaded = env.orch.get_run(&record.run_id).expect("load");
    let stage = reloaded.stage(Stage::QcRaw).expect("stage record");
    assert_eq!(stage.status, StageStatus::Running);
    assert_eq!(stage.job_id.as_deref(), Some("9001"));

    // sbatch was pointed at a rendered script with placeholders filled in.
    let calls = env.runner.calls();
    let (_, args) = calls
        .iter()
        .find(|(program, _)| program == "sbatch")
        .expect("sbatch call");
    let script = std::fs::read_to_string(&args[0]).expect("script");
    assert!(script.contains("--account=bio-lab"));
    assert!(script.contains(&format!("qc_raw_{}", record.run_id)));
    assert!(script.contains("adapter=NexteraPE-PE"));
    assert!(!script.contains("{RUN_ID}"));
}

#[test]
fn test_submit_fails_validation_without_inputs() {
    let env = test_env();
    let record = env.orch.create_run(new_run()).expect("create");

    let err = env
        .orch
        .submit(&record.run_id, Stage::QcRaw, &SubmitOptions::default())
        .unwrap_err();
    match err {
        PipelineError::Validation { stage, errors } => {
            assert_eq!(stage, Stage::QcRaw);
            assert!(errors
                .contains(&"No FASTQ files found in raw directory".to_string()));
        }
        other => panic!("expected validation error, got {other}"),
    }
    // Nothing reached the scheduler.
    assert_eq!(env.runner.calls_to("sbatch"), 0);
}

#[test]
fn test_submit_enforces_dependencies() {
    let env = test_env();
    let record = env.orch.create_run(new_run()).expect("create");
    let run_dir = env.orch.store().run_dir(&record.run_id);
    add_raw_pair(&run_dir, "sampleA");

    let err = env
        .orch
        .submit(&record.run_id, Stage::Trim, &SubmitOptions::default())
        .unwrap_err();
    match err {
        PipelineError::Validation { errors, .. } => {
            assert!(errors
                .contains(&"Required stage 'qc_raw' has not been completed".to_string()));
        }
        other => panic!("expected validation error, got {other}"),
    }
}

#[test]
fn test_submit_force_skips_gates() {
    let env = test_env();
    let record = env.orch.create_run(new_run()).expect("create");

    env.runner
        .push("sbatch", FakeRunner::ok("Submitted batch job 9002\n"));
    let job_id = env
        .orch
        .submit(
            &record.run_id,
            Stage::Trim,
            &SubmitOptions {
                force: true,
                ..SubmitOptions::default()
            },
        )
        .expect("forced submit");
    assert_eq!(job_id, "9002");
}

#[test]
fn test_rerun_requires_confirmation_and_clears_marker() {
    let env = test_env();
    let record = env.orch.create_run(new_run()).expect("create");
    let run_dir = env.orch.store().run_dir(&record.run_id);
    add_raw_pair(&run_dir, "sampleA");

    let flag = run_dir.join(Stage::QcRaw.completion_flag());
    touch(&flag);

    let err = env
        .orch
        .submit(&record.run_id, Stage::QcRaw, &SubmitOptions::default())
        .unwrap_err();
    assert!(matches!(err, PipelineError::RerunNotConfirmed(Stage::QcRaw)));

    env.runner
        .push("sbatch", FakeRunner::ok("Submitted batch job 9003\n"));
    env.orch
        .submit(
            &record.run_id,
            Stage::QcRaw,
            &SubmitOptions {
                confirm_rerun: true,
                ..SubmitOptions::default()
            },
        )
        .expect("confirmed rerun");
    assert!(!flag.exists(), "stale marker must be removed on rerun");
}

// A rerun that every guard rejects must leave the completed stage's marker
// alone; losing it would flip the stage to failed on the next status read.
#[test]
fn test_rejected_rerun_keeps_marker() {
    let env = test_env();
    let record = env.orch.create_run(new_run()).expect("create");
    let run_dir = env.orch.store().run_dir(&record.run_id);
    add_raw_pair(&run_dir, "sampleA");

    env.runner
        .push("sbatch", FakeRunner::ok("Submitted batch job 9014\n"));
    env.orch
        .submit(&record.run_id, Stage::QcRaw, &SubmitOptions::default())
        .expect("submit");
    let flag = run_dir.join(Stage::QcRaw.completion_flag());
    touch(&flag);

    // In-flight guard rejects the rerun.
    env.runner.push(
        "squeue",
        FakeRunner::ok(&squeue_output(&[squeue_row(
            "9014",
            &format!("qc_raw_{}", record.run_id),
            "R",
            "5:00",
        )])),
    );
    let err = env
        .orch
        .submit(
            &record.run_id,
            Stage::QcRaw,
            &SubmitOptions {
                confirm_rerun: true,
                ..SubmitOptions::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, PipelineError::AlreadyRunning(_)));
    assert!(flag.exists(), "rejected rerun must not delete the marker");

    // Validation rejects the rerun.
    std::fs::remove_dir_all(run_dir.join("raw")).expect("drop inputs");
    let err = env
        .orch
        .submit(
            &record.run_id,
            Stage::QcRaw,
            &SubmitOptions {
                confirm_rerun: true,
                ..SubmitOptions::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, PipelineError::Validation { .. }));
    assert!(flag.exists(), "rejected rerun must not delete the marker");

    // The stage still reads completed afterwards.
    let report = env
        .orch
        .stage_status(&record.run_id, Stage::QcRaw)
        .expect("status");
    assert_eq!(report.status, StageStatus::Completed);
}

#[test]
fn test_submit_refuses_while_job_in_flight() {
    let env = test_env();
    let record = env.orch.create_run(new_run()).expect("create");
    let run_dir = env.orch.store().run_dir(&record.run_id);
    add_raw_pair(&run_dir, "sampleA");

    env.runner
        .push("sbatch", FakeRunner::ok("Submitted batch job 9004\n"));
    env.orch
        .submit(&record.run_id, Stage::QcRaw, &SubmitOptions::default())
        .expect("first submit");

    // The guard checks the user's queue and finds a job for this run.
    let in_queue = FakeRunner::ok(&squeue_output(&[squeue_row(
        "9004",
        &format!("qc_raw_{}", record.run_id),
        "R",
        "5:00",
    )]));
    env.runner.push("squeue", in_queue.clone());
    let err = env
        .orch
        .submit(&record.run_id, Stage::QcRaw, &SubmitOptions::default())
        .unwrap_err();
    assert!(matches!(err, PipelineError::AlreadyRunning(_)));
    assert_eq!(env.runner.calls_to("sbatch"), 1);

    // The queue is queried with an unbounded name column; a padded one
    // would truncate the embedded run id and blind this guard.
    let calls = env.runner.calls();
    let (_, args) = calls
        .iter()
        .find(|(program, _)| program == "squeue")
        .expect("squeue call");
    let format = args.last().expect("format arg");
    assert!(format.contains(" %j "), "name column is bounded: {format}");

    // The guard covers every stage of the run, force included, and no
    // script is rendered for the rejected call.
    env.runner.push("squeue", in_queue);
    let err = env
        .orch
        .submit(
            &record.run_id,
            Stage::Trim,
            &SubmitOptions {
                force: true,
                ..SubmitOptions::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, PipelineError::AlreadyRunning(_)));
    assert_eq!(env.runner.calls_to("sbatch"), 1);
}

#[test]
fn test_marker_outranks_scheduler_failure() {
    let env = test_env();
    let record = env.orch.create_run(new_run()).expect("create");
    let run_dir = env.orch.store().run_dir(&record.run_id);
    add_raw_pair(&run_dir, "sampleA");

    env.runner
        .push("sbatch", FakeRunner::ok("Submitted batch job 9005\n"));
    env.orch
        .submit(&record.run_id, Stage::QcRaw, &SubmitOptions::default())
        .expect("submit");

    // Job wrote its marker; the scheduler is never consulted.
    touch(&run_dir.join(Stage::QcRaw.completion_flag()));
    let squeue_before = env.runner.calls_to("squeue");

    let report = env
        .orch
        .stage_status(&record.run_id, Stage::QcRaw)
        .expect("status");
    assert_eq!(report.status, StageStatus::Completed);
    assert!(report.scheduler.is_none());
    assert_eq!(env.runner.calls_to("squeue"), squeue_before);

    // The outcome was healed into the store.
    let reloaded = env.orch.get_run(&record.run_id).expect("load");
    assert_eq!(
        reloaded.stage_status(Stage::QcRaw),
        Some(StageStatus::Completed)
    );
}

#[test]
fn test_scheduler_completed_without_marker_is_failure() {
    let env = test_env();
    let record = env.orch.create_run(new_run()).expect("create");
    let run_dir = env.orch.store().run_dir(&record.run_id);
    add_raw_pair(&run_dir, "sampleA");

    env.runner
        .push("sbatch", FakeRunner::ok("Submitted batch job 9006\n"));
    env.orch
        .submit(&record.run_id, Stage::QcRaw, &SubmitOptions::default())
        .expect("submit");

    // Gone from the queue, sacct says COMPLETED, but no marker was written.
    env.runner
        .push("squeue", FakeRunner::ok(&squeue_output(&[])));
    env.runner
        .push("sacct", FakeRunner::ok(&sacct_output("9006", "COMPLETED", "0:0")));

    let report = env
        .orch
        .stage_status(&record.run_id, Stage::QcRaw)
        .expect("status");
    assert_eq!(report.status, StageStatus::Failed);

    let reloaded = env.orch.get_run(&record.run_id).expect("load");
    assert_eq!(
        reloaded.stage_status(Stage::QcRaw),
        Some(StageStatus::Failed)
    );
}

#[test]
fn test_cancelled_job_reconciles_to_cancelled() {
    let env = test_env();
    let record = env.orch.create_run(new_run()).expect("create");
    let run_dir = env.orch.store().run_dir(&record.run_id);
    add_raw_pair(&run_dir, "sampleA");

    env.runner
        .push("sbatch", FakeRunner::ok("Submitted batch job 9007\n"));
    env.orch
        .submit(&record.run_id, Stage::QcRaw, &SubmitOptions::default())
        .expect("submit");

    env.runner
        .push("squeue", FakeRunner::ok(&squeue_output(&[])));
    env.runner.push(
        "sacct",
        FakeRunner::ok(&sacct_output("9007", "CANCELLED by 1000", "0:0")),
    );

    let report = env
        .orch
        .stage_status(&record.run_id, Stage::QcRaw)
        .expect("status");
    assert_eq!(report.status, StageStatus::Cancelled);
}

#[test]
fn test_unknown_job_reports_running() {
    let env = test_env();
    let record = env.orch.create_run(new_run()).expect("create");
    let run_dir = env.orch.store().run_dir(&record.run_id);
    add_raw_pair(&run_dir, "sampleA");

    env.runner
        .push("sbatch", FakeRunner::ok("Submitted batch job 9008\n"));
    env.orch
        .submit(&record.run_id, Stage::QcRaw, &SubmitOptions::default())
        .expect("submit");

    // Neither queue view knows the job right now.
    env.runner
        .push("squeue", FakeRunner::ok(&squeue_output(&[])));
    env.runner.push("sacct", FakeRunner::ok(""));

    let report = env
        .orch
        .stage_status(&record.run_id, Stage::QcRaw)
        .expect("status");
    assert_eq!(report.status, StageStatus::Running);
    let scheduler = report.scheduler.expect("scheduler report");
    assert!(scheduler.error.is_some());
}

#[test]
fn test_queued_job_reports_running() {
    let env = test_env();
    let record = env.orch.create_run(new_run()).expect("create");
    let run_dir = env.orch.store().run_dir(&record.run_id);
    add_raw_pair(&run_dir, "sampleA");

    env.runner
        .push("sbatch", FakeRunner::ok("Submitted batch job 9009\n"));
    env.orch
        .submit(&record.run_id, Stage::QcRaw, &SubmitOptions::default())
        .expect("submit");

    env.runner.push(
        "squeue",
        FakeRunner::ok(&squeue_output(&[squeue_row(
            "9009",
            &format!("qc_raw_{}", record.run_id),
            "PD",
            "0:00",
        )])),
    );

    let report = env
        .orch
        .stage_status(&record.run_id, Stage::QcRaw)
        .expect("status");
    assert_eq!(report.status, StageStatus::Running);
    // Still in flight; nothing is written back.
    let reloaded = env.orch.get_run(&record.run_id).expect("load");
    assert_eq!(
        reloaded.stage_status(Stage::QcRaw),
        Some(StageStatus::Running)
    );
}

#[test]
fn test_submit_account_override() {
    let env = test_env();
    let record = env.orch.create_run(new_run()).expect("create");
    let run_dir = env.orch.store().run_dir(&record.run_id);
    add_raw_pair(&run_dir, "sampleA");

    env.runner
        .push("sbatch", FakeRunner::ok("Submitted batch job 9013\n"));
    env.orch
        .submit(
            &record.run_id,
            Stage::QcRaw,
            &SubmitOptions {
                account: Some("genomics-prio".to_string()),
                ..SubmitOptions::default()
            },
        )
        .expect("submit");

    let calls = env.runner.calls();
    let (_, args) = calls
        .iter()
        .find(|(program, _)| program == "sbatch")
        .expect("sbatch call");
    let script = std::fs::read_to_string(&args[0]).expect("script");
    assert!(script.contains("--account=genomics-prio"));
}

#[test]
fn test_unsubmitted_stage_reports_pending() {
    let env = test_env();
    let record = env.orch.create_run(new_run()).expect("create");

    let report = env
        .orch
        .stage_status(&record.run_id, Stage::Star)
        .expect("status");
    assert_eq!(report.status, StageStatus::Pending);
    assert!(report.job_id.is_none());
    assert_eq!(env.runner.calls_to("squeue"), 0);
}

#[test]
fn test_delete_refused_while_run_active() {
    let env = test_env();
    let record = env.orch.create_run(new_run()).expect("create");

    env.runner.push(
        "squeue",
        FakeRunner::ok(&squeue_output(&[squeue_row(
            "9010",
            &format!("trim_{}", record.run_id),
            "R",
            "1:00",
        )])),
    );
    let err = env.orch.delete_run(&record.run_id).unwrap_err();
    assert!(matches!(err, PipelineError::RunActive(_)));
    assert!(env.orch.store().run_dir(&record.run_id).exists());
}

// Deleting needs a definite answer from the queue; a failed query must not
// be read as "no jobs".
#[test]
fn test_delete_refused_when_queue_unreachable() {
    let env = test_env();
    let record = env.orch.create_run(new_run()).expect("create");

    env.runner
        .push("squeue", FakeRunner::fail(1, "slurm_load_jobs error"));
    let err = env.orch.delete_run(&record.run_id).unwrap_err();
    assert!(matches!(err, PipelineError::Slurm(_)));
    assert!(env.orch.store().run_dir(&record.run_id).exists());

    // A missing squeue binary blocks deletion the same way.
    let err = env.orch.delete_run(&record.run_id).unwrap_err();
    assert!(matches!(err, PipelineError::Slurm(_)));
    assert!(env.orch.store().run_dir(&record.run_id).exists());
}

#[test]
fn test_delete_removes_run_and_scripts() {
    let env = test_env();
    let record = env.orch.create_run(new_run()).expect("create");
    let run_dir = env.orch.store().run_dir(&record.run_id);
    add_raw_pair(&run_dir, "sampleA");

    env.runner
        .push("sbatch", FakeRunner::ok("Submitted batch job 9011\n"));
    env.orch
        .submit(&record.run_id, Stage::QcRaw, &SubmitOptions::default())
        .expect("submit");

    // The queue answers and is empty for this user.
    env.runner
        .push("squeue", FakeRunner::ok(&squeue_output(&[])));
    env.orch.delete_run(&record.run_id).expect("delete");

    assert!(!run_dir.exists());
    assert!(env.orch.list_runs().expect("list").is_empty());
}

#[test]
fn test_list_accounts_falls_back_to_sacctmgr() {
    let env = test_env();
    // `allocations` is not scripted, so it behaves like a missing binary.
    env.runner.push(
        "sacctmgr",
        FakeRunner::ok("cluster|bio-lab|alice|||\ncluster|genomics|alice|||\n"),
    );

    let accounts = env.orch.list_accounts();
    assert_eq!(accounts, vec!["bio-lab", "genomics"]);
}

#[test]
fn test_list_accounts_final_fallback() {
    let env = test_env();
    env.runner.push("allocations", FakeRunner::fail(1, "no such command"));
    env.runner.push("sacctmgr", FakeRunner::fail(1, "denied"));

    let accounts = env.orch.list_accounts();
    assert_eq!(accounts, vec!["default", "general", "standard"]);
}

#[test]
fn test_stage_logs_found_by_job_id() {
    let env = test_env();
    let record = env.orch.create_run(new_run()).expect("create");
    let run_dir = env.orch.store().run_dir(&record.run_id);
    add_raw_pair(&run_dir, "sampleA");

    env.runner
        .push("sbatch", FakeRunner::ok("Submitted batch job 9012\n"));
    env.orch
        .submit(&record.run_id, Stage::QcRaw, &SubmitOptions::default())
        .expect("submit");

    std::fs::write(run_dir.join("logs/qc_raw_9012.out"), "fastqc done\n").expect("out log");
    std::fs::write(run_dir.join("logs/qc_raw_9012.err"), "").expect("err log");

    let logs = env
        .orch
        .stage_logs(&record.run_id, Stage::QcRaw)
        .expect("logs")
        .expect("job submitted");
    assert_eq!(logs.job_id, "9012");
    assert_eq!(logs.stdout, "fastqc done\n");
    assert!(logs.stdout_path.is_some());
}

#[test]
fn test_stage_logs_none_before_submission() {
    let env = test_env();
    let record = env.orch.create_run(new_run()).expect("create");
    let logs = env
        .orch
        .stage_logs(&record.run_id, Stage::QcRaw)
        .expect("logs");
    assert!(logs.is_none());
}

#[test]
fn test_submit_preserves_raw_scheduler_output() {
    let runner = FakeRunner::new();
    runner.push("sbatch", FakeRunner::ok("Submitted batch job 777\n"));
    let slurm = SlurmClient::with_runner(SlurmSettings::default(), "alice", runner);

    let job = slurm.submit(Path::new("/tmp/qc_raw_run.slurm")).expect("submit");
    assert_eq!(job.job_id, "777");
    assert_eq!(job.raw_output, "Submitted batch job 777\n");
}

#[test]
fn test_missing_run_is_not_found() {
    let env = test_env();
    let missing = RunId("no-such-run".to_string());
    let err = env.orch.get_run(&missing).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Store(rnaflow_core::errors::StoreError::NotFound(_))
    ));
}

// Walks a run through the first half of the pipeline the way the CLI
// would, with each job "finishing" by writing its marker.
#[test]
fn test_pipeline_progression() {
    let env = test_env();
    let record = env.orch.create_run(new_run()).expect("create");
    let run_dir = env.orch.store().run_dir(&record.run_id);
    add_raw_pair(&run_dir, "sampleA");
    touch(&env._base.path().join("mapping_in/genome.fa"));
    touch(&env._base.path().join("mapping_in/genes.gtf"));

    env.runner
        .push("sbatch", FakeRunner::ok("Submitted batch job 100\n"));
    env.orch
        .submit(&record.run_id, Stage::QcRaw, &SubmitOptions::default())
        .expect("qc_raw");
    touch(&run_dir.join(Stage::QcRaw.completion_flag()));

    env.runner
        .push("sbatch", FakeRunner::ok("Submitted batch job 101\n"));
    env.orch
        .submit(&record.run_id, Stage::Trim, &SubmitOptions::default())
        .expect("trim");
    touch(&run_dir.join(Stage::Trim.completion_flag()));
    touch(&run_dir.join("trimmed/sampleA_forward_paired.fq.gz"));
    touch(&run_dir.join("trimmed/sampleA_reverse_paired.fq.gz"));

    env.runner
        .push("sbatch", FakeRunner::ok("Submitted batch job 102\n"));
    env.orch
        .submit(&record.run_id, Stage::Star, &SubmitOptions::default())
        .expect("star");
    touch(&run_dir.join(Stage::Star.completion_flag()));

    let reports = env.orch.run_status(&record.run_id).expect("run status");
    let by_stage: Vec<(Stage, StageStatus)> =
        reports.iter().map(|r| (r.stage, r.status)).collect();
    assert!(by_stage.contains(&(Stage::QcRaw, StageStatus::Completed)));
    assert!(by_stage.contains(&(Stage::Trim, StageStatus::Completed)));
    assert!(by_stage.contains(&(Stage::Star, StageStatus::Completed)));
    assert!(by_stage.contains(&(Stage::FeatureCounts, StageStatus::Pending)));
    assert!(by_stage.contains(&(Stage::Deseq2, StageStatus::Pending)));
}
