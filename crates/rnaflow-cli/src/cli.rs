use clap::{Args, Parser, Subcommand};
use rnaflow_core::model::RunId;
use rnaflow_core::stages::Stage;

#[derive(Parser)]
#[command(
    name = "rnaflow",
    author,
    version,
    about = "SLURM-backed RNA-seq pipeline runner",
    long_about = "Manages RNA-seq pipeline runs on an HPC cluster: per-run data directories, \
                  generated SLURM submission scripts, and stage-by-stage job tracking."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, action = clap::ArgAction::Count, global = true, help = "Increase verbosity level (-v for debug, -vv for trace)")]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Manage pipeline runs")]
    Run(RunArgs),

    #[command(about = "Validate, submit and track pipeline stages")]
    Stage(StageArgs),

    #[command(about = "List SLURM accounts available to the current user")]
    Accounts,

    #[command(about = "Report FASTQ sample pairing for a run")]
    Samples { run_id: RunId },

    #[command(about = "List supported trimming adapter types")]
    Adapters,

    #[command(about = "Remove old generated submission scripts")]
    Clean(CleanArgs),
}

#[derive(Args)]
pub struct RunArgs {
    #[command(subcommand)]
    pub action: RunAction,
}

#[derive(Subcommand)]
pub enum RunAction {
    #[command(about = "Create a new run")]
    Create(CreateArgs),

    #[command(about = "List all runs, newest first")]
    List,

    #[command(about = "Show one run's record")]
    Show { run_id: RunId },

    #[command(about = "Delete a run and its data")]
    Delete { run_id: RunId },

    #[command(about = "Set the trimming adapter type for a run")]
    SetAdapter { run_id: RunId, adapter: String },
}

#[derive(Args)]
pub struct CreateArgs {
    #[arg(long, help = "SLURM account to charge jobs to")]
    pub account: String,

    #[arg(long, help = "Human-readable run name")]
    pub name: Option<String>,

    #[arg(long, help = "Free-form description")]
    pub description: Option<String>,

    #[arg(long, help = "Trimming adapter type (defaults to NexteraPE-PE)")]
    pub adapter: Option<String>,
}

#[derive(Args)]
pub struct StageArgs {
    #[command(subcommand)]
    pub action: StageAction,
}

#[derive(Subcommand)]
pub enum StageAction {
    #[command(about = "Check that a stage's inputs and dependencies are ready")]
    Validate { run_id: RunId, stage: Stage },

    #[command(about = "Submit a stage to the scheduler")]
    Submit(SubmitArgs),

    #[command(about = "Show reconciled stage status (one stage or the whole run)")]
    Status {
        run_id: RunId,
        stage: Option<Stage>,
    },

    #[command(about = "Show the scheduler logs for a stage's job")]
    Logs { run_id: RunId, stage: Stage },
}

#[derive(Args)]
pub struct SubmitArgs {
    pub run_id: RunId,
    pub stage: Stage,

    #[arg(long, help = "Skip validation and dependency checks")]
    pub force: bool,

    #[arg(
        long,
        help = "Resubmit a stage that already completed; its completion marker is removed"
    )]
    pub confirm_rerun: bool,

    #[arg(long, help = "Charge a different account than the run's default")]
    pub account: Option<String>,
}

#[derive(Args)]
pub struct CleanArgs {
    #[arg(long, default_value_t = 50, help = "Number of most recent scripts to keep")]
    pub keep: usize,
}
