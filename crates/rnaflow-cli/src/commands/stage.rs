use crate::cli::{StageAction, SubmitArgs};
use crate::error::CliError;
use colored::Colorize;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets, Attribute, Cell, Color, Table};
use rnaflow_client::orchestrator::{Orchestrator, SubmitOptions};
use rnaflow_client::reconcile::StageReport;
use rnaflow_core::model::{RunId, StageStatus};
use rnaflow_core::stages::Stage;

pub fn handle(orch: &Orchestrator, action: StageAction) -> Result<(), CliError> {
    match action {
        StageAction::Validate { run_id, stage } => validate(orch, &run_id, stage),
        StageAction::Submit(args) => submit(orch, args),
        StageAction::Status { run_id, stage } => status(orch, &run_id, stage),
        StageAction::Logs { run_id, stage } => logs(orch, &run_id, stage),
    }
}

fn validate(orch: &Orchestrator, run_id: &RunId, stage: Stage) -> Result<(), CliError> {
    let result = orch.validate(run_id, stage)?;

    for warning in &result.warnings {
        println!("  {} {}", "warning:".yellow(), warning);
    }
    for error in &result.errors {
        println!("  {} {}", "error:".red(), error);
    }

    if result.valid {
        println!("Stage {} is ready to submit.", stage.to_string().green());
    } else {
        println!("Stage {} is {} ready.", stage, "not".red());
        std::process::exit(1);
    }
    Ok(())
}

fn submit(orch: &Orchestrator, args: SubmitArgs) -> Result<(), CliError> {
    let options = SubmitOptions {
        force: args.force,
        confirm_rerun: args.confirm_rerun,
        account: args.account.clone(),
    };
    let job_id = orch.submit(&args.run_id, args.stage, &options)?;
    println!(
        "Stage {} of run {} submitted as job {}",
        args.stage,
        args.run_id,
        job_id.yellow()
    );
    Ok(())
}

fn status(orch: &Orchestrator, run_id: &RunId, stage: Option<Stage>) -> Result<(), CliError> {
    let reports = match stage {
        Some(stage) => vec![orch.stage_status(run_id, stage)?],
        None => orch.run_status(run_id)?,
    };

    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec![
            Cell::new("Stage").add_attribute(Attribute::Bold),
            Cell::new("Status").add_attribute(Attribute::Bold),
            Cell::new("Job ID").add_attribute(Attribute::Bold),
            Cell::new("Scheduler").add_attribute(Attribute::Bold),
        ]);

    for report in &reports {
        table.add_row(vec![
            Cell::new(report.stage.to_string()),
            status_cell(report),
            Cell::new(report.job_id.as_deref().unwrap_or("-")),
            Cell::new(scheduler_note(report)),
        ]);
    }

    println!("{table}");
    Ok(())
}

fn status_cell(report: &StageReport) -> Cell {
    let cell = Cell::new(report.status.to_string());
    match report.status {
        StageStatus::Completed => cell.fg(Color::Green),
        StageStatus::Failed => cell.fg(Color::Red),
        StageStatus::Running => cell.fg(Color::Cyan),
        StageStatus::Cancelled => cell.fg(Color::DarkGrey),
        StageStatus::Pending => cell,
    }
}

fn scheduler_note(report: &StageReport) -> String {
    match &report.scheduler {
        Some(job) => {
            let mut note = job.state.to_string();
            if let Some(elapsed) = &job.elapsed {
                note.push_str(&format!(" ({})", elapsed));
            }
            if let Some(exit) = &job.exit_code {
                note.push_str(&format!(" exit {}", exit));
            }
            note
        }
        None => "-".to_string(),
    }
}

fn logs(orch: &Orchestrator, run_id: &RunId, stage: Stage) -> Result<(), CliError> {
    let Some(logs) = orch.stage_logs(run_id, stage)? else {
        println!("Stage {} has not been submitted yet.", stage);
        return Ok(());
    };

    println!("Job {}", logs.job_id.yellow());
    match &logs.stdout_path {
        Some(path) => {
            println!("{} {}", "--- stdout".bold(), path.display());
            print!("{}", logs.stdout);
        }
        None => println!("(no stdout log found)"),
    }
    match &logs.stderr_path {
        Some(path) => {
            println!("{} {}", "--- stderr".bold(), path.display());
            print!("{}", logs.stderr);
        }
        None => println!("(no stderr log found)"),
    }
    Ok(())
}
