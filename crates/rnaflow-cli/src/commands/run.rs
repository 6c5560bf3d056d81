use crate::cli::{CreateArgs, RunAction};
use crate::error::CliError;
use colored::Colorize;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets, Attribute, Cell, Color, Table};
use rnaflow_client::orchestrator::Orchestrator;
use rnaflow_core::model::{RunId, RunStatus};
use rnaflow_core::store::NewRun;

pub fn handle(orch: &Orchestrator, action: RunAction) -> Result<(), CliError> {
    match action {
        RunAction::Create(args) => create(orch, args),
        RunAction::List => list(orch),
        RunAction::Show { run_id } => show(orch, &run_id),
        RunAction::Delete { run_id } => delete(orch, &run_id),
        RunAction::SetAdapter { run_id, adapter } => set_adapter(orch, &run_id, &adapter),
    }
}

fn create(orch: &Orchestrator, args: CreateArgs) -> Result<(), CliError> {
    let record = orch.create_run(NewRun {
        name: args.name,
        description: args.description,
        account: args.account,
        adapter_type: args.adapter,
    })?;

    println!("Created run {}", record.run_id.to_string().yellow());
    if let Some(name) = &record.name {
        println!("  name:    {}", name);
    }
    println!("  account: {}", record.account);
    println!(
        "  adapter: {}",
        record.parameter("adapter_type").unwrap_or("-")
    );
    Ok(())
}

fn list(orch: &Orchestrator) -> Result<(), CliError> {
    let runs = orch.list_runs()?;
    if runs.is_empty() {
        println!("No runs found.");
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec![
            Cell::new("Run ID").add_attribute(Attribute::Bold),
            Cell::new("Name").add_attribute(Attribute::Bold),
            Cell::new("Status").add_attribute(Attribute::Bold),
            Cell::new("Account").add_attribute(Attribute::Bold),
            Cell::new("Created").add_attribute(Attribute::Bold),
        ]);

    for run in &runs {
        table.add_row(vec![
            Cell::new(run.run_id.as_str()).fg(Color::Yellow),
            Cell::new(run.name.as_deref().unwrap_or("-")),
            status_cell(run.status),
            Cell::new(&run.account),
            Cell::new(run.created_at.format("%Y-%m-%d %H:%M").to_string()),
        ]);
    }

    println!("{table}");
    Ok(())
}

fn status_cell(status: RunStatus) -> Cell {
    let cell = Cell::new(status.to_string());
    match status {
        RunStatus::Completed => cell.fg(Color::Green),
        RunStatus::Failed => cell.fg(Color::Red),
        RunStatus::Running => cell.fg(Color::Cyan),
        RunStatus::Cancelled => cell.fg(Color::DarkGrey),
        RunStatus::Created => cell,
    }
}

fn show(orch: &Orchestrator, run_id: &RunId) -> Result<(), CliError> {
    let record = orch.get_run(run_id)?;
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}

fn delete(orch: &Orchestrator, run_id: &RunId) -> Result<(), CliError> {
    orch.delete_run(run_id)?;
    println!("Deleted run {}", run_id);
    Ok(())
}

fn set_adapter(orch: &Orchestrator, run_id: &RunId, adapter: &str) -> Result<(), CliError> {
    let record = orch.set_adapter(run_id, adapter)?;
    println!(
        "Adapter for run {} set to {}",
        run_id,
        record.parameter("adapter_type").unwrap_or(adapter)
    );
    Ok(())
}

pub fn handle_samples(orch: &Orchestrator, run_id: &RunId) -> Result<(), CliError> {
    let report = orch.sample_report(run_id)?;
    println!(
        "{} FASTQ file(s) in raw/, {} sample pair(s)",
        report.total_files,
        report.pairs.len()
    );

    for pair in &report.pairs {
        let marker = if pair.valid {
            "ok".green()
        } else {
            "incomplete".red()
        };
        println!(
            "  {:<20} [{}] {} / {}",
            pair.sample_name,
            marker,
            or_dash(&pair.forward_file),
            or_dash(&pair.reverse_file)
        );
    }
    for file in &report.unpaired_files {
        println!("  {} {}", "unpaired:".yellow(), file);
    }
    for issue in &report.issues {
        println!("  {} {}", "issue:".red(), issue);
    }
    Ok(())
}

fn or_dash(s: &str) -> &str {
    if s.is_empty() {
        "-"
    } else {
        s
    }
}
