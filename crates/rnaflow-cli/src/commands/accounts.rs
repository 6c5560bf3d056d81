use crate::error::CliError;
use rnaflow_client::orchestrator::Orchestrator;
use rnaflow_core::constants::adapters;

pub fn handle_accounts(orch: &Orchestrator) -> Result<(), CliError> {
    let accounts = orch.list_accounts();
    println!("Available SLURM accounts:");
    for account in accounts {
        println!("  {}", account);
    }
    Ok(())
}

pub fn handle_adapters() -> Result<(), CliError> {
    println!("Supported adapter types:");
    for adapter in adapters::ALL {
        if *adapter == adapters::DEFAULT {
            println!("  {} (default)", adapter);
        } else {
            println!("  {}", adapter);
        }
    }
    Ok(())
}

pub fn handle_clean(orch: &Orchestrator, keep: usize) -> Result<(), CliError> {
    let removed = orch.cleanup_generated(keep)?;
    println!("Removed {} old submission script(s).", removed);
    Ok(())
}
