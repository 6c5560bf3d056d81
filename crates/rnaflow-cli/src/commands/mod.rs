mod accounts;
mod run;
mod stage;

use crate::cli::{Cli, Commands};
use crate::error::CliError;
use rnaflow_client::orchestrator::Orchestrator;
use rnaflow_core::config::Config;

pub fn dispatch(cli: Cli) -> Result<(), CliError> {
    let config = Config::load()?;
    let orch = Orchestrator::new(config);

    match cli.command {
        Commands::Run(args) => run::handle(&orch, args.action),
        Commands::Stage(args) => stage::handle(&orch, args.action),
        Commands::Accounts => accounts::handle_accounts(&orch),
        Commands::Samples { run_id } => run::handle_samples(&orch, &run_id),
        Commands::Adapters => accounts::handle_adapters(),
        Commands::Clean(args) => accounts::handle_clean(&orch, args.keep),
    }
}
