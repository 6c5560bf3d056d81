mod cli;
mod commands;
mod error;

use clap::Parser;
use colored::Colorize;
use rnaflow_core::logging::{self, LogLevel};

fn main() {
    let args = cli::Cli::parse();

    match args.verbose {
        0 => logging::set_log_level(LogLevel::Info),
        1 => logging::set_log_level(LogLevel::Debug),
        _ => logging::set_log_level(LogLevel::Trace),
    }
    logging::set_log_level_from_env();

    let logging_config = rnaflow_core::config::Config::load()
        .map(|c| c.logging)
        .unwrap_or_default();
    if let Err(e) = logging::init_session_logger(&logging_config) {
        eprintln!(
            "{}",
            format!("[WARN] Failed to initialize session logger: {}", e).yellow()
        );
    }

    if let Err(e) = commands::dispatch(args) {
        eprintln!("{}", format!("[ERROR] {}", e).red());
        std::process::exit(1);
    }
}
