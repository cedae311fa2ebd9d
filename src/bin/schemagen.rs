use clap::Parser;
use schemagen::cli::{run_cli, Cli};
use schemagen::logging::{init_logging_with_config, LogConfig};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut log_config = LogConfig::from_env();
    if cli.verbose {
        log_config = log_config.verbose();
    }
    if let Err(e) = init_logging_with_config(&log_config) {
        eprintln!("Warning: {e:#}");
    }

    match run_cli(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("❌ schemagen failed: {e}");
            ExitCode::FAILURE
        }
    }
}
