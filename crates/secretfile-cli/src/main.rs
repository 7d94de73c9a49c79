//! secretfile CLI entry point.

use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::Parser;
use secretfile_cli::{exit_code, init_logging, load_config, run, Cli, Status};

fn main() -> ExitCode {
    // Parse CLI arguments
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => exit_code::SUCCESS,
                _ => exit_code::USAGE,
            };
            let _ = e.print();
            return ExitCode::from(code);
        }
    };

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e:#}");
            return ExitCode::from(exit_code::FAILURE);
        }
    };

    // Initialize logging
    init_logging(cli.verbose, &config);

    // Run the command
    match run(cli, &config) {
        Ok(Status::Success) => ExitCode::from(exit_code::SUCCESS),
        Ok(Status::NotFound) => ExitCode::from(exit_code::FAILURE),
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(exit_code::FAILURE)
        }
    }
}
