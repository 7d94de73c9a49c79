//! secretfile command-line interface.

pub mod commands;

use std::path::Path;

use anyhow::Context;
use clap::{Parser, Subcommand};
use secretfile_core::config::{resolve_config_path, Config};
use secretfile_core::env::vars;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// secretfile - encrypted secrets in a single file
#[derive(Parser)]
#[command(name = "secretfile")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase logging verbosity
    #[arg(long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file
    #[arg(long, env = "SECRETFILE_CONFIG", global = true)]
    pub config: Option<std::path::PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the secrets file
    Init(commands::secrets::FileArgs),

    /// Add a secret, replacing any existing value
    Add(commands::secrets::AddArgs),

    /// Remove a secret
    Remove(commands::secrets::NameArgs),

    /// Print the value of a secret
    Show(commands::secrets::NameArgs),

    /// List the names of all secrets
    Keys(commands::secrets::FileArgs),

    /// Resolve several secrets at once and print them as JSON
    Lookup(commands::lookup::LookupArgs),

    /// Show version information
    Version,
}

/// How a command that did not fail finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    /// A requested secret, or any secret at all, was missing.
    NotFound,
}

/// Process exit codes.
pub mod exit_code {
    pub const SUCCESS: u8 = 0;
    /// Bad or missing arguments.
    pub const USAGE: u8 = 1;
    /// Missing secrets and every other failure.
    pub const FAILURE: u8 = 255;
}

/// Load the config file, falling back to defaults when it does not exist.
pub fn load_config(explicit: Option<&Path>) -> anyhow::Result<Config> {
    let path = resolve_config_path(explicit)?;
    Config::load_or_default(&path)
        .with_context(|| format!("Failed to load config from {}", path.display()))
}

/// Install the stderr `tracing` subscriber.
///
/// `SECRETFILE_LOG` or `RUST_LOG` take precedence; otherwise the level comes
/// from `--verbose` or the config file.
pub fn init_logging(verbose: u8, config: &Config) {
    let level = match verbose {
        0 => config.logging.level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_env(vars::SECRETFILE_LOG)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(format!("secretfile={level}")));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Run the CLI with the given arguments.
pub fn run(cli: Cli, config: &Config) -> anyhow::Result<Status> {
    match cli.command {
        Commands::Init(args) => commands::secrets::init(args, config),
        Commands::Add(args) => commands::secrets::add(args, config),
        Commands::Remove(args) => commands::secrets::remove(args, config),
        Commands::Show(args) => commands::secrets::show(args, config),
        Commands::Keys(args) => commands::secrets::keys(args, config),
        Commands::Lookup(args) => commands::lookup::run(args, config),
        Commands::Version => {
            println!("secretfile {}", env!("CARGO_PKG_VERSION"));
            Ok(Status::Success)
        }
    }
}
