//! Secret file management commands.
//!
//! Provides `secretfile init|add|remove|show|keys`. Status messages go to
//! stderr so that stdout carries only secret values and names.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use secretfile_core::Config;
use secretfile_db::ops;

use crate::Status;

/// Selects the secrets file.
#[derive(Args, Debug)]
pub struct FileArgs {
    /// Path to the secrets file (defaults to the configured file)
    #[arg(short = 'f', long = "file", env = "SECRETFILE_FILE")]
    pub file: Option<PathBuf>,
}

impl FileArgs {
    /// The explicit `--file`, or the configured default.
    pub fn resolve(&self, config: &Config) -> anyhow::Result<PathBuf> {
        match &self.file {
            Some(path) => Ok(path.clone()),
            None => config
                .default_secrets_file()
                .context("No secrets file given and no default could be determined"),
        }
    }
}

/// Selects one secret in a secrets file.
#[derive(Args, Debug)]
pub struct NameArgs {
    #[command(flatten)]
    pub file: FileArgs,

    /// Secret name
    #[arg(short = 'n', long = "name")]
    pub name: String,
}

/// Arguments for `add`.
#[derive(Args, Debug)]
pub struct AddArgs {
    #[command(flatten)]
    pub target: NameArgs,

    /// Secret value (if omitted, prompts for hidden input)
    #[arg(short = 'v', long = "value")]
    pub value: Option<String>,
}

/// Create a new, empty secrets file.
pub fn init(args: FileArgs, config: &Config) -> anyhow::Result<Status> {
    let path = args.resolve(config)?;
    ops::init(&path)
        .with_context(|| format!("Failed to initialize secrets file {}", path.display()))?;

    eprintln!("Initialized secret database file in {}", path.display());
    Ok(Status::Success)
}

/// Add or replace a secret.
pub fn add(args: AddArgs, config: &Config) -> anyhow::Result<Status> {
    let path = args.target.file.resolve(config)?;
    let name = args.target.name;

    let secret_value = match args.value {
        Some(v) => v,
        None => {
            let prompt = format!("Enter value for '{name}': ");
            rpassword::prompt_password(prompt).context("Failed to read secret")?
        }
    };

    ops::add(&path, &name, &secret_value)?;

    eprintln!("Added secret named {name}.");
    Ok(Status::Success)
}

/// Remove a secret. A missing secret is reported but is not a failure.
pub fn remove(args: NameArgs, config: &Config) -> anyhow::Result<Status> {
    let path = args.file.resolve(config)?;

    if ops::remove(&path, &args.name)? {
        eprintln!("Removed secret named {}.", args.name);
    } else {
        eprintln!("Secret named {} was not found.", args.name);
    }
    Ok(Status::Success)
}

/// Print a decrypted secret.
pub fn show(args: NameArgs, config: &Config) -> anyhow::Result<Status> {
    let path = args.file.resolve(config)?;

    match ops::show(&path, &args.name)? {
        Some(secret) => {
            println!("{}", secret.expose());
            Ok(Status::Success)
        }
        None => {
            eprintln!("Secret named {} was not found.", args.name);
            Ok(Status::NotFound)
        }
    }
}

/// Print the name of every secret, one per line.
pub fn keys(args: FileArgs, config: &Config) -> anyhow::Result<Status> {
    let path = args.resolve(config)?;
    let names = ops::keys(&path)?;

    if names.is_empty() {
        eprintln!("There are no secrets in the secrets database file.");
        return Ok(Status::NotFound);
    }

    for name in &names {
        println!("{name}");
    }
    Ok(Status::Success)
}
