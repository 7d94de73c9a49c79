//! `secretfile lookup`: resolve several secrets in one call.

use anyhow::anyhow;
use clap::Args;
use secretfile_core::Config;
use secretfile_db::lookup::{self, LookupOutcome};
use secretfile_db::StoreCache;
use tracing::debug;

use super::secrets::FileArgs;
use crate::Status;

/// Lookup command arguments.
#[derive(Args, Debug)]
pub struct LookupArgs {
    #[command(flatten)]
    pub file: FileArgs,

    /// Names of the secrets to resolve
    #[arg(required = true)]
    pub names: Vec<String>,
}

/// Resolve every requested name and print `[{"key": .., "value": ..}]`.
///
/// If any name is missing nothing is printed to stdout and the missing names
/// are reported on stderr.
pub fn run(args: LookupArgs, config: &Config) -> anyhow::Result<Status> {
    let path = args.file.resolve(config)?;
    let cache = StoreCache::from_config(&config.cache);
    debug!(path = %path.display(), names = args.names.len(), "looking up secrets");

    let outcome = lookup::lookup(&cache, &path, &args.names)
        .map_err(|e| anyhow!(lookup::error_message(&e)))?;

    match outcome {
        LookupOutcome::Found(values) => {
            println!("{}", serde_json::to_string_pretty(&values)?);
            Ok(Status::Success)
        }
        missing @ LookupOutcome::NotFound(_) => {
            if let Some(message) = missing.message() {
                eprintln!("{message}");
            }
            Ok(Status::NotFound)
        }
    }
}
