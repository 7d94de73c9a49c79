//! Batch lookup of several secrets from one file.
//!
//! A lookup either resolves every requested name or reports the ones that
//! were missing; it never returns a partial result.

use std::path::Path;

use crate::cache::StoreCache;
use crate::error::{Result, SecretError};
use crate::store::SecretStore;
use crate::types::SecretValue;

/// Result of a batch lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    /// Every name resolved; values are in request order.
    Found(Vec<SecretValue>),
    /// Names that had no entry, in request order.
    NotFound(Vec<String>),
}

impl LookupOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, LookupOutcome::Found(_))
    }

    /// Human-readable description of the missing names, if any.
    pub fn message(&self) -> Option<String> {
        match self {
            LookupOutcome::Found(_) => None,
            LookupOutcome::NotFound(names) => Some(format!(
                "Secrets with keys [{}] not found.",
                names.join(", ")
            )),
        }
    }
}

/// Resolve `names` from the secrets file at `path`, going through `cache`.
pub fn lookup<S: AsRef<str>>(
    cache: &StoreCache,
    path: &Path,
    names: &[S],
) -> Result<LookupOutcome> {
    let store = cache.get(path)?;
    resolve(&store, names)
}

/// Resolve `names` against an already loaded store.
///
/// Undecryptable entries fail the whole lookup rather than being reported as
/// missing.
pub fn resolve<S: AsRef<str>>(store: &SecretStore, names: &[S]) -> Result<LookupOutcome> {
    let mut found = Vec::with_capacity(names.len());
    let mut missing = Vec::new();

    for name in names {
        let name: &str = name.as_ref();
        match store.get_secret(name)? {
            Some(secret) => found.push(SecretValue::new(name, &secret)),
            None => missing.push(name.to_string()),
        }
    }

    if missing.is_empty() {
        Ok(LookupOutcome::Found(found))
    } else {
        Ok(LookupOutcome::NotFound(missing))
    }
}

/// Message reported to a lookup caller when the lookup itself failed.
pub fn error_message(err: &SecretError) -> String {
    format!("Error while looking up secrets: {err}")
}
