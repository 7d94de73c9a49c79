//! File-level operations behind the command-line front end.
//!
//! Each call reads the secrets file, applies one change, and writes it back.
//! Nothing here is cached; long-lived readers should go through
//! [`StoreCache`](crate::StoreCache) instead.

use std::path::Path;

use tracing::info;

use crate::error::Result;
use crate::store::SecretStore;
use crate::types::DecryptedSecret;

/// Create a new, empty secrets file at `path`, replacing any existing file.
pub fn init(path: &Path) -> Result<SecretStore> {
    let store = SecretStore::new();
    store.save_to(path)?;
    info!(path = %path.display(), "initialized secrets file");
    Ok(store)
}

/// Add or replace the secret `name` in an existing secrets file.
pub fn add(path: &Path, name: &str, value: &str) -> Result<()> {
    SecretStore::read_from(path)?
        .add_secret(name, value)?
        .save_to(path)?;
    info!(path = %path.display(), name, "added secret");
    Ok(())
}

/// Remove the secret `name`. Returns `false`, without rewriting the file, if it
/// was not present.
pub fn remove(path: &Path, name: &str) -> Result<bool> {
    let store = SecretStore::read_from(path)?;
    if !store.remove_secret(name) {
        return Ok(false);
    }
    store.save_to(path)?;
    info!(path = %path.display(), name, "removed secret");
    Ok(true)
}

/// Decrypt the secret `name`, or `None` if it is not present.
pub fn show(path: &Path, name: &str) -> Result<Option<DecryptedSecret>> {
    SecretStore::read_from(path)?.get_secret(name)
}

/// Names of all secrets in the file, in insertion order. Empty if there are none.
pub fn keys(path: &Path) -> Result<Vec<String>> {
    Ok(SecretStore::read_from(path)?.list_keys())
}
