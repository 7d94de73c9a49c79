//! The secrets file and its in-memory form.
//!
//! A [`SecretStore`] owns one store key and an insertion-ordered map from
//! secret name to envelope. Decrypted values are memoized per name; the memo
//! entry is dropped in the same critical section that rewrites or removes
//! the envelope, so a read that follows a write on the same instance never
//! sees the old plaintext.

use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use indexmap::IndexMap;
use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::debug;
use zeroize::Zeroizing;

use crate::cipher::{self, KEY_SIZE};
use crate::error::{Result, SecretError};
use crate::types::DecryptedSecret;

/// On-disk representation of a secrets file.
#[derive(Deserialize)]
struct StoreFile {
    secret_key: String,
    #[serde(default)]
    secrets: IndexMap<String, String>,
}

#[derive(Serialize)]
struct StoreFileRef<'a> {
    secret_key: &'a str,
    secrets: &'a IndexMap<String, String>,
}

/// Lazily filled plaintext for one envelope. Filled at most once.
type MemoCell = Arc<OnceCell<DecryptedSecret>>;

#[derive(Default)]
struct StoreState {
    secrets: IndexMap<String, String>,
    memo: HashMap<String, MemoCell>,
}

/// Named secrets encrypted under a single store key.
///
/// All methods take `&self`; the store can be shared across threads behind an
/// `Arc` and mutated in place.
pub struct SecretStore {
    encoded_key: Zeroizing<String>,
    key: Zeroizing<Vec<u8>>,
    state: Mutex<StoreState>,
    decryptions: AtomicU64,
}

impl SecretStore {
    /// Create an empty store with a freshly generated key.
    pub fn new() -> Self {
        let key = cipher::generate_key();
        Self {
            encoded_key: Zeroizing::new(STANDARD.encode(&key[..])),
            key: Zeroizing::new(key.to_vec()),
            state: Mutex::new(StoreState::default()),
            decryptions: AtomicU64::new(0),
        }
    }

    /// Create an empty store around an existing base64-encoded key.
    pub fn from_key(encoded_key: &str) -> Result<Self> {
        let encoded_key = encoded_key.trim();
        let key = Zeroizing::new(STANDARD.decode(encoded_key).map_err(|e| {
            SecretError::MalformedStore(format!("secret_key is not base64: {e}"))
        })?);
        if key.len() != KEY_SIZE {
            return Err(SecretError::MalformedStore(format!(
                "secret_key must decode to {KEY_SIZE} bytes, got {}",
                key.len()
            )));
        }

        Ok(Self {
            encoded_key: Zeroizing::new(encoded_key.to_string()),
            key,
            state: Mutex::new(StoreState::default()),
            decryptions: AtomicU64::new(0),
        })
    }

    /// Parse a store from the bytes of a secrets file.
    pub fn load(bytes: &[u8]) -> Result<Self> {
        let file: StoreFile = serde_json::from_slice(bytes)
            .map_err(|e| SecretError::MalformedStore(e.to_string()))?;

        let mut store = Self::from_key(&file.secret_key)?;
        store.state.get_mut().secrets = file.secrets;
        Ok(store)
    }

    /// Serialize the store as pretty-printed JSON, secrets in insertion order.
    pub fn save(&self) -> Result<Vec<u8>> {
        let state = self.state.lock();
        let file = StoreFileRef {
            secret_key: &self.encoded_key,
            secrets: &state.secrets,
        };
        Ok(serde_json::to_vec_pretty(&file)?)
    }

    /// Read and parse the secrets file at `path`.
    pub fn read_from(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).map_err(|e| SecretError::file_access(path, e))?;
        debug!(path = %path.display(), bytes = bytes.len(), "loading secrets file");
        Self::load(&bytes)
    }

    /// Write the store to `path`, replacing any existing file.
    pub fn save_to(&self, path: &Path) -> Result<&Self> {
        let bytes = self.save()?;
        write_secrets_file(path, &bytes).map_err(|e| SecretError::file_access(path, e))?;
        debug!(path = %path.display(), secrets = self.len(), "wrote secrets file");
        Ok(self)
    }

    /// Encrypt `value` and store it under `name`, replacing any previous value.
    pub fn add_secret(&self, name: &str, value: &str) -> Result<&Self> {
        let envelope = cipher::encrypt(&self.key, value)?;

        let mut state = self.state.lock();
        state.secrets.insert(name.to_string(), envelope);
        state.memo.remove(name);
        Ok(self)
    }

    /// Decrypt the secret stored under `name`.
    ///
    /// Returns `Ok(None)` if there is no such secret. Concurrent callers asking
    /// for the same name share one decryption. A failed decryption is not
    /// remembered; the next call tries again.
    pub fn get_secret(&self, name: &str) -> Result<Option<DecryptedSecret>> {
        let (cell, envelope) = {
            let mut state = self.state.lock();
            if let Some(secret) = state.memo.get(name).and_then(|cell| cell.get()) {
                return Ok(Some(secret.clone()));
            }

            let Some(envelope) = state.secrets.get(name).cloned() else {
                return Ok(None);
            };
            let cell = match state.memo.get(name) {
                Some(cell) => Arc::clone(cell),
                None => Arc::clone(state.memo.entry(name.to_string()).or_default()),
            };
            (cell, envelope)
        };

        let secret = cell.get_or_try_init(|| {
            debug!(name, "decrypting secret");
            self.decryptions.fetch_add(1, Ordering::Relaxed);
            cipher::decrypt(&self.key, &envelope).map(DecryptedSecret::new)
        })?;
        Ok(Some(secret.clone()))
    }

    /// Remove the secret stored under `name`. Returns whether it existed.
    pub fn remove_secret(&self, name: &str) -> bool {
        let mut state = self.state.lock();
        state.memo.remove(name);
        state.secrets.shift_remove(name).is_some()
    }

    /// Names of all stored secrets, in insertion order.
    pub fn list_keys(&self) -> Vec<String> {
        self.state.lock().secrets.keys().cloned().collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.state.lock().secrets.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.state.lock().secrets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of decryptions this instance has performed.
    pub fn decryptions(&self) -> u64 {
        self.decryptions.load(Ordering::Relaxed)
    }

    #[cfg(test)]
    fn is_memoized(&self, name: &str) -> bool {
        self.state
            .lock()
            .memo
            .get(name)
            .map_or(false, |cell| cell.get().is_some())
    }
}

impl Default for SecretStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SecretStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretStore")
            .field("secrets", &self.len())
            .finish_non_exhaustive()
    }
}

/// Atomically replace `path` with `data`.
///
/// The temp file is created beside the target with owner-only permissions, so
/// the store key is never readable by others while it is being written. An
/// existing target keeps its permissions across the replace.
fn write_secrets_file(path: &Path, data: &[u8]) -> io::Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let mut temp = NamedTempFile::new_in(parent)?;
    temp.write_all(data)?;
    temp.as_file().sync_all()?;

    match fs::metadata(path) {
        Ok(existing) => temp.as_file().set_permissions(existing.permissions())?,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }

    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
