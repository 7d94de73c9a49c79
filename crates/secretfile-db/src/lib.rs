//! Encrypted single-file secret store.
//!
//! A secrets file holds one AES-128 key and an ordered map of named,
//! individually encrypted values. [`SecretStore`] memoizes decrypted values,
//! [`ChangeDetector`] fingerprints the backing file, and [`StoreCache`] keeps
//! a bounded set of loaded stores that are dropped when their file changes.

pub mod cache;
pub mod cipher;
pub mod error;
pub mod fingerprint;
pub mod lookup;
pub mod ops;
pub mod store;
pub mod types;

pub use cache::StoreCache;
pub use error::{Result, SecretError};
pub use fingerprint::{ChangeDetector, FileFingerprint};
pub use lookup::{lookup, LookupOutcome};
pub use store::SecretStore;
pub use types::{DecryptedSecret, SecretValue};
