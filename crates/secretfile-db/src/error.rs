//! Error types for secret store operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during secret store operations.
///
/// A missing secret is not an error: lookups return `None` instead.
#[derive(Debug, Error)]
pub enum SecretError {
    /// The stored value is not a well-formed `AES:<iv>:<ciphertext>` envelope.
    #[error("Invalid envelope: {0}")]
    InvalidEnvelope(String),

    /// Decryption under the store key failed (wrong key, tampering, truncation).
    #[error("Decryption failed: {0}")]
    CryptoFailure(String),

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    /// The secrets file does not have the expected structure.
    #[error("Malformed secrets file: {0}")]
    MalformedStore(String),

    #[error("Cannot access secrets file {}: {source}", path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SecretError {
    pub(crate) fn file_access(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileAccess {
            path: path.into(),
            source,
        }
    }
}

/// Convenience result alias for secret store operations.
pub type Result<T> = std::result::Result<T, SecretError>;
