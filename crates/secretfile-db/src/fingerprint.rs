//! File change detection.
//!
//! A [`FileFingerprint`] records existence, kind, size, modification time and
//! a SHA-256 digest of the content. Size and mtime alone miss same-size edits
//! made within the timestamp resolution, so the digest is always compared.
//! Hashing reads the whole file; [`ChangeDetector`] bounds that cost by
//! refusing to re-fingerprint more often than a caller-supplied interval.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant, SystemTime};

use sha2::{Digest, Sha256};
use tracing::debug;

/// Snapshot of the change-relevant attributes of a path.
///
/// The default value describes a path that does not exist.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileFingerprint {
    pub exists: bool,
    pub is_directory: bool,
    pub modified: Option<SystemTime>,
    pub length: u64,
    /// SHA-256 of the content; empty for missing paths and directories.
    pub digest: Vec<u8>,
}

impl FileFingerprint {
    /// Fingerprint `path` as it is now.
    pub fn capture(path: &Path) -> io::Result<Self> {
        let metadata = match fs::metadata(path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e),
        };

        let modified = metadata.modified().ok();
        if metadata.is_dir() {
            return Ok(Self {
                exists: true,
                is_directory: true,
                modified,
                length: 0,
                digest: Vec::new(),
            });
        }

        let digest = match digest_file(path) {
            Ok(digest) => digest,
            // Removed between stat and open.
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e),
        };

        Ok(Self {
            exists: true,
            is_directory: false,
            modified,
            length: metadata.len(),
            digest,
        })
    }
}

fn digest_file(path: &Path) -> io::Result<Vec<u8>> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher)?;
    Ok(hasher.finalize().to_vec())
}

/// Tracks one path and reports whether it changed since the last check.
#[derive(Debug)]
pub struct ChangeDetector {
    path: PathBuf,
    fingerprint: FileFingerprint,
    last_check: Option<Instant>,
}

impl ChangeDetector {
    /// Start tracking `path`. Nothing is read until the first check.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            fingerprint: FileFingerprint::default(),
            last_check: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The fingerprint recorded by the last check that touched the filesystem.
    pub fn fingerprint(&self) -> &FileFingerprint {
        &self.fingerprint
    }

    /// Whether the file changed since the previous check.
    ///
    /// Returns `false` without touching the filesystem when less than
    /// `min_interval` has passed since the previous check. The first check
    /// compares against an absent file, so it reports `true` for any path
    /// that exists.
    pub fn changed(&mut self, min_interval: Duration) -> io::Result<bool> {
        self.changed_at(Instant::now(), min_interval)
    }

    /// [`changed`](Self::changed) with an explicit clock reading.
    pub fn changed_at(&mut self, now: Instant, min_interval: Duration) -> io::Result<bool> {
        if let Some(last) = self.last_check {
            if now.saturating_duration_since(last) < min_interval {
                return Ok(false);
            }
        }
        self.last_check = Some(now);

        let current = FileFingerprint::capture(&self.path)?;
        let changed = current != self.fingerprint;
        if changed {
            debug!(
                path = %self.path.display(),
                exists = current.exists,
                length = current.length,
                "file fingerprint changed"
            );
        }
        self.fingerprint = current;
        Ok(changed)
    }
}
