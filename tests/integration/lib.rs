//! Shared fixtures for the integration tests.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use secretfile_db::StoreCache;
use tempfile::TempDir;

/// A temporary directory holding one secrets file path.
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create temp dir"),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Path of a (not yet created) secrets file inside the workspace.
    pub fn secrets_file(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new()
    }
}

/// A cache that re-checks files on every access.
pub fn eager_cache() -> StoreCache {
    StoreCache::new(8, Duration::ZERO)
}

/// Read a secrets file as JSON.
pub fn read_json(path: &Path) -> serde_json::Value {
    let raw = fs::read(path).expect("read secrets file");
    serde_json::from_slice(&raw).expect("secrets file is JSON")
}
