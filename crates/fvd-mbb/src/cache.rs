use std::path::Path;

use chrono::{DateTime, Utc};
use fvd_core::{CachedRelease, ReleaseCache};
use log::debug;
use serde::{Deserialize, Serialize};

/// The release cache slot as kept on disk between runs.
#[derive(Debug, Serialize, Deserialize)]
pub struct DiskCache {
    pub release: CachedRelease,
    pub cached_at: DateTime<Utc>,
}

impl DiskCache {
    pub fn load_from_path(path: &Path) -> Option<Self> {
        let data = std::fs::read_to_string(path).ok()?;
        serde_json::from_str(&data).ok()
    }

    fn save_to_path(&self, path: &Path) {
        if let Ok(data) = serde_json::to_vec(self)
            && let Err(error) = crate::persist::write_atomic(path, &data)
        {
            debug!("Failed to persist release cache: {error}");
        }
    }

    /// Seed `cache` from the file at `path`, if one exists.
    pub fn restore_into(path: &Path, cache: &ReleaseCache) {
        if let Some(disk) = Self::load_from_path(path) {
            debug!(
                "Restored cached release {} (expires {})",
                disk.release.payload.tag_name, disk.release.expires_at
            );
            cache.restore(disk.release);
        }
    }

    /// Write the current slot to `path`, or remove the file when it is empty.
    pub fn persist_from(path: &Path, cache: &ReleaseCache) {
        match cache.snapshot() {
            Some(release) => Self {
                release,
                cached_at: Utc::now(),
            }
            .save_to_path(path),
            None => {
                let _ = std::fs::remove_file(path);
            }
        }
    }
}
