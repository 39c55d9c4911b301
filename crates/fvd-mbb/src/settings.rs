use std::path::Path;
use std::time::Duration;

use chrono::TimeDelta;
use fvd_core::{GITHUB_API_BASE, GITHUB_REPO, RELEASE_ASSET_ZIP};
use serde::{Deserialize, Serialize};

/// Host-side settings: where to look for releases, how long to cache them,
/// and how to log. Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostSettings {
    #[serde(default)]
    pub debug_logging: bool,

    #[serde(default = "default_http_timeout")]
    pub http_timeout_secs: u64,

    #[serde(default = "default_release_cache_ttl")]
    pub release_cache_ttl_secs: u64,

    #[serde(default = "default_github_repo")]
    pub github_repo: String,

    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    #[serde(default = "default_release_asset")]
    pub release_asset: String,

    #[serde(default = "default_home_url")]
    pub home_url: String,

    #[serde(default = "default_max_log_size_bytes")]
    pub max_log_size_bytes: u64,
}

fn default_http_timeout() -> u64 {
    10
}

fn default_release_cache_ttl() -> u64 {
    60 * 60
}

fn default_github_repo() -> String {
    GITHUB_REPO.to_string()
}

fn default_api_base_url() -> String {
    GITHUB_API_BASE.to_string()
}

fn default_release_asset() -> String {
    RELEASE_ASSET_ZIP.to_string()
}

fn default_home_url() -> String {
    "/".to_string()
}

fn default_max_log_size_bytes() -> u64 {
    5 * 1024 * 1024
}

impl Default for HostSettings {
    fn default() -> Self {
        Self {
            debug_logging: false,
            http_timeout_secs: default_http_timeout(),
            release_cache_ttl_secs: default_release_cache_ttl(),
            github_repo: default_github_repo(),
            api_base_url: default_api_base_url(),
            release_asset: default_release_asset(),
            home_url: default_home_url(),
            max_log_size_bytes: default_max_log_size_bytes(),
        }
    }
}

impl HostSettings {
    /// Read settings from `path`; a missing or unreadable file yields defaults.
    pub fn load_from_path(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    pub fn save_to_path(&self, path: &Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self)?;
        crate::persist::write_atomic(path, content.as_bytes())
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn release_cache_ttl(&self) -> TimeDelta {
        i64::try_from(self.release_cache_ttl_secs)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .unwrap_or(fvd_core::DEFAULT_RELEASE_TTL)
    }
}
