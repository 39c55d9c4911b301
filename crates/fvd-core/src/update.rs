use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, USER_AGENT};
use semver::Version;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::release_cache::ReleaseCache;

pub const GITHUB_REPO: &str = "fervilela-dev/FVD-Mobile-Bottom-Bar";
pub const GITHUB_API_BASE: &str = "https://api.github.com";
pub const RELEASE_ASSET_ZIP: &str = "fvd-mobile-bottom-bar.zip";
pub const SLUG: &str = "fvd-mobile-bottom-bar";
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const GITHUB_ACCEPT: &str = "application/vnd.github+json";

/// An update worth offering: the release is strictly newer than what runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppUpdate {
    pub current_version: String,
    pub new_version: String,
    pub package_url: String,
    pub release_url: String,
}

/// What the checker keeps from a release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleasePayload {
    pub tag_name: String,
    pub zip_url: String,
    pub html_url: String,
    pub published_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitHubAsset {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub browser_download_url: String,
}

#[derive(Debug, Deserialize)]
pub struct GitHubRelease {
    #[serde(default)]
    pub tag_name: String,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub assets: Vec<GitHubAsset>,
}

#[derive(Debug, Error)]
pub enum UpdateError {
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    #[error("failed to check for update: {0}")]
    Request(#[source] reqwest::Error),
    #[error("update check failed with HTTP {status}{body_snippet}")]
    HttpStatus {
        status: StatusCode,
        body_snippet: String,
    },
    #[error("failed to parse update response: {0}")]
    Parse(#[source] reqwest::Error),
    #[error("latest release has no tag name")]
    MissingTag,
    #[error("latest release has no asset named {asset}")]
    AssetNotFound { asset: String },
}

/// HTTP client with the given request timeout.
///
/// # Errors
/// Returns [`UpdateError::ClientBuild`] when the TLS backend cannot be set up.
pub fn http_client(timeout: Duration) -> Result<reqwest::Client, UpdateError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(UpdateError::ClientBuild)
}

/// Looks up the latest GitHub release and keeps it in a shared cache.
#[derive(Debug, Clone)]
pub struct ReleaseChecker {
    client: reqwest::Client,
    cache: Arc<ReleaseCache>,
    api_base: String,
    repo: String,
    asset_name: String,
}

impl ReleaseChecker {
    #[must_use]
    pub fn new(client: reqwest::Client, cache: Arc<ReleaseCache>) -> Self {
        Self {
            client,
            cache,
            api_base: GITHUB_API_BASE.to_string(),
            repo: GITHUB_REPO.to_string(),
            asset_name: RELEASE_ASSET_ZIP.to_string(),
        }
    }

    #[must_use]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    #[must_use]
    pub fn with_repo(mut self, repo: impl Into<String>) -> Self {
        self.repo = repo.into();
        self
    }

    #[must_use]
    pub fn with_asset_name(mut self, asset_name: impl Into<String>) -> Self {
        self.asset_name = asset_name.into();
        self
    }

    #[must_use]
    pub fn cache(&self) -> &Arc<ReleaseCache> {
        &self.cache
    }

    #[must_use]
    pub fn latest_release_url(&self) -> String {
        format!(
            "{}/repos/{}/releases/latest",
            self.api_base.trim_end_matches('/'),
            self.repo
        )
    }

    /// Compare the latest release against `current_version`.
    ///
    /// Uses the cached payload while it is fresh, otherwise fetches once.
    /// Every failure is logged and reported as no update; failures are never
    /// cached.
    pub async fn check_for_update(&self, current_version: &str) -> Option<AppUpdate> {
        let payload = if let Some(payload) = self.cache.get() {
            debug!("Using cached release {}", payload.tag_name);
            payload
        } else {
            match self.fetch_release_payload().await {
                Ok(payload) => {
                    info!("Latest release is {}", payload.tag_name);
                    self.cache.store(payload.clone());
                    payload
                }
                Err(error) => {
                    warn!("Update check skipped: {error}");
                    return None;
                }
            }
        };

        update_for(&payload, current_version)
    }

    /// Fetch and validate the latest release without touching the cache.
    ///
    /// # Errors
    /// Returns an error when the request fails, the status is not 200, the
    /// body cannot be parsed, the tag is empty, or the expected asset is
    /// missing.
    pub async fn fetch_release_payload(&self) -> Result<ReleasePayload, UpdateError> {
        let url = self.latest_release_url();
        debug!("Fetching {url}");

        let response = self
            .client
            .get(&url)
            .header(ACCEPT, GITHUB_ACCEPT)
            .header(USER_AGENT, SLUG)
            .send()
            .await
            .map_err(UpdateError::Request)?;

        if response.status() != StatusCode::OK {
            let status = response.status();
            let body_snippet = response
                .text()
                .await
                .ok()
                .map(|body| response_snippet(&body, 160))
                .unwrap_or_default();
            return Err(UpdateError::HttpStatus {
                status,
                body_snippet,
            });
        }

        let release: GitHubRelease = response.json().await.map_err(UpdateError::Parse)?;
        payload_from_release(release, &self.asset_name)
    }
}

fn payload_from_release(
    release: GitHubRelease,
    asset_name: &str,
) -> Result<ReleasePayload, UpdateError> {
    let tag = release.tag_name.trim().trim_start_matches('v');
    if tag.is_empty() {
        return Err(UpdateError::MissingTag);
    }

    let zip_url = release
        .assets
        .iter()
        .find(|asset| asset.name == asset_name && !asset.browser_download_url.is_empty())
        .map(|asset| asset.browser_download_url.clone())
        .ok_or_else(|| UpdateError::AssetNotFound {
            asset: asset_name.to_string(),
        })?;

    Ok(ReleasePayload {
        tag_name: tag.to_string(),
        zip_url,
        html_url: release.html_url.unwrap_or_default(),
        published_at: release.published_at.unwrap_or_default(),
    })
}

/// The update to offer for `payload`, if it is newer than `current_version`.
#[must_use]
pub fn update_for(payload: &ReleasePayload, current_version: &str) -> Option<AppUpdate> {
    let current = current_version.strip_prefix('v').unwrap_or(current_version);
    if !is_newer_version(&payload.tag_name, current) {
        debug!(
            "Release {} is not newer than {current}",
            payload.tag_name
        );
        return None;
    }

    Some(AppUpdate {
        current_version: current.to_string(),
        new_version: payload.tag_name.clone(),
        package_url: payload.zip_url.clone(),
        release_url: payload.html_url.clone(),
    })
}

fn response_snippet(body: &str, max_chars: usize) -> String {
    let snippet: String = body.chars().take(max_chars).collect();
    if snippet.is_empty() {
        String::new()
    } else {
        format!(": {snippet}")
    }
}

/// Semantic-version ordering; versions that cannot be read never compare as
/// newer.
#[must_use]
pub fn is_newer_version(latest: &str, current: &str) -> bool {
    match (parse_semver(latest), parse_semver(current)) {
        (Some(latest), Some(current)) => latest > current,
        _ => false,
    }
}

fn parse_semver(version: &str) -> Option<Version> {
    let version = version.trim();
    if let Ok(parsed) = Version::parse(version) {
        return Some(parsed);
    }

    let (core, suffix) = split_semver_core_and_suffix(version);
    let mut parts = core.split('.');
    let major = parts.next()?.parse::<u64>().ok()?;
    let minor = parts.next().and_then(|part| part.parse::<u64>().ok());
    let patch = parts.next().and_then(|part| part.parse::<u64>().ok());

    if parts.next().is_some() {
        return None;
    }

    let normalized = match (minor, patch) {
        (None, None) => format!("{major}.0.0{suffix}"),
        (Some(minor), None) => format!("{major}.{minor}.0{suffix}"),
        (Some(minor), Some(patch)) => format!("{major}.{minor}.{patch}{suffix}"),
        (None, Some(_)) => return None,
    };

    Version::parse(&normalized).ok()
}

fn split_semver_core_and_suffix(version: &str) -> (&str, &str) {
    let suffix_idx = version.find(['-', '+']).unwrap_or(version.len());
    (&version[..suffix_idx], &version[suffix_idx..])
}
