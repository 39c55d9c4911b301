//! Host operations: the points where a site calls into the bar.
//!
//! Rendering reads the stored option record fresh on every call. Saving is
//! the only path that writes it.

use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use fvd_core::{
    AppUpdate, BarConfig, RawBarConfig, ReleaseCache, ReleaseChecker, UpdateError, http_client,
    render_bar, render_styles, resolve,
};
use fvd_platform::AppPaths;
use log::{info, warn};

use crate::cache::DiskCache;
use crate::error::AppError;
use crate::options::{OptionStore, SETTINGS_OPTION};
use crate::settings::HostSettings;

pub struct Host {
    paths: AppPaths,
    settings: HostSettings,
    store: OptionStore,
}

impl Host {
    pub fn new(paths: AppPaths, settings: HostSettings) -> Self {
        let store = OptionStore::new(paths.options_file());
        Self {
            paths,
            settings,
            store,
        }
    }

    pub fn settings(&self) -> &HostSettings {
        &self.settings
    }

    pub fn paths(&self) -> &AppPaths {
        &self.paths
    }

    /// The stored record resolved against defaults. An unreadable store
    /// renders the defaults.
    pub fn load_config(&self) -> BarConfig {
        let raw = match self.store.get(SETTINGS_OPTION) {
            Ok(Some(value)) => RawBarConfig::from_value(value),
            Ok(None) => RawBarConfig::default(),
            Err(error) => {
                warn!("Falling back to default bar settings: {error}");
                RawBarConfig::default()
            }
        };
        resolve(&raw)
    }

    /// Inline stylesheet followed by the bar markup.
    pub fn render(&self) -> String {
        let config = self.load_config();
        format!(
            "<style id=\"fvd-mbb-inline-css\">{}</style>\n{}\n",
            render_styles(&config),
            render_bar(&config, &self.settings.home_url)
        )
    }

    /// Resolve a submitted form (JSON) and persist the resolved record.
    pub fn save(&self, form: &str) -> Result<BarConfig, AppError> {
        let value: serde_json::Value = serde_json::from_str(form)
            .map_err(|error| AppError::json("form input is not valid JSON", error))?;
        let config = resolve(&RawBarConfig::from_value(value));
        self.store.set(SETTINGS_OPTION, &config.to_raw())?;
        info!(
            "Saved bar settings with {} buttons to {}",
            config.buttons_count,
            self.store.path().display()
        );
        Ok(config)
    }

    /// Drop the stored record so rendering uses defaults again.
    pub fn reset(&self) -> Result<bool, AppError> {
        Ok(self.store.delete(SETTINGS_OPTION)?)
    }

    fn release_checker(&self, cache: Arc<ReleaseCache>) -> Result<ReleaseChecker, UpdateError> {
        let client = http_client(self.settings.http_timeout())?;
        Ok(ReleaseChecker::new(client, cache)
            .with_api_base(self.settings.api_base_url.clone())
            .with_repo(self.settings.github_repo.clone())
            .with_asset_name(self.settings.release_asset.clone()))
    }

    /// Check for a newer release, reusing the on-disk cache slot while it is
    /// fresh. `force` skips reading the slot; it is only replaced when the
    /// forced fetch succeeds.
    pub async fn check_for_update(&self, current_version: &str, force: bool) -> Option<AppUpdate> {
        let cache_path = self.paths.release_cache_file();
        let cache = Arc::new(ReleaseCache::new(self.settings.release_cache_ttl()));
        if !force {
            DiskCache::restore_into(&cache_path, &cache);
        }

        let update = match self.release_checker(Arc::clone(&cache)) {
            Ok(checker) => checker.check_for_update(current_version).await,
            Err(error) => {
                warn!("Update check skipped: {error}");
                None
            }
        };

        if !force || cache.snapshot().is_some() {
            DiskCache::persist_from(&cache_path, &cache);
        }
        update
    }
}

/// Read form input from a file, or from stdin when `path` is `-`.
pub fn read_form_input(path: &Path) -> Result<String, AppError> {
    if path == Path::new("-") {
        let mut input = String::new();
        std::io::stdin()
            .read_to_string(&mut input)
            .map_err(|error| AppError::io("failed to read form input from stdin", error))?;
        return Ok(input);
    }

    std::fs::read_to_string(path).map_err(|error| AppError::io("failed to read form input", error))
}
