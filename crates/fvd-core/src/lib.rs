//! Core logic for the FVD mobile bottom bar.
//!
//! This crate holds everything that does not touch the filesystem:
//! - Bar and button configuration types plus their default table.
//! - The settings resolver that turns raw form/option input into a complete
//!   configuration.
//! - Static lookup tables (trigger selectors, visibility breakpoints).
//! - Markup and stylesheet rendering.
//! - The click policy for trigger buttons.
//! - The GitHub release check and its expiring cache.

mod bar;
mod lookup;
mod raw;
mod release_cache;
mod render;
mod resolve;
mod sanitize;
mod trigger;
mod update;

/// Resolved configuration types, enumerations and the default button table.
pub use bar::{
    ActionType, BarConfig, ButtonConfig, IntegrationProvider, MAX_BUTTONS, MAX_ICON_SIZE,
    MIN_BUTTONS, MIN_ICON_SIZE, Visibility, default_buttons,
};
/// Trigger selector and breakpoint tables.
pub use lookup::{WidthRange, default_selector};
/// Raw, partially-valid input as submitted by a form or read from storage.
pub use raw::{RawBarConfig, RawButtonConfig, RawNumber};
/// Expiring single-slot release cache.
pub use release_cache::{CachedRelease, DEFAULT_RELEASE_TTL, ReleaseCache};
/// Markup and inline stylesheet rendering.
pub use render::{render_bar, render_styles};
/// Settings resolution.
pub use resolve::{resolve, resolve_with_defaults};
/// Client-side trigger policy.
pub use trigger::{
    TRIGGER_EVENT_NAME, TriggerAttributes, TriggerEvent, TriggerOutcome, resolve_trigger,
};
/// Release lookup, payload types and version comparison.
pub use update::{
    AppUpdate, GITHUB_API_BASE, GITHUB_REPO, GitHubAsset, GitHubRelease, RELEASE_ASSET_ZIP,
    REQUEST_TIMEOUT, ReleaseChecker, ReleasePayload, SLUG, UpdateError, http_client,
    is_newer_version, update_for,
};
