use serde::{Deserialize, Serialize};

use crate::lookup::{WidthRange, default_selector};

pub const MIN_BUTTONS: u32 = 1;
pub const MAX_BUTTONS: u32 = 6;
pub const MIN_ICON_SIZE: u32 = 12;
pub const MAX_ICON_SIZE: u32 = 48;

const DEFAULT_BUTTONS_COUNT: u32 = 4;
const DEFAULT_BACKGROUND: &str = "#0b0f19";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    #[default]
    Url,
    Search,
    Cart,
    CustomTrigger,
}

impl ActionType {
    pub const ALL: [Self; 4] = [Self::Url, Self::Search, Self::Cart, Self::CustomTrigger];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Url => "url",
            Self::Search => "search",
            Self::Cart => "cart",
            Self::CustomTrigger => "custom_trigger",
        }
    }

    /// Matches a submitted value, ignoring surrounding whitespace and case.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|action| action.as_str().eq_ignore_ascii_case(name))
    }

    /// Anything other than a plain link is rendered as a trigger button.
    #[must_use]
    pub const fn is_trigger(self) -> bool {
        !matches!(self, Self::Url)
    }
}

impl std::fmt::Display for ActionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IntegrationProvider {
    #[default]
    None,
    Elementor,
    RoyalElementor,
    Custom,
}

impl IntegrationProvider {
    pub const ALL: [Self; 4] = [
        Self::None,
        Self::Elementor,
        Self::RoyalElementor,
        Self::Custom,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Elementor => "elementor",
            Self::RoyalElementor => "royal-elementor",
            Self::Custom => "custom",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|provider| provider.as_str().eq_ignore_ascii_case(name))
    }
}

impl std::fmt::Display for IntegrationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Mobile,
    Tablet,
    Desktop,
    Custom,
}

impl Visibility {
    pub const ALL: [Self; 4] = [Self::Mobile, Self::Tablet, Self::Desktop, Self::Custom];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mobile => "mobile",
            Self::Tablet => "tablet",
            Self::Desktop => "desktop",
            Self::Custom => "custom",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|visibility| visibility.as_str().eq_ignore_ascii_case(name))
    }
}

impl std::fmt::Display for Visibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One slot of the bottom bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonConfig {
    pub url: String,
    pub color: String,
    pub size: u32,
    pub icon: String,
    pub label: String,
    pub action_type: ActionType,
    pub integration_provider: IntegrationProvider,
    #[serde(default)]
    pub target_selector: String,
}

impl ButtonConfig {
    /// The configured selector, or the one implied by the action/provider
    /// pair when none was configured.
    #[must_use]
    pub fn effective_selector(&self) -> &str {
        if self.target_selector.is_empty() {
            default_selector(self.action_type, self.integration_provider).unwrap_or("")
        } else {
            &self.target_selector
        }
    }

    /// Glyph classes for the icon span.
    #[must_use]
    pub fn icon_class(&self) -> String {
        format!("dashicons dashicons-{}", self.icon)
    }
}

struct ButtonPreset {
    url: &'static str,
    icon: &'static str,
    label: &'static str,
    action_type: ActionType,
    integration_provider: IntegrationProvider,
}

const BUTTON_COLOR: &str = "#ffffff";
const BUTTON_SIZE: u32 = 22;

const BUTTON_PRESETS: [ButtonPreset; 6] = [
    ButtonPreset {
        url: "/",
        icon: "admin-home",
        label: "Home",
        action_type: ActionType::Url,
        integration_provider: IntegrationProvider::None,
    },
    ButtonPreset {
        url: "#",
        icon: "search",
        label: "Search",
        action_type: ActionType::Search,
        integration_provider: IntegrationProvider::None,
    },
    ButtonPreset {
        url: "/cart/",
        icon: "cart",
        label: "Cart",
        action_type: ActionType::Cart,
        integration_provider: IntegrationProvider::None,
    },
    ButtonPreset {
        url: "/my-account/",
        icon: "admin-users",
        label: "Account",
        action_type: ActionType::Url,
        integration_provider: IntegrationProvider::None,
    },
    ButtonPreset {
        url: "/gallery/",
        icon: "format-gallery",
        label: "Gallery",
        action_type: ActionType::Url,
        integration_provider: IntegrationProvider::None,
    },
    ButtonPreset {
        url: "#",
        icon: "share",
        label: "Share",
        action_type: ActionType::CustomTrigger,
        integration_provider: IntegrationProvider::Custom,
    },
];

impl ButtonPreset {
    fn to_config(&self) -> ButtonConfig {
        ButtonConfig {
            url: self.url.to_string(),
            color: BUTTON_COLOR.to_string(),
            size: BUTTON_SIZE,
            icon: self.icon.to_string(),
            label: self.label.to_string(),
            action_type: self.action_type,
            integration_provider: self.integration_provider,
            target_selector: String::new(),
        }
    }
}

/// The positional default table: home, search, cart, account, gallery, share.
#[must_use]
pub fn default_buttons() -> Vec<ButtonConfig> {
    BUTTON_PRESETS.iter().map(ButtonPreset::to_config).collect()
}

/// Fully resolved bar configuration. `buttons.len()` always equals
/// `buttons_count`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarConfig {
    pub buttons_count: u32,
    pub background_color: String,
    pub visibility: Visibility,
    pub custom_min_width: u32,
    pub custom_max_width: u32,
    pub buttons: Vec<ButtonConfig>,
}

impl Default for BarConfig {
    fn default() -> Self {
        Self {
            buttons_count: DEFAULT_BUTTONS_COUNT,
            background_color: DEFAULT_BACKGROUND.to_string(),
            visibility: Visibility::Mobile,
            custom_min_width: 0,
            custom_max_width: 0,
            buttons: BUTTON_PRESETS
                .iter()
                .take(DEFAULT_BUTTONS_COUNT as usize)
                .map(ButtonPreset::to_config)
                .collect(),
        }
    }
}

impl BarConfig {
    /// Viewport widths in which the bar is displayed.
    #[must_use]
    pub fn visible_range(&self) -> WidthRange {
        WidthRange::for_visibility(
            self.visibility,
            self.custom_min_width,
            self.custom_max_width,
        )
    }
}
