use log::debug;

use crate::bar::{
    ActionType, BarConfig, ButtonConfig, IntegrationProvider, MAX_BUTTONS, MAX_ICON_SIZE,
    MIN_BUTTONS, MIN_ICON_SIZE, Visibility, default_buttons,
};
use crate::raw::{RawBarConfig, RawButtonConfig, RawNumber};
use crate::sanitize;

/// Resolve raw input against the built-in default table.
///
/// Never fails: malformed or out-of-range values are replaced by defaults or
/// clamped.
#[must_use]
pub fn resolve(raw: &RawBarConfig) -> BarConfig {
    resolve_with_defaults(raw, &default_buttons())
}

/// Resolve raw input against an explicit positional default table.
///
/// Slots past the end of `defaults` reuse its last entry.
#[must_use]
pub fn resolve_with_defaults(raw: &RawBarConfig, defaults: &[ButtonConfig]) -> BarConfig {
    let base = BarConfig::default();

    let buttons_count = integer(raw.buttons_count.as_ref()).map_or(base.buttons_count, |count| {
        let clamped = clamp_u32(count, MIN_BUTTONS, MAX_BUTTONS);
        if i64::from(clamped) != count {
            debug!("Clamped buttons_count {count} to {clamped}");
        }
        clamped
    });

    let background_color = raw
        .background_color
        .as_deref()
        .and_then(sanitize::hex_color)
        .unwrap_or(base.background_color);

    let visibility = raw
        .visibility
        .as_deref()
        .and_then(Visibility::from_name)
        .unwrap_or(base.visibility);

    let mut custom_min_width = width(raw.custom_min_width.as_ref(), base.custom_min_width);
    let mut custom_max_width = width(raw.custom_max_width.as_ref(), base.custom_max_width);
    if custom_min_width > 0 && custom_max_width > 0 && custom_max_width < custom_min_width {
        std::mem::swap(&mut custom_min_width, &mut custom_max_width);
    }

    let empty_row = RawButtonConfig::default();
    let buttons = (0..buttons_count as usize)
        .map(|index| {
            let row = raw.buttons.get(index).unwrap_or(&empty_row);
            let fallback = positional_default(defaults, index);
            resolve_button(row, &fallback, index)
        })
        .collect();

    BarConfig {
        buttons_count,
        background_color,
        visibility,
        custom_min_width,
        custom_max_width,
        buttons,
    }
}

fn positional_default(defaults: &[ButtonConfig], index: usize) -> ButtonConfig {
    defaults
        .get(index)
        .or_else(|| defaults.last())
        .cloned()
        .unwrap_or_else(|| ButtonConfig {
            url: "#".to_string(),
            color: "#ffffff".to_string(),
            size: 22,
            icon: "marker".to_string(),
            label: String::new(),
            action_type: ActionType::Url,
            integration_provider: IntegrationProvider::None,
            target_selector: String::new(),
        })
}

fn resolve_button(row: &RawButtonConfig, fallback: &ButtonConfig, index: usize) -> ButtonConfig {
    let url = row
        .url
        .as_deref()
        .and_then(sanitize::url)
        .or_else(|| sanitize::url(&fallback.url))
        .unwrap_or_else(|| "#".to_string());

    let color = row
        .color
        .as_deref()
        .and_then(sanitize::hex_color)
        .unwrap_or_else(|| fallback.color.clone());

    let size = integer(row.size.as_ref())
        .map_or(fallback.size, |size| {
            clamp_u32(size, MIN_ICON_SIZE, MAX_ICON_SIZE)
        });

    let icon = row
        .icon
        .as_deref()
        .and_then(sanitize::key)
        .unwrap_or_else(|| fallback.icon.clone());

    let label = row
        .label
        .as_deref()
        .map(sanitize::text)
        .filter(|label| !label.is_empty())
        .unwrap_or_else(|| sanitize::text(&fallback.label));
    let label = if label.is_empty() {
        format!("Button {}", index + 1)
    } else {
        label
    };

    let action_type = row
        .action_type
        .as_deref()
        .and_then(ActionType::from_name)
        .unwrap_or(fallback.action_type);

    let integration_provider = row
        .integration_provider
        .as_deref()
        .and_then(IntegrationProvider::from_name)
        .unwrap_or(fallback.integration_provider);

    let target_selector = row
        .target_selector
        .as_deref()
        .map_or_else(|| sanitize::selector(&fallback.target_selector), sanitize::selector);

    ButtonConfig {
        url,
        color,
        size,
        icon,
        label,
        action_type,
        integration_provider,
        target_selector,
    }
}

fn integer(value: Option<&RawNumber>) -> Option<i64> {
    value.and_then(RawNumber::as_integer)
}

fn width(value: Option<&RawNumber>, default: u32) -> u32 {
    integer(value).map_or(default, |width| clamp_u32(width, 0, u32::MAX))
}

fn clamp_u32(value: i64, min: u32, max: u32) -> u32 {
    let clamped = value.clamp(i64::from(min), i64::from(max));
    u32::try_from(clamped).unwrap_or(min)
}

impl BarConfig {
    /// Project a resolved config back into raw form, as persisted.
    #[must_use]
    pub fn to_raw(&self) -> RawBarConfig {
        RawBarConfig {
            buttons_count: Some(RawNumber::from(self.buttons_count)),
            background_color: Some(self.background_color.clone()),
            visibility: Some(self.visibility.as_str().to_string()),
            custom_min_width: Some(RawNumber::from(self.custom_min_width)),
            custom_max_width: Some(RawNumber::from(self.custom_max_width)),
            buttons: self.buttons.iter().map(ButtonConfig::to_raw).collect(),
        }
    }
}

impl ButtonConfig {
    #[must_use]
    pub fn to_raw(&self) -> RawButtonConfig {
        RawButtonConfig {
            url: Some(self.url.clone()),
            color: Some(self.color.clone()),
            size: Some(RawNumber::from(self.size)),
            icon: Some(self.icon.clone()),
            label: Some(self.label.clone()),
            action_type: Some(self.action_type.as_str().to_string()),
            integration_provider: Some(self.integration_provider.as_str().to_string()),
            target_selector: Some(self.target_selector.clone()),
        }
    }
}
