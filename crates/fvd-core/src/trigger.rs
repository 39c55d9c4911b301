//! Click handling for trigger buttons (`data-fvd-*` attributes).
//!
//! The front-end script tries each selector in order and clicks the first
//! element that exists. When nothing matches it broadcasts a
//! `fvdMbbTrigger` event for other scripts and, if a fallback url other than
//! `#` is set, navigates there. There is no retry.

use serde::Serialize;

const DEFAULT_ACTION: &str = "custom_trigger";
const DEFAULT_PROVIDER: &str = "custom";

/// Name of the DOM event emitted when no selector matched.
pub const TRIGGER_EVENT_NAME: &str = "fvdMbbTrigger";

/// Attribute values read from a clicked trigger element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerAttributes {
    pub action: String,
    pub provider: String,
    pub selector: String,
    pub fallback: String,
}

impl TriggerAttributes {
    /// Missing or empty action/provider attributes take the script defaults.
    #[must_use]
    pub fn from_attributes(
        action: Option<&str>,
        provider: Option<&str>,
        selector: Option<&str>,
        fallback: Option<&str>,
    ) -> Self {
        let or_default = |value: Option<&str>, default: &str| {
            value
                .filter(|value| !value.is_empty())
                .unwrap_or(default)
                .to_string()
        };

        Self {
            action: or_default(action, DEFAULT_ACTION),
            provider: or_default(provider, DEFAULT_PROVIDER),
            selector: selector.unwrap_or_default().to_string(),
            fallback: fallback.unwrap_or_default().to_string(),
        }
    }

    /// Comma-separated selectors, trimmed, empty entries skipped.
    pub fn selectors(&self) -> impl Iterator<Item = &str> {
        self.selector
            .split(',')
            .map(str::trim)
            .filter(|query| !query.is_empty())
    }
}

/// Payload of the broadcast event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TriggerEvent {
    pub action: String,
    pub provider: String,
    pub selector: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// The first selector with a matching element was clicked.
    Clicked(String),
    /// Nothing matched: emit `event`, then navigate if a fallback exists.
    Broadcast {
        event: TriggerEvent,
        navigate: Option<String>,
    },
}

/// Decide what a click on a trigger element does.
///
/// `matches` reports whether a selector finds an element on the page.
pub fn resolve_trigger(
    attributes: &TriggerAttributes,
    matches: impl Fn(&str) -> bool,
) -> TriggerOutcome {
    if let Some(selector) = attributes.selectors().find(|query| matches(*query)) {
        return TriggerOutcome::Clicked(selector.to_string());
    }

    let navigate = Some(attributes.fallback.as_str())
        .filter(|fallback| !fallback.is_empty() && *fallback != "#")
        .map(str::to_string);

    TriggerOutcome::Broadcast {
        event: TriggerEvent {
            action: attributes.action.clone(),
            provider: attributes.provider.clone(),
            selector: attributes.selector.clone(),
        },
        navigate,
    }
}
