use crate::bar::{ActionType, IntegrationProvider, Visibility};

const ELEMENTOR_SEARCH: &str =
    ".elementor-search-form__toggle, .elementor-search-form__submit";
const ROYAL_ELEMENTOR_SEARCH: &str = ".wpr-search-form-submit, .wpr-search-form-input";
const ELEMENTOR_CART: &str =
    ".elementor-menu-cart__toggle_button, .elementor-menu-cart__toggle .elementor-button";
const ROYAL_ELEMENTOR_CART: &str = ".wpr-mini-cart-toggle-btn, .wpr-mini-cart-btn-icon";

const DEFAULT_SELECTORS: [((ActionType, IntegrationProvider), &str); 4] = [
    (
        (ActionType::Search, IntegrationProvider::Elementor),
        ELEMENTOR_SEARCH,
    ),
    (
        (ActionType::Search, IntegrationProvider::RoyalElementor),
        ROYAL_ELEMENTOR_SEARCH,
    ),
    (
        (ActionType::Cart, IntegrationProvider::Elementor),
        ELEMENTOR_CART,
    ),
    (
        (ActionType::Cart, IntegrationProvider::RoyalElementor),
        ROYAL_ELEMENTOR_CART,
    ),
];

/// Selector list a trigger button clicks when none was configured.
///
/// Only search and cart actions backed by a page-builder provider have one;
/// every other pair yields `None`.
#[must_use]
pub fn default_selector(
    action: ActionType,
    provider: IntegrationProvider,
) -> Option<&'static str> {
    DEFAULT_SELECTORS
        .iter()
        .find(|(key, _)| *key == (action, provider))
        .map(|(_, selector)| *selector)
}

/// Inclusive viewport width range in CSS pixels. `max: None` is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WidthRange {
    pub min: u32,
    pub max: Option<u32>,
}

const VISIBILITY_RANGES: [(Visibility, WidthRange); 3] = [
    (
        Visibility::Mobile,
        WidthRange {
            min: 0,
            max: Some(767),
        },
    ),
    (
        Visibility::Tablet,
        WidthRange {
            min: 768,
            max: Some(1024),
        },
    ),
    (
        Visibility::Desktop,
        WidthRange {
            min: 1025,
            max: None,
        },
    ),
];

impl WidthRange {
    #[must_use]
    pub fn for_visibility(visibility: Visibility, custom_min: u32, custom_max: u32) -> Self {
        if visibility == Visibility::Custom {
            return Self {
                min: custom_min,
                max: (custom_max > 0).then_some(custom_max),
            };
        }

        VISIBILITY_RANGES
            .iter()
            .find(|(key, _)| *key == visibility)
            .map_or(VISIBILITY_RANGES[0].1, |(_, range)| *range)
    }

    /// `(min-width:..)` / `(max-width:..)` conditions; empty when the range
    /// covers every width.
    #[must_use]
    pub fn media_conditions(&self) -> Vec<String> {
        let mut conditions = Vec::with_capacity(2);
        if self.min > 0 {
            conditions.push(format!("(min-width:{}px)", self.min));
        }
        if let Some(max) = self.max {
            conditions.push(format!("(max-width:{max}px)"));
        }
        conditions
    }
}
