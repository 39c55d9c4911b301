use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::bar::MAX_BUTTONS;

/// A numeric field as it arrives from a form (text) or from storage (number).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RawNumber {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl RawNumber {
    /// Integer value, reading the leading `[+-]?[0-9]+` of text input.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            Self::Float(value) => value.is_finite().then(|| value.trunc() as i64),
            Self::Text(text) => leading_integer(text),
        }
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Number(number) => number
                .as_i64()
                .map(Self::Integer)
                .or_else(|| number.as_f64().map(Self::Float)),
            Value::String(text) => Some(Self::Text(text)),
            _ => None,
        }
    }
}

impl From<u32> for RawNumber {
    fn from(value: u32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<&str> for RawNumber {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

fn leading_integer(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let (negative, rest) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }

    let digits = &rest[..digits_len];
    let magnitude = digits.parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

/// Raw input for one button row. Every field is optional; the resolver fills
/// gaps from the positional default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawButtonConfig {
    #[serde(deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub size: Option<RawNumber>,
    #[serde(deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub action_type: Option<String>,
    #[serde(deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub integration_provider: Option<String>,
    #[serde(deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub target_selector: Option<String>,
}

/// Raw bar settings: a form submission or the persisted option record.
///
/// Deserialization never fails on a JSON object. Values of the wrong shape
/// read as absent, and `buttons` may be an array or an object keyed by
/// position (`{"0": {...}, "1": {...}}`), which is how form rows arrive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawBarConfig {
    #[serde(deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub buttons_count: Option<RawNumber>,
    #[serde(deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub visibility: Option<String>,
    #[serde(deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub custom_min_width: Option<RawNumber>,
    #[serde(deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub custom_max_width: Option<RawNumber>,
    #[serde(deserialize_with = "lenient_buttons", skip_serializing_if = "Vec::is_empty")]
    pub buttons: Vec<RawButtonConfig>,
}

impl RawBarConfig {
    /// Read a raw config from arbitrary JSON; anything but an object is empty.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        if !value.is_object() {
            return Self::default();
        }
        serde_json::from_value(value).unwrap_or_default()
    }
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<RawNumber>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(RawNumber::from_value(Value::deserialize(deserializer)?))
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => Some(text),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    })
}

fn lenient_buttons<'de, D>(deserializer: D) -> Result<Vec<RawButtonConfig>, D::Error>
where
    D: Deserializer<'de>,
{
    let row = |value: Value| {
        if value.is_object() {
            serde_json::from_value::<RawButtonConfig>(value).unwrap_or_default()
        } else {
            RawButtonConfig::default()
        }
    };

    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items.into_iter().map(row).collect(),
        Value::Object(map) => {
            let mut rows = Vec::new();
            for (key, value) in map {
                let Ok(index) = key.trim().parse::<usize>() else {
                    continue;
                };
                if index >= MAX_BUTTONS as usize {
                    continue;
                }
                if rows.len() <= index {
                    rows.resize_with(index + 1, RawButtonConfig::default);
                }
                rows[index] = row(value);
            }
            rows
        }
        _ => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn leading_integer_reads_numeric_prefix() {
        assert_eq!(leading_integer("12px"), Some(12));
        assert_eq!(leading_integer("  -5"), Some(-5));
        assert_eq!(leading_integer("+7"), Some(7));
        assert_eq!(leading_integer("px12"), None);
        assert_eq!(leading_integer(""), None);
        assert_eq!(leading_integer("-"), None);
        assert_eq!(leading_integer("99999999999999999999999"), Some(i64::MAX));
    }

    #[test]
    fn numbers_accept_json_numbers_and_strings() {
        assert_eq!(RawNumber::Integer(3).as_integer(), Some(3));
        assert_eq!(RawNumber::Float(3.9).as_integer(), Some(3));
        assert_eq!(RawNumber::Float(f64::NAN).as_integer(), None);
        assert_eq!(RawNumber::from("5").as_integer(), Some(5));
        assert_eq!(RawNumber::from("five").as_integer(), None);
    }

    #[test]
    fn wrong_shapes_read_as_absent() {
        let raw = RawBarConfig::from_value(json!({
            "buttons_count": true,
            "background_color": ["#000"],
            "visibility": null,
            "custom_min_width": {"px": 10},
            "buttons": "nope"
        }));

        assert_eq!(raw, RawBarConfig::default());
    }

    #[test]
    fn non_object_input_is_empty() {
        assert_eq!(RawBarConfig::from_value(json!("text")), RawBarConfig::default());
        assert_eq!(RawBarConfig::from_value(json!([1, 2])), RawBarConfig::default());
    }

    #[test]
    fn keyed_button_rows_keep_their_positions() {
        let raw = RawBarConfig::from_value(json!({
            "buttons": {
                "2": { "label": "Third" },
                "0": { "label": "First" },
                "x": { "label": "Ignored" },
                "40": { "label": "Out of range" }
            }
        }));

        assert_eq!(raw.buttons.len(), 3);
        assert_eq!(raw.buttons[0].label.as_deref(), Some("First"));
        assert_eq!(raw.buttons[1], RawButtonConfig::default());
        assert_eq!(raw.buttons[2].label.as_deref(), Some("Third"));
    }

    #[test]
    fn malformed_rows_become_empty_rows() {
        let raw = RawBarConfig::from_value(json!({
            "buttons": [42, { "size": "20", "color": 123 }]
        }));

        assert_eq!(raw.buttons.len(), 2);
        assert_eq!(raw.buttons[0], RawButtonConfig::default());
        assert_eq!(raw.buttons[1].size, Some(RawNumber::Text("20".to_string())));
        assert_eq!(raw.buttons[1].color.as_deref(), Some("123"));
    }

    #[test]
    fn serialization_omits_absent_fields() {
        let raw = RawBarConfig {
            buttons_count: Some(RawNumber::Integer(3)),
            ..RawBarConfig::default()
        };

        let value = serde_json::to_value(&raw).expect("raw config should serialize");
        assert_eq!(value, json!({ "buttons_count": 3 }));
    }
}
