//! Items, property values, and configuration validation.

use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;

/// A selectable candidate.
///
/// The displayed text is the `label` when present, otherwise the `value`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Item {
    /// Unique identifier committed as the combobox value.
    pub value: String,
    /// Human-readable text shown in the menu and the input.
    #[serde(default)]
    pub label: Option<String>,
}

impl Item {
    /// An item whose label is its value.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: None,
        }
    }

    /// An item with a separate display label.
    pub fn labeled(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: Some(label.into()),
        }
    }

    /// The text shown for this item.
    pub fn display_text(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.value)
    }
}

/// Initial properties for a [`Combobox`](super::Combobox).
///
/// Every field has a default, so hosts can deserialize a partial JSON object:
///
/// ```
/// use forma_widgets::combobox::ComboboxProps;
///
/// let props: ComboboxProps = serde_json::from_str(
///     r#"{ "label": "Fruit", "requiredIcon": true, "items": [{ "value": "1", "label": "Apple" }] }"#,
/// ).unwrap();
/// assert!(props.visible);
/// assert_eq!(props.items[0].display_text(), "Apple");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ComboboxProps {
    pub items: Vec<Item>,
    pub value: String,
    pub label: String,
    pub disabled: bool,
    pub required_icon: bool,
    pub visible: bool,
    pub error: String,
    pub language: String,
}

impl Default for ComboboxProps {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            value: String::new(),
            label: String::new(),
            disabled: false,
            required_icon: false,
            visible: true,
            error: String::new(),
            language: "auto".into(),
        }
    }
}

/// A rejected property update.
///
/// The combobox keeps its previous state and reports the error after the
/// update cycle that received the bad value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("'items' property is not array")]
    ItemsNotArray,

    #[error("'items[{index}]' is not a valid item: {reason}")]
    InvalidItem { index: usize, reason: String },

    #[error("'items[].value' is duplicated: {value:?}")]
    DuplicatedValues { value: String },

    #[error("'value' property is not string")]
    ValueNotString,

    #[error("'{name}' property is not {expected}")]
    InvalidProperty { name: String, expected: &'static str },

    #[error("unknown property '{name}'")]
    UnknownProperty { name: String },
}

/// Reject candidate lists whose values are not unique.
pub fn validate_items(items: &[Item]) -> Result<(), ConfigurationError> {
    let mut seen = HashSet::with_capacity(items.len());
    for item in items {
        if !seen.insert(item.value.as_str()) {
            return Err(ConfigurationError::DuplicatedValues {
                value: item.value.clone(),
            });
        }
    }
    Ok(())
}

/// Parse and validate an untyped `items` value.
pub fn parse_items(value: Value) -> Result<Vec<Item>, ConfigurationError> {
    let Value::Array(entries) = value else {
        return Err(ConfigurationError::ItemsNotArray);
    };
    let items = entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            serde_json::from_value::<Item>(entry).map_err(|err| ConfigurationError::InvalidItem {
                index,
                reason: err.to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    validate_items(&items)?;
    Ok(items)
}

/// Parse an untyped `value`.
pub fn validate_value(value: Value) -> Result<String, ConfigurationError> {
    match value {
        Value::String(s) => Ok(s),
        _ => Err(ConfigurationError::ValueNotString),
    }
}

/// A single typed property assignment.
#[derive(Debug, Clone, PartialEq)]
pub enum Property {
    Items(Vec<Item>),
    Value(String),
    Label(String),
    Disabled(bool),
    RequiredIcon(bool),
    Visible(bool),
    Error(String),
    Language(String),
}

impl Property {
    /// Convert a `(name, value)` pair, as a host reading attributes or JSON
    /// would supply it, into a typed property.
    ///
    /// Names are accepted in camelCase (`requiredIcon`) or kebab-case
    /// (`required-icon`).
    pub fn parse(name: &str, value: Value) -> Result<Self, ConfigurationError> {
        match name {
            "items" => parse_items(value).map(Property::Items),
            "value" => validate_value(value).map(Property::Value),
            "label" => string_prop(name, value).map(Property::Label),
            "error" => string_prop(name, value).map(Property::Error),
            "language" => string_prop(name, value).map(Property::Language),
            "disabled" => bool_prop(name, value).map(Property::Disabled),
            "requiredIcon" | "required-icon" => bool_prop(name, value).map(Property::RequiredIcon),
            "visible" => bool_prop(name, value).map(Property::Visible),
            _ => Err(ConfigurationError::UnknownProperty { name: name.into() }),
        }
    }
}

fn string_prop(name: &str, value: Value) -> Result<String, ConfigurationError> {
    match value {
        Value::String(s) => Ok(s),
        _ => Err(ConfigurationError::InvalidProperty {
            name: name.into(),
            expected: "string",
        }),
    }
}

fn bool_prop(name: &str, value: Value) -> Result<bool, ConfigurationError> {
    match value {
        Value::Bool(b) => Ok(b),
        _ => Err(ConfigurationError::InvalidProperty {
            name: name.into(),
            expected: "boolean",
        }),
    }
}
