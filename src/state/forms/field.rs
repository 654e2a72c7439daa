//! Form field value objects

use serde::{Deserialize, Serialize};

/// Type-safe field values
///
/// Serialized untagged so a section maps directly onto a JSON object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Flag(bool),
    Number(f64),
    Text(String),
}

impl Default for FieldValue {
    fn default() -> Self {
        FieldValue::Text(String::new())
    }
}

impl FieldValue {
    /// Get the text value (returns empty string for non-text fields)
    pub fn as_text(&self) -> &str {
        match self {
            FieldValue::Text(s) => s,
            _ => "",
        }
    }

    /// Get the flag value (false for non-flag fields)
    pub fn as_flag(&self) -> bool {
        matches!(self, FieldValue::Flag(true))
    }

    /// Get the display value for rendering
    pub fn display_value(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                format!("{}", *n as i64)
            }
            FieldValue::Number(n) => n.to_string(),
            FieldValue::Flag(true) => "Yes".to_string(),
            FieldValue::Flag(false) => "No".to_string(),
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, FieldValue::Text(s) if s.trim().is_empty())
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Flag(value)
    }
}

/// Option lists served by the dropdown endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropdownList {
    Materials,
    DeliveryTerms,
    DeliveryModes,
    /// Depends on the selected delivery mode
    Packaging,
    Currencies,
    Surveyors,
}

/// How a field is edited in the wizard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
    Flag,
    Choice(DropdownList),
}

/// Static description of a single form field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub const fn text(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::Text,
        }
    }

    pub const fn number(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::Number,
        }
    }

    pub const fn flag(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::Flag,
        }
    }

    pub const fn choice(name: &'static str, label: &'static str, list: DropdownList) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::Choice(list),
        }
    }

    /// Apply a typed character to the current value, respecting the field kind.
    ///
    /// Number fields only become numbers when the number displays exactly as
    /// typed, so input like "12.", "0.0" or "10.50" stays as text.
    pub fn push_char(&self, current: Option<&FieldValue>, c: char) -> Option<FieldValue> {
        match self.kind {
            FieldKind::Flag => None,
            FieldKind::Text | FieldKind::Choice(_) => {
                let mut text = current.map(FieldValue::display_value).unwrap_or_default();
                text.push(c);
                Some(FieldValue::Text(text))
            }
            FieldKind::Number => {
                if !(c.is_ascii_digit() || c == '.' || c == '-') {
                    return None;
                }
                let mut text = current.map(FieldValue::display_value).unwrap_or_default();
                text.push(c);
                Some(Self::number_value(text))
            }
        }
    }

    /// Remove the last character from the current value
    pub fn pop_char(&self, current: Option<&FieldValue>) -> Option<FieldValue> {
        match self.kind {
            FieldKind::Flag => None,
            FieldKind::Text | FieldKind::Choice(_) => {
                let mut text = current.map(FieldValue::display_value).unwrap_or_default();
                text.pop();
                Some(FieldValue::Text(text))
            }
            FieldKind::Number => {
                let mut text = current.map(FieldValue::display_value).unwrap_or_default();
                text.pop();
                Some(Self::number_value(text))
            }
        }
    }

    fn number_value(text: String) -> FieldValue {
        match text.parse::<f64>().map(FieldValue::Number) {
            Ok(number) if number.display_value() == text => number,
            _ => FieldValue::Text(text),
        }
    }

    /// Value as sent to the backend: numeric text in a number field becomes a number
    pub fn wire_value(&self, value: &FieldValue) -> FieldValue {
        match (self.kind, value) {
            (FieldKind::Number, FieldValue::Text(text)) => text
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .map(FieldValue::Number)
                .unwrap_or_else(|| value.clone()),
            _ => value.clone(),
        }
    }
}
