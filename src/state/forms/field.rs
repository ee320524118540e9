//! Form field value objects

use super::validation::FieldPath;

/// Type-safe field values
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    /// Text that is masked when rendered
    Secret(String),
    /// Raw numeric input; coercion happens at validation time
    Number(String),
}

impl Default for FieldValue {
    fn default() -> Self {
        FieldValue::Text(String::new())
    }
}

/// Represents a single form input bound to a field path
#[derive(Debug, Clone)]
pub struct FormField {
    pub path: FieldPath,
    pub label: String,
    pub value: FieldValue,
}

impl FormField {
    /// Create a new text field
    pub fn text(path: FieldPath, label: &str) -> Self {
        Self {
            path,
            label: label.to_string(),
            value: FieldValue::Text(String::new()),
        }
    }

    /// Create a new masked field
    pub fn secret(path: FieldPath, label: &str) -> Self {
        Self {
            path,
            label: label.to_string(),
            value: FieldValue::Secret(String::new()),
        }
    }

    /// Create a new numeric field with initial value
    pub fn number_with_value(path: FieldPath, label: &str, value: &str) -> Self {
        Self {
            path,
            label: label.to_string(),
            value: FieldValue::Number(value.to_string()),
        }
    }

    /// Get the raw value
    pub fn as_text(&self) -> &str {
        match &self.value {
            FieldValue::Text(s) | FieldValue::Secret(s) | FieldValue::Number(s) => s,
        }
    }

    /// Set the raw value
    pub fn set_text(&mut self, value: String) {
        match &mut self.value {
            FieldValue::Text(s) | FieldValue::Secret(s) | FieldValue::Number(s) => *s = value,
        }
    }

    /// Push a character to the field value.
    ///
    /// Numeric fields only take characters that can appear in a number.
    pub fn push_char(&mut self, c: char) {
        match &mut self.value {
            FieldValue::Text(s) | FieldValue::Secret(s) => s.push(c),
            FieldValue::Number(s) => {
                if c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E') {
                    s.push(c);
                }
            }
        }
    }

    /// Remove the last character from the field value
    pub fn pop_char(&mut self) {
        match &mut self.value {
            FieldValue::Text(s) | FieldValue::Secret(s) | FieldValue::Number(s) => {
                s.pop();
            }
        }
    }

    /// Clear the field value
    pub fn clear(&mut self) {
        self.set_text(String::new());
    }

    /// Get the display value for rendering
    pub fn display_value(&self) -> String {
        match &self.value {
            FieldValue::Text(s) | FieldValue::Number(s) => s.clone(),
            FieldValue::Secret(s) => "•".repeat(s.chars().count()),
        }
    }
}
