//! Form field value objects

/// Type-safe field values
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    /// Identifier picked from an option list
    Select(Option<i64>),
}

impl Default for FieldValue {
    fn default() -> Self {
        FieldValue::Text(String::new())
    }
}

/// Represents a single form field with its configuration and value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub name: &'static str,
    pub label: &'static str,
    pub placeholder: &'static str,
    pub value: FieldValue,
    pub is_multiline: bool,
}

impl FormField {
    /// Create a new text field
    pub fn text(name: &'static str, label: &'static str, placeholder: &'static str) -> Self {
        Self {
            name,
            label,
            placeholder,
            value: FieldValue::Text(String::new()),
            is_multiline: false,
        }
    }

    /// Create a new multiline text field
    pub fn textarea(name: &'static str, label: &'static str, placeholder: &'static str) -> Self {
        Self {
            is_multiline: true,
            ..Self::text(name, label, placeholder)
        }
    }

    /// Create a new select field
    pub fn select(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            placeholder: "",
            value: FieldValue::Select(None),
            is_multiline: false,
        }
    }

    pub fn is_select(&self) -> bool {
        matches!(self.value, FieldValue::Select(_))
    }

    /// Get the text value (returns empty string for select fields)
    pub fn as_text(&self) -> &str {
        match &self.value {
            FieldValue::Text(s) => s,
            FieldValue::Select(_) => "",
        }
    }

    /// Get the selected identifier (returns None for text fields)
    pub fn as_selected(&self) -> Option<i64> {
        match self.value {
            FieldValue::Select(v) => v,
            FieldValue::Text(_) => None,
        }
    }

    /// Set the text value
    pub fn set_text(&mut self, value: impl Into<String>) {
        self.value = FieldValue::Text(value.into());
    }

    /// Set the selected identifier
    pub fn set_selected(&mut self, value: Option<i64>) {
        self.value = FieldValue::Select(value);
    }

    /// Push a character to the field value
    pub fn push_char(&mut self, c: char) {
        if let FieldValue::Text(s) = &mut self.value {
            s.push(c);
        }
    }

    /// Remove the last character from the field value
    pub fn pop_char(&mut self) {
        if let FieldValue::Text(s) = &mut self.value {
            s.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_field_editing() {
        let mut field = FormField::text("name", "Nama Keluarga", "");
        field.push_char('a');
        field.push_char('b');
        field.pop_char();
        assert_eq!(field.as_text(), "a");
        assert!(!field.is_select());
    }

    #[test]
    fn test_select_field_ignores_typing() {
        let mut field = FormField::select("state_id", "Provinsi");
        field.push_char('1');
        field.pop_char();
        assert_eq!(field.as_selected(), None);
        field.set_selected(Some(12));
        assert_eq!(field.as_selected(), Some(12));
        assert_eq!(field.as_text(), "");
    }

    #[test]
    fn test_textarea_is_multiline() {
        assert!(FormField::textarea("address", "Alamat Lengkap", "").is_multiline);
    }
}
