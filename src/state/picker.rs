//! Popup picker for select fields

use super::forms::FieldId;
use super::options::SelectOption;

/// State of an open option picker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionPicker {
    pub field: FieldId,
    pub query: String,
    pub highlighted: usize,
}

impl OptionPicker {
    pub fn new(field: FieldId) -> Self {
        Self {
            field,
            query: String::new(),
            highlighted: 0,
        }
    }

    /// Open with the currently selected value highlighted
    pub fn with_selection(field: FieldId, options: &[SelectOption], selected: Option<i64>) -> Self {
        let mut picker = Self::new(field);
        if let Some(value) = selected {
            picker.highlighted = options.iter().position(|o| o.value == value).unwrap_or(0);
        }
        picker
    }

    /// Options whose label contains the query, case-insensitively
    pub fn filtered<'a>(&self, options: &'a [SelectOption]) -> Vec<&'a SelectOption> {
        let query = self.query.to_lowercase();
        options
            .iter()
            .filter(|o| query.is_empty() || o.label.to_lowercase().contains(&query))
            .collect()
    }

    pub fn push_char(&mut self, c: char) {
        self.query.push(c);
        self.highlighted = 0;
    }

    pub fn pop_char(&mut self) {
        self.query.pop();
        self.highlighted = 0;
    }

    pub fn move_down(&mut self, visible: usize) {
        if visible > 0 && self.highlighted + 1 < visible {
            self.highlighted += 1;
        }
    }

    pub fn move_up(&mut self) {
        self.highlighted = self.highlighted.saturating_sub(1);
    }

    /// Value under the cursor
    pub fn chosen(&self, options: &[SelectOption]) -> Option<i64> {
        self.filtered(options).get(self.highlighted).map(|o| o.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provinces() -> Vec<SelectOption> {
        vec![
            SelectOption::new(11, "Aceh"),
            SelectOption::new(12, "Sumatera Utara"),
            SelectOption::new(13, "Sumatera Barat"),
            SelectOption::new(31, "DKI Jakarta"),
        ]
    }

    #[test]
    fn test_filter_is_case_insensitive() {
        let mut picker = OptionPicker::new(FieldId::State);
        for c in "SUMATERA".chars() {
            picker.push_char(c);
        }
        let options = provinces();
        let labels: Vec<_> = picker
            .filtered(&options)
            .iter()
            .map(|o| o.label.as_str())
            .collect();
        assert_eq!(labels, vec!["Sumatera Utara", "Sumatera Barat"]);
    }

    #[test]
    fn test_chosen_follows_highlight_within_filter() {
        let options = provinces();
        let mut picker = OptionPicker::new(FieldId::State);
        picker.push_char('s');
        picker.move_down(picker.filtered(&options).len());
        assert_eq!(picker.chosen(&options), Some(13));
    }

    #[test]
    fn test_move_is_bounded() {
        let options = provinces();
        let mut picker = OptionPicker::new(FieldId::State);
        picker.move_up();
        assert_eq!(picker.highlighted, 0);
        for _ in 0..10 {
            picker.move_down(options.len());
        }
        assert_eq!(picker.highlighted, 3);
    }

    #[test]
    fn test_with_selection_highlights_current_value() {
        let picker = OptionPicker::with_selection(FieldId::State, &provinces(), Some(31));
        assert_eq!(picker.highlighted, 3);
        let picker = OptionPicker::with_selection(FieldId::State, &provinces(), Some(99));
        assert_eq!(picker.highlighted, 0);
    }

    #[test]
    fn test_no_match_chooses_nothing() {
        let mut picker = OptionPicker::new(FieldId::City);
        picker.push_char('x');
        assert_eq!(picker.chosen(&provinces()), None);
    }
}
