//! Declarative validation schema
//!
//! A schema is a list of field rules. Validation is a pure function of the
//! form and produces an [`ErrorMap`]; a field without an entry is valid.

use super::family_form::{FamilyForm, FieldId};
use super::field::{FieldValue, FormField};
use std::collections::BTreeMap;

/// Validation errors keyed by field
pub type ErrorMap = BTreeMap<FieldId, String>;

/// A single constraint on a field value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Non-blank text, or a selected value
    Required,
    /// Selected value (or numeric text) greater than zero; absent values pass
    PositiveInteger,
}

impl Rule {
    fn check(self, field: &FormField) -> bool {
        match (self, &field.value) {
            (Rule::Required, FieldValue::Text(s)) => !s.trim().is_empty(),
            (Rule::Required, FieldValue::Select(v)) => v.is_some(),
            (Rule::PositiveInteger, FieldValue::Select(v)) => v.map_or(true, |v| v > 0),
            (Rule::PositiveInteger, FieldValue::Text(s)) => {
                s.trim().is_empty() || s.trim().parse::<i64>().is_ok_and(|v| v > 0)
            }
        }
    }
}

/// Rules for one field with the message shown when any of them fails
#[derive(Debug, Clone)]
pub struct FieldRule {
    pub field: FieldId,
    pub rules: Vec<Rule>,
    pub message: &'static str,
}

impl FieldRule {
    pub fn new(field: FieldId, rules: &[Rule], message: &'static str) -> Self {
        Self {
            field,
            rules: rules.to_vec(),
            message,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Schema {
    rules: Vec<FieldRule>,
}

impl Schema {
    pub fn new(rules: Vec<FieldRule>) -> Self {
        Self { rules }
    }

    /// Rules for the family edit form
    pub fn family() -> Self {
        use Rule::{PositiveInteger, Required};
        Self::new(vec![
            FieldRule::new(FieldId::Name, &[Required], "Name is required"),
            FieldRule::new(
                FieldId::State,
                &[Required, PositiveInteger],
                "State is required",
            ),
            FieldRule::new(
                FieldId::City,
                &[Required, PositiveInteger],
                "City is required",
            ),
            FieldRule::new(FieldId::Address, &[Required], "Address is required"),
            FieldRule::new(FieldId::District, &[Required], "District is required"),
            FieldRule::new(FieldId::PostalCode, &[Required], "Postal code is required"),
            FieldRule::new(
                FieldId::PhoneNumber,
                &[Required],
                "Phone number is required",
            ),
        ])
    }

    /// Validate the whole form
    pub fn validate(&self, form: &FamilyForm) -> ErrorMap {
        self.rules
            .iter()
            .filter(|rule| !rule.rules.iter().all(|r| r.check(form.field(rule.field))))
            .map(|rule| (rule.field, rule.message.to_string()))
            .collect()
    }

    /// Whether a field carries any rule
    pub fn is_constrained(&self, field: FieldId) -> bool {
        self.rules.iter().any(|r| r.field == field)
    }
}
