//! Form domain layer
//!
//! Type-safe form handling for the family edit view: field values, the
//! editable draft and the declarative validation schema.

mod family_form;
mod field;
mod schema;

pub use family_form::{FamilyForm, FieldId, Form};
pub use field::FormField;
pub use schema::{ErrorMap, Schema};
