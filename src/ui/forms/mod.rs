//! Form rendering module
//!
//! - `field_renderer`: text and select field rendering
//! - `family_form`: the family edit form

mod family_form;
mod field_renderer;

pub use family_form::draw_family_edit;
