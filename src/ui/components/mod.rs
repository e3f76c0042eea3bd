//! Reusable UI components

mod button;
mod picker;
mod toast;

pub use button::{render_button, BUTTON_HEIGHT};
pub use picker::render_picker;
pub use toast::render_toast;
