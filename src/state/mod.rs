//! Application state module

mod app_state;
mod family;
mod forms;
mod options;
mod picker;
mod toast;

pub use app_state::*;
pub use family::*;
pub use forms::*;
pub use options::*;
pub use picker::*;
pub use toast::*;
