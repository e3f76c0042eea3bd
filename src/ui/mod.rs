//! UI module for rendering the TUI

mod components;
mod family_list;
mod forms;
mod layout;

use crate::app::App;
use crate::state::View;
use ratatui::Frame;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let main_area = layout::create_layout(frame.area());

    // Draw main content based on current view
    match &app.state.current_view {
        View::FamilyList => family_list::draw(frame, main_area, app),
        View::FamilyEdit => forms::draw_family_edit(frame, main_area, app),
    }

    // Overlays
    if let Some(picker) = &app.state.picker {
        let options = app.controller.options_for(picker.field).options();
        let title = app.controller.form().field(picker.field).label;
        components::render_picker(frame, title, picker, options);
    }
    if let Some(toast) = app.toasts.current() {
        components::render_toast(frame, toast, app.toasts.len());
    }

    // Draw status bar
    layout::draw_status_bar(frame, app);
}
