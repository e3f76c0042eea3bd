//! Layout components (content area, status bar)

use crate::app::App;
use crate::platform::SAVE_SHORTCUT;
use crate::state::View;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Create the main layout, reserving the bottom line for the status bar
pub fn create_layout(area: Rect) -> Rect {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    chunks[0]
}

/// Draw the status bar
pub fn draw_status_bar(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let status_area = Rect {
        x: 0,
        y: area.height.saturating_sub(1),
        width: area.width,
        height: 1,
    };

    let mut spans = vec![Span::styled(
        format!(" {} ", app.api_address),
        Style::default().fg(Color::Blue),
    )];

    // View-specific hints
    let hints = if app.state.picker.is_some() {
        "type: filter | ↑/↓: move | Enter: choose | Esc: close".to_string()
    } else {
        get_view_hints(&app.state.current_view)
    };
    spans.push(Span::styled(hints, Style::default().fg(Color::DarkGray)));

    if let Some(message) = &app.status_message {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(
            message.as_str(),
            Style::default().fg(Color::Yellow),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), status_area);
}

/// Get hints for the current view
fn get_view_hints(view: &View) -> String {
    match view {
        View::FamilyList => {
            "j/k: navigate | Enter: edit | n/p: page | r: reload | q: quit".to_string()
        }
        View::FamilyEdit => format!(
            "Tab: next | Enter: choose | {SAVE_SHORTCUT}: save | Ctrl+R: reload | Esc: cancel"
        ),
    }
}
