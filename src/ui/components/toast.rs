//! Toast notification overlay

use crate::state::{Toast, ToastKind};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Render a toast in the top-right corner.
///
/// `queued` is the number of live toasts, shown when more than one waits
pub fn render_toast(frame: &mut Frame, toast: &Toast, queued: usize) {
    let area = frame.area();
    let color = match toast.kind {
        ToastKind::Success => Color::Green,
        ToastKind::Error => Color::Red,
    };

    let text = if queued > 1 {
        format!(" {} (+{}) ", toast.message, queued - 1)
    } else {
        format!(" {} ", toast.message)
    };

    // Text + borders
    let width = (text.chars().count() as u16 + 2).min(area.width);
    let toast_area = Rect {
        x: area.x + area.width.saturating_sub(width + 1),
        y: area.y + 1,
        width,
        height: 3.min(area.height),
    };

    frame.render_widget(Clear, toast_area);
    let content = Paragraph::new(text)
        .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color))
                .style(Style::default().bg(Color::Black)),
        );
    frame.render_widget(content, toast_area);
}
