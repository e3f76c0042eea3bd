//! Option picker popup

use crate::state::{OptionPicker, SelectOption};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

const PICKER_WIDTH: u16 = 48;
const PICKER_MAX_HEIGHT: u16 = 20;

/// Render a centered, filterable option list over the form
pub fn render_picker(
    frame: &mut Frame,
    title: &str,
    picker: &OptionPicker,
    options: &[SelectOption],
) {
    let area = centered(frame.area(), PICKER_WIDTH, PICKER_MAX_HEIGHT);

    // Clear the area behind the popup
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(format!(" Pilih {title} "))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .style(Style::default().bg(Color::Black));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Filter
            Constraint::Length(1), // Separator
            Constraint::Min(0),    // Options
        ])
        .split(inner);

    let filter = Paragraph::new(Line::from(vec![
        Span::styled("Cari: ", Style::default().fg(Color::DarkGray)),
        Span::raw(picker.query.as_str()),
        Span::styled("▌", Style::default().fg(Color::Cyan)),
    ]));
    frame.render_widget(filter, chunks[0]);

    let filtered = picker.filtered(options);
    if filtered.is_empty() {
        let empty = Paragraph::new("No matching options")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, chunks[2]);
        return;
    }

    let items: Vec<ListItem> = filtered
        .iter()
        .map(|option| ListItem::new(option.label.as_str()))
        .collect();
    let list = List::new(items)
        .highlight_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▸ ");

    let mut state = ListState::default().with_selected(Some(picker.highlighted));
    frame.render_stateful_widget(list, chunks[2], &mut state);
}

/// A rect of at most `width` x `height`, centered in `area`
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
