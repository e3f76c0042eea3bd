//! Family list view

use crate::app::App;
use crate::state::ListLoad;
use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

/// Draw the paged family list
pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let list = &app.state.family_list;
    let title = format!(" Families (page {}/{}) ", list.page, list.page_count());
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let message = match &list.load {
        ListLoad::Idle | ListLoad::Loading => Some(vec![Line::from("Loading families...")]),
        ListLoad::Failed(err) => Some(vec![
            Line::styled(
                format!("Failed to load families: {err}"),
                Style::default().fg(Color::Red),
            ),
            Line::from(""),
            Line::styled("r: retry", Style::default().fg(Color::DarkGray)),
        ]),
        ListLoad::Loaded(_) if list.families().is_empty() => {
            Some(vec![Line::from("No families found.")])
        }
        ListLoad::Loaded(_) => None,
    };

    if let Some(lines) = message {
        let content = Paragraph::new(lines)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(content, area);
        return;
    }

    let header = Row::new(["NO KKJ", "Nama Keluarga", "No Telfon", "Kecamatan"])
        .style(Style::default().add_modifier(Modifier::BOLD));

    let rows = list.families().iter().map(|family| {
        Row::new([
            Cell::from(family.display_code().to_string()),
            Cell::from(family.name.clone()),
            Cell::from(family.family_phone_number.clone()),
            Cell::from(family.district.clone()),
        ])
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(12),
            Constraint::Min(20),
            Constraint::Length(16),
            Constraint::Length(20),
        ],
    )
    .header(header)
    .block(block)
    .row_highlight_style(
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("▸ ");

    let mut state = TableState::default().with_selected(Some(list.selected_index));
    frame.render_stateful_widget(table, area, &mut state);
}
