//! Field rendering utilities for forms

use crate::platform::RELOAD_SHORTCUT;
use crate::state::{FormField, OptionList, SelectOption};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// How a field is drawn besides its value
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldDecor<'a> {
    pub is_active: bool,
    pub is_required: bool,
    /// Validation message shown in the bottom border
    pub error: Option<&'a str>,
}

impl FieldDecor<'_> {
    fn border_style(&self) -> Style {
        if self.error.is_some() {
            Style::default().fg(Color::Red)
        } else if self.is_active {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        }
    }

    fn block<'b>(&self, label: &str) -> Block<'b> {
        let title = if self.is_required {
            format!(" {label} * ")
        } else {
            format!(" {label} ")
        };
        let mut block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(self.border_style());
        if let Some(error) = self.error {
            block = block.title_bottom(Line::styled(
                format!(" {error} "),
                Style::default().fg(Color::Red),
            ));
        }
        block
    }
}

/// Draw a text field
pub fn draw_field(frame: &mut Frame, area: Rect, field: &FormField, decor: FieldDecor) {
    let style = if decor.is_active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::Gray)
    };

    let value = field.as_text();
    let cursor = if decor.is_active { "▌" } else { "" };

    let content = if value.is_empty() && !decor.is_active {
        Paragraph::new(Span::styled(
            field.placeholder,
            Style::default().fg(Color::DarkGray),
        ))
    } else if field.is_multiline {
        let mut lines: Vec<Line> = value
            .lines()
            .map(|l| Line::styled(l.to_string(), style))
            .collect();
        // A trailing newline starts an empty line the cursor sits on
        if value.is_empty() || value.ends_with('\n') {
            lines.push(Line::from(""));
        }
        if let Some(last) = lines.last_mut() {
            last.spans
                .push(Span::styled(cursor, Style::default().fg(Color::Cyan)));
        }
        Paragraph::new(lines)
    } else {
        Paragraph::new(Line::from(vec![
            Span::styled(value, style),
            Span::styled(cursor, Style::default().fg(Color::Cyan)),
        ]))
    };

    frame.render_widget(
        content
            .wrap(Wrap { trim: false })
            .block(decor.block(field.label)),
        area,
    );
}

/// Draw a select field with the label of its chosen option
pub fn draw_select_field(
    frame: &mut Frame,
    area: Rect,
    field: &FormField,
    options: &OptionList,
    selected: Option<&SelectOption>,
    decor: FieldDecor,
) {
    let (text, style) = select_display(options, selected);
    let marker = if decor.is_active { " ▾" } else { "" };

    let content = Paragraph::new(Line::from(vec![
        Span::styled(text, style),
        Span::styled(marker, Style::default().fg(Color::Cyan)),
    ]));

    frame.render_widget(content.block(decor.block(field.label)), area);
}

/// Text and style for a select field's current state
fn select_display(options: &OptionList, selected: Option<&SelectOption>) -> (String, Style) {
    if let Some(option) = selected {
        return (option.label.clone(), Style::default().fg(Color::White));
    }
    if options.is_loading() {
        return (
            "Loading...".to_string(),
            Style::default().fg(Color::DarkGray),
        );
    }
    if let Some(err) = options.error() {
        return (
            format!("Failed: {err} ({RELOAD_SHORTCUT} to retry)"),
            Style::default().fg(Color::Red),
        );
    }
    (
        "(not selected)".to_string(),
        Style::default().fg(Color::DarkGray),
    )
}

/// Draw help text at the bottom of a form
pub fn draw_help_text(frame: &mut Frame, area: Rect, text: &str) {
    let help = Paragraph::new(text).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, area);
}
