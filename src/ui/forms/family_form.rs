//! Family edit form
//!
//! Layout:
//! +------------------------------------------+
//! | Info (code, rayon, branch, last update)  |
//! +------------------------------------------+
//! | Name                                     |
//! | Address (multiline)                      |
//! | Province           | City                |
//! | District           | Phone               |
//! | RW       | RT      | Postal code         |
//! | [ Simpan ]                               |
//! +------------------------------------------+

use super::field_renderer::{draw_field, draw_help_text, draw_select_field, FieldDecor};
use crate::app::App;
use crate::controller::{FamilyFormController, RecordState};
use crate::platform::{RELOAD_SHORTCUT, SAVE_SHORTCUT};
use crate::state::{Family, FieldId};
use crate::ui::components::{render_button, BUTTON_HEIGHT};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Draw the family edit view
pub fn draw_family_edit(frame: &mut Frame, area: Rect, app: &App) {
    let controller = &app.controller;
    let id = controller.family_id().unwrap_or("-");

    let block = Block::default()
        .title(format!(" Edit Keluarga {id} "))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    match controller.record() {
        RecordState::Loaded(family) => draw_loaded(frame, inner, controller, family),
        RecordState::Idle | RecordState::Loading => {
            draw_message(frame, inner, "Loading family...", Color::DarkGray)
        }
        RecordState::NotFound => draw_message(
            frame,
            inner,
            &format!("Family {id} was not found. Esc: back"),
            Color::Yellow,
        ),
        RecordState::Failed(err) => draw_message(
            frame,
            inner,
            &format!("Failed to load family: {err}\n{RELOAD_SHORTCUT}: retry | Esc: back"),
            Color::Red,
        ),
    }
}

fn draw_message(frame: &mut Frame, area: Rect, message: &str, color: Color) {
    let content = Paragraph::new(message).style(Style::default().fg(color));
    frame.render_widget(content, area);
}

fn draw_loaded(frame: &mut Frame, area: Rect, controller: &FamilyFormController, family: &Family) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),             // Info
            Constraint::Length(3),             // Name
            Constraint::Length(5),             // Address
            Constraint::Length(3),             // Province | City
            Constraint::Length(3),             // District | Phone
            Constraint::Length(3),             // RW | RT | Postal code
            Constraint::Length(BUTTON_HEIGHT), // Submit
            Constraint::Min(0),                // Spacer
            Constraint::Length(1),             // Help
        ])
        .split(area);

    draw_info(frame, chunks[0], family);

    draw_form_field(frame, chunks[1], controller, FieldId::Name);
    draw_form_field(frame, chunks[2], controller, FieldId::Address);

    let halves = |row: Rect| {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(row)
    };

    let locality = halves(chunks[3]);
    draw_form_field(frame, locality[0], controller, FieldId::State);
    draw_form_field(frame, locality[1], controller, FieldId::City);

    let contact = halves(chunks[4]);
    draw_form_field(frame, contact[0], controller, FieldId::District);
    draw_form_field(frame, contact[1], controller, FieldId::PhoneNumber);

    let numbers = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(50),
        ])
        .split(chunks[5]);
    draw_form_field(frame, numbers[0], controller, FieldId::Hamlet);
    draw_form_field(frame, numbers[1], controller, FieldId::Neighbourhood);
    draw_form_field(frame, numbers[2], controller, FieldId::PostalCode);

    let button_area = Rect {
        width: chunks[6].width.min(24),
        ..chunks[6]
    };
    let label = if controller.is_submitting() {
        "Menyimpan..."
    } else {
        "Simpan"
    };
    render_button(
        frame,
        button_area,
        label,
        controller.form().is_submit_row_active(),
        !controller.is_submitting(),
    );

    draw_help_text(
        frame,
        chunks[8],
        &format!("Tab/Shift+Tab: move | Enter: choose | {SAVE_SHORTCUT}: save | Esc: cancel"),
    );
}

/// Read-only record details
fn draw_info(frame: &mut Frame, area: Rect, family: &Family) {
    let label = Style::default().fg(Color::DarkGray);
    let value = Style::default().add_modifier(Modifier::BOLD);
    let updated = family
        .updated_at
        .map(|at| at.format("%d/%m/%Y").to_string())
        .unwrap_or_else(|| "-".to_string());

    let lines = vec![
        Line::from(vec![
            Span::styled("NO KKJ: ", label),
            Span::styled(family.display_code().to_string(), value),
            Span::styled("   Rayon: ", label),
            Span::styled(family.church_area.clone().unwrap_or_default(), value),
        ]),
        Line::from(vec![
            Span::styled("Cabang: ", label),
            Span::styled(family.church_name.clone().unwrap_or_default(), value),
            Span::styled("   Tanggal Process: ", label),
            Span::styled(updated, value),
        ]),
    ];
    frame.render_widget(Paragraph::new(lines), area);
}

fn draw_form_field(frame: &mut Frame, area: Rect, controller: &FamilyFormController, id: FieldId) {
    let form = controller.form();
    let field = form.field(id);
    let decor = FieldDecor {
        is_active: form.active_field_id() == Some(id),
        is_required: controller.is_required(id),
        error: controller.visible_error(id),
    };

    if field.is_select() {
        draw_select_field(
            frame,
            area,
            field,
            controller.options_for(id),
            controller.selected_option(id),
            decor,
        );
    } else {
        draw_field(frame, area, field, decor);
    }
}
