//! Sign-up form rendering

use super::field_renderer::{draw_field, draw_field_error, draw_help_text};
use crate::app::App;
use crate::state::{FieldPath, Focus, FormField, TechRow, ValidationErrors};
use crate::ui::components::{render_button, BUTTON_HEIGHT};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Height of a bordered input
const FIELD_HEIGHT: u16 = 3;
/// Height of the inline error line under an input
const ERROR_HEIGHT: u16 = 1;
const ROW_HEIGHT: u16 = FIELD_HEIGHT + ERROR_HEIGHT;
/// Avatar, name, email, password
const FIXED_ROWS: u16 = 4;

/// Draw the sign-up form
pub fn draw_signup_form(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(" Sign up ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let form = &app.state.form;
    let errors = &app.state.errors;
    let focus = form.focus();

    // Everything except the tech rows: fixed rows, list header, list error, buttons, help
    let reserved = FIXED_ROWS * ROW_HEIGHT + 1 + ERROR_HEIGHT + BUTTON_HEIGHT + 1;
    let capacity = usize::from(inner.height.saturating_sub(reserved) / ROW_HEIGHT).max(1);
    let anchor = match focus {
        Focus::Field(path) => path.tech_index().unwrap_or(0),
        Focus::AddTechButton | Focus::SubmitButton => form.techs.len().saturating_sub(1),
    };
    let (start, end) = visible_tech_window(form.techs.len(), capacity, anchor);

    let mut constraints = Vec::new();
    for _ in 0..FIXED_ROWS {
        constraints.push(Constraint::Length(FIELD_HEIGHT));
        constraints.push(Constraint::Length(ERROR_HEIGHT));
    }
    constraints.push(Constraint::Length(1)); // Tech list header
    for _ in start..end {
        constraints.push(Constraint::Length(FIELD_HEIGHT));
        constraints.push(Constraint::Length(ERROR_HEIGHT));
    }
    constraints.push(Constraint::Length(ERROR_HEIGHT)); // List-level error
    constraints.push(Constraint::Length(BUTTON_HEIGHT)); // Buttons
    constraints.push(Constraint::Length(1)); // Help text
    constraints.push(Constraint::Min(0));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    let mut idx = 0;
    for field in [&form.avatar, &form.name, &form.email, &form.password] {
        draw_input(frame, chunks[idx], chunks[idx + 1], field, focus, errors);
        idx += 2;
    }

    draw_tech_header(frame, chunks[idx], form.techs.len(), start, end);
    idx += 1;

    for (index, row) in form.techs.iter().enumerate().take(end).skip(start) {
        draw_tech_row(frame, chunks[idx], chunks[idx + 1], index, row, focus, errors);
        idx += 2;
    }

    draw_field_error(frame, chunks[idx], errors.get(FieldPath::Techs));
    idx += 1;

    let buttons = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(22), // Add technology
            Constraint::Length(12), // Submit
            Constraint::Min(0),
        ])
        .split(chunks[idx]);
    render_button(
        frame,
        buttons[0],
        "+ Add technology",
        focus == Focus::AddTechButton,
    );
    render_button(frame, buttons[1], "Submit", focus == Focus::SubmitButton);
    idx += 1;

    draw_help_text(
        frame,
        chunks[idx],
        &[
            ("Tab", "next"),
            (crate::platform::SUBMIT_SHORTCUT, "submit"),
            ("Ctrl+A", "add tech"),
            ("Ctrl+D", "remove tech"),
            ("Ctrl+U", "clear"),
        ],
    );
}

fn draw_input(
    frame: &mut Frame,
    field_area: Rect,
    error_area: Rect,
    field: &FormField,
    focus: Focus,
    errors: &ValidationErrors,
) {
    let is_active = focus == Focus::Field(field.path);
    draw_field(frame, field_area, field, is_active, errors.contains(field.path));
    draw_field_error(frame, error_area, errors.get(field.path));
}

fn draw_tech_header(frame: &mut Frame, area: Rect, total: usize, start: usize, end: usize) {
    let mut spans = vec![Span::styled(
        format!("Technologies ({total})"),
        Style::default().add_modifier(Modifier::BOLD),
    )];
    if end - start < total {
        spans.push(Span::styled(
            format!("  showing {}-{}", start + 1, end),
            Style::default().fg(Color::DarkGray),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_tech_row(
    frame: &mut Frame,
    field_area: Rect,
    error_area: Rect,
    index: usize,
    row: &TechRow,
    focus: Focus,
    errors: &ValidationErrors,
) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(75), Constraint::Percentage(25)])
        .split(field_area);

    for (area, field) in [(columns[0], &row.title), (columns[1], &row.knowledge)] {
        let is_active = focus == Focus::Field(field.path);
        draw_field(frame, area, field, is_active, errors.contains(field.path));
    }

    let messages: Vec<&str> = [FieldPath::TechTitle(index), FieldPath::TechKnowledge(index)]
        .into_iter()
        .filter_map(|path| errors.get(path))
        .collect();
    if !messages.is_empty() {
        let joined = messages.join(" · ");
        draw_field_error(frame, error_area, Some(joined.as_str()));
    }
}

/// Range of tech rows that fit in `capacity` while keeping `anchor` visible
pub fn visible_tech_window(total: usize, capacity: usize, anchor: usize) -> (usize, usize) {
    if total <= capacity {
        return (0, total);
    }
    let anchor = anchor.min(total - 1);
    let start = (anchor + 1).saturating_sub(capacity);
    (start, start + capacity)
}
