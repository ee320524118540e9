//! Layout components (form/output split, status bar)

use crate::app::App;
use crate::state::SubmitPhase;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Split the screen into form (left) and output (right), reserving the status bar
pub fn create_layout(area: Rect) -> (Rect, Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(55), // Form
            Constraint::Percentage(45), // Output
        ])
        .split(rows[0]);

    (columns[0], columns[1])
}

/// Draw the status bar
pub fn draw_status_bar(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let status_area = Rect {
        x: area.x,
        y: area.bottom().saturating_sub(1),
        width: area.width,
        height: 1.min(area.height),
    };

    let phase = &app.state.phase;
    let phase_color = match phase {
        SubmitPhase::Editing => Color::Yellow,
        SubmitPhase::Submitted => Color::Green,
        SubmitPhase::UploadFailed(_) => Color::Red,
    };

    let mut spans = vec![
        Span::styled(" ● ", Style::default().fg(phase_color)),
        Span::styled(phase.label(), Style::default().fg(phase_color)),
    ];

    if let SubmitPhase::UploadFailed(reason) = phase {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(reason, Style::default().fg(Color::Red)));
    }

    if !app.state.errors.is_empty() {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(
            format!("{} invalid field(s)", app.state.errors.len()),
            Style::default().fg(Color::Red),
        ));
    }

    if let Some(msg) = &app.status_message {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(msg, Style::default().fg(Color::Green)));
    }

    spans.push(Span::raw(" | "));
    spans.push(Span::styled(
        format!("bucket: {}  domain: {}", app.bucket, app.email_domain()),
        Style::default().fg(Color::Blue),
    ));

    let status = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status, status_area);

    // Quit hint on the right (double Ctrl+C to quit)
    let quit_hint = " ^C^C:quit ";
    let hint_width = (quit_hint.len() as u16).min(area.width);
    let quit_area = Rect {
        x: area.right().saturating_sub(hint_width),
        y: status_area.y,
        width: hint_width,
        height: status_area.height,
    };
    let quit_widget =
        Paragraph::new(quit_hint).style(Style::default().bg(Color::DarkGray).fg(Color::Gray));
    frame.render_widget(quit_widget, quit_area);
}
