//! Submission output panel

use crate::app::App;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Draw the pretty-printed payload from the last successful submit
pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(format!(" Output ({}: copy) ", crate::platform::COPY_SHORTCUT))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let paragraph = match &app.state.output {
        Some(json) => Paragraph::new(json.lines().map(Line::from).collect::<Vec<_>>())
            .style(Style::default().fg(Color::Green)),
        None => Paragraph::new("Submit the form to see the payload")
            .style(Style::default().fg(Color::DarkGray)),
    };

    frame.render_widget(paragraph.block(block), area);
}
