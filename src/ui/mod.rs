//! UI module for rendering the TUI

mod components;
mod forms;
mod layout;
mod output;

use crate::app::App;
use ratatui::Frame;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let (form_area, output_area) = layout::create_layout(frame.area());

    forms::draw_signup_form(frame, form_area, app);
    output::draw(frame, output_area, app);

    // Draw status bar
    layout::draw_status_bar(frame, app);

    // Error dialog overlays everything else
    if let Some(message) = app.state.current_error() {
        components::render_error_dialog(frame, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SignupConfig;
    use crate::state::{FieldPath, SubmitPhase};
    use crate::storage::MockStorageClientTrait;
    use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};

    fn test_app() -> App {
        let mut storage = MockStorageClientTrait::new();
        storage.expect_is_configured().return_const(true);
        App::with_storage(&SignupConfig::default(), Box::new(storage))
    }

    fn render(app: &App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| draw(frame, app)).unwrap();
        buffer_text(terminal.backend().buffer())
    }

    fn buffer_text(buffer: &Buffer) -> String {
        let area = buffer.area;
        let mut text = String::new();
        for y in 0..area.height {
            for x in 0..area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn test_renders_form_and_placeholder() {
        let text = render(&test_app(), 120, 50);
        assert!(text.contains("Sign up"));
        assert!(text.contains("Avatar (file path)"));
        assert!(text.contains("Technologies (2)"));
        assert!(text.contains("+ Add technology"));
        assert!(text.contains("Submit the form to see the payload"));
        assert!(text.contains("Editing"));
    }

    #[test]
    fn test_renders_inline_errors() {
        let mut app = test_app();
        app.state.errors.insert(FieldPath::Email, "invalid email format");
        app.state
            .errors
            .insert(FieldPath::Techs, "at least 2 technologies required");
        let text = render(&app, 120, 50);
        assert!(text.contains("invalid email format"));
        assert!(text.contains("at least 2 technologies required"));
    }

    #[test]
    fn test_status_bar_shows_upload_failure_reason() {
        let mut app = test_app();
        app.state.phase =
            SubmitPhase::UploadFailed("Failed to upload avatar: storage returned 409".to_string());
        let text = render(&app, 200, 50);
        let status = text.lines().last().unwrap();
        assert!(status.contains("Upload failed"));
        assert!(status.contains("storage returned 409"));
    }

    #[test]
    fn test_renders_output_and_error_dialog() {
        let mut app = test_app();
        app.state.output = Some("{\n  \"name\": \"John  Doe\"\n}".to_string());
        app.push_error("Failed to upload avatar");
        let text = render(&app, 120, 50);
        assert!(text.contains("\"name\": \"John  Doe\""));
        assert!(text.contains("Failed to upload avatar"));
    }

    #[test]
    fn test_small_terminal_does_not_panic() {
        let mut app = test_app();
        for _ in 0..20 {
            app.add_tech();
        }
        render(&app, 30, 8);
    }
}
