//! Application state and core logic

use crate::config::SignupConfig;
use crate::state::{
    AppState, FieldPath, Focus, Form, SignupPayload, SignupSchema, SubmitPhase, ValidationErrors,
};
use crate::storage::{StorageClient, StorageClientTrait};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::{Duration, Instant};

/// Window in which a second Ctrl+C quits
const DOUBLE_CTRL_C_WINDOW: Duration = Duration::from_secs(1);

/// Main application struct
pub struct App {
    /// Current application state
    pub state: AppState,
    /// Storage client for avatar uploads
    storage: Box<dyn StorageClientTrait>,
    /// Validation rules built from configuration
    schema: SignupSchema,
    /// Bucket that receives avatar uploads
    pub bucket: String,
    /// Whether the app should quit
    quit: bool,
    /// Short feedback shown in the status bar
    pub status_message: Option<String>,
    /// Timestamp of last Ctrl+C press for double-tap quit
    pub last_ctrl_c: Option<Instant>,
}

impl App {
    /// Create a new App instance
    pub fn new(config: &SignupConfig) -> Result<Self> {
        let storage = StorageClient::new(config)?;
        Ok(Self::with_storage(config, Box::new(storage)))
    }

    /// Create an App that uploads through the given storage client
    pub fn with_storage(config: &SignupConfig, storage: Box<dyn StorageClientTrait>) -> Self {
        if !storage.is_configured() {
            tracing::warn!("Storage is not configured; uploads will fail");
        }

        let mut state = AppState::default();
        // Start with the minimum number of tech rows
        state.form.add_tech();
        state.form.add_tech();

        Self {
            state,
            storage,
            schema: SignupSchema::new(&config.email_domain, config.max_avatar_bytes),
            bucket: config.bucket.clone(),
            quit: false,
            status_message: None,
            last_ctrl_c: None,
        }
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Push an error message to the error queue for display
    pub fn push_error(&mut self, message: impl Into<String>) {
        self.state.push_error(message.into());
    }

    pub fn email_domain(&self) -> &str {
        self.schema.email_domain()
    }

    /// Handle a key event
    pub async fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        // Global quit: double Ctrl+C
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.handle_ctrl_c(Instant::now());
            return Ok(());
        }

        // Handle error dialog dismissal first (modal)
        if self.state.has_errors() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.state.dismiss_error();
            }
            return Ok(());
        }

        // Clear any status messages on key press
        self.status_message = None;

        self.handle_form_key(key).await
    }

    fn handle_ctrl_c(&mut self, now: Instant) {
        match self.last_ctrl_c {
            Some(previous) if now.duration_since(previous) <= DOUBLE_CTRL_C_WINDOW => {
                self.quit = true;
            }
            _ => {
                self.last_ctrl_c = Some(now);
                self.status_message = Some("Press Ctrl+C again to quit".to_string());
            }
        }
    }

    async fn handle_form_key(&mut self, key: KeyEvent) -> Result<()> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Char('s') if ctrl => self.submit().await,
            KeyCode::Char('a') if ctrl => {
                let index = self.add_tech();
                self.state.form.focus_path(FieldPath::TechTitle(index));
            }
            KeyCode::Char('d') if ctrl => {
                if let Some(index) = self.state.form.focused_tech() {
                    self.remove_tech(index);
                }
            }
            KeyCode::Char('u') if ctrl => {
                if let Some(field) = self.state.form.get_active_field_mut() {
                    field.clear();
                    self.after_edit();
                }
            }
            KeyCode::Char('y') if key.modifiers.contains(crate::platform::COPY_MODIFIER) => {
                self.copy_output()?;
            }
            KeyCode::Tab | KeyCode::Down => self.state.form.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.state.form.prev_field(),
            KeyCode::Enter => match self.state.form.focus() {
                Focus::AddTechButton => {
                    let index = self.add_tech();
                    self.state.form.focus_path(FieldPath::TechTitle(index));
                }
                Focus::SubmitButton => self.submit().await,
                Focus::Field(_) => self.state.form.next_field(),
            },
            KeyCode::Char(c) if !ctrl => {
                if let Some(field) = self.state.form.get_active_field_mut() {
                    field.push_char(c);
                    self.after_edit();
                }
            }
            KeyCode::Backspace => {
                if let Some(field) = self.state.form.get_active_field_mut() {
                    field.pop_char();
                    self.after_edit();
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Append a default tech row
    pub fn add_tech(&mut self) -> usize {
        let index = self.state.form.add_tech();
        tracing::debug!(index, "Added tech row");
        self.after_edit();
        index
    }

    /// Remove the tech row at `index`; out-of-range indices are ignored
    pub fn remove_tech(&mut self, index: usize) {
        if self.state.form.remove_tech(index) {
            tracing::debug!(index, "Removed tech row");
            self.after_edit();
        }
    }

    /// Bookkeeping after any change to the inputs
    fn after_edit(&mut self) {
        self.state.mark_editing();
        if self.state.submit_attempted {
            self.revalidate();
        }
    }

    /// Re-run the schema without submitting, refreshing the error snapshot
    pub fn revalidate(&mut self) {
        self.state.errors = match self.schema.validate(&self.state.form.to_raw()) {
            Ok(_) => ValidationErrors::default(),
            Err(errors) => errors,
        };
    }

    /// Validate the form, upload the avatar and publish the payload
    pub async fn submit(&mut self) {
        self.state.submit_attempted = true;

        let payload = match self.schema.validate(&self.state.form.to_raw()) {
            Ok(payload) => payload,
            Err(errors) => {
                tracing::info!(count = errors.len(), "Submit rejected: {errors}");
                if let Some((path, _)) = errors.iter().next() {
                    self.state.form.focus_path(path);
                }
                self.state.errors = errors;
                self.state.phase = SubmitPhase::Editing;
                return;
            }
        };
        self.state.errors = ValidationErrors::default();

        tracing::debug!(avatar = ?payload.avatar, "Uploading avatar");
        if let Err(e) = self.upload_avatar(&payload).await {
            let message = format!("Failed to upload avatar: {e:#}");
            tracing::warn!("{message}");
            self.state.phase = SubmitPhase::UploadFailed(message.clone());
            self.push_error(message);
            return;
        }

        match payload.to_pretty_json() {
            Ok(json) => {
                self.state.output = Some(json);
                self.state.phase = SubmitPhase::Submitted;
                self.status_message = Some(format!("Uploaded {}", payload.avatar.name));
            }
            Err(e) => self.push_error(format!("Failed to render output: {e}")),
        }
    }

    async fn upload_avatar(&self, payload: &SignupPayload) -> Result<()> {
        let content = payload.avatar.read().await?;
        self.storage
            .upload(&self.bucket, &payload.avatar.name, content)
            .await
    }

    fn copy_output(&mut self) -> Result<()> {
        let Some(output) = self.state.output.clone() else {
            self.status_message = Some("Nothing to copy yet".to_string());
            return Ok(());
        };
        match copy_to_clipboard(&output) {
            Ok(()) => self.status_message = Some(format!("Copied {} chars", output.len())),
            Err(e) => self.push_error(format!("Failed to copy: {e}")),
        }
        Ok(())
    }
}

fn copy_to_clipboard(text: &str) -> Result<()> {
    use arboard::Clipboard;
    let mut clipboard = Clipboard::new()?;
    clipboard.set_text(text)?;
    Ok(())
}
