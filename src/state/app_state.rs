//! Application state definitions

use super::forms::{SignupForm, ValidationErrors};
use std::collections::VecDeque;

/// Where the current submission attempt stands
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmitPhase {
    /// Form is being filled in (initial state)
    #[default]
    Editing,
    /// Last submit validated and the avatar upload succeeded
    Submitted,
    /// Last submit validated but the upload was rejected
    UploadFailed(String),
}

impl SubmitPhase {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Editing => "Editing",
            Self::Submitted => "Submitted",
            Self::UploadFailed(_) => "Upload failed",
        }
    }
}

/// Main application state
#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// The sign-up form inputs
    pub form: SignupForm,
    /// Errors from the most recent validation pass
    pub errors: ValidationErrors,
    pub phase: SubmitPhase,
    /// Pretty-printed payload from the last successful submit
    pub output: Option<String>,
    /// Set after the first submit; edits re-validate from then on
    pub submit_attempted: bool,
    /// Messages waiting to be shown in the error dialog
    error_queue: VecDeque<String>,
}

impl AppState {
    /// Queue an error for the modal dialog
    pub fn push_error(&mut self, message: String) {
        self.error_queue.push_back(message);
    }

    pub fn has_errors(&self) -> bool {
        !self.error_queue.is_empty()
    }

    /// The error currently shown in the dialog
    pub fn current_error(&self) -> Option<&str> {
        self.error_queue.front().map(String::as_str)
    }

    pub fn dismiss_error(&mut self) {
        self.error_queue.pop_front();
    }

    /// Mark the form as edited again after a finished attempt
    pub fn mark_editing(&mut self) {
        self.phase = SubmitPhase::Editing;
    }
}
