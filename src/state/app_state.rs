//! Front-end state that is not part of the wizard itself

use std::collections::VecDeque;

/// Cursor and message state for the terminal front end
#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// Index into the current section's field catalog
    pub active_field: usize,
    /// Errors waiting to be shown, oldest first
    errors: VecDeque<String>,
    /// One-line feedback shown in the status bar
    pub status_message: Option<String>,
}

impl AppState {
    /// Move to the next field, wrapping around
    pub fn next_field(&mut self, field_count: usize) {
        if field_count == 0 {
            return;
        }
        self.active_field = (self.active_field + 1) % field_count;
    }

    /// Move to the previous field, wrapping around
    pub fn prev_field(&mut self, field_count: usize) {
        if field_count == 0 {
            return;
        }
        if self.active_field == 0 || self.active_field >= field_count {
            self.active_field = field_count - 1;
        } else {
            self.active_field -= 1;
        }
    }

    /// Put the cursor back on the first field (after a step change)
    pub fn reset_cursor(&mut self) {
        self.active_field = 0;
    }

    pub fn push_error(&mut self, message: String) {
        self.errors.push_back(message);
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn current_error(&self) -> Option<&str> {
        self.errors.front().map(String::as_str)
    }

    pub fn dismiss_error(&mut self) {
        self.errors.pop_front();
    }
}
