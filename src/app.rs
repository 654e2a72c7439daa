//! Application state and core logic

use crate::state::{
    AppState, FieldKind, FieldMap, FieldSpec, FieldValue, SectionName, Step, SubmissionStatus,
};
use crate::wizard::{AdvanceOutcome, WizardController};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

/// Main application struct
pub struct App {
    /// Cursor and message state
    pub state: AppState,
    /// The deal wizard being driven
    pub wizard: WizardController,
    /// Whether the app should quit
    quit: bool,
}

impl App {
    pub fn new(wizard: WizardController) -> Self {
        Self {
            state: AppState::default(),
            wizard,
            quit: false,
        }
    }

    /// Load data needed before the first screen is usable
    pub async fn init(&mut self) {
        self.wizard.load_dropdown_data().await;
        if self.wizard.dropdowns().is_empty() {
            self.state.status_message =
                Some("Option lists unavailable; choice fields accept free text".to_string());
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

    /// Apply poller events received since the last frame
    pub fn tick(&mut self) {
        if !self.wizard.is_polling() {
            return;
        }
        let before = self.wizard.submission_status();
        if self.wizard.pump_poll_events() == 0 {
            return;
        }
        let after = self.wizard.submission_status();
        if before == after {
            return;
        }
        match after {
            SubmissionStatus::Completed => {
                self.state.reset_cursor();
                self.state.status_message = Some("Deal processed".to_string());
            }
            SubmissionStatus::Failed => {
                let message = self
                    .wizard
                    .state()
                    .submission
                    .error()
                    .unwrap_or("unknown error")
                    .to_string();
                self.push_error(format!("Deal processing failed: {message}"));
            }
            _ => {}
        }
    }

    /// Field catalog for the current step, empty outside the form steps
    pub fn current_fields(&self) -> &'static [FieldSpec] {
        self.wizard
            .current_step()
            .section()
            .map(|section| section.fields())
            .unwrap_or(&[])
    }

    fn active_spec(&self) -> Option<(SectionName, FieldSpec)> {
        let section = self.wizard.current_step().section()?;
        let spec = section.fields().get(self.state.active_field)?;
        Some((section, *spec))
    }

    pub async fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        // Handle error dialog dismissal first (modal)
        if self.state.has_errors() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.state.dismiss_error();
            }
            return Ok(());
        }

        // Clear any status messages on key press
        self.state.status_message = None;

        match self.wizard.current_step() {
            Step::DealBasics | Step::CommercialTerms | Step::PaymentTerms => {
                self.handle_section_key(key).await?
            }
            Step::Review => self.handle_review_key(key).await?,
            Step::Summary => self.handle_summary_key(key)?,
        }
        Ok(())
    }

    async fn handle_section_key(&mut self, key: KeyEvent) -> Result<()> {
        let field_count = self.current_fields().len();
        let kind = self.active_spec().map(|(_, spec)| spec.kind);

        match key.code {
            KeyCode::Tab | KeyCode::Down => self.state.next_field(field_count),
            KeyCode::BackTab | KeyCode::Up => self.state.prev_field(field_count),
            KeyCode::Enter => self.advance().await,
            KeyCode::Esc => self.retreat(),
            KeyCode::Char(' ') | KeyCode::Left | KeyCode::Right
                if kind == Some(FieldKind::Flag) =>
            {
                self.toggle_flag()
            }
            KeyCode::Left if matches!(kind, Some(FieldKind::Choice(_))) => {
                self.cycle_choice(false)
            }
            KeyCode::Right if matches!(kind, Some(FieldKind::Choice(_))) => {
                self.cycle_choice(true)
            }
            KeyCode::Char(c) => {
                self.edit_active_field(|spec, current| spec.push_char(current, c))
            }
            KeyCode::Backspace => self.edit_active_field(|spec, current| spec.pop_char(current)),
            _ => {}
        }
        Ok(())
    }

    async fn handle_review_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Enter => self.submit().await,
            KeyCode::Esc => self.retreat(),
            KeyCode::Char('v') => {
                self.wizard.validate_all().await;
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_summary_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Char('n') => {
                self.wizard.reset();
                self.state.reset_cursor();
                self.state.status_message = Some("Started a new deal".to_string());
            }
            KeyCode::Char('q') => self.quit = true,
            KeyCode::Esc => self.retreat(),
            _ => {}
        }
        Ok(())
    }

    /// Replace the active field's value with whatever `edit` produces
    fn edit_active_field<F>(&mut self, edit: F)
    where
        F: FnOnce(&FieldSpec, Option<&FieldValue>) -> Option<FieldValue>,
    {
        let Some((section, spec)) = self.active_spec() else {
            return;
        };
        let current = self.wizard.state().form.value(section, spec.name);
        if let Some(value) = edit(&spec, current) {
            self.set_field(section, &spec, value);
        }
    }

    fn set_field(&mut self, section: SectionName, spec: &FieldSpec, value: FieldValue) {
        let previous = self.wizard.state().form.value(section, spec.name).cloned();
        let mut partial = FieldMap::new();
        // Packaging options depend on the delivery mode.
        if spec.name == "deliveryMode" && previous.as_ref() != Some(&value) {
            partial.insert("packaging".to_string(), FieldValue::default());
        }
        partial.insert(spec.name.to_string(), value);
        self.wizard.update_section(section, partial);
    }

    fn toggle_flag(&mut self) {
        self.edit_active_field(|_, current| {
            let on = current.map(FieldValue::as_flag).unwrap_or(false);
            Some(FieldValue::Flag(!on))
        });
    }

    fn cycle_choice(&mut self, forward: bool) {
        let Some((section, spec)) = self.active_spec() else {
            return;
        };
        let FieldKind::Choice(list) = spec.kind else {
            return;
        };

        let form = &self.wizard.state().form;
        let delivery_mode = form
            .value(SectionName::CommercialTerms, "deliveryMode")
            .map(FieldValue::as_text);
        let options = self.wizard.dropdowns().options(list, delivery_mode);
        if options.is_empty() {
            self.state.status_message = Some(format!("No options available for {}", spec.label));
            return;
        }

        let current = form
            .value(section, spec.name)
            .map(FieldValue::as_text)
            .unwrap_or_default();
        let position = options.iter().position(|option| option == current);
        let next = match (position, forward) {
            (Some(i), true) => (i + 1) % options.len(),
            (Some(0), false) | (None, false) => options.len() - 1,
            (Some(i), false) => i - 1,
            (None, true) => 0,
        };
        let value = FieldValue::Text(options[next].clone());
        self.set_field(section, &spec, value);
    }

    async fn advance(&mut self) {
        match self.wizard.request_advance().await {
            Ok(AdvanceOutcome::Advanced { to, .. }) => {
                self.state.reset_cursor();
                if to == Step::Review {
                    self.wizard.validate_all().await;
                }
            }
            Ok(AdvanceOutcome::Blocked) => {
                self.state.status_message =
                    Some("Resolve the warnings below before continuing".to_string());
            }
            Ok(AdvanceOutcome::AtLastStep) => {}
            Err(err) => self.push_error(err.to_string()),
        }
    }

    fn retreat(&mut self) {
        let before = self.wizard.current_step();
        match self.wizard.request_retreat() {
            Ok(()) if self.wizard.current_step() != before => self.state.reset_cursor(),
            Ok(()) => {}
            Err(err) => self.push_error(err.to_string()),
        }
    }

    async fn submit(&mut self) {
        match self.wizard.submit().await {
            Ok(handle) => {
                let mut message = format!("Submitted, processing task {}", handle.task_id);
                if let Some(detail) = handle.message.filter(|m| !m.trim().is_empty()) {
                    message.push_str(&format!(" ({detail})"));
                }
                self.state.status_message = Some(message);
            }
            Err(err) => self.push_error(err.to_string()),
        }
    }
}
