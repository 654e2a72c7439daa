//! Wizard state controller
//!
//! Single authority over [`WizardState`]. Every mutation goes through one of
//! the operations here; collaborator calls suspend the caller but never
//! overlap, since each operation borrows the controller mutably.

use super::error::WizardError;
use super::poller::{PollEvent, PollerHandle, TaskPoller, DEFAULT_POLL_INTERVAL};
use crate::api::{
    ApiClient, Credentials, DropdownData, DropdownSource, Submitter, TaskHandle, TaskStatusSource,
    Validator,
};
use crate::state::{FieldMap, SectionName, Step, SubmissionStatus, ValidationResult, WizardState};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use uuid::Uuid;

/// The backend collaborators the controller talks to
#[derive(Clone)]
pub struct Collaborators {
    pub validator: Arc<dyn Validator>,
    pub submitter: Arc<dyn Submitter>,
    pub task_status: Arc<dyn TaskStatusSource>,
    pub dropdowns: Arc<dyn DropdownSource>,
}

impl Collaborators {
    /// Use one HTTP client for every collaborator
    pub fn from_client(client: ApiClient) -> Self {
        let client = Arc::new(client);
        Self {
            validator: client.clone(),
            submitter: client.clone(),
            task_status: client.clone(),
            dropdowns: client,
        }
    }
}

/// Result of a request to move to the next step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceOutcome {
    Advanced { from: Step, to: Step },
    /// Validation did not pass; the step is unchanged
    Blocked,
    /// Already on the summary step
    AtLastStep,
}

pub struct WizardController {
    session_id: Uuid,
    state: WizardState,
    api: Collaborators,
    credentials: Credentials,
    poll_interval: Duration,
    poller: Option<PollerHandle>,
    events_tx: mpsc::UnboundedSender<PollEvent>,
    events_rx: mpsc::UnboundedReceiver<PollEvent>,
    dropdowns: DropdownData,
}

impl WizardController {
    pub fn new(api: Collaborators, credentials: Credentials) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let session_id = Uuid::new_v4();
        tracing::info!(%session_id, "Wizard session started");
        Self {
            session_id,
            state: WizardState::new(),
            api,
            credentials,
            poll_interval: DEFAULT_POLL_INTERVAL,
            poller: None,
            events_tx,
            events_rx,
            dropdowns: DropdownData::default(),
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn current_step(&self) -> Step {
        self.state.current_step
    }

    pub fn submission_status(&self) -> SubmissionStatus {
        self.state.submission.status()
    }

    pub fn dropdowns(&self) -> &DropdownData {
        &self.dropdowns
    }

    pub fn is_polling(&self) -> bool {
        self.poller.is_some()
    }

    /// Shallow-merge `partial` into a section
    pub fn update_section(&mut self, section: SectionName, partial: FieldMap) {
        tracing::debug!(%section, fields = partial.len(), "Updating section");
        self.state.form.merge(section, partial);
    }

    /// Validate the current step and move forward if allowed.
    ///
    /// The review step advances regardless of the validation result; the
    /// operator has already seen the warnings there.
    pub async fn request_advance(&mut self) -> Result<AdvanceOutcome, WizardError> {
        if self.state.submission.status().is_in_flight() {
            return Err(WizardError::SubmissionInProgress);
        }
        let step = self.state.current_step;
        if step == Step::LAST {
            return Ok(AdvanceOutcome::AtLastStep);
        }

        let data = self.state.step_data();
        let result = match self
            .api
            .validator
            .validate_step(&self.credentials, step.number(), &data)
            .await
        {
            Ok(response) => ValidationResult::from(response),
            Err(err) => {
                tracing::warn!(step = step.number(), "Validation failed: {err}");
                ValidationResult::service_unavailable()
            }
        };

        let accepted = result.is_valid || step == Step::Review;
        self.state.validation = result;

        if !accepted {
            tracing::debug!(step = step.number(), "Advance blocked by validation");
            return Ok(AdvanceOutcome::Blocked);
        }

        let next = step.next();
        self.state.current_step = next;
        tracing::info!("Advanced from step {} to step {}", step, next);
        Ok(AdvanceOutcome::Advanced {
            from: step,
            to: next,
        })
    }

    /// Move back one step; a no-op on the first step
    pub fn request_retreat(&mut self) -> Result<(), WizardError> {
        let status = self.state.submission.status();
        if status.is_in_flight() {
            return Err(WizardError::SubmissionInProgress);
        }
        // Completed submissions pin the wizard to the summary.
        if status == SubmissionStatus::Completed {
            return Err(WizardError::AlreadySubmitted);
        }
        self.state.current_step = self.state.current_step.prev();
        Ok(())
    }

    /// Validate every section at once, for the review step
    pub async fn validate_all(&mut self) -> &ValidationResult {
        self.state.validation = match self
            .api
            .validator
            .validate_all(&self.credentials, &self.state.form)
            .await
        {
            Ok(response) => ValidationResult::from(response),
            Err(err) => {
                tracing::warn!("Full form validation failed: {err}");
                ValidationResult::service_unavailable()
            }
        };
        &self.state.validation
    }

    /// Submit the deal and start polling its task.
    ///
    /// Returns the backend's task handle on success. On failure the
    /// submission is left in `failed` and may be retried.
    pub async fn submit(&mut self) -> Result<TaskHandle, WizardError> {
        let step = self.state.current_step;
        if step != Step::Review {
            return Err(WizardError::SubmitNotAllowed { step });
        }
        self.state.submission.begin()?;
        tracing::info!(session_id = %self.session_id, "Submitting deal");

        let snapshot = self.state.form.clone();
        match self.api.submitter.submit(&self.credentials, &snapshot).await {
            Ok(handle) => {
                let task_id = handle.task_id.clone();
                self.state.submission.start_polling(task_id.clone())?;
                self.state.task_status = None;
                self.activate_poller(task_id.clone());
                tracing::info!(
                    %task_id,
                    status = handle.status.as_deref().unwrap_or("unknown"),
                    "Deal accepted, polling task"
                );
                Ok(handle)
            }
            Err(err) => {
                let message = err.to_string();
                tracing::warn!("Submission failed: {message}");
                self.state.submission.fail(message.clone())?;
                Err(WizardError::SubmissionFailed(message))
            }
        }
    }

    fn activate_poller(&mut self, task_id: String) {
        let poller = TaskPoller::new(
            self.api.task_status.clone(),
            self.credentials.clone(),
            self.poll_interval,
        );
        // Replacing the handle aborts any poller bound to an older task.
        self.poller = Some(poller.activate(task_id, self.events_tx.clone()));
    }

    /// Apply a poller notification, discarding stale ones
    pub fn apply_poll_event(&mut self, event: PollEvent) {
        let bound = self.state.submission.task_id();
        if self.state.submission.status() != SubmissionStatus::Polling
            || bound != Some(event.task_id())
        {
            tracing::debug!(
                task_id = event.task_id(),
                "Discarding poll event for inactive task"
            );
            return;
        }

        match event {
            PollEvent::Progress { status, .. } => {
                self.state.task_status = Some(status);
            }
            PollEvent::Completed { task_id, status } => {
                self.state.task_status = Some(status);
                self.poller = None;
                if self.state.submission.complete().is_ok() {
                    self.state.current_step = Step::Summary;
                    tracing::info!(%task_id, "Task completed, showing summary");
                }
            }
            PollEvent::Failed {
                task_id,
                status,
                message,
            } => {
                self.state.task_status = Some(status);
                self.poller = None;
                if self.state.submission.fail(message).is_ok() {
                    tracing::warn!(%task_id, "Task failed");
                }
            }
        }
    }

    /// Apply every event already waiting; returns how many were received
    pub fn pump_poll_events(&mut self) -> usize {
        let mut received = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            self.apply_poll_event(event);
            received += 1;
        }
        received
    }

    /// Wait for the next poller event, or `None` if nothing is polling
    #[cfg(test)]
    pub async fn next_poll_event(&mut self) -> Option<PollEvent> {
        if let Ok(event) = self.events_rx.try_recv() {
            return Some(event);
        }
        self.poller.as_ref()?;
        self.events_rx.recv().await
    }

    /// Drive polling until the submission leaves `polling`
    #[cfg(test)]
    pub async fn await_submission(&mut self) -> SubmissionStatus {
        while self.state.submission.status() == SubmissionStatus::Polling {
            match self.next_poll_event().await {
                Some(event) => self.apply_poll_event(event),
                None => break,
            }
        }
        self.state.submission.status()
    }

    /// Fetch option lists for choice fields; failures leave them empty
    pub async fn load_dropdown_data(&mut self) {
        match self.api.dropdowns.dropdown_data(&self.credentials).await {
            Ok(data) => self.dropdowns = data,
            Err(err) => tracing::warn!("Failed to load dropdown data: {err}"),
        }
    }

    /// Start a new deal from defaults, stopping any active poller
    pub fn reset(&mut self) {
        if let Some(poller) = self.poller.take() {
            tracing::debug!(task_id = poller.task_id(), "Stopping poller for abandoned task");
        }
        while self.events_rx.try_recv().is_ok() {}
        self.state = WizardState::new();
        tracing::info!(session_id = %self.session_id, "Wizard reset for a new deal");
    }
}
