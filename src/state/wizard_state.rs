//! Wizard state definitions

use super::forms::{FieldMap, FormSections, SectionName};
use crate::api::{TaskStatus, ValidationResponse};
use crate::wizard::WizardError;
use chrono::{DateTime, Utc};
use std::fmt;

/// Warning stored when the validator cannot be reached
pub const VALIDATION_UNAVAILABLE: &str = "Validation service unavailable";

/// Stage of the wizard, numbered 1 through 5
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Step {
    #[default]
    DealBasics = 1,
    CommercialTerms = 2,
    PaymentTerms = 3,
    Review = 4,
    Summary = 5,
}

impl Step {
    pub const ALL: [Step; 5] = [
        Step::DealBasics,
        Step::CommercialTerms,
        Step::PaymentTerms,
        Step::Review,
        Step::Summary,
    ];
    pub const FIRST: Step = Step::DealBasics;
    pub const LAST: Step = Step::Summary;

    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn from_number(number: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|step| step.number() == number)
    }

    /// Following step, capped at the summary
    pub fn next(self) -> Self {
        Self::from_number(self.number() + 1).unwrap_or(Self::LAST)
    }

    /// Preceding step, floored at the first
    pub fn prev(self) -> Self {
        Self::from_number(self.number().saturating_sub(1)).unwrap_or(Self::FIRST)
    }

    /// Section edited on this step, if any
    pub fn section(self) -> Option<SectionName> {
        match self {
            Self::DealBasics => Some(SectionName::DealBasics),
            Self::CommercialTerms => Some(SectionName::CommercialTerms),
            Self::PaymentTerms => Some(SectionName::PaymentTerms),
            Self::Review | Self::Summary => None,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::DealBasics => "Deal Basics",
            Self::CommercialTerms => "Commercial Terms",
            Self::PaymentTerms => "Payment Terms",
            Self::Review => "Review & Submit",
            Self::Summary => "Summary",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::DealBasics => "Seller, Buyer, Material & Quantity",
            Self::CommercialTerms => "Delivery, Assay & Pricing",
            Self::PaymentTerms => "Method, Stages & Surveyor",
            Self::Review => "Validate & Confirm",
            Self::Summary => "Processing Results",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.number(), self.title())
    }
}

/// Outcome of the most recent validation call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub suggestions: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    /// Result used when the validator could not be reached
    pub fn service_unavailable() -> Self {
        Self {
            is_valid: false,
            suggestions: Vec::new(),
            warnings: vec![VALIDATION_UNAVAILABLE.to_string()],
        }
    }
}

impl From<ValidationResponse> for ValidationResult {
    fn from(response: ValidationResponse) -> Self {
        Self {
            is_valid: response.is_valid,
            suggestions: response.suggestions,
            warnings: response.warnings,
        }
    }
}

/// Lifecycle of a submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionStatus {
    #[default]
    Idle,
    Submitting,
    Polling,
    Completed,
    Failed,
}

impl SubmissionStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Submitting => "submitting",
            Self::Polling => "polling",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// Whether a submission call or status polling is outstanding
    pub fn is_in_flight(&self) -> bool {
        matches!(self, Self::Submitting | Self::Polling)
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Submission record; fields change only through the transition methods
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Submission {
    task_id: Option<String>,
    status: SubmissionStatus,
    error: Option<String>,
    submitted_at: Option<DateTime<Utc>>,
}

impl Submission {
    pub fn task_id(&self) -> Option<&str> {
        self.task_id.as_deref()
    }

    pub fn status(&self) -> SubmissionStatus {
        self.status
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn submitted_at(&self) -> Option<DateTime<Utc>> {
        self.submitted_at
    }

    fn transition(
        &mut self,
        allowed_from: &[SubmissionStatus],
        to: SubmissionStatus,
    ) -> Result<(), WizardError> {
        if !allowed_from.contains(&self.status) {
            return Err(WizardError::InvalidTransition {
                from: self.status,
                to,
            });
        }
        self.status = to;
        Ok(())
    }

    /// `idle | failed -> submitting`
    pub fn begin(&mut self) -> Result<(), WizardError> {
        self.transition(
            &[SubmissionStatus::Idle, SubmissionStatus::Failed],
            SubmissionStatus::Submitting,
        )?;
        self.task_id = None;
        self.error = None;
        self.submitted_at = Some(Utc::now());
        Ok(())
    }

    /// `submitting -> polling`, binding the task id
    pub fn start_polling(&mut self, task_id: String) -> Result<(), WizardError> {
        self.transition(&[SubmissionStatus::Submitting], SubmissionStatus::Polling)?;
        self.task_id = Some(task_id);
        Ok(())
    }

    /// `polling -> completed`
    pub fn complete(&mut self) -> Result<(), WizardError> {
        self.transition(&[SubmissionStatus::Polling], SubmissionStatus::Completed)
    }

    /// `submitting | polling -> failed`
    pub fn fail(&mut self, message: impl Into<String>) -> Result<(), WizardError> {
        self.transition(
            &[SubmissionStatus::Submitting, SubmissionStatus::Polling],
            SubmissionStatus::Failed,
        )?;
        self.error = Some(message.into());
        Ok(())
    }
}

/// The aggregate owned by the wizard controller
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WizardState {
    pub current_step: Step,
    pub form: FormSections,
    pub validation: ValidationResult,
    pub submission: Submission,
    /// Last task status observed while polling
    pub task_status: Option<TaskStatus>,
}

impl WizardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Data sent to the validator for the current step
    pub fn step_data(&self) -> FieldMap {
        self.current_step
            .section()
            .map(|section| self.form.section(section).clone())
            .unwrap_or_default()
    }
}
