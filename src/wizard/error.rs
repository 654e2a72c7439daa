//! Errors raised by wizard operations

use crate::state::{Step, SubmissionStatus};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WizardError {
    #[error("unknown form section: {0}")]
    UnknownSection(String),

    #[error("submission is only possible from the review step (currently on step {step})")]
    SubmitNotAllowed { step: Step },

    #[error("a submission is in progress")]
    SubmissionInProgress,

    #[error("the deal has already been submitted; start a new deal to make changes")]
    AlreadySubmitted,

    #[error("cannot move submission from {from} to {to}")]
    InvalidTransition {
        from: SubmissionStatus,
        to: SubmissionStatus,
    },

    #[error("submission failed: {0}")]
    SubmissionFailed(String),
}
