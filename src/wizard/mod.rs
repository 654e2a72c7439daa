//! Business Confirmation wizard core: state controller and task poller

mod controller;
mod error;
mod poller;

pub use controller::{AdvanceOutcome, Collaborators, WizardController};
pub use error::WizardError;
pub use poller::DEFAULT_POLL_INTERVAL;
