//! Backend collaborators for the BC Flow REST API

mod client;
mod error;
mod traits;
mod types;

pub use client::{ApiClient, DEFAULT_API_URL};
pub use error::ApiError;
pub use traits::{DropdownSource, Submitter, TaskStatusSource, Validator};
pub use types::{Credentials, DropdownData, TaskHandle, TaskStatus, ValidationResponse};

#[cfg(test)]
pub use traits::{MockDropdownSource, MockSubmitter, MockTaskStatusSource, MockValidator};
