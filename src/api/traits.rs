//! Trait abstraction for the backend collaborators to enable mocking in tests

use super::error::ApiError;
use super::types::{Credentials, DropdownData, TaskHandle, TaskStatus, ValidationResponse};
use crate::state::{FieldMap, FormSections};
use async_trait::async_trait;

/// Checks a step's data (or the whole form) and returns advice
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Validator: Send + Sync {
    /// Validate the data of a single step
    async fn validate_step(
        &self,
        credentials: &Credentials,
        step: u8,
        data: &FieldMap,
    ) -> Result<ValidationResponse, ApiError>;

    /// Validate all sections together
    async fn validate_all(
        &self,
        credentials: &Credentials,
        form: &FormSections,
    ) -> Result<ValidationResponse, ApiError>;
}

/// Accepts a complete deal for background processing
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Submitter: Send + Sync {
    async fn submit(
        &self,
        credentials: &Credentials,
        form: &FormSections,
    ) -> Result<TaskHandle, ApiError>;
}

/// Reports the state of a background task; safe to call repeatedly
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskStatusSource: Send + Sync {
    async fn get_status(
        &self,
        credentials: &Credentials,
        task_id: &str,
    ) -> Result<TaskStatus, ApiError>;
}

/// Serves option lists for the choice fields
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DropdownSource: Send + Sync {
    async fn dropdown_data(&self, credentials: &Credentials) -> Result<DropdownData, ApiError>;
}
