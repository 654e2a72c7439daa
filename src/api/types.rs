//! Request/response types shared by the backend collaborators

use crate::state::DropdownList;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Credentials passed explicitly to every backend call
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    token: Option<String>,
}

impl Credentials {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn bearer(token: impl Into<String>) -> Self {
        let token = token.into();
        Self {
            token: (!token.trim().is_empty()).then_some(token),
        }
    }

    pub fn bearer_token(&self) -> Option<&str> {
        self.token.as_deref()
    }
}

// Never print the token itself.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Body returned by the step validation endpoints
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResponse {
    pub is_valid: bool,
    #[serde(default)]
    pub suggestions: Vec<String>,
    #[serde(default)]
    pub warnings: Vec<String>,
}

/// Body returned when a deal is accepted for background processing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskHandle {
    pub task_id: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Snapshot of a background task as reported by the backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskStatus {
    #[serde(default)]
    pub task_id: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub confirmation_number: Option<String>,
    #[serde(default)]
    pub processing_time: Option<f64>,
    #[serde(default)]
    pub timestamp: Option<String>,
    /// Any fields this client does not know about
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl TaskStatus {
    pub fn is_completed(&self) -> bool {
        self.completed || self.status.eq_ignore_ascii_case("completed")
    }

    pub fn is_failed(&self) -> bool {
        self.status.eq_ignore_ascii_case("failed")
    }

    #[cfg(test)]
    pub fn with_status(status: &str) -> Self {
        Self {
            status: status.to_string(),
            ..Default::default()
        }
    }
}

/// Option lists for choice fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DropdownData {
    pub materials: Vec<String>,
    pub delivery_terms: Vec<String>,
    pub delivery_modes: Vec<String>,
    /// Packaging options keyed by lowercase delivery mode
    pub packaging_options: HashMap<String, Vec<String>>,
    pub currencies: Vec<String>,
    pub surveyors: Vec<String>,
}

impl DropdownData {
    /// Options for a list; packaging depends on the chosen delivery mode
    pub fn options(&self, list: DropdownList, delivery_mode: Option<&str>) -> &[String] {
        match list {
            DropdownList::Materials => &self.materials,
            DropdownList::DeliveryTerms => &self.delivery_terms,
            DropdownList::DeliveryModes => &self.delivery_modes,
            DropdownList::Currencies => &self.currencies,
            DropdownList::Surveyors => &self.surveyors,
            DropdownList::Packaging => delivery_mode
                .and_then(|mode| self.packaging_options.get(&mode.to_lowercase()))
                .map(Vec::as_slice)
                .unwrap_or(&[]),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
            && self.delivery_terms.is_empty()
            && self.delivery_modes.is_empty()
            && self.packaging_options.is_empty()
            && self.currencies.is_empty()
            && self.surveyors.is_empty()
    }
}
