//! Configuration handling for the TUI

use crate::api::{Credentials, DEFAULT_API_URL};
use crate::wizard::DEFAULT_POLL_INTERVAL;
use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable overriding the backend address
pub const API_URL_ENV: &str = "BC_FLOW_API_URL";

/// Environment variable overriding the bearer token
pub const API_TOKEN_ENV: &str = "BC_FLOW_API_TOKEN";

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// User configuration for the TUI
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TuiConfig {
    /// Backend base address
    pub api_url: Option<String>,
    /// Bearer token sent with every request
    pub auth_token: Option<String>,
    /// Task status poll interval in milliseconds
    pub poll_interval_ms: Option<u64>,
    /// Per-request timeout in seconds
    pub request_timeout_secs: Option<u64>,
}

impl TuiConfig {
    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("com", "openmineral", "bc-flow-tui")
    }

    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Directory for the log file
    pub fn log_dir() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.data_local_dir().to_path_buf())
    }

    /// Load configuration from file
    pub fn load() -> Result<Self> {
        let path = Self::config_path();

        if let Some(path) = path {
            if path.exists() {
                let content = fs::read_to_string(&path)?;
                let config: TuiConfig = serde_json::from_str(&content)?;
                tracing::debug!("Loaded config from {}", path.display());
                return Ok(config);
            }
        }

        Ok(Self::default())
    }

    /// Backend address: environment, then config file, then default
    pub fn api_url(&self) -> String {
        self.resolve_api_url(std::env::var(API_URL_ENV).ok())
    }

    fn resolve_api_url(&self, from_env: Option<String>) -> String {
        from_env
            .filter(|url| !url.trim().is_empty())
            .or_else(|| self.api_url.clone())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
    }

    /// Credentials: environment token, then config file token
    pub fn credentials(&self) -> Credentials {
        self.resolve_credentials(std::env::var(API_TOKEN_ENV).ok())
    }

    fn resolve_credentials(&self, from_env: Option<String>) -> Credentials {
        from_env
            .filter(|token| !token.trim().is_empty())
            .or_else(|| self.auth_token.clone())
            .map(Credentials::bearer)
            .unwrap_or_else(Credentials::anonymous)
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval_ms
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_POLL_INTERVAL)
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT)
    }
}
