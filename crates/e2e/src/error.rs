//! Error types for E2E testing

use thiserror::Error;

#[derive(Error, Debug)]
pub enum E2eError {
    #[error("Server failed to start: {0}")]
    ServerStartup(String),

    #[error("Server health check failed after {0} attempts")]
    ServerHealthCheck(usize),

    #[error("Playwright not found. Install with: npx playwright install")]
    PlaywrightNotFound,

    #[error("Playwright error: {0}")]
    Playwright(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Step failed: {step} - {reason}")]
    StepFailed { step: String, reason: String },

    #[error("Assertion failed: {0}")]
    AssertionFailed(String),

    #[error("Element is missing expected content: {0}")]
    ElementMissing(String),

    #[error("No email selected")]
    NoEmailSelected,

    #[error("Unknown email subject: {0}")]
    UnknownEmailSubject(String),

    #[error("Email does not have a \"To\" field")]
    MissingRecipient,

    #[error("Timeout waiting for: {0}")]
    Timeout(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl E2eError {
    /// Errors the mailbox settle poll may retry past: the detail pane is
    /// briefly empty while it re-renders.
    pub fn is_transient(&self) -> bool {
        matches!(self, E2eError::NoEmailSelected)
    }
}

pub type E2eResult<T> = Result<T, E2eError>;
