//! Error types for browser automation

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BrowserError {
    #[error("Playwright not found. Install with: npm install playwright && npx playwright install")]
    PlaywrightNotFound,

    #[error("Browser driver failed to start: {0}")]
    DriverStartup(String),

    #[error("{action} failed: {reason}")]
    Action { action: String, reason: String },

    #[error("Timeout during {action}: {reason}")]
    Timeout { action: String, reason: String },

    #[error("Browser session is closed")]
    SessionClosed,

    #[error("All strategies failed ({}): {last_error}", attempted.join(", "))]
    StrategiesExhausted {
        attempted: Vec<String>,
        last_error: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl BrowserError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, BrowserError::Timeout { .. })
    }
}

pub type BrowserResult<T> = Result<T, BrowserError>;

impl From<BrowserError> for otp_signup_common::Error {
    fn from(e: BrowserError) -> Self {
        match e {
            BrowserError::Io(io) => otp_signup_common::Error::Io(io),
            other => otp_signup_common::Error::UiInteraction(other.to_string()),
        }
    }
}
