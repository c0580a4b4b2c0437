//! Error types for OTP signup automation

use thiserror::Error;

use crate::types::WorkflowStage;

/// Result type alias using the signup Error
pub type Result<T> = std::result::Result<T, Error>;

/// Signup error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Config encode error: {0}")]
    ConfigEncode(#[from] toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Mailbox setup failed. Never retried.
    #[error("Mailbox provisioning failed at {step}: {reason}")]
    Provisioning { step: String, reason: String },

    /// The poll budget ran out without a code.
    #[error("otp timeout after {seconds}s")]
    OtpTimeout { seconds: u64 },

    #[error("UI interaction failed: {0}")]
    UiInteraction(String),

    #[error("Stage {stage} failed: {cause}")]
    Workflow {
        stage: WorkflowStage,
        #[source]
        cause: Box<Error>,
    },
}

impl Error {
    pub fn provisioning(step: impl Into<String>, reason: impl ToString) -> Self {
        Error::Provisioning {
            step: step.into(),
            reason: reason.to_string(),
        }
    }

    /// Wrap an error as the cause of a failed stage
    pub fn at_stage(stage: WorkflowStage, cause: Error) -> Self {
        Error::Workflow {
            stage,
            cause: Box::new(cause),
        }
    }

    /// The stage this error aborted, if it came out of the workflow
    pub fn stage(&self) -> Option<WorkflowStage> {
        match self {
            Error::Workflow { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}
