//! Core types for OTP signup automation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::otp::OtpCode;

/// Credentials of a provisioned disposable mailbox.
///
/// Created once per run and never mutated afterwards.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailboxCredentials {
    pub address: String,
    pub password: String,
    pub auth_token: String,
}

impl MailboxCredentials {
    pub fn new(address: String, password: String, auth_token: String) -> Self {
        Self {
            address,
            password,
            auth_token,
        }
    }

    /// Domain part of the address
    pub fn domain(&self) -> &str {
        self.address
            .split_once('@')
            .map(|(_, domain)| domain)
            .unwrap_or_default()
    }
}

impl std::fmt::Debug for MailboxCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailboxCredentials")
            .field("address", &self.address)
            .field("password", &"<redacted>")
            .field("auth_token", &"<redacted>")
            .finish()
    }
}

/// One entry of the provider's message list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageSummary {
    pub id: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// A fully fetched message
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboxMessage {
    pub id: String,
    pub text_body: String,
    pub html_body: String,
}

impl InboxMessage {
    /// Text immediately followed by raw HTML, no separator. Markup is left
    /// in place.
    pub fn searchable_body(&self) -> String {
        let mut body = String::with_capacity(self.text_body.len() + self.html_body.len());
        body.push_str(&self.text_body);
        body.push_str(&self.html_body);
        body
    }

    pub fn find_code(&self) -> Option<OtpCode> {
        OtpCode::extract(&self.searchable_body())
    }
}

/// Stages of the signup form, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStage {
    AgreeTerms,
    PersonalDetails,
    OtpVerification,
    AgencyDetails,
    Experience,
    Services,
    Verification,
    FileUpload,
    Submit,
}

impl WorkflowStage {
    pub const ALL: [WorkflowStage; 9] = [
        WorkflowStage::AgreeTerms,
        WorkflowStage::PersonalDetails,
        WorkflowStage::OtpVerification,
        WorkflowStage::AgencyDetails,
        WorkflowStage::Experience,
        WorkflowStage::Services,
        WorkflowStage::Verification,
        WorkflowStage::FileUpload,
        WorkflowStage::Submit,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowStage::AgreeTerms => "agree_terms",
            WorkflowStage::PersonalDetails => "personal_details",
            WorkflowStage::OtpVerification => "otp_verification",
            WorkflowStage::AgencyDetails => "agency_details",
            WorkflowStage::Experience => "experience",
            WorkflowStage::Services => "services",
            WorkflowStage::Verification => "verification",
            WorkflowStage::FileUpload => "file_upload",
            WorkflowStage::Submit => "submit",
        }
    }

    /// The stage that follows this one, if any
    pub fn next(&self) -> Option<WorkflowStage> {
        let idx = Self::ALL.iter().position(|s| s == self)?;
        Self::ALL.get(idx + 1).copied()
    }
}

impl std::fmt::Display for WorkflowStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of waiting for an OTP
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    Found { code: OtpCode, attempts: u64 },
    NotFound { attempts: u64 },
}

impl PollOutcome {
    pub fn attempts(&self) -> u64 {
        match self {
            PollOutcome::Found { attempts, .. } | PollOutcome::NotFound { attempts } => *attempts,
        }
    }

    pub fn code(&self) -> Option<&OtpCode> {
        match self {
            PollOutcome::Found { code, .. } => Some(code),
            PollOutcome::NotFound { .. } => None,
        }
    }
}

/// Timing of one completed stage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageReport {
    pub stage: WorkflowStage,
    pub duration_ms: u64,
}

/// Summary of a completed signup run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupResult {
    pub address: String,
    pub stages: Vec<StageReport>,
    pub otp_attempts: u64,
    pub duration_ms: u64,
}
