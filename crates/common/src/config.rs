//! Run configuration
//!
//! Every component receives its section of [`SignupConfig`] at
//! construction. Defaults reproduce the reference signup run against the
//! public mail.tm API.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::error::{Error, Result};

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignupConfig {
    /// Disposable mailbox provider
    pub mail: MailConfig,

    /// Browser engine
    pub browser: BrowserConfig,

    /// Target form and the values typed into it
    pub form: FormConfig,

    /// Files attached during the upload stage
    pub attachments: AttachmentConfig,
}

/// Mail provider configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MailConfig {
    /// Base URL of the mail.tm compatible API
    pub api_base: String,

    /// Seconds between two polls of the inbox
    pub poll_interval_secs: u64,

    /// Budget for the OTP to arrive
    pub otp_timeout_secs: u64,

    /// Upper bound for a single HTTP request
    pub request_timeout_secs: u64,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.mail.tm".to_string(),
            poll_interval_secs: 2,
            otp_timeout_secs: 90,
            request_timeout_secs: 15,
        }
    }
}

impl MailConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Browser engine flavour
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserKind {
    #[default]
    Chromium,
    Firefox,
    Webkit,
}

impl BrowserKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BrowserKind::Chromium => "chromium",
            BrowserKind::Firefox => "firefox",
            BrowserKind::Webkit => "webkit",
        }
    }
}

impl std::str::FromStr for BrowserKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "chromium" | "chrome" => Ok(BrowserKind::Chromium),
            "firefox" => Ok(BrowserKind::Firefox),
            "webkit" => Ok(BrowserKind::Webkit),
            other => Err(Error::InvalidConfig(format!("unknown browser: {}", other))),
        }
    }
}

/// Browser configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    pub browser: BrowserKind,

    pub headless: bool,

    /// Node executable used to host the Playwright driver
    pub node_binary: PathBuf,

    /// Directory whose `node_modules` provides the `playwright` package
    pub project_dir: PathBuf,

    /// Default timeout applied to every page action
    pub action_timeout_ms: u64,

    pub viewport_width: u32,
    pub viewport_height: u32,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            browser: BrowserKind::Chromium,
            headless: false,
            node_binary: PathBuf::from("node"),
            project_dir: PathBuf::from("."),
            action_timeout_ms: 30_000,
            viewport_width: 1280,
            viewport_height: 720,
        }
    }
}

/// Target form and the demo values entered into it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    /// Page holding the "Sign Up" entry point
    pub login_url: String,

    pub first_name: String,
    pub last_name: String,
    pub password: String,

    pub agency_name: String,
    pub role_in_agency: String,
    pub agency_email: String,
    pub agency_website: String,
    pub agency_address: String,
    pub region: String,

    pub experience_level: String,
    pub students_recruited_annually: String,
    pub focus_area: String,
    pub success_metrics: String,

    pub services: Vec<String>,

    pub business_registration_number: String,
    pub preferred_country: String,
    pub institutions: Vec<String>,
    pub certification_details: String,

    /// How long the terms checkbox may take to appear
    pub terms_wait_ms: u64,

    /// How long the OTP-marked input may take to appear
    pub otp_input_wait_ms: u64,

    /// Pause after opening the experience dropdown
    pub dropdown_settle_ms: u64,

    /// Time the page is kept open after submitting
    pub submit_settle_ms: u64,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            login_url: "https://authorized-partner.netlify.app/login".to_string(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            password: "Test@1234".to_string(),
            agency_name: "Test Agency".to_string(),
            role_in_agency: "Manager".to_string(),
            agency_email: "demo@example.com".to_string(),
            agency_website: "www.demoagency.com".to_string(),
            agency_address: "123 Demo Street".to_string(),
            region: "Nepal".to_string(),
            experience_level: "5 years".to_string(),
            students_recruited_annually: "50".to_string(),
            focus_area: "Undergraduate admissions to Canada".to_string(),
            success_metrics: "90".to_string(),
            services: vec![
                "Career Counseling".to_string(),
                "Admission Applications".to_string(),
                "Visa Processing".to_string(),
                "Test Prepration".to_string(),
            ],
            business_registration_number: "BRN123456".to_string(),
            preferred_country: "Canada".to_string(),
            institutions: vec!["Universities".to_string(), "Colleges".to_string()],
            certification_details: "ICEF Certified Education Agent".to_string(),
            terms_wait_ms: 10_000,
            otp_input_wait_ms: 5_000,
            dropdown_settle_ms: 500,
            submit_settle_ms: 5_000,
        }
    }
}

/// Placeholder attachment configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttachmentConfig {
    /// Files uploaded in order, one per file input
    pub paths: Vec<PathBuf>,

    /// Content written to a missing file
    pub placeholder: String,
}

impl Default for AttachmentConfig {
    fn default() -> Self {
        Self {
            paths: vec![PathBuf::from("example1.pdf"), PathBuf::from("example2.pdf")],
            placeholder: "%PDF-1.0\n%dummy PDF content for testing\n".to_string(),
        }
    }
}

impl SignupConfig {
    /// Load configuration from file, falling back to defaults when absent
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = toml::from_str(&content)?;
            debug!("Loaded configuration from {}", path.display());
            Ok(config)
        } else {
            debug!("No configuration at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject configurations that cannot complete a run
    pub fn validate(&self) -> Result<()> {
        if !self.mail.api_base.starts_with("http://") && !self.mail.api_base.starts_with("https://") {
            return Err(Error::InvalidConfig(format!(
                "mail.api_base must be an http(s) URL, got {}",
                self.mail.api_base
            )));
        }
        if self.mail.poll_interval_secs == 0 {
            return Err(Error::InvalidConfig(
                "mail.poll_interval_secs must be at least 1".to_string(),
            ));
        }
        if self.mail.otp_timeout_secs < self.mail.poll_interval_secs {
            return Err(Error::InvalidConfig(format!(
                "mail.otp_timeout_secs ({}) leaves no room for a single poll every {}s",
                self.mail.otp_timeout_secs, self.mail.poll_interval_secs
            )));
        }
        if self.attachments.paths.is_empty() {
            return Err(Error::InvalidConfig(
                "attachments.paths must name at least one file".to_string(),
            ));
        }
        Ok(())
    }
}
