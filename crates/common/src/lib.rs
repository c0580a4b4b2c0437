//! OTP Signup Common Library
//!
//! Shared types, configuration and errors for the signup workspace.

pub mod config;
pub mod error;
pub mod otp;
pub mod types;

// Re-export commonly used types
pub use config::{AttachmentConfig, BrowserConfig, BrowserKind, FormConfig, MailConfig, SignupConfig};
pub use error::{Error, Result};
pub use otp::OtpCode;
pub use types::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default configuration file path
pub fn default_config_path() -> std::path::PathBuf {
    std::path::PathBuf::from("otp-signup.toml")
}
