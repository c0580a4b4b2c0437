//! Locators of the partner signup form

use otp_signup_browser::Locator;

pub const TERMS_CHECKBOX: &str = "#remember";

/// Region and preferred-country pickers share this trigger
pub const COMBOBOX: &str = r#"button[role="combobox"][aria-haspopup="dialog"]"#;

pub const EXPERIENCE_TRIGGER: &str = r#"button:has-text("Select Your Experience Level")"#;

pub const FILE_INPUTS: &str = r#"div[role="presentation"] >> input[type="file"]"#;

/// Input explicitly marked for one-time-password entry
pub const OTP_MARKED_INPUT: &str = "input[data-input-otp='true']";

/// Any input sized for exactly six characters
pub const OTP_SIX_CHAR_INPUT: &str = "input[maxlength='6']";

pub fn sign_up() -> Locator {
    Locator::text("Sign Up")
}

pub fn continue_button() -> Locator {
    Locator::text("Continue")
}

pub fn next_button() -> Locator {
    Locator::text("Next")
}

pub fn verify_code() -> Locator {
    Locator::text("Verify Code")
}

pub fn submit() -> Locator {
    Locator::text("Submit")
}

/// Visible option of the experience dropdown
pub fn experience_option(level: &str) -> Locator {
    Locator::css(format!("text=\"{}\" >> visible=true", level))
}

pub fn file_input(index: usize) -> Locator {
    Locator::css(FILE_INPUTS).nth(index)
}
