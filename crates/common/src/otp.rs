//! One-time-password extraction

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Six ASCII digits with a word boundary on each side. A longer digit run
/// has no boundary inside it, so it never matches.
static OTP_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b([0-9]{6})\b").expect("static OTP pattern is valid"));

/// A 6-digit verification code
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OtpCode(String);

impl OtpCode {
    pub const LEN: usize = 6;

    /// Find the first standalone 6-digit code in `body`
    pub fn extract(body: &str) -> Option<Self> {
        OTP_PATTERN
            .captures(body)
            .and_then(|caps| caps.get(1))
            .map(|m| OtpCode(m.as_str().to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for OtpCode {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.len() == Self::LEN && value.bytes().all(|b| b.is_ascii_digit()) {
            Ok(OtpCode(value))
        } else {
            Err(format!("not a {}-digit code: {:?}", Self::LEN, value))
        }
    }
}

impl From<OtpCode> for String {
    fn from(code: OtpCode) -> Self {
        code.0
    }
}

impl std::fmt::Display for OtpCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("Your code is 482913", Some("482913") ; "plain sentence")]
    #[test_case("482913", Some("482913") ; "whole string")]
    #[test_case("<td>482913</td>", Some("482913") ; "inside markup")]
    #[test_case("code: 111111, backup 222222", Some("111111") ; "first wins")]
    #[test_case("id 1234567 here", None ; "seven digit run")]
    #[test_case("call +1 5551234567 now", None ; "phone number")]
    #[test_case("12345 only five", None ; "too short")]
    #[test_case("order 9876543210 code 135790", Some("135790") ; "skips longer run")]
    #[test_case("abc123456", None ; "glued to letters")]
    #[test_case("", None ; "empty")]
    fn test_extract(body: &str, expected: Option<&str>) {
        let code = OtpCode::extract(body);
        assert_eq!(code.as_ref().map(OtpCode::as_str), expected);
    }

    #[test]
    fn test_try_from_validates_shape() {
        assert!(OtpCode::try_from("482913".to_string()).is_ok());
        assert!(OtpCode::try_from("48291".to_string()).is_err());
        assert!(OtpCode::try_from("48291a".to_string()).is_err());
    }
}
