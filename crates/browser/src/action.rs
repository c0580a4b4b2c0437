//! Actions understood by the browser driver
//!
//! Each action is sent to the driver as one JSON object per line, tagged by
//! `action`. The driver answers every line with one [`Reply`].

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{BrowserError, BrowserResult};

/// Describes how to find an element on the page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locator {
    /// Playwright selector (CSS, `text=`, or chained with `>>`)
    pub selector: String,

    /// Pick the n-th match instead of requiring a unique one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nth: Option<usize>,
}

impl Locator {
    pub fn css(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            nth: None,
        }
    }

    /// Element whose text is `text`
    pub fn text(text: &str) -> Self {
        Self::css(format!("text={}", text))
    }

    /// `<label>` containing `text`
    pub fn label(text: &str) -> Self {
        Self::css(format!("label:has-text(\"{}\")", text))
    }

    /// `<input name="...">`
    pub fn input(name: &str) -> Self {
        Self::css(format!("input[name='{}']", name))
    }

    pub fn nth(mut self, index: usize) -> Self {
        self.nth = Some(index);
        self
    }
}

impl std::fmt::Display for Locator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.nth {
            Some(n) => write!(f, "{} [{}]", self.selector, n),
            None => f.write_str(&self.selector),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaitState {
    #[default]
    Visible,
    Hidden,
    Attached,
    Detached,
}

/// A single driver action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    /// Start the browser and open a page
    Launch {
        browser: String,
        headless: bool,
        viewport_width: u32,
        viewport_height: u32,
        timeout_ms: u64,
    },

    /// Navigate to an absolute URL
    Navigate { url: String },

    /// Click an element
    Click {
        #[serde(flatten)]
        locator: Locator,
    },

    /// Fill an input field
    Fill {
        #[serde(flatten)]
        locator: Locator,
        value: String,
    },

    /// Wait for an element to reach a state
    WaitFor {
        #[serde(flatten)]
        locator: Locator,
        state: WaitState,
        timeout_ms: u64,
    },

    /// Attach files to a file input
    SetInputFiles {
        #[serde(flatten)]
        locator: Locator,
        paths: Vec<PathBuf>,
    },

    /// Wait for a fixed amount of time (use sparingly)
    Pause { ms: u64 },

    /// Close the browser and end the driver
    Close,
}

impl Action {
    /// Short name used in logs and step history
    pub fn name(&self) -> String {
        match self {
            Action::Launch { browser, .. } => format!("launch:{}", browser),
            Action::Navigate { url } => format!("navigate:{}", url),
            Action::Click { locator } => format!("click:{}", locator),
            Action::Fill { locator, .. } => format!("fill:{}", locator),
            Action::WaitFor { locator, .. } => format!("wait:{}", locator),
            Action::SetInputFiles { locator, .. } => format!("upload:{}", locator),
            Action::Pause { ms } => format!("pause:{}ms", ms),
            Action::Close => "close".to_string(),
        }
    }
}

/// Driver answer to one action
#[derive(Debug, Clone, Deserialize)]
pub struct Reply {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub kind: Option<String>,
}

impl Reply {
    pub fn into_result(self, action: &str) -> BrowserResult<()> {
        if self.ok {
            return Ok(());
        }

        let reason = self.error.unwrap_or_else(|| "unknown driver error".to_string());
        match self.kind.as_deref() {
            Some("timeout") => Err(BrowserError::Timeout {
                action: action.to_string(),
                reason,
            }),
            _ => Err(BrowserError::Action {
                action: action.to_string(),
                reason,
            }),
        }
    }
}
