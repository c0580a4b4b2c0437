//! Ordered interaction strategies
//!
//! A control that the target page may render in more than one way is
//! described by a list of strategies. They are tried in order and the first
//! one that succeeds wins; any error moves on to the next.

use std::time::Duration;

use tracing::{info, warn};

use otp_signup_browser::{BrowserError, BrowserResult, BrowserSession, Locator, WaitState};

/// One way of reaching a control
#[derive(Debug, Clone)]
pub struct InteractionStrategy {
    pub name: String,
    pub locator: Locator,
    /// Wait for the control to become visible before using it
    pub wait_visible: Option<Duration>,
}

impl InteractionStrategy {
    pub fn new(name: impl Into<String>, locator: Locator) -> Self {
        Self {
            name: name.into(),
            locator,
            wait_visible: None,
        }
    }

    pub fn wait_visible(mut self, timeout: Duration) -> Self {
        self.wait_visible = Some(timeout);
        self
    }

    async fn fill<B>(&self, session: &mut B, value: &str) -> BrowserResult<()>
    where
        B: BrowserSession + ?Sized,
    {
        if let Some(timeout) = self.wait_visible {
            session.wait_for(&self.locator, WaitState::Visible, timeout).await?;
        }
        session.fill(&self.locator, value).await
    }
}

/// Fill `value` using the first strategy that works.
///
/// Returns the name of the strategy that succeeded. When all of them fail
/// the error names every strategy that was tried.
pub async fn fill_first_available<B>(
    session: &mut B,
    strategies: &[InteractionStrategy],
    value: &str,
) -> BrowserResult<String>
where
    B: BrowserSession + ?Sized,
{
    let mut attempted = Vec::with_capacity(strategies.len());
    let mut last_error = None;

    for strategy in strategies {
        attempted.push(strategy.name.clone());
        match strategy.fill(session, value).await {
            Ok(()) => {
                if attempted.len() > 1 {
                    info!("Filled using fallback strategy '{}'", strategy.name);
                }
                return Ok(strategy.name.clone());
            }
            Err(e) => {
                warn!("Strategy '{}' failed: {}", strategy.name, e);
                last_error = Some(e.to_string());
            }
        }
    }

    Err(BrowserError::StrategiesExhausted {
        attempted,
        last_error: last_error.unwrap_or_else(|| "no strategies configured".to_string()),
    })
}
