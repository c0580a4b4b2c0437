//! Bounded polling of a mailbox for a one-time password

use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, info, warn};

use otp_signup_common::{MailConfig, MessageSummary, OtpCode, PollOutcome};

use crate::client::MailApi;
use crate::error::MailResult;

/// Polls the inbox at a fixed interval until a code shows up or the
/// attempt budget runs out
pub struct OtpPoller {
    api: Arc<dyn MailApi>,
    interval_secs: u64,
}

impl OtpPoller {
    pub fn new(api: Arc<dyn MailApi>, interval: Duration) -> Self {
        Self {
            api,
            interval_secs: interval.as_secs().max(1),
        }
    }

    pub fn from_config(api: Arc<dyn MailApi>, config: &MailConfig) -> Self {
        Self::new(api, config.poll_interval())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    /// `timeout_secs / interval`, rounded down. A trailing partial interval
    /// is never polled.
    pub fn max_attempts(&self, timeout_secs: u64) -> u64 {
        timeout_secs / self.interval_secs
    }

    /// Wait for a 6-digit code to arrive in the mailbox behind `auth_token`.
    ///
    /// Failed attempts are logged and retried; running out of attempts is
    /// reported as `NotFound`, never as an error.
    pub async fn wait_for_code(&self, auth_token: &str, timeout_secs: u64) -> PollOutcome {
        let max_attempts = self.max_attempts(timeout_secs);
        let mut last_seen: Option<String> = None;

        info!(
            "Waiting up to {}s for OTP email ({} attempts, every {}s)",
            timeout_secs, max_attempts, self.interval_secs
        );

        for attempt in 1..=max_attempts {
            match self.poll_once(auth_token, &mut last_seen).await {
                Ok(Some(code)) => {
                    info!(attempt, "OTP found");
                    return PollOutcome::Found {
                        code,
                        attempts: attempt,
                    };
                }
                Ok(None) => debug!(attempt, "No OTP yet"),
                Err(e) => warn!(attempt, "Error checking mailbox: {}", e),
            }

            sleep(self.interval()).await;
        }

        warn!("No OTP found in mailbox within {}s", timeout_secs);
        PollOutcome::NotFound {
            attempts: max_attempts,
        }
    }

    /// One attempt: list, pick the latest message, fetch it, search it
    async fn poll_once(&self, auth_token: &str, last_seen: &mut Option<String>) -> MailResult<Option<OtpCode>> {
        let summaries = self.api.list_messages(auth_token).await?;
        let Some(latest) = select_latest(&summaries) else {
            return Ok(None);
        };

        if last_seen.as_deref() != Some(latest.id.as_str()) {
            debug!(id = %latest.id, total = summaries.len(), "New latest message");
            *last_seen = Some(latest.id.clone());
        }

        let message = self.api.get_message(auth_token, &latest.id).await?;
        Ok(message.find_code())
    }
}

/// Newest message by `created_at` when every entry carries one, otherwise
/// the provider's first entry. Ties keep provider order.
pub fn select_latest(summaries: &[MessageSummary]) -> Option<&MessageSummary> {
    if summaries.iter().all(|s| s.created_at.is_some()) {
        summaries.iter().rev().max_by_key(|s| s.created_at)
    } else {
        summaries.first()
    }
}
