//! Disposable mailbox commands

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Args;
use serde::Serialize;

use otp_signup_common::{MailboxCredentials, PollOutcome, SignupConfig};
use otp_signup_mailbox::{MailTmClient, MailboxProvisioner, OtpPoller};

use crate::output::{print_info, print_item, OutputFormat, TableDisplay};

#[derive(Args, Debug, Default)]
pub struct MailboxArgs {
    /// Keep polling the new inbox until a code arrives
    #[arg(long)]
    pub wait: bool,

    /// Seconds to wait for a code (defaults to mail.otp_timeout_secs)
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Mail provider API base URL
    #[arg(long, env = "OTP_SIGNUP_MAIL_API")]
    pub mail_api: Option<String>,
}

/// Mailbox as shown to the user. The bearer token stays out of it.
#[derive(Serialize)]
struct MailboxDisplay {
    address: String,
    password: String,
    code: Option<String>,
    attempts: Option<u64>,
}

impl From<&MailboxCredentials> for MailboxDisplay {
    fn from(mailbox: &MailboxCredentials) -> Self {
        Self {
            address: mailbox.address.clone(),
            password: mailbox.password.clone(),
            code: None,
            attempts: None,
        }
    }
}

impl TableDisplay for MailboxDisplay {
    fn headers() -> Vec<&'static str> {
        vec!["Email", "Password", "Code", "Attempts"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.address.clone(),
            self.password.clone(),
            self.code.clone().unwrap_or_else(|| "-".to_string()),
            self.attempts.map(|a| a.to_string()).unwrap_or_else(|| "-".to_string()),
        ]
    }
}

pub async fn execute(args: MailboxArgs, mut config: SignupConfig, format: OutputFormat) -> Result<()> {
    if let Some(base) = args.mail_api {
        config.mail.api_base = base;
    }
    let timeout_secs = args.timeout.unwrap_or(config.mail.otp_timeout_secs);

    let api = Arc::new(MailTmClient::new(&config.mail).context("failed to build mail client")?);
    let mailbox = MailboxProvisioner::new(api.clone()).provision().await?;
    let mut display = MailboxDisplay::from(&mailbox);

    if args.wait {
        if format != OutputFormat::Json {
            print_info(&format!(
                "Waiting up to {}s for a code at {}",
                timeout_secs, mailbox.address
            ));
        }
        let poller = OtpPoller::from_config(api, &config.mail);
        match poller.wait_for_code(&mailbox.auth_token, timeout_secs).await {
            PollOutcome::Found { code, attempts } => {
                display.code = Some(code.to_string());
                display.attempts = Some(attempts);
            }
            PollOutcome::NotFound { attempts } => {
                print_item(&display, format);
                bail!("no code arrived after {} attempt(s) over {}s", attempts, timeout_secs);
            }
        }
    }

    print_item(&display, format);
    Ok(())
}
