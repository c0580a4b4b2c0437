//! Full signup run

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use tracing::info;

use otp_signup_browser::PlaywrightSession;
use otp_signup_common::{BrowserKind, SignupConfig, SignupResult, StageReport};
use otp_signup_flow::SignupWorkflow;
use otp_signup_mailbox::MailTmClient;

use crate::output::{print_item, print_list, print_success, OutputFormat, TableDisplay};

#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Login page the signup starts from
    #[arg(long, env = "OTP_SIGNUP_URL")]
    pub signup_url: Option<String>,

    /// Seconds to wait for the verification email
    #[arg(long, env = "OTP_SIGNUP_OTP_TIMEOUT")]
    pub otp_timeout: Option<u64>,

    /// Seconds between inbox checks
    #[arg(long, env = "OTP_SIGNUP_POLL_INTERVAL")]
    pub poll_interval: Option<u64>,

    /// Run the browser without a window
    #[arg(long, env = "OTP_SIGNUP_HEADLESS")]
    pub headless: bool,

    /// Browser engine (chromium, firefox, webkit)
    #[arg(long, env = "OTP_SIGNUP_BROWSER")]
    pub browser: Option<BrowserKind>,

    /// Mail provider API base URL
    #[arg(long, env = "OTP_SIGNUP_MAIL_API")]
    pub mail_api: Option<String>,
}

impl RunArgs {
    /// Overlay the flags that were given on top of the loaded configuration
    pub fn apply(&self, config: &mut SignupConfig) {
        if let Some(url) = &self.signup_url {
            config.form.login_url = url.clone();
        }
        if let Some(secs) = self.otp_timeout {
            config.mail.otp_timeout_secs = secs;
        }
        if let Some(secs) = self.poll_interval {
            config.mail.poll_interval_secs = secs;
        }
        if self.headless {
            config.browser.headless = true;
        }
        if let Some(kind) = self.browser {
            config.browser.browser = kind;
        }
        if let Some(base) = &self.mail_api {
            config.mail.api_base = base.clone();
        }
    }
}

#[derive(Serialize)]
struct RunSummary {
    address: String,
    otp_attempts: u64,
    stages: usize,
    duration_ms: u64,
}

impl From<&SignupResult> for RunSummary {
    fn from(result: &SignupResult) -> Self {
        Self {
            address: result.address.clone(),
            otp_attempts: result.otp_attempts,
            stages: result.stages.len(),
            duration_ms: result.duration_ms,
        }
    }
}

impl TableDisplay for RunSummary {
    fn headers() -> Vec<&'static str> {
        vec!["Email", "OTP Attempts", "Stages", "Duration"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.address.clone(),
            self.otp_attempts.to_string(),
            self.stages.to_string(),
            format!("{} ms", self.duration_ms),
        ]
    }
}

impl TableDisplay for StageReport {
    fn headers() -> Vec<&'static str> {
        vec!["Stage", "Duration"]
    }

    fn row(&self) -> Vec<String> {
        vec![self.stage.to_string(), format!("{} ms", self.duration_ms)]
    }
}

pub async fn execute(args: RunArgs, mut config: SignupConfig, format: OutputFormat) -> Result<()> {
    args.apply(&mut config);
    config.validate().context("invalid configuration")?;

    let mail = Arc::new(MailTmClient::new(&config.mail).context("failed to build mail client")?);

    info!(
        "Launching {} (headless: {})",
        config.browser.browser.as_str(),
        config.browser.headless
    );
    let browser = PlaywrightSession::launch(&config.browser)
        .await
        .context("failed to start browser")?;

    let result = SignupWorkflow::new(config, mail, browser).run().await?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        _ => {
            print_list(&result.stages, format);
            print_item(&RunSummary::from(&result), format);
            print_success(&format!("Signup submitted for {}", result.address));
        }
    }
    Ok(())
}
