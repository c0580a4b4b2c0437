//! Signup workflow that orchestrates mailbox, browser and OTP polling

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, error, info, warn};
use uuid::Uuid;

use otp_signup_browser::{BrowserSession, Locator, WaitState};
use otp_signup_common::{
    Error, MailboxCredentials, PollOutcome, Result, SignupConfig, SignupResult, StageReport,
    WorkflowStage,
};
use otp_signup_mailbox::{MailApi, MailboxProvisioner, OtpPoller};

use crate::attachments::ensure_placeholders;
use crate::selectors;
use crate::strategy::{fill_first_available, InteractionStrategy};

/// State carried from one stage to the next
struct RunState {
    mailbox: MailboxCredentials,
    otp_attempts: u64,
}

/// One signup attempt.
///
/// Owns the browser session for its whole life; `run` closes it on every
/// exit path.
pub struct SignupWorkflow<B: BrowserSession> {
    config: SignupConfig,
    provisioner: MailboxProvisioner,
    poller: OtpPoller,
    browser: B,
}

impl<B: BrowserSession> SignupWorkflow<B> {
    pub fn new(config: SignupConfig, mail: Arc<dyn MailApi>, browser: B) -> Self {
        let poller = OtpPoller::from_config(mail.clone(), &config.mail);
        Self {
            provisioner: MailboxProvisioner::new(mail),
            poller,
            config,
            browser,
        }
    }

    /// Provision a mailbox and walk every stage once, in order.
    pub async fn run(mut self) -> Result<SignupResult> {
        let outcome = self.execute().await;

        if let Err(e) = self.browser.close().await {
            warn!("Failed to close browser session: {}", e);
        }

        outcome
    }

    async fn execute(&mut self) -> Result<SignupResult> {
        let start = Instant::now();

        let mailbox = self.provisioner.provision().await?;
        info!("Temporary email created: {}", mailbox.address);

        let mut state = RunState {
            mailbox,
            otp_attempts: 0,
        };
        let mut stages = Vec::with_capacity(WorkflowStage::ALL.len());

        for stage in WorkflowStage::ALL {
            let stage_start = Instant::now();
            debug!("Entering stage {}", stage);

            if let Err(cause) = self.run_stage(stage, &mut state).await {
                error!("Stage {} failed: {}", stage, cause);
                return Err(Error::at_stage(stage, cause));
            }

            let duration_ms = stage_start.elapsed().as_millis() as u64;
            info!("✓ {} ({} ms)", stage, duration_ms);
            stages.push(StageReport { stage, duration_ms });
        }

        info!("Form submitted successfully");
        Ok(SignupResult {
            address: state.mailbox.address,
            stages,
            otp_attempts: state.otp_attempts,
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }

    async fn run_stage(&mut self, stage: WorkflowStage, state: &mut RunState) -> Result<()> {
        match stage {
            WorkflowStage::AgreeTerms => self.agree_terms().await,
            WorkflowStage::PersonalDetails => self.personal_details(&state.mailbox).await,
            WorkflowStage::OtpVerification => {
                state.otp_attempts = self.verify_otp(&state.mailbox).await?;
                Ok(())
            }
            WorkflowStage::AgencyDetails => self.agency_details().await,
            WorkflowStage::Experience => self.experience().await,
            WorkflowStage::Services => self.services().await,
            WorkflowStage::Verification => self.verification().await,
            WorkflowStage::FileUpload => self.file_upload().await,
            WorkflowStage::Submit => self.submit().await,
        }
    }

    async fn agree_terms(&mut self) -> Result<()> {
        let form = &self.config.form;
        let checkbox = Locator::css(selectors::TERMS_CHECKBOX);

        self.browser.navigate(&form.login_url).await?;
        self.browser.click(&selectors::sign_up()).await?;
        self.browser
            .wait_for(&checkbox, WaitState::Visible, Duration::from_millis(form.terms_wait_ms))
            .await?;
        self.browser.click(&checkbox).await?;
        self.browser.click(&selectors::continue_button()).await?;
        Ok(())
    }

    async fn personal_details(&mut self, mailbox: &MailboxCredentials) -> Result<()> {
        let form = &self.config.form;
        let phone = generate_phone_number();
        debug!("Using phone number {}", phone);

        let fields = [
            ("firstName", form.first_name.as_str()),
            ("lastName", form.last_name.as_str()),
            ("email", mailbox.address.as_str()),
            ("phoneNumber", phone.as_str()),
            ("password", form.password.as_str()),
            ("confirmPassword", form.password.as_str()),
        ];
        for (name, value) in fields {
            self.browser.fill(&Locator::input(name), value).await?;
        }
        self.browser.click(&selectors::next_button()).await?;
        Ok(())
    }

    /// Wait for the emailed code and type it in. Returns the poll attempts used.
    async fn verify_otp(&mut self, mailbox: &MailboxCredentials) -> Result<u64> {
        let timeout_secs = self.config.mail.otp_timeout_secs;
        info!("Waiting for OTP email at {}", mailbox.address);

        let (code, attempts) = match self.poller.wait_for_code(&mailbox.auth_token, timeout_secs).await {
            PollOutcome::Found { code, attempts } => {
                info!("OTP received after {} attempt(s)", attempts);
                (code, attempts)
            }
            PollOutcome::NotFound { .. } => {
                return Err(Error::OtpTimeout {
                    seconds: timeout_secs,
                })
            }
        };

        let strategies = otp_strategies(Duration::from_millis(self.config.form.otp_input_wait_ms));
        let used = fill_first_available(&mut self.browser, &strategies, code.as_str()).await?;
        debug!("OTP entered via '{}'", used);

        self.browser.click(&selectors::verify_code()).await?;
        Ok(attempts)
    }

    async fn agency_details(&mut self) -> Result<()> {
        let form = &self.config.form;
        let fields = [
            ("agency_name", form.agency_name.as_str()),
            ("role_in_agency", form.role_in_agency.as_str()),
            ("agency_email", form.agency_email.as_str()),
            ("agency_website", form.agency_website.as_str()),
            ("agency_address", form.agency_address.as_str()),
        ];
        for (name, value) in fields {
            self.browser.fill(&Locator::input(name), value).await?;
        }

        self.browser.click(&Locator::css(selectors::COMBOBOX)).await?;
        self.browser.click(&Locator::text(&form.region)).await?;
        self.browser.click(&selectors::next_button()).await?;
        Ok(())
    }

    async fn experience(&mut self) -> Result<()> {
        let form = &self.config.form;

        self.browser.click(&Locator::css(selectors::EXPERIENCE_TRIGGER)).await?;
        self.browser
            .pause(Duration::from_millis(form.dropdown_settle_ms))
            .await?;
        self.browser
            .click(&selectors::experience_option(&form.experience_level))
            .await?;

        let fields = [
            (
                "number_of_students_recruited_annually",
                form.students_recruited_annually.as_str(),
            ),
            ("focus_area", form.focus_area.as_str()),
            ("success_metrics", form.success_metrics.as_str()),
        ];
        for (name, value) in fields {
            self.browser.fill(&Locator::input(name), value).await?;
        }
        Ok(())
    }

    async fn services(&mut self) -> Result<()> {
        for service in &self.config.form.services {
            self.browser.click(&Locator::label(service)).await?;
        }
        self.browser.click(&selectors::next_button()).await?;
        Ok(())
    }

    async fn verification(&mut self) -> Result<()> {
        let form = &self.config.form;

        self.browser
            .fill(
                &Locator::input("business_registration_number"),
                &form.business_registration_number,
            )
            .await?;

        self.browser.click(&Locator::css(selectors::COMBOBOX)).await?;
        self.browser.click(&Locator::text(&form.preferred_country)).await?;

        for institution in &form.institutions {
            self.browser.click(&Locator::label(institution)).await?;
        }

        self.browser
            .fill(
                &Locator::input("certification_details"),
                &form.certification_details,
            )
            .await?;
        Ok(())
    }

    async fn file_upload(&mut self) -> Result<()> {
        let attachments = &self.config.attachments;
        ensure_placeholders(attachments)?;

        for (index, path) in attachments.paths.iter().enumerate() {
            self.browser
                .set_input_files(&selectors::file_input(index), std::slice::from_ref(path))
                .await?;
        }
        Ok(())
    }

    async fn submit(&mut self) -> Result<()> {
        self.browser.click(&selectors::submit()).await?;
        self.browser
            .pause(Duration::from_millis(self.config.form.submit_settle_ms))
            .await?;
        Ok(())
    }
}

/// Ways to reach the code input, most specific first
pub fn otp_strategies(marked_input_wait: Duration) -> Vec<InteractionStrategy> {
    vec![
        InteractionStrategy::new("otp-marked input", Locator::css(selectors::OTP_MARKED_INPUT))
            .wait_visible(marked_input_wait),
        InteractionStrategy::new("six-character input", Locator::css(selectors::OTP_SIX_CHAR_INPUT)),
    ]
}

/// `+1` followed by the first ten decimal digits of a random 128-bit id
pub fn generate_phone_number() -> String {
    let digits = Uuid::new_v4().as_u128().to_string();
    let local = digits.get(..10).unwrap_or(&digits);
    format!("+1{}", local)
}
