//! Playwright browser automation
//!
//! Playwright runs inside a long-lived Node process hosting `driver.js`.
//! Actions go over stdin as JSON lines and each one is acknowledged on
//! stdout before the next is sent.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tempfile::TempDir;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, ChildStdin, ChildStdout, Command as TokioCommand};
use tracing::{debug, info, warn};

use otp_signup_common::BrowserConfig;

use crate::action::{Action, Locator, Reply, WaitState};
use crate::error::{BrowserError, BrowserResult};
use crate::session::BrowserSession;

const DRIVER_SCRIPT: &str = include_str!("driver.js");

/// How long `close` waits for the driver to exit before killing it
const EXIT_GRACE: Duration = Duration::from_secs(5);

/// Result of executing a driver action
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepResult {
    pub success: bool,
    pub step_name: String,
    pub duration_ms: u64,
    pub error: Option<String>,
}

/// A browser page owned by a Node/Playwright driver process.
///
/// The driver is killed when the session is dropped without `close`.
pub struct PlaywrightSession {
    child: Child,
    stdin: ChildStdin,
    replies: Lines<BufReader<ChildStdout>>,
    history: Vec<StepResult>,
    closed: bool,
    _script_dir: Option<TempDir>,
}

impl PlaywrightSession {
    /// Start Node with the embedded driver and launch the configured browser
    pub async fn launch(config: &BrowserConfig) -> BrowserResult<Self> {
        Self::check_playwright_installed(config).await?;

        let script_dir = tempfile::tempdir()?;
        let script_path = script_dir.path().join("driver.js");
        std::fs::write(&script_path, DRIVER_SCRIPT)?;
        debug!("Driver script staged at {}", script_path.display());

        let mut cmd = TokioCommand::new(&config.node_binary);
        cmd.arg(&script_path)
            .current_dir(&config.project_dir)
            .env("NODE_PATH", config.project_dir.join("node_modules"));

        let mut session = Self::spawn(cmd, Some(script_dir))?;

        let launch = Action::Launch {
            browser: config.browser.as_str().to_string(),
            headless: config.headless,
            viewport_width: config.viewport_width,
            viewport_height: config.viewport_height,
            timeout_ms: config.action_timeout_ms,
        };
        if let Err(e) = session.execute(launch).await {
            let _ = session.child.start_kill();
            return Err(BrowserError::DriverStartup(e.to_string()));
        }

        info!(
            "Launched {} (headless: {})",
            config.browser.as_str(),
            config.headless
        );
        Ok(session)
    }

    /// Wire up a driver process. `cmd` must speak the JSON-line protocol.
    pub fn spawn(mut cmd: TokioCommand, script_dir: Option<TempDir>) -> BrowserResult<Self> {
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);

        let mut child = cmd
            .spawn()
            .map_err(|e| BrowserError::DriverStartup(format!("Failed to spawn driver: {}", e)))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| BrowserError::DriverStartup("driver stdin unavailable".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| BrowserError::DriverStartup("driver stdout unavailable".to_string()))?;

        Ok(Self {
            child,
            stdin,
            replies: BufReader::new(stdout).lines(),
            history: Vec::new(),
            closed: false,
            _script_dir: script_dir,
        })
    }

    /// Check if Playwright is installed
    async fn check_playwright_installed(config: &BrowserConfig) -> BrowserResult<()> {
        let output = TokioCommand::new("npx")
            .args(["playwright", "--version"])
            .current_dir(&config.project_dir)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await;

        match output {
            Ok(status) if status.success() => Ok(()),
            _ => Err(BrowserError::PlaywrightNotFound),
        }
    }

    /// Send one action and wait for its reply
    pub async fn execute(&mut self, action: Action) -> BrowserResult<()> {
        if self.closed {
            return Err(BrowserError::SessionClosed);
        }

        let start = Instant::now();
        let step_name = action.name();
        debug!("Executing action: {}", step_name);

        let result = self.round_trip(&action, &step_name).await;

        let duration_ms = start.elapsed().as_millis() as u64;
        if let Err(e) = &result {
            debug!("Action {} failed after {} ms: {}", step_name, duration_ms, e);
        }
        self.history.push(StepResult {
            success: result.is_ok(),
            step_name,
            duration_ms,
            error: result.as_ref().err().map(|e| e.to_string()),
        });

        result
    }

    async fn round_trip(&mut self, action: &Action, step_name: &str) -> BrowserResult<()> {
        let mut line = serde_json::to_string(action)?;
        line.push('\n');
        self.stdin.write_all(line.as_bytes()).await?;
        self.stdin.flush().await?;

        let reply = self
            .replies
            .next_line()
            .await?
            .ok_or(BrowserError::SessionClosed)?;
        let reply: Reply = serde_json::from_str(&reply)?;
        reply.into_result(step_name)
    }

    /// Actions executed so far, failed ones included
    pub fn history(&self) -> &[StepResult] {
        &self.history
    }
}

#[async_trait]
impl BrowserSession for PlaywrightSession {
    async fn navigate(&mut self, url: &str) -> BrowserResult<()> {
        self.execute(Action::Navigate { url: url.to_string() }).await
    }

    async fn click(&mut self, locator: &Locator) -> BrowserResult<()> {
        self.execute(Action::Click {
            locator: locator.clone(),
        })
        .await
    }

    async fn fill(&mut self, locator: &Locator, value: &str) -> BrowserResult<()> {
        self.execute(Action::Fill {
            locator: locator.clone(),
            value: value.to_string(),
        })
        .await
    }

    async fn wait_for(&mut self, locator: &Locator, state: WaitState, timeout: Duration) -> BrowserResult<()> {
        self.execute(Action::WaitFor {
            locator: locator.clone(),
            state,
            timeout_ms: timeout.as_millis() as u64,
        })
        .await
    }

    async fn set_input_files(&mut self, locator: &Locator, paths: &[PathBuf]) -> BrowserResult<()> {
        self.execute(Action::SetInputFiles {
            locator: locator.clone(),
            paths: paths.to_vec(),
        })
        .await
    }

    async fn pause(&mut self, duration: Duration) -> BrowserResult<()> {
        self.execute(Action::Pause {
            ms: duration.as_millis() as u64,
        })
        .await
    }

    async fn close(&mut self) -> BrowserResult<()> {
        if self.closed {
            return Ok(());
        }

        let result = self.execute(Action::Close).await;
        self.closed = true;

        match tokio::time::timeout(EXIT_GRACE, self.child.wait()).await {
            Ok(Ok(status)) => debug!("Driver exited with {}", status),
            Ok(Err(e)) => warn!("Failed to reap driver: {}", e),
            Err(_) => {
                warn!("Driver did not exit within {:?}, killing it", EXIT_GRACE);
                let _ = self.child.kill().await;
            }
        }

        info!("Browser session closed");
        result
    }
}

impl Drop for PlaywrightSession {
    fn drop(&mut self) {
        if !self.closed {
            let _ = self.child.start_kill();
        }
    }
}
