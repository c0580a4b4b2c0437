//! Browser session abstraction

use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;

use crate::action::{Locator, WaitState};
use crate::error::BrowserResult;

/// The page primitives the signup workflow is built from.
///
/// Every call either succeeds or fails with a locator or timeout error;
/// there is no partial success.
#[async_trait]
pub trait BrowserSession: Send {
    async fn navigate(&mut self, url: &str) -> BrowserResult<()>;

    async fn click(&mut self, locator: &Locator) -> BrowserResult<()>;

    async fn fill(&mut self, locator: &Locator, value: &str) -> BrowserResult<()>;

    async fn wait_for(&mut self, locator: &Locator, state: WaitState, timeout: Duration) -> BrowserResult<()>;

    async fn set_input_files(&mut self, locator: &Locator, paths: &[PathBuf]) -> BrowserResult<()>;

    async fn pause(&mut self, duration: Duration) -> BrowserResult<()>;

    /// Release the browser. Calling it twice is a no-op.
    async fn close(&mut self) -> BrowserResult<()>;
}
