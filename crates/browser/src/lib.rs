//! OTP Signup Browser Boundary
//!
//! The workflow talks to the page only through [`BrowserSession`]. The
//! Playwright implementation hosts the browser in a Node process:
//!
//! ```text
//! ┌────────────────────────┐   JSON line per action   ┌──────────────────┐
//! │ PlaywrightSession      │ ───────────────────────► │ node driver.js   │
//! │   execute(Action)      │ ◄─────────────────────── │   playwright API │
//! └────────────────────────┘   {ok, error?, kind?}    └──────────────────┘
//! ```

pub mod action;
pub mod error;
pub mod playwright;
pub mod session;

pub use action::{Action, Locator, WaitState};
pub use error::{BrowserError, BrowserResult};
pub use playwright::{PlaywrightSession, StepResult};
pub use session::BrowserSession;
