//! Disposable Mailbox
//!
//! Provisions a throwaway mail.tm account and polls it for the
//! verification code sent during signup.
//!
//! ```text
//! MailboxProvisioner::provision()
//!   GET  /domains        -> first domain
//!   POST /accounts       -> 201 or fatal
//!   POST /token          -> bearer token
//!
//! OtpPoller::wait_for_code(token, timeout)
//!   repeat timeout / interval times:
//!     GET /messages      -> latest entry
//!     GET /messages/{id} -> text + html -> 6-digit code
//!     sleep(interval)
//! ```

pub mod client;
pub mod error;
pub mod poller;
pub mod provisioner;

pub use client::{MailApi, MailTmClient};
pub use error::{MailError, MailResult};
pub use poller::OtpPoller;
pub use provisioner::MailboxProvisioner;
