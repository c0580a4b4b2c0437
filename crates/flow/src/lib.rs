//! OTP Signup Workflow
//!
//! Walks the partner signup form stage by stage:
//!
//! ```text
//! provision mailbox
//!   └─ AgreeTerms → PersonalDetails → OtpVerification → AgencyDetails
//!        → Experience → Services → Verification → FileUpload → Submit
//! ```
//!
//! `OtpVerification` blocks on the mailbox poller and types the code in
//! through an ordered list of input strategies.

pub mod attachments;
pub mod selectors;
pub mod strategy;
pub mod workflow;

pub use strategy::{fill_first_available, InteractionStrategy};
pub use workflow::SignupWorkflow;
