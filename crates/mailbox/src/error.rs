//! Error types for the mail provider client

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MailError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{endpoint} returned {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("Provider listed no domains")]
    NoDomains,
}

pub type MailResult<T> = Result<T, MailError>;
