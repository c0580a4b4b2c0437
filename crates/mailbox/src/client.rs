//! Client for the mail.tm disposable mailbox API

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Response, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use otp_signup_common::{InboxMessage, MailConfig, MessageSummary};

use crate::error::{MailError, MailResult};

/// Operations the provisioner and poller need from a mail provider
#[async_trait]
pub trait MailApi: Send + Sync {
    /// Domains new accounts may be created under, in provider order
    async fn domains(&self) -> MailResult<Vec<String>>;

    /// Register an account. Only a 201 counts as success.
    async fn create_account(&self, address: &str, password: &str) -> MailResult<()>;

    /// Exchange credentials for a bearer token
    async fn token(&self, address: &str, password: &str) -> MailResult<String>;

    async fn list_messages(&self, token: &str) -> MailResult<Vec<MessageSummary>>;

    async fn get_message(&self, token: &str, id: &str) -> MailResult<InboxMessage>;
}

/// mail.tm HTTP client
#[derive(Debug, Clone)]
pub struct MailTmClient {
    http: reqwest::Client,
    base_url: String,
}

/// Collections come back as JSON-LD (`hydra:member`) or, with a plain
/// JSON `Accept` header, as a bare array.
#[derive(Deserialize)]
#[serde(untagged)]
enum Collection<T> {
    Hydra {
        #[serde(rename = "hydra:member")]
        member: Vec<T>,
    },
    Plain(Vec<T>),
}

impl<T> Collection<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            Collection::Hydra { member } => member,
            Collection::Plain(items) => items,
        }
    }
}

#[derive(Deserialize)]
struct DomainEntry {
    domain: String,
}

#[derive(Serialize)]
struct Credentials<'a> {
    address: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct TokenResponse {
    token: String,
}

#[derive(Deserialize)]
struct MessageEntry {
    id: String,
    #[serde(rename = "createdAt", default)]
    created_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
struct MessageBody {
    id: String,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    html: Option<HtmlBody>,
}

/// mail.tm sends `html` as a list of fragments; other providers send one string
#[derive(Deserialize)]
#[serde(untagged)]
enum HtmlBody {
    One(String),
    Many(Vec<String>),
}

impl HtmlBody {
    fn into_string(self) -> String {
        match self {
            HtmlBody::One(html) => html,
            HtmlBody::Many(parts) => parts.concat(),
        }
    }
}

impl MailTmClient {
    pub fn new(config: &MailConfig) -> MailResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            http,
            base_url: config.api_base.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Pass the response through if its status is acceptable, otherwise
    /// turn it into a `Status` error carrying the body.
    async fn check(endpoint: &str, resp: Response, expected: Option<StatusCode>) -> MailResult<Response> {
        let status = resp.status();
        let ok = match expected {
            Some(code) => status == code,
            None => status.is_success(),
        };
        if ok {
            return Ok(resp);
        }

        let body = resp.text().await.unwrap_or_default();
        Err(MailError::Status {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl MailApi for MailTmClient {
    async fn domains(&self) -> MailResult<Vec<String>> {
        let resp = self.http.get(self.url("/domains")).send().await?;
        let resp = Self::check("GET /domains", resp, None).await?;
        let domains: Collection<DomainEntry> = resp.json().await?;
        Ok(domains.into_vec().into_iter().map(|d| d.domain).collect())
    }

    async fn create_account(&self, address: &str, password: &str) -> MailResult<()> {
        debug!(address = %address, "Registering mailbox account");
        let resp = self
            .http
            .post(self.url("/accounts"))
            .json(&Credentials { address, password })
            .send()
            .await?;
        Self::check("POST /accounts", resp, Some(StatusCode::CREATED)).await?;
        Ok(())
    }

    async fn token(&self, address: &str, password: &str) -> MailResult<String> {
        let resp = self
            .http
            .post(self.url("/token"))
            .json(&Credentials { address, password })
            .send()
            .await?;
        let resp = Self::check("POST /token", resp, None).await?;
        let token: TokenResponse = resp.json().await?;
        Ok(token.token)
    }

    async fn list_messages(&self, token: &str) -> MailResult<Vec<MessageSummary>> {
        let resp = self
            .http
            .get(self.url("/messages"))
            .bearer_auth(token)
            .send()
            .await?;
        let resp = Self::check("GET /messages", resp, None).await?;
        let entries: Collection<MessageEntry> = resp.json().await?;
        Ok(entries
            .into_vec()
            .into_iter()
            .map(|m| MessageSummary {
                id: m.id,
                created_at: m.created_at,
            })
            .collect())
    }

    async fn get_message(&self, token: &str, id: &str) -> MailResult<InboxMessage> {
        let resp = self
            .http
            .get(self.url(&format!("/messages/{}", id)))
            .bearer_auth(token)
            .send()
            .await?;
        let resp = Self::check("GET /messages/{id}", resp, None).await?;
        let body: MessageBody = resp.json().await?;
        Ok(InboxMessage {
            id: body.id,
            text_body: body.text.unwrap_or_default(),
            html_body: body.html.map(HtmlBody::into_string).unwrap_or_default(),
        })
    }
}
