//! Disposable mailbox provisioning

use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use otp_signup_common::{Error, MailboxCredentials, Result};

use crate::client::MailApi;
use crate::error::MailError;

/// Length of the random local part of a generated address
const LOCAL_PART_LEN: usize = 10;

/// Creates one disposable mailbox per call and authenticates it
pub struct MailboxProvisioner {
    api: Arc<dyn MailApi>,
}

impl MailboxProvisioner {
    pub fn new(api: Arc<dyn MailApi>) -> Self {
        Self { api }
    }

    /// Create a mailbox on the first listed domain and obtain its token.
    ///
    /// Every failure is fatal; nothing is retried and the remote account is
    /// left for the provider to expire.
    pub async fn provision(&self) -> Result<MailboxCredentials> {
        let domains = self
            .api
            .domains()
            .await
            .map_err(|e| Error::provisioning("domains", e))?;
        let domain = domains
            .into_iter()
            .next()
            .ok_or_else(|| Error::provisioning("domains", MailError::NoDomains))?;
        debug!(domain = %domain, "Selected mail domain");

        let address = generate_address(&domain);
        let password = generate_password();

        self.api
            .create_account(&address, &password)
            .await
            .map_err(|e| Error::provisioning("accounts", e))?;

        let token = self
            .api
            .token(&address, &password)
            .await
            .map_err(|e| Error::provisioning("token", e))?;

        info!(address = %address, "Disposable mailbox created");
        Ok(MailboxCredentials::new(address, password, token))
    }
}

/// `<10 hex chars of a v4 UUID>@<domain>`
pub fn generate_address(domain: &str) -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!("{}@{}", &id[..LOCAL_PART_LEN], domain)
}

pub fn generate_password() -> String {
    Uuid::new_v4().simple().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MailResult;
    use async_trait::async_trait;
    use otp_signup_common::{InboxMessage, MessageSummary};
    use std::collections::HashSet;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeProvider {
        domains: Vec<String>,
        account_status: Option<u16>,
        token_status: Option<u16>,
        accounts: Mutex<Vec<(String, String)>>,
    }

    fn status(endpoint: &str, code: u16) -> MailError {
        MailError::Status {
            endpoint: endpoint.to_string(),
            status: code,
            body: "{}".to_string(),
        }
    }

    #[async_trait]
    impl MailApi for FakeProvider {
        async fn domains(&self) -> MailResult<Vec<String>> {
            Ok(self.domains.clone())
        }

        async fn create_account(&self, address: &str, password: &str) -> MailResult<()> {
            if let Some(code) = self.account_status {
                return Err(status("POST /accounts", code));
            }
            self.accounts
                .lock()
                .unwrap()
                .push((address.to_string(), password.to_string()));
            Ok(())
        }

        async fn token(&self, address: &str, _password: &str) -> MailResult<String> {
            if let Some(code) = self.token_status {
                return Err(status("POST /token", code));
            }
            Ok(format!("token-for-{}", address))
        }

        async fn list_messages(&self, _token: &str) -> MailResult<Vec<MessageSummary>> {
            Ok(vec![])
        }

        async fn get_message(&self, _token: &str, id: &str) -> MailResult<InboxMessage> {
            Err(status(&format!("GET /messages/{}", id), 404))
        }
    }

    fn provider(domains: &[&str]) -> FakeProvider {
        FakeProvider {
            domains: domains.iter().map(|d| d.to_string()).collect(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_provision_uses_first_domain() {
        let fake = Arc::new(provider(&["first.test", "second.test"]));
        let creds = MailboxProvisioner::new(fake.clone()).provision().await.unwrap();

        assert!(creds.address.ends_with("@first.test"));
        assert_eq!(creds.address.split('@').next().unwrap().len(), LOCAL_PART_LEN);
        assert_eq!(creds.password.len(), 32);
        assert_eq!(creds.auth_token, format!("token-for-{}", creds.address));

        let accounts = fake.accounts.lock().unwrap();
        assert_eq!(accounts.as_slice(), &[(creds.address.clone(), creds.password.clone())]);
    }

    #[tokio::test]
    async fn test_provision_without_domains_fails() {
        let err = MailboxProvisioner::new(Arc::new(provider(&[])))
            .provision()
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Provisioning { ref step, .. } if step == "domains"));
    }

    #[tokio::test]
    async fn test_account_rejection_is_fatal() {
        let fake = FakeProvider {
            account_status: Some(422),
            ..provider(&["first.test"])
        };
        let err = MailboxProvisioner::new(Arc::new(fake)).provision().await.unwrap_err();
        match err {
            Error::Provisioning { step, reason } => {
                assert_eq!(step, "accounts");
                assert!(reason.contains("422"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_token_failure_propagates() {
        let fake = FakeProvider {
            token_status: Some(401),
            ..provider(&["first.test"])
        };
        let err = MailboxProvisioner::new(Arc::new(fake)).provision().await.unwrap_err();
        assert!(matches!(err, Error::Provisioning { ref step, .. } if step == "token"));
    }

    #[test]
    fn test_generated_addresses_are_unique() {
        let addresses: HashSet<String> = (0..1000).map(|_| generate_address("x.test")).collect();
        assert_eq!(addresses.len(), 1000);
        assert!(addresses.iter().all(|a| {
            let local = a.strip_suffix("@x.test").unwrap();
            local.len() == LOCAL_PART_LEN && local.chars().all(|c| c.is_ascii_hexdigit())
        }));
    }
}
