//! mail.tm client against a mock provider

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use otp_signup_common::{Error, MailConfig, PollOutcome};
use otp_signup_mailbox::{MailApi, MailError, MailTmClient, MailboxProvisioner, OtpPoller};

fn client_for(server: &MockServer) -> MailTmClient {
    MailTmClient::new(&MailConfig {
        api_base: server.uri(),
        request_timeout_secs: 5,
        ..Default::default()
    })
    .unwrap()
}

async fn mount_domains(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/domains"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "hydra:member": [
                { "id": "d1", "domain": "mock-mail.test", "isActive": true },
                { "id": "d2", "domain": "other-mail.test", "isActive": true }
            ],
            "hydra:totalItems": 2
        })))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn provision_creates_account_and_token() {
    let server = MockServer::start().await;
    mount_domains(&server).await;
    Mock::given(method("POST"))
        .and(path("/accounts"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": "acc1" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "acc1", "token": "jwt-abc" })))
        .expect(1)
        .mount(&server)
        .await;

    let provisioner = MailboxProvisioner::new(Arc::new(client_for(&server)));
    let creds = provisioner.provision().await.unwrap();

    assert!(creds.address.ends_with("@mock-mail.test"));
    assert_eq!(creds.auth_token, "jwt-abc");

    let requests = server.received_requests().await.unwrap();
    let account_body: serde_json::Value = requests
        .iter()
        .find(|r| r.url.path() == "/accounts")
        .map(|r| serde_json::from_slice(&r.body).unwrap())
        .unwrap();
    assert_eq!(account_body["address"], creds.address.as_str());
    assert_eq!(account_body["password"], creds.password.as_str());
}

#[tokio::test]
async fn non_201_account_response_is_fatal() {
    let server = MockServer::start().await;
    mount_domains(&server).await;
    // A 200 is still a failure for account creation
    Mock::given(method("POST"))
        .and(path("/accounts"))
        .respond_with(ResponseTemplate::new(200).set_body_string("already exists"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = MailboxProvisioner::new(Arc::new(client_for(&server)))
        .provision()
        .await
        .unwrap_err();

    match err {
        Error::Provisioning { step, reason } => {
            assert_eq!(step, "accounts");
            assert!(reason.contains("200"));
            assert!(reason.contains("already exists"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn token_rejection_names_token_step() {
    let server = MockServer::start().await;
    mount_domains(&server).await;
    Mock::given(method("POST"))
        .and(path("/accounts"))
        .respond_with(ResponseTemplate::new(201))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad credentials"))
        .mount(&server)
        .await;

    let err = MailboxProvisioner::new(Arc::new(client_for(&server)))
        .provision()
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Provisioning { ref step, .. } if step == "token"));
}

#[tokio::test]
async fn domain_listing_failure_is_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/domains"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = MailboxProvisioner::new(Arc::new(client_for(&server)))
        .provision()
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Provisioning { ref step, .. } if step == "domains"));
}

#[tokio::test]
async fn messages_require_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/messages"))
        .and(header("Authorization", "Bearer jwt-abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "hydra:member": [
                { "id": "m2", "createdAt": "2024-05-01T10:05:00+00:00" },
                { "id": "m1", "createdAt": "2024-05-01T10:00:00+00:00" }
            ]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/messages"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let listed = client.list_messages("jwt-abc").await.unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, "m2");
    assert!(listed[0].created_at.is_some());

    let err = client.list_messages("wrong").await.unwrap_err();
    assert!(matches!(err, MailError::Status { status: 401, .. }));
}

#[tokio::test]
async fn poller_reads_code_from_html_fragments() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "hydra:member": [ { "id": "m1" } ]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/messages/m1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "m1",
            "text": "Verify your account",
            "html": ["<p>Your code</p>", "<strong>604218</strong>"]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let poller = OtpPoller::new(Arc::new(client_for(&server)), Duration::from_secs(2));
    let outcome = poller.wait_for_code("jwt-abc", 4).await;

    match outcome {
        PollOutcome::Found { code, attempts } => {
            assert_eq!(code.as_str(), "604218");
            assert_eq!(attempts, 1);
        }
        other => panic!("expected a code, got {:?}", other),
    }
}

#[tokio::test]
async fn hanging_provider_cannot_stretch_the_attempt_budget() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/messages"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "hydra:member": [] }))
                .set_delay(Duration::from_secs(10)),
        )
        .expect(2)
        .mount(&server)
        .await;

    let client = MailTmClient::new(&MailConfig {
        api_base: server.uri(),
        request_timeout_secs: 1,
        ..Default::default()
    })
    .unwrap();
    let poller = OtpPoller::new(Arc::new(client), Duration::from_secs(2));

    let start = std::time::Instant::now();
    let outcome = poller.wait_for_code("jwt-abc", 4).await;

    assert_eq!(outcome, PollOutcome::NotFound { attempts: 2 });
    // two 1s request timeouts plus two 2s intervals
    assert!(start.elapsed() < Duration::from_secs(9));
    let listed = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.url.path() == "/messages")
        .count();
    assert_eq!(listed, 2);
}
