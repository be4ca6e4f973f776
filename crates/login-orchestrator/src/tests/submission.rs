//! Credential submission coordinator tests.

use super::harness::{rejected, Harness};
use crate::{AuthMode, OrchestratorError, EMAIL_SESSION_KEY};
use auth_transport::FORM_URLENCODED;
use std::time::Duration;

#[tokio::test]
async fn basic_submit_stores_one_result_and_writes_email_once() {
    let h = Harness::new();
    h.orchestrator.set_user("user@example.com");
    h.orchestrator.set_password("pw");

    h.orchestrator.submit().await.unwrap();

    assert_eq!(h.transport.submission_count(), 1);
    let login = h.orchestrator.last_login().unwrap();
    assert_eq!(login.email, "user@example.com");
    assert_eq!(
        h.store.writes(),
        vec![(EMAIL_SESSION_KEY.to_string(), "user@example.com".to_string())]
    );
}

#[tokio::test]
async fn html_submit_carries_form_urlencoded_content_type() {
    let h = Harness::new();
    h.orchestrator.select_mode(AuthMode::Html).await;

    h.orchestrator.submit().await.unwrap();

    let (payload, options) = h.transport.submissions().remove(0);
    assert_eq!(options.content_type.as_deref(), Some(FORM_URLENCODED));
    assert_eq!(payload.op, AuthMode::Html);
    assert_eq!(payload.csrf, None);
}

#[tokio::test]
async fn basic_and_csrf_submits_use_default_content_type() {
    let h = Harness::new();
    h.orchestrator.submit().await.unwrap();
    h.orchestrator.select_mode(AuthMode::Csrf).await;
    h.orchestrator.submit().await.unwrap();

    for (_, options) in h.transport.submissions() {
        assert_eq!(options.content_type, None);
    }
}

#[tokio::test]
async fn csrf_submit_carries_the_fetched_token() {
    let h = Harness::new();
    h.transport.queue_csrf(Ok("tok-42".into()));
    h.orchestrator.select_mode(AuthMode::Csrf).await;

    h.orchestrator.submit().await.unwrap();

    let (payload, _) = h.transport.submissions().remove(0);
    assert_eq!(payload.csrf.as_deref(), Some("tok-42"));
}

#[tokio::test]
async fn csrf_submit_is_blocked_when_the_token_fetch_failed() {
    let h = Harness::new();
    h.transport.queue_csrf(Err(rejected()));
    h.orchestrator.select_mode(AuthMode::Csrf).await;

    let err = h.orchestrator.submit().await.unwrap_err();
    assert!(matches!(err, OrchestratorError::MissingCsrfToken));
    assert_eq!(h.transport.submission_count(), 0);
}

#[tokio::test]
async fn oidc_submit_never_calls_the_credential_transport() {
    let h = Harness::new();
    h.orchestrator.set_user("user@example.com");
    h.orchestrator.set_password("hunter2");
    h.orchestrator.select_mode(AuthMode::OidcPassword).await;

    h.orchestrator.submit().await.unwrap();

    assert_eq!(h.transport.submission_count(), 0);
    assert_eq!(h.gateway.redirect_states(), vec!["hunter2".to_string()]);
    assert_eq!(h.orchestrator.last_login(), None);
}

#[tokio::test]
async fn oidc_redirect_failure_is_reported_locally() {
    let h = Harness::new();
    h.gateway.fail_redirect();
    h.orchestrator.select_mode(AuthMode::OidcPassword).await;

    let err = h.orchestrator.submit().await.unwrap_err();
    assert!(matches!(err, OrchestratorError::Provider(_)));
    assert_eq!(h.transport.submission_count(), 0);
}

#[tokio::test]
async fn duplicate_submit_while_in_flight_is_suppressed() {
    let h = Harness::new();
    h.transport.set_submit_delay(Duration::from_millis(50));

    let first = {
        let orchestrator = h.orchestrator.clone();
        tokio::spawn(async move { orchestrator.submit().await })
    };
    tokio::time::sleep(Duration::from_millis(10)).await;
    h.orchestrator.submit().await.unwrap();

    first.await.unwrap().unwrap();
    assert_eq!(h.transport.submission_count(), 1);
}

#[tokio::test]
async fn failed_submit_keeps_form_and_mode() {
    let h = Harness::new();
    h.transport.queue_login(Err(rejected()));
    h.orchestrator.set_user("user@example.com");
    h.orchestrator.set_password("pw");

    let err = h.orchestrator.submit().await.unwrap_err();
    match err {
        OrchestratorError::Transport(transport) => {
            assert!(transport.is_credential_rejection());
        }
        other => panic!("unexpected error: {other}"),
    }

    let form = h.orchestrator.form();
    assert_eq!(form.user, "user@example.com");
    assert_eq!(form.password, "pw");
    assert_eq!(h.orchestrator.mode(), AuthMode::Basic);
    assert_eq!(h.orchestrator.last_login(), None);
    assert!(h.store.writes().is_empty());
}

#[tokio::test]
async fn a_released_coordinator_accepts_the_next_submission() {
    let h = Harness::new();
    h.transport.queue_login(Err(rejected()));

    assert!(h.orchestrator.submit().await.is_err());
    h.orchestrator.submit().await.unwrap();

    assert_eq!(h.transport.submission_count(), 2);
}
