//! Post-login side-effect chain tests.

use super::harness::{sample_record, server_fault, Harness};
use crate::{OrchestratorError, APP_ROOT};
use auth_transport::LoginResult;

#[tokio::test]
async fn empty_profile_link_skips_fetch_and_navigation() {
    let h = Harness::new();
    h.transport.queue_login(Ok(LoginResult {
        email: "user@example.com".into(),
        directory_profile_link: String::new(),
    }));

    h.orchestrator.submit().await.unwrap();

    assert!(h.transport.profile_fetches().is_empty());
    assert!(h.navigator.navigations().is_empty());
    assert_eq!(h.orchestrator.last_profile(), None);
}

#[tokio::test]
async fn successful_profile_fetch_navigates_to_root_exactly_once() {
    let h = Harness::new();

    h.orchestrator.submit().await.unwrap();

    assert_eq!(
        h.transport.profile_fetches(),
        vec!["/api/users/ldap?query=user".to_string()]
    );
    assert_eq!(h.navigator.navigations(), vec![APP_ROOT.to_string()]);
    assert_eq!(h.orchestrator.last_profile(), Some(vec![sample_record()]));
}

#[tokio::test]
async fn navigation_happens_even_for_an_empty_profile() {
    let h = Harness::new();
    h.transport.queue_profile(Ok(vec![]));

    h.orchestrator.submit().await.unwrap();

    assert_eq!(h.navigator.navigations(), vec![APP_ROOT.to_string()]);
    assert_eq!(h.orchestrator.last_profile(), Some(vec![]));
}

#[tokio::test]
async fn profile_fetch_failure_blocks_navigation() {
    let h = Harness::new();
    h.transport
        .queue_profile(Err(server_fault("/api/users/ldap?query=user")));

    let err = h.orchestrator.submit().await.unwrap_err();
    assert!(matches!(err, OrchestratorError::Transport(_)));

    assert!(h.navigator.navigations().is_empty());
    // The login itself still committed before the chain failed.
    assert!(h.orchestrator.last_login().is_some());
}

#[tokio::test]
async fn each_login_result_runs_the_chain_once() {
    let h = Harness::new();

    h.orchestrator.submit().await.unwrap();
    h.orchestrator.submit().await.unwrap();

    assert_eq!(h.transport.profile_fetches().len(), 2);
    assert_eq!(h.navigator.navigations().len(), 2);
}
