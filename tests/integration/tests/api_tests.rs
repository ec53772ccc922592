//! REST client integration tests
//!
//! Run with: cargo test -p integration-tests --test api_tests

use std::sync::atomic::Ordering;
use std::sync::Arc;

use adigo_api::dto::LoginRequest;
use adigo_cache::UserStore;
use adigo_common::{MemoryTokenStore, TokenStore};
use adigo_core::UserRepository;
use integration_tests::{FakeApi, TEST_EMAIL, TEST_PASSWORD};

// ============================================================================
// Login
// ============================================================================

#[tokio::test]
async fn test_login_saves_tokens() {
    let server = FakeApi::start().await.expect("Failed to start server");
    let api = server.client().unwrap();

    let pair = api
        .login(&LoginRequest::new(TEST_EMAIL, TEST_PASSWORD))
        .await
        .unwrap();

    assert_eq!(pair.access_token, "access-1");
    assert_eq!(api.token_store().access_token().as_deref(), Some("access-1"));
    assert_eq!(api.token_store().refresh_token().as_deref(), Some("refresh-1"));

    let me = api.me().await.unwrap();
    assert_eq!(me.nickname, "tester");
}

#[tokio::test]
async fn test_login_wrong_password() {
    let server = FakeApi::start().await.expect("Failed to start server");
    let api = server.client().unwrap();

    let err = api
        .login(&LoginRequest::new(TEST_EMAIL, "nope"))
        .await
        .unwrap_err();

    assert!(err.is_unauthorized());
    assert!(api.token_store().access_token().is_none());
    assert_eq!(server.state.reissues(), 0);
}

#[tokio::test]
async fn test_login_validation_happens_locally() {
    let server = FakeApi::start().await.expect("Failed to start server");
    let api = server.client().unwrap();

    let err = api
        .login(&LoginRequest::new("not-an-email", TEST_PASSWORD))
        .await
        .unwrap_err();

    assert!(matches!(err, adigo_api::ApiError::Validation(_)));
    assert!(api.token_store().access_token().is_none());
}

// ============================================================================
// Token refresh
// ============================================================================

#[tokio::test]
async fn test_stale_access_is_refreshed_and_retried() {
    let server = FakeApi::start().await.expect("Failed to start server");
    let api = server.client().unwrap();
    api.login(&LoginRequest::new(TEST_EMAIL, TEST_PASSWORD))
        .await
        .unwrap();

    server.state.expire_access();
    let friends = api.friends().await.unwrap();

    assert_eq!(friends.len(), 2);
    assert_eq!(friends[0].nickname, "minji");
    assert_eq!(server.state.reissues(), 1);
    assert_eq!(
        api.token_store().access_token(),
        Some(server.state.current_access())
    );
    // first attempt rejected, retry accepted
    assert_eq!(server.state.protected_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_concurrent_unauthorized_refresh_once() {
    let server = FakeApi::start().await.expect("Failed to start server");
    let store = Arc::new(MemoryTokenStore::with_tokens(server.state.issue_pair()));
    let api = server.client_with_store(store.clone()).unwrap();

    server.state.expire_access();
    let (friends, me) = tokio::join!(api.friends(), api.me());

    assert!(friends.is_ok());
    assert!(me.is_ok());
    assert_eq!(server.state.reissues(), 1);
    assert_eq!(store.access_token().as_deref(), Some("access-2"));
}

#[tokio::test]
async fn test_rejected_refresh_surfaces_unauthorized() {
    let server = FakeApi::start().await.expect("Failed to start server");
    let api = server
        .client_with_store(Arc::new(MemoryTokenStore::with_tokens(
            server.state.issue_pair(),
        )))
        .unwrap();

    server.state.revoke_session();
    let err = api.friends().await.unwrap_err();

    assert!(err.is_unauthorized());
    assert_eq!(server.state.reissues(), 1);
}

#[tokio::test]
async fn test_reissue_without_session() {
    let server = FakeApi::start().await.expect("Failed to start server");
    let api = server.client().unwrap();

    assert!(api.reissue().await.is_none());
    assert_eq!(server.state.reissues(), 0);
}

// ============================================================================
// Cache
// ============================================================================

#[tokio::test]
async fn test_friend_list_mirrors_into_cache() {
    let server = FakeApi::start().await.expect("Failed to start server");
    let api = server.client().unwrap();
    api.login(&LoginRequest::new(TEST_EMAIL, TEST_PASSWORD))
        .await
        .unwrap();

    let users = UserStore::new();
    users.replace_all(api.friends().await.unwrap()).await.unwrap();

    let cached = users.find_by_id(9).await.unwrap().unwrap();
    assert_eq!(cached.nickname, "jisoo");
    assert_eq!(
        users.find_by_email("MINJI@adigo.site").await.unwrap().map(|u| u.id),
        Some(7)
    );
}
