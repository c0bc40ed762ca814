// ============================
// promptdesk-backend-lib/tests/auth_flow.rs
// ============================
//! End-to-end exercises of the authentication seam.
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use promptdesk_backend_lib::auth::{AuthService, CredentialStore, DefaultAuth, SessionManager};
use promptdesk_backend_lib::AppError;

fn auth_with_demo_user() -> DefaultAuth {
    let store = CredentialStore::new();
    store.add_user("demo", "demo123").unwrap();
    DefaultAuth::new(Arc::new(store), SessionManager::new())
}

#[tokio::test]
async fn test_login_validate_logout_round_trip() {
    let auth = auth_with_demo_user();

    let token = auth.login("demo", "demo123").await.unwrap();
    assert_eq!(auth.validate(&token).await.unwrap(), "demo");

    assert!(auth.logout(&token).await);
    assert!(matches!(
        auth.validate(&token).await.unwrap_err(),
        AppError::Unauthenticated
    ));

    // Logging out an already-dead token is not an error
    assert!(!auth.logout(&token).await);
}

#[tokio::test]
async fn test_login_failures_are_uniform() {
    let auth = auth_with_demo_user();

    // Wrong password and unknown user produce the same error
    let wrong_password = auth.login("demo", "nope").await.unwrap_err();
    let unknown_user = auth.login("ghost", "demo123").await.unwrap_err();

    assert!(matches!(wrong_password, AppError::InvalidCredentials));
    assert!(matches!(unknown_user, AppError::InvalidCredentials));
    assert_eq!(wrong_password.to_string(), unknown_user.to_string());

    assert_eq!(auth.session_count().await, 0);
}

#[tokio::test]
async fn test_tokens_are_unique_across_logins() {
    let auth = auth_with_demo_user();

    let mut seen = HashSet::new();
    for _ in 0..5 {
        let token = auth.login("demo", "demo123").await.unwrap();
        assert!(seen.insert(token), "token reissued");
    }

    assert_eq!(auth.session_count().await, 5);
}

#[tokio::test]
async fn test_session_count_accounting() {
    let auth = auth_with_demo_user();

    let first = auth.login("demo", "demo123").await.unwrap();
    assert_eq!(auth.session_count().await, 1);

    let second = auth.login("demo", "demo123").await.unwrap();
    assert_eq!(auth.session_count().await, 2);

    auth.logout(&first).await;
    assert_eq!(auth.session_count().await, 1);

    auth.logout(&second).await;
    assert_eq!(auth.session_count().await, 0);
}

#[tokio::test]
async fn test_password_rotation_keeps_sessions() {
    let store = Arc::new(CredentialStore::new());
    store.add_user("demo", "demo123").unwrap();
    let auth = DefaultAuth::new(store.clone(), SessionManager::new());

    let token = auth.login("demo", "demo123").await.unwrap();

    store.set_password("demo", "rotated-secret").unwrap();

    // Sessions are independent of credential state after issuance
    assert_eq!(auth.validate(&token).await.unwrap(), "demo");

    // New logins only succeed against the new password
    assert!(auth.login("demo", "demo123").await.is_err());
    assert!(auth.login("demo", "rotated-secret").await.is_ok());
}

#[tokio::test]
async fn test_list_and_info() {
    let auth = auth_with_demo_user();
    let token = auth.login("demo", "demo123").await.unwrap();

    let sessions = auth.list_sessions().await;
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].username, "demo");

    let info = auth.session_info(&token).await.unwrap();
    assert_eq!(info.username, "demo");
    assert!(auth.session_info("unknown").await.is_none());
}

#[tokio::test]
async fn test_sweep_leaves_fresh_sessions() {
    let auth = auth_with_demo_user();
    auth.login("demo", "demo123").await.unwrap();

    let evicted = auth.sweep_expired(Duration::from_secs(60 * 60)).await;
    assert_eq!(evicted, 0);
    assert_eq!(auth.session_count().await, 1);
}
