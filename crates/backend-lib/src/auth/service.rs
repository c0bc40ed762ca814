// ============================
// promptdesk-backend-lib/src/auth/service.rs
// ============================
use std::time::Duration;

use async_trait::async_trait;

use crate::error::AppError;
use crate::messages::{SessionInfo, UserInfo};

/// The seam between the HTTP layer and the authentication core. Handlers
/// depend on this trait, never on the stores behind it.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Verify credentials and mint a session token. Any failure surfaces as
    /// `InvalidCredentials`, whatever its cause.
    async fn login(&self, username: &str, password: &str) -> Result<String, AppError>;

    /// Resolve a bearer token to its username, refreshing the session.
    async fn validate(&self, token: &str) -> Result<String, AppError>;

    /// Drop the session for `token`; returns whether one was removed.
    async fn logout(&self, token: &str) -> bool;

    async fn session_count(&self) -> usize;

    async fn list_sessions(&self) -> Vec<SessionInfo>;

    async fn session_info(&self, token: &str) -> Option<UserInfo>;

    async fn sweep_expired(&self, max_age: Duration) -> usize;
}
