// ============================
// promptdesk-backend-lib/src/auth/service_impl.rs
// ============================
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use metrics::counter;
use tracing::{info, warn};

use crate::auth::{AuthService, CredentialStore, SessionManager};
use crate::error::AppError;
use crate::messages::{SessionInfo, UserInfo};
use crate::metrics as keys;

pub struct DefaultAuth {
    credentials: Arc<CredentialStore>,
    sessions: SessionManager,
}

impl DefaultAuth {
    pub fn new(credentials: Arc<CredentialStore>, sessions: SessionManager) -> Self {
        Self {
            credentials,
            sessions,
        }
    }
}

#[async_trait]
impl AuthService for DefaultAuth {
    async fn login(&self, username: &str, password: &str) -> Result<String, AppError> {
        // The scrypt work runs before any session-map lock is taken; the
        // credential store and session map are independent critical sections.
        if !self.credentials.verify(username, password) {
            counter!(keys::LOGIN_FAILURE).increment(1);
            warn!(user = %username, "login_failure");
            return Err(AppError::InvalidCredentials);
        }

        let token = self.sessions.create_session(username).await;
        counter!(keys::LOGIN_SUCCESS).increment(1);
        info!(user = %username, "login_success");
        Ok(token)
    }

    async fn validate(&self, token: &str) -> Result<String, AppError> {
        self.sessions.validate(token).await
    }

    async fn logout(&self, token: &str) -> bool {
        self.sessions.remove(token).await
    }

    async fn session_count(&self) -> usize {
        self.sessions.count().await
    }

    async fn list_sessions(&self) -> Vec<SessionInfo> {
        self.sessions.list().await
    }

    async fn session_info(&self, token: &str) -> Option<UserInfo> {
        self.sessions.info(token).await
    }

    async fn sweep_expired(&self, max_age: Duration) -> usize {
        self.sessions.sweep_expired(max_age).await
    }
}
