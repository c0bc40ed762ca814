// ============================
// promptdesk-backend-lib/src/lib.rs
// ============================
//! Core backend-lib functionality for the `PromptDesk` chat assistant server.

pub mod auth;
pub mod config;
pub mod error;
pub mod llm;
pub mod messages;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod validation;

use std::sync::Arc;
use std::time::Duration;

use crate::auth::{AuthRateLimiter, AuthService, CredentialStore, DefaultAuth, SessionManager};
use crate::config::Settings;
use crate::llm::LlmService;

pub use crate::error::AppError;
pub use crate::routes::create_router;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Authentication service
    pub auth: Arc<dyn AuthService>,
    /// Session manager
    pub sessions: Arc<SessionManager>,
    /// Inference proxy
    pub llm: Arc<LlmService>,
    /// Settings
    pub settings: Arc<Settings>,
    /// Login attempt limiter
    pub login_limiter: Arc<AuthRateLimiter>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// The session manager and auth service are constructed here, once per
    /// process, and handed to the HTTP layer by reference. Nothing in the
    /// crate reaches for them through a global.
    pub fn new(credentials: CredentialStore, llm: LlmService, settings: Settings) -> Self {
        let sessions = SessionManager::with_max_age(Duration::from_secs(settings.session_ttl_secs));
        let auth: Arc<dyn AuthService> =
            Arc::new(DefaultAuth::new(Arc::new(credentials), sessions.clone()));

        Self {
            auth,
            sessions: Arc::new(sessions),
            llm: Arc::new(llm),
            settings: Arc::new(settings),
            login_limiter: Arc::new(AuthRateLimiter::default()),
        }
    }
}
