// ============================
// promptdesk-backend-lib/src/auth/session.rs
// ============================
//! Session token handling and management.
use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, SystemTime},
};

use metrics::{counter, gauge};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::info;

use crate::auth::token::generate_secure_token;
use crate::error::AppError;
use crate::messages::{SessionInfo, UserInfo};
use crate::metrics as keys;

/// Maximum session age: a session's absolute lifetime is capped at 24 hours
/// from creation, however actively it is used.
pub const SESSION_TTL: Duration = Duration::from_secs(60 * 60 * 24);

/// Session information
#[derive(Clone)]
pub struct Session {
    pub username: String,
    pub created_at: SystemTime,
    pub last_activity: SystemTime,
}

/// Session manager for handling authentication tokens.
///
/// Exclusively owns the token -> session map; everything else goes through
/// these methods. A single write lock serializes all mutations.
#[derive(Clone)]
pub struct SessionManager {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
    max_age: Duration,
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionManager {
    /// Create a new session manager with the default 24-hour TTL.
    pub fn new() -> Self {
        Self::with_max_age(SESSION_TTL)
    }

    /// Create a new session manager with a custom maximum session age.
    pub fn with_max_age(max_age: Duration) -> Self {
        SessionManager {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            max_age,
        }
    }

    /// Mint a session for `username` and return its token.
    ///
    /// The token is regenerated until it collides with no live token, under
    /// the same write lock as the insert.
    pub async fn create_session(&self, username: &str) -> String {
        let now = SystemTime::now();
        let mut sessions = self.sessions.write().await;

        let token = loop {
            let candidate = generate_secure_token();
            if !sessions.contains_key(&candidate) {
                break candidate;
            }
        };

        sessions.insert(
            token.clone(),
            Session {
                username: username.to_string(),
                created_at: now,
                last_activity: now,
            },
        );

        counter!(keys::SESSION_CREATED).increment(1);
        gauge!(keys::SESSION_ACTIVE).set(sessions.len() as f64);

        token
    }

    /// Validate a token and resolve it to its username.
    ///
    /// Unknown tokens fail with `Unauthenticated`. Tokens older than the
    /// maximum age are evicted in the same critical section and fail with
    /// `SessionExpired`; a retry then sees `Unauthenticated`. On success
    /// `last_activity` is refreshed. `created_at` never moves, so absolute
    /// age governs expiry regardless of activity.
    pub async fn validate(&self, token: &str) -> Result<String, AppError> {
        let now = SystemTime::now();
        let mut sessions = self.sessions.write().await;

        let expired = {
            let Some(session) = sessions.get(token) else {
                return Err(AppError::Unauthenticated);
            };
            now.duration_since(session.created_at).unwrap_or_default() > self.max_age
        };

        if expired {
            if let Some(session) = sessions.remove(token) {
                counter!(keys::SESSION_EXPIRED).increment(1);
                gauge!(keys::SESSION_ACTIVE).set(sessions.len() as f64);
                info!(user = %session.username, "session_expired");
            }
            return Err(AppError::SessionExpired);
        }

        let session = sessions.get_mut(token).ok_or(AppError::Unauthenticated)?;
        session.last_activity = now;
        Ok(session.username.clone())
    }

    /// Remove a session. Idempotent: removing an absent token just returns
    /// false.
    pub async fn remove(&self, token: &str) -> bool {
        let mut sessions = self.sessions.write().await;
        let removed = sessions.remove(token).is_some();
        if removed {
            gauge!(keys::SESSION_ACTIVE).set(sessions.len() as f64);
        }
        removed
    }

    /// Current live-session count.
    pub async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Token-free view of all live sessions.
    pub async fn list(&self) -> Vec<SessionInfo> {
        let sessions = self.sessions.read().await;
        sessions
            .values()
            .map(|session| SessionInfo {
                username: session.username.clone(),
                created_at: session.created_at.into(),
                last_activity: session.last_activity.into(),
            })
            .collect()
    }

    /// Session details for one token, if it is live.
    pub async fn info(&self, token: &str) -> Option<UserInfo> {
        let sessions = self.sessions.read().await;
        let session = sessions.get(token)?;

        let created: chrono::DateTime<chrono::Utc> = session.created_at.into();
        let elapsed = SystemTime::now()
            .duration_since(session.created_at)
            .unwrap_or_default();

        Some(UserInfo {
            username: session.username.clone(),
            login_time: created.format("%Y-%m-%d %H:%M:%S").to_string(),
            session_duration: format_duration(elapsed),
        })
    }

    /// Evict every session strictly older than `max_age` by `created_at`
    /// and return the eviction count.
    pub async fn sweep_expired(&self, max_age: Duration) -> usize {
        let now = SystemTime::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();

        sessions.retain(|_, session| {
            now.duration_since(session.created_at).unwrap_or_default() <= max_age
        });

        let evicted = before - sessions.len();
        if evicted > 0 {
            counter!(keys::SESSION_EVICTED).increment(evicted as u64);
            gauge!(keys::SESSION_ACTIVE).set(sessions.len() as f64);
            info!(evicted, "session_evicted");
        }
        evicted
    }

    /// Spawn the periodic sweep. Runs independently of request traffic so
    /// abandoned sessions cannot accumulate; takes the same write lock as
    /// the request path.
    pub fn spawn_sweeper(&self, interval: Duration, max_age: Duration) -> JoinHandle<()> {
        let manager = self.clone();
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(interval).await;
                manager.sweep_expired(max_age).await;
            }
        })
    }
}

fn format_duration(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Rewind a session's creation time; expiry is a function of
    /// `created_at`, so this stands in for the passage of time.
    async fn backdate(manager: &SessionManager, token: &str, age: Duration) {
        let mut sessions = manager.sessions.write().await;
        let session = sessions.get_mut(token).expect("session exists");
        session.created_at = SystemTime::now() - age;
    }

    const HOUR: Duration = Duration::from_secs(60 * 60);

    #[tokio::test]
    async fn test_validate_resolves_username() {
        let manager = SessionManager::new();
        let token = manager.create_session("demo").await;

        assert_eq!(manager.validate(&token).await.unwrap(), "demo");
    }

    #[tokio::test]
    async fn test_validate_unknown_token() {
        let manager = SessionManager::new();
        let err = manager.validate("never-issued").await.unwrap_err();
        assert!(matches!(err, AppError::Unauthenticated));
    }

    #[tokio::test]
    async fn test_validate_refreshes_last_activity_only() {
        let manager = SessionManager::new();
        let token = manager.create_session("demo").await;
        backdate(&manager, &token, HOUR).await;

        let created_before = manager.sessions.read().await[&token].created_at;
        manager.validate(&token).await.unwrap();

        let sessions = manager.sessions.read().await;
        let session = &sessions[&token];
        assert_eq!(session.created_at, created_before);
        assert!(session.last_activity > session.created_at);
    }

    #[tokio::test]
    async fn test_expired_session_is_evicted_on_validate() {
        let manager = SessionManager::new();
        let token = manager.create_session("demo").await;
        backdate(&manager, &token, 25 * HOUR).await;

        let err = manager.validate(&token).await.unwrap_err();
        assert!(matches!(err, AppError::SessionExpired));

        // The record is gone: a second validate no longer knows the token.
        let err = manager.validate(&token).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthenticated));
        assert_eq!(manager.count().await, 0);
    }

    #[tokio::test]
    async fn test_activity_does_not_extend_lifetime() {
        let manager = SessionManager::new();
        let token = manager.create_session("demo").await;

        // Recently used but created 25h ago: still expired.
        backdate(&manager, &token, 25 * HOUR).await;
        manager.sessions.write().await.get_mut(&token).unwrap().last_activity =
            SystemTime::now();

        let err = manager.validate(&token).await.unwrap_err();
        assert!(matches!(err, AppError::SessionExpired));
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let manager = SessionManager::new();
        let token = manager.create_session("demo").await;

        assert!(manager.remove(&token).await);
        assert!(!manager.remove(&token).await);

        let err = manager.validate(&token).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthenticated));
    }

    #[tokio::test]
    async fn test_count_tracks_logins_and_logouts() {
        let manager = SessionManager::new();
        assert_eq!(manager.count().await, 0);

        let first = manager.create_session("demo").await;
        let second = manager.create_session("admin").await;
        assert_eq!(manager.count().await, 2);

        manager.remove(&first).await;
        assert_eq!(manager.count().await, 1);
        manager.remove(&second).await;
        assert_eq!(manager.count().await, 0);
    }

    #[tokio::test]
    async fn test_sweep_evicts_only_old_sessions() {
        let manager = SessionManager::new();

        let ages = [1, 23, 25, 48];
        let mut tokens = Vec::new();
        for age in ages {
            let token = manager.create_session(&format!("user-{age}h")).await;
            backdate(&manager, &token, age * HOUR).await;
            tokens.push(token);
        }

        let evicted = manager.sweep_expired(24 * HOUR).await;
        assert_eq!(evicted, 2);
        assert_eq!(manager.count().await, 2);

        assert_eq!(manager.validate(&tokens[0]).await.unwrap(), "user-1h");
        assert_eq!(manager.validate(&tokens[1]).await.unwrap(), "user-23h");
        assert!(manager.validate(&tokens[2]).await.is_err());
        assert!(manager.validate(&tokens[3]).await.is_err());
    }

    #[tokio::test]
    async fn test_list_exposes_no_tokens() {
        let manager = SessionManager::new();
        let token = manager.create_session("demo").await;

        let listed = manager.list().await;
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].username, "demo");

        // The serialized admin view must not contain the bearer token.
        let json = serde_json::to_string(&listed).unwrap();
        assert!(!json.contains(&token));
    }

    #[tokio::test]
    async fn test_info_reports_duration() {
        let manager = SessionManager::new();
        let token = manager.create_session("demo").await;
        backdate(&manager, &token, HOUR).await;

        let info = manager.info(&token).await.unwrap();
        assert_eq!(info.username, "demo");
        assert!(info.session_duration.starts_with("1:00"));

        assert!(manager.info("unknown").await.is_none());
    }
}
