// ============================
// promptdesk-backend-lib/src/middleware/mod.rs
// ============================

//! Middleware for the `PromptDesk` HTTP layer.

pub mod auth;

pub use auth::{bearer_token, require_session, AuthedUser};
