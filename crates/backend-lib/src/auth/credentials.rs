// ============================
// promptdesk-backend-lib/src/auth/credentials.rs
// ============================
//! In-memory credential store: username -> salted scrypt hash.
use std::collections::HashMap;
use std::sync::LazyLock;

use parking_lot::RwLock;

use crate::auth::password::{
    hash_password, validate_password_strength, verify_password, PasswordRequirements,
};
use crate::error::AppError;
use crate::validation::validate_username;

/// Hash verified against when the username is unknown, so that a failed
/// login costs the same scrypt work whether or not the user exists.
static DUMMY_HASH: LazyLock<String> =
    LazyLock::new(|| hash_password("promptdesk-timing-pad").expect("scrypt with default params"));

/// Maps usernames to password hashes. Plaintext passwords are hashed on the
/// way in and never stored or logged; hashing always happens outside the
/// map lock.
pub struct CredentialStore {
    users: RwLock<HashMap<String, String>>,
    requirements: PasswordRequirements,
}

impl Default for CredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialStore {
    pub fn new() -> Self {
        Self::with_requirements(PasswordRequirements::default())
    }

    pub fn with_requirements(requirements: PasswordRequirements) -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            requirements,
        }
    }

    /// Check a plaintext password against the stored hash for `username`.
    ///
    /// Unknown usernames still pay for a scrypt verification against
    /// [`DUMMY_HASH`], keeping failure latency independent of whether the
    /// user exists.
    pub fn verify(&self, username: &str, password: &str) -> bool {
        let stored = self.users.read().get(username).cloned();

        match stored {
            Some(hash) => verify_password(&hash, password),
            None => {
                let _ = verify_password(&DUMMY_HASH, password);
                false
            },
        }
    }

    /// Register a new user. Fails with `AlreadyExists` on a duplicate
    /// username.
    pub fn add_user(&self, username: &str, password: &str) -> Result<(), AppError> {
        validate_username(username)?;
        if !validate_password_strength(password, &self.requirements) {
            return Err(AppError::InvalidInput(
                "password does not meet the configured requirements".to_string(),
            ));
        }

        let hash = hash_password(password).map_err(|e| AppError::Internal(e.to_string()))?;

        let mut users = self.users.write();
        if users.contains_key(username) {
            return Err(AppError::AlreadyExists(username.to_string()));
        }
        users.insert(username.to_string(), hash);
        Ok(())
    }

    /// Rotate the password of an existing user. This is pure rotation:
    /// unknown usernames fail with `NotFound` rather than being created.
    /// Existing sessions are untouched.
    pub fn set_password(&self, username: &str, password: &str) -> Result<(), AppError> {
        if !validate_password_strength(password, &self.requirements) {
            return Err(AppError::InvalidInput(
                "password does not meet the configured requirements".to_string(),
            ));
        }

        let hash = hash_password(password).map_err(|e| AppError::Internal(e.to_string()))?;

        let mut users = self.users.write();
        match users.get_mut(username) {
            Some(slot) => {
                *slot = hash;
                Ok(())
            },
            None => Err(AppError::NotFound(username.to_string())),
        }
    }

    pub fn contains(&self, username: &str) -> bool {
        self.users.read().contains_key(username)
    }

    pub fn len(&self) -> usize {
        self.users.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.read().is_empty()
    }
}
