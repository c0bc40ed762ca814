// ============================
// promptdesk-backend-lib/src/validation.rs
// ============================
//! Input validation.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::AppError;

const MIN_USERNAME_LENGTH: usize = 3;
const MAX_USERNAME_LENGTH: usize = 32;

static USERNAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").unwrap());

/// Validate a username: 3-32 characters, alphanumeric plus `_` and `-`.
pub fn validate_username(username: &str) -> Result<&str, AppError> {
    if username.len() < MIN_USERNAME_LENGTH || username.len() > MAX_USERNAME_LENGTH {
        return Err(AppError::InvalidInput(format!(
            "username must be between {MIN_USERNAME_LENGTH} and {MAX_USERNAME_LENGTH} characters"
        )));
    }

    if !USERNAME_REGEX.is_match(username) {
        return Err(AppError::InvalidInput(
            "username must contain only alphanumeric characters, underscores and hyphens"
                .to_string(),
        ));
    }

    Ok(username)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_username() {
        assert!(validate_username("demo").is_ok());
        assert!(validate_username("demo_user-2").is_ok());

        assert!(matches!(
            validate_username(""),
            Err(AppError::InvalidInput(_))
        ));
        assert!(matches!(
            validate_username("ab"),
            Err(AppError::InvalidInput(_))
        ));
        assert!(matches!(
            validate_username(&"a".repeat(33)),
            Err(AppError::InvalidInput(_))
        ));
        assert!(matches!(
            validate_username("demo user"),
            Err(AppError::InvalidInput(_))
        ));
        assert!(matches!(
            validate_username("demo@host"),
            Err(AppError::InvalidInput(_))
        ));
    }
}
