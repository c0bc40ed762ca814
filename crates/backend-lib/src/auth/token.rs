// ============================
// promptdesk-backend-lib/src/auth/token.rs
// ============================
//! Secure session token generation.
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::{rngs::OsRng, RngCore};

/// Default token size in bytes (32 bytes = 256 bits of entropy)
const DEFAULT_TOKEN_BYTES: usize = 32;

/// Generate a cryptographically secure random token.
///
/// Uses OS-provided entropy; the result is base64 URL-safe encoded without
/// padding and carries 256 bits of randomness.
pub fn generate_secure_token() -> String {
    generate_secure_token_with_size(DEFAULT_TOKEN_BYTES)
}

/// Generate a cryptographically secure random token with the given width.
pub fn generate_secure_token_with_size(bytes: usize) -> String {
    let mut buffer = vec![0u8; bytes];
    OsRng.fill_bytes(&mut buffer);
    URL_SAFE_NO_PAD.encode(buffer)
}
