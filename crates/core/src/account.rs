//! Sign-up and token-exchange rules.
//!
//! A user signs up with a username and email, receives a random confirmation
//! code by mail, and trades `(username, confirmation_code)` for an access
//! token. The code lives in its own column and is compared in constant time.

use std::sync::LazyLock;

use rand::distr::Alphanumeric;
use rand::Rng;
use regex::Regex;

use crate::error::CoreError;

/// Username reserved for the "my account" endpoint (`/users/me`).
pub const RESERVED_USERNAME: &str = "me";

/// Maximum length for a username.
pub const MAX_USERNAME_LENGTH: usize = 150;

/// Maximum length for an email address.
pub const MAX_EMAIL_LENGTH: usize = 254;

/// Length of generated confirmation codes.
pub const CONFIRMATION_CODE_LENGTH: usize = 32;

/// Letters, digits and `@ . + - _`.
const USERNAME_PATTERN: &str = r"^[\w.@+-]+$";

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(USERNAME_PATTERN).expect("valid regex"));

/// Validate a username's shape: non-empty, bounded, allowed characters only.
pub fn validate_username(username: &str) -> Result<(), CoreError> {
    if username.is_empty() || username.chars().count() > MAX_USERNAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "Username must be between 1 and {MAX_USERNAME_LENGTH} characters"
        )));
    }
    if !USERNAME_RE.is_match(username) {
        return Err(CoreError::Validation(format!(
            "Invalid username '{username}'. Only letters, digits and @/./+/-/_ are allowed"
        )));
    }
    Ok(())
}

/// Validate a username requested at sign-up.
///
/// On top of [`validate_username`], the literal `"me"` is refused.
pub fn validate_signup_username(username: &str) -> Result<(), CoreError> {
    if username == RESERVED_USERNAME {
        return Err(CoreError::ReservedUsername(username.to_string()));
    }
    validate_username(username)
}

/// Generate a random alphanumeric confirmation code.
pub fn generate_confirmation_code() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(CONFIRMATION_CODE_LENGTH)
        .map(char::from)
        .collect()
}

/// Check a supplied confirmation code against the stored one.
pub fn verify_confirmation_code(supplied: &str, stored: &str) -> Result<(), CoreError> {
    if constant_time_eq(supplied.as_bytes(), stored.as_bytes()) {
        Ok(())
    } else {
        Err(CoreError::InvalidConfirmationCode)
    }
}

/// Byte comparison whose running time depends only on the longer input.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    let len_match = a.len() == b.len();
    let max_len = a.len().max(b.len());

    let mut diff = 0u8;
    for i in 0..max_len {
        let byte_a = a.get(i).copied().unwrap_or(0);
        let byte_b = b.get(i).copied().unwrap_or(0);
        diff |= byte_a ^ byte_b;
    }

    len_match && diff == 0
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn me_is_reserved() {
        assert_matches!(
            validate_signup_username("me"),
            Err(CoreError::ReservedUsername(name)) if name == "me"
        );
    }

    #[test]
    fn other_usernames_accepted() {
        for name in ["mee", "Me", "meme", "john.doe", "a+b@c-d_e"] {
            assert!(validate_signup_username(name).is_ok(), "{name} should be accepted");
        }
    }

    #[test]
    fn malformed_usernames_rejected() {
        assert!(validate_username("").is_err());
        assert!(validate_username("has space").is_err());
        assert!(validate_username("semi;colon").is_err());
        assert!(validate_username(&"u".repeat(MAX_USERNAME_LENGTH + 1)).is_err());
    }

    #[test]
    fn generated_codes_are_alphanumeric_and_distinct() {
        let a = generate_confirmation_code();
        let b = generate_confirmation_code();
        assert_eq!(a.len(), CONFIRMATION_CODE_LENGTH);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(a, b);
    }

    #[test]
    fn matching_code_accepted() {
        assert!(verify_confirmation_code("abc123", "abc123").is_ok());
    }

    #[test]
    fn wrong_code_rejected() {
        assert_matches!(
            verify_confirmation_code("abc124", "abc123"),
            Err(CoreError::InvalidConfirmationCode)
        );
        assert_matches!(
            verify_confirmation_code("abc12", "abc123"),
            Err(CoreError::InvalidConfirmationCode)
        );
        assert_matches!(
            verify_confirmation_code("", "abc123"),
            Err(CoreError::InvalidConfirmationCode)
        );
    }

    #[test]
    fn comparison_is_exact() {
        assert!(verify_confirmation_code("ABC123", "abc123").is_err());
        assert!(verify_confirmation_code("abc123 ", "abc123").is_err());
    }
}
