use std::sync::LazyLock;

use regex::Regex;

use super::ValidationError;

/// RFC 5321 path limit.
pub const MAX_EMAIL_LEN: usize = 254;

#[allow(clippy::expect_used)]
static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .expect("email pattern compiles")
});

/// Checks the shape of an invite target address.
///
/// Expects the canonical form (trimmed, lowercased); whitespace anywhere is
/// a format error.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() {
        return Err(ValidationError::EmailEmpty);
    }

    if email.len() > MAX_EMAIL_LEN {
        return Err(ValidationError::EmailTooLong);
    }

    if !EMAIL_REGEX.is_match(email) {
        return Err(ValidationError::EmailInvalidFormat);
    }

    Ok(())
}
