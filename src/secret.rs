//! Redacting wrapper for invite tokens and other plaintext credentials.

use std::fmt;

use serde::{Serialize, Serializer};

/// Plaintext credential that never shows up in `Debug` or `Display` output.
///
/// Invite tokens are handed to the issuer exactly once and are otherwise only
/// ever held as their SHA-256 digest. Wrapping them keeps them out of log
/// lines and panic messages on the way.
///
/// ```rust
/// use tipgate::SecretString;
///
/// let token = SecretString::new("bdi1.email.c2VjcmV0");
/// assert_eq!(format!("{token:?}"), "SecretString([REDACTED])");
/// assert_eq!(token.expose_secret(), "bdi1.email.c2VjcmV0");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct SecretString(String);

impl SecretString {
    #[must_use]
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Exposes the plaintext. Call sites should hash or transmit it, not log it.
    #[must_use]
    pub fn expose_secret(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretString([REDACTED])")
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl From<String> for SecretString {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SecretString {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl Serialize for SecretString {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // issuance responses carry the token to its only legitimate reader
        serializer.serialize_str(&self.0)
    }
}
