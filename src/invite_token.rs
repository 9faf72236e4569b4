//! Invite token format: issue, normalize, parse and hash.
//!
//! A token is `version.kind.secret`:
//!
//! - `version` is [`TOKEN_VERSION`]; changing it, or [`TOKEN_SEPARATOR`], is a
//!   breaking format change.
//! - `kind` is `email` or `link`.
//! - `secret` is at least [`MIN_SECRET_BYTES`] random bytes encoded as
//!   unpadded URL-safe base64, an alphabet that never contains the separator.
//!
//! The whole token is safe in a URL path segment (`/join/{token}`). Only its
//! [`hash`] is ever persisted.
//!
//! ```rust
//! use tipgate::invite_token::{self, InviteKind};
//!
//! let token = invite_token::create_token(InviteKind::Link).unwrap();
//! let parsed = invite_token::parse(token.expose_secret()).unwrap();
//! assert_eq!(parsed.kind, InviteKind::Link);
//!
//! assert!(invite_token::parse("raw-token").is_none());
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::crypto::{random_url_safe, sha256_hex};
use crate::{AuthError, SecretString};

/// Format version tag; the first field of every token.
pub const TOKEN_VERSION: &str = "bdi1";

/// Field separator. Absent from the version tag, both kind tags and the
/// URL-safe base64 alphabet.
pub const TOKEN_SEPARATOR: char = '.';

/// Floor on secret entropy, in bytes before encoding.
pub const MIN_SECRET_BYTES: usize = 24;

/// Secret size used by [`create_token`].
pub const DEFAULT_SECRET_BYTES: usize = 32;

/// How an invite is bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InviteKind {
    /// Bound to one invitee's verified email address; consumed once.
    Email,
    /// Shareable; bounded by max uses and expiry.
    Link,
}

impl InviteKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Link => "link",
        }
    }

    /// Exact match only.
    pub fn from_name(s: &str) -> Option<Self> {
        match s {
            "email" => Some(Self::Email),
            "link" => Some(Self::Link),
            _ => None,
        }
    }
}

impl fmt::Display for InviteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structural view of a well-formed token.
///
/// The secret is kept redacted; it has no use beyond being hashed as part of
/// the whole token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedInviteToken {
    pub version: &'static str,
    pub kind: InviteKind,
    pub secret: SecretString,
}

/// Issues a new token of `kind` with a [`DEFAULT_SECRET_BYTES`] secret.
///
/// # Errors
///
/// [`AuthError::ConfigurationError`] if the OS random source is unavailable.
pub fn create_token(kind: InviteKind) -> Result<SecretString, AuthError> {
    create_token_with_len(kind, DEFAULT_SECRET_BYTES)
}

/// Like [`create_token`] with an explicit secret size. Sizes below
/// [`MIN_SECRET_BYTES`] are raised to it.
pub fn create_token_with_len(
    kind: InviteKind,
    secret_bytes: usize,
) -> Result<SecretString, AuthError> {
    let secret = random_url_safe(secret_bytes.max(MIN_SECRET_BYTES))?;

    Ok(SecretString::new(format!(
        "{TOKEN_VERSION}{TOKEN_SEPARATOR}{kind}{TOKEN_SEPARATOR}{secret}"
    )))
}

/// Strips surrounding whitespace. Idempotent.
pub fn normalize(raw: &str) -> &str {
    raw.trim()
}

/// Validates token structure and vocabulary.
///
/// Returns `None` for empty input, anything other than exactly three
/// `.`-separated fields, an unsupported version, an unknown kind or an empty
/// secret. No fuzzy matching: this runs before any store lookup and rejects
/// guesses cheaply.
pub fn parse(raw: &str) -> Option<ParsedInviteToken> {
    let token = normalize(raw);
    if token.is_empty() {
        return None;
    }

    let mut fields = token.split(TOKEN_SEPARATOR);
    let (version, kind, secret) = (fields.next()?, fields.next()?, fields.next()?);
    if fields.next().is_some() {
        return None;
    }

    if version != TOKEN_VERSION || secret.is_empty() {
        return None;
    }
    let kind = InviteKind::from_name(kind)?;

    Some(ParsedInviteToken {
        version: TOKEN_VERSION,
        kind,
        secret: SecretString::new(secret),
    })
}

/// Storage key for a token: SHA-256 of the normalized text, lowercase hex.
pub fn hash(raw: &str) -> String {
    sha256_hex(normalize(raw))
}
