//! Cryptographic primitives behind invite tokens.
//!
//! Two operations only: draw high-entropy bytes from the operating system and
//! digest token text for storage. Invite tokens are long random strings, so a
//! fast hash like SHA-256 is sufficient; no salt or key stretching applies.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngCore;
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};

use crate::AuthError;

/// Fills `len` bytes from the OS random source and encodes them as unpadded
/// URL-safe base64 (`A-Z a-z 0-9 - _`).
///
/// There is no fallback generator: if the OS source fails, the error is
/// returned as [`AuthError::ConfigurationError`].
pub fn random_url_safe(len: usize) -> Result<String, AuthError> {
    encode_random(&mut OsRng, len)
}

fn encode_random<R: RngCore>(rng: &mut R, len: usize) -> Result<String, AuthError> {
    let mut bytes = vec![0u8; len];
    rng.try_fill_bytes(&mut bytes).map_err(|e| {
        log::error!(
            target: "tipgate",
            "msg=\"secure random source unavailable\", error=\"{e}\""
        );
        AuthError::ConfigurationError(format!("secure random source unavailable: {e}"))
    })?;

    Ok(URL_SAFE_NO_PAD.encode(&bytes))
}

/// SHA-256 of `input`, lowercase hex (64 characters).
pub fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}
