//! Core password storage scheme abstraction following RFC 3112. A scheme is a
//! named pair of encode and verify operations over raw bytes; the envelope and
//! registry layers stay free of algorithm internals so new schemes plug in
//! without touching the wire format.

use rand::rngs::OsRng;
use rand::RngCore;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemeError {
    #[error("password not matching")]
    PasswordMismatch,
    #[error("invalid password storage syntax")]
    InvalidSyntax,
    #[error("unknown password storage scheme: {0}")]
    UnknownScheme(String),
    #[error("encoded password uses scheme {found}, expected {expected}")]
    SchemeMismatch { expected: String, found: String },
    #[error("payload decoding failed: {0}")]
    Decoding(String),
    #[error("hash primitive failed: {0}")]
    Hashing(String),
    #[error("salt generation failed: {0}")]
    Rng(String),
}

/// A password storage scheme: one hashing or storage strategy with a stable
/// RFC 3112 name. Implementations are immutable once constructed and may be
/// shared freely across threads.
pub trait Scheme: Send + Sync {
    /// Scheme name; must consist of `0-9`, `A-Z`, `a-z`, `-`, `.`, `/` or `_`.
    /// Names are compared case-insensitively everywhere.
    fn name(&self) -> &str;

    /// Produces the raw (pre-base64) payload for a plaintext password.
    fn encode(&self, plain: &[u8]) -> Result<Vec<u8>, SchemeError>;

    /// Checks a plaintext password against a raw payload previously produced
    /// by [`Scheme::encode`]. `Ok(())` means the password matches.
    fn verify(&self, plain: &[u8], raw: &[u8]) -> Result<(), SchemeError>;
}

/// Normalizes a scheme name for comparison; RFC 3112 compares names
/// case-insensitively, so the registry keys them upper-cased.
pub fn normalize_name(name: &str) -> String {
    name.to_ascii_uppercase()
}

/// Returns true when the name is non-empty and stays within the RFC 3112
/// scheme-name alphabet.
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '/' | '_'))
}

/// Draws `len` bytes from the operating system CSPRNG. A failing CSPRNG is
/// fatal for password encoding, so the error is surfaced instead of retried.
pub(crate) fn generate_salt(len: usize) -> Result<Vec<u8>, SchemeError> {
    let mut salt = vec![0u8; len];
    OsRng
        .try_fill_bytes(&mut salt)
        .map_err(|e| SchemeError::Rng(format!("{e}")))?;
    Ok(salt)
}
