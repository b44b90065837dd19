//! The authPassword syntax envelope: `{SCHEME}base64-payload`. This module
//! owns the textual wire format only; algorithm work stays behind the
//! [`Scheme`] trait so every scheme serializes identically.

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::scheme::{normalize_name, Scheme, SchemeError};

/// Splits an envelope into its scheme name and base64 payload. Both the
/// leading `{` and the closing `}` are required; everything after the first
/// `}` is payload and may be empty.
pub fn parse_envelope(envelope: &str) -> Result<(&str, &str), SchemeError> {
    let rest = envelope
        .strip_prefix('{')
        .ok_or(SchemeError::InvalidSyntax)?;
    rest.split_once('}').ok_or(SchemeError::InvalidSyntax)
}

/// Binds one scheme to the authPassword envelope format. Stateless beyond the
/// scheme reference; clones share the same scheme.
#[derive(Clone)]
pub struct Aps {
    scheme: Arc<dyn Scheme>,
}

impl Aps {
    pub fn new(scheme: Arc<dyn Scheme>) -> Self {
        Self { scheme }
    }

    /// The bound scheme.
    pub fn scheme(&self) -> &dyn Scheme {
        self.scheme.as_ref()
    }

    /// Encrypts a plaintext password into `{NAME}base64(raw)`. The name is
    /// emitted exactly as the scheme reports it; an empty raw payload yields
    /// an empty base64 payload.
    pub fn encrypt(&self, plain: &str) -> Result<String, SchemeError> {
        let raw = self.scheme.encode(plain.as_bytes())?;
        let payload = STANDARD.encode(&raw);
        Ok(format!("{{{}}}{}", self.scheme.name(), payload))
    }

    /// Verifies a plaintext password against an envelope produced by the
    /// bound scheme. Parser and decoder failures keep their own error kinds
    /// so callers can branch on taxonomy rather than message text.
    pub fn verify(&self, plain: &str, envelope: &str) -> Result<(), SchemeError> {
        let (name, payload) = parse_envelope(envelope)?;
        if normalize_name(name) != normalize_name(self.scheme.name()) {
            return Err(SchemeError::SchemeMismatch {
                expected: normalize_name(self.scheme.name()),
                found: normalize_name(name),
            });
        }
        let raw = STANDARD
            .decode(payload)
            .map_err(|e| SchemeError::Decoding(format!("{e}")))?;
        self.scheme.verify(plain.as_bytes(), &raw)
    }
}
