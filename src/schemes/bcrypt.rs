//! Bcrypt storage scheme. The raw payload is the full bcrypt-formatted hash
//! string, which already carries its own salt and cost factor, so no extra
//! byte layout is needed on top.

use crate::scheme::{Scheme, SchemeError};

/// The `BCRYPT` scheme with a configurable cost factor.
pub struct BcryptScheme {
    cost: u32,
}

impl BcryptScheme {
    /// Creates the scheme at the default cost factor.
    pub fn new() -> Self {
        Self {
            cost: bcrypt::DEFAULT_COST,
        }
    }

    /// Creates the scheme with an explicit cost factor.
    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptScheme {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheme for BcryptScheme {
    fn name(&self) -> &str {
        "BCRYPT"
    }

    fn encode(&self, plain: &[u8]) -> Result<Vec<u8>, SchemeError> {
        let hash = bcrypt::hash(plain, self.cost)
            .map_err(|e| SchemeError::Hashing(format!("{e}")))?;
        Ok(hash.into_bytes())
    }

    fn verify(&self, plain: &[u8], raw: &[u8]) -> Result<(), SchemeError> {
        let hash = std::str::from_utf8(raw).map_err(|e| SchemeError::Decoding(format!("{e}")))?;
        let matches =
            bcrypt::verify(plain, hash).map_err(|e| SchemeError::Decoding(format!("{e}")))?;
        if matches {
            Ok(())
        } else {
            Err(SchemeError::PasswordMismatch)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::BcryptScheme;
    use crate::scheme::{Scheme, SchemeError};

    fn cheap() -> BcryptScheme {
        BcryptScheme::with_cost(4)
    }

    #[test]
    fn round_trips() {
        let scheme = cheap();
        let raw = scheme.encode(b"password").expect("hashing should succeed");
        scheme
            .verify(b"password", &raw)
            .expect("password should verify");

        let err = scheme.verify(b"wrongpassword", &raw).unwrap_err();
        assert!(matches!(err, SchemeError::PasswordMismatch));
    }

    #[test]
    fn hashes_are_salted() {
        let scheme = cheap();
        let first = scheme.encode(b"password").expect("first hash");
        let second = scheme.encode(b"password").expect("second hash");
        assert_ne!(first, second);
    }

    #[test]
    fn payload_is_a_bcrypt_formatted_string() {
        let raw = cheap().encode(b"password").expect("hashing should succeed");
        let hash = String::from_utf8(raw).expect("payload should be ascii");
        assert!(hash.starts_with("$2"));
    }

    #[test]
    fn rejects_garbage_payloads_as_decoding_errors() {
        let err = cheap().verify(b"password", b"not-a-bcrypt-hash").unwrap_err();
        assert!(matches!(err, SchemeError::Decoding(_)));
    }
}
