//! Plaintext storage scheme. Kept for interoperability and tests; deployments
//! should prefer one of the hashed schemes.

use subtle::ConstantTimeEq;

use crate::scheme::{Scheme, SchemeError};

/// The `PLAIN` scheme: the raw payload is the password itself.
pub struct PlainScheme;

impl Scheme for PlainScheme {
    fn name(&self) -> &str {
        "PLAIN"
    }

    fn encode(&self, plain: &[u8]) -> Result<Vec<u8>, SchemeError> {
        Ok(plain.to_vec())
    }

    fn verify(&self, plain: &[u8], raw: &[u8]) -> Result<(), SchemeError> {
        if bool::from(plain.ct_eq(raw)) {
            Ok(())
        } else {
            Err(SchemeError::PasswordMismatch)
        }
    }
}
