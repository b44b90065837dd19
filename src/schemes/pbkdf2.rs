//! PBKDF2 storage scheme. The raw payload is `salt || derived-key` with
//! HMAC-SHA512 as the PRF. Salt length, iteration count, and derived-key
//! length are fixed per scheme instance; changing them changes the payload
//! layout, so stored credentials must be re-encoded after retuning.

use pbkdf2::pbkdf2_hmac;
use serde::Deserialize;
use sha2::Sha512;
use subtle::ConstantTimeEq;
use zeroize::Zeroize;

use crate::scheme::{generate_salt, Scheme, SchemeError};

const DEFAULT_SALT_LEN: usize = 256;
const DEFAULT_ITERATIONS: u32 = 10_000;
const DEFAULT_KEY_LEN: usize = 512;

/// Tuning for the `PBKDF2` scheme. Deserializable so deployments can set it
/// from configuration; omitted fields keep their defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct Pbkdf2Params {
    /// Salt length in bytes.
    #[serde(rename = "saltLength", default = "default_salt_len")]
    pub salt_len: usize,
    /// PBKDF2 iteration count.
    #[serde(default = "default_iterations")]
    pub iterations: u32,
    /// Derived-key length in bytes.
    #[serde(rename = "keyLength", default = "default_key_len")]
    pub key_len: usize,
}

fn default_salt_len() -> usize {
    DEFAULT_SALT_LEN
}

fn default_iterations() -> u32 {
    DEFAULT_ITERATIONS
}

fn default_key_len() -> usize {
    DEFAULT_KEY_LEN
}

impl Default for Pbkdf2Params {
    fn default() -> Self {
        Self {
            salt_len: DEFAULT_SALT_LEN,
            iterations: DEFAULT_ITERATIONS,
            key_len: DEFAULT_KEY_LEN,
        }
    }
}

/// The `PBKDF2` scheme with HMAC-SHA512 as the PRF.
pub struct Pbkdf2Scheme {
    params: Pbkdf2Params,
}

impl Pbkdf2Scheme {
    /// Creates the scheme with default parameters.
    pub fn new() -> Self {
        Self::with_params(Pbkdf2Params::default())
    }

    /// Creates the scheme with explicit parameters.
    pub fn with_params(params: Pbkdf2Params) -> Self {
        Self { params }
    }

    fn derive(&self, plain: &[u8], salt: &[u8]) -> Vec<u8> {
        let mut key = vec![0u8; self.params.key_len];
        pbkdf2_hmac::<Sha512>(plain, salt, self.params.iterations, &mut key);
        key
    }
}

impl Default for Pbkdf2Scheme {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheme for Pbkdf2Scheme {
    fn name(&self) -> &str {
        "PBKDF2"
    }

    fn encode(&self, plain: &[u8]) -> Result<Vec<u8>, SchemeError> {
        let salt = generate_salt(self.params.salt_len)?;
        let derived = self.derive(plain, &salt);

        let mut raw = salt;
        raw.extend_from_slice(&derived);
        Ok(raw)
    }

    fn verify(&self, plain: &[u8], raw: &[u8]) -> Result<(), SchemeError> {
        let expected = self.params.salt_len + self.params.key_len;
        if raw.len() != expected {
            return Err(SchemeError::Decoding(format!(
                "expected {expected} bytes of salt and derived key, got {}",
                raw.len()
            )));
        }

        let (salt, stored) = raw.split_at(self.params.salt_len);
        let mut candidate = self.derive(plain, salt);
        let matches = bool::from(candidate.ct_eq(stored));
        candidate.zeroize();

        if matches {
            Ok(())
        } else {
            Err(SchemeError::PasswordMismatch)
        }
    }
}
