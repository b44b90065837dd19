//! Argon2id storage scheme. The raw payload is the PHC string produced by the
//! hasher, which records its own salt and cost parameters, so older payloads
//! stay verifiable after the costs are retuned.

use argon2::password_hash::SaltString;
use argon2::{
    password_hash, Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier,
    Version,
};
use rand::rngs::OsRng;

use crate::scheme::{Scheme, SchemeError};

/// Default Argon2id parameters: 19 MiB of memory and 3 iterations keep GPU
/// cracking expensive while staying server friendly; a single lane keeps
/// resource usage predictable on shared hosts.
const MEMORY_COST_KIB: u32 = 19 * 1024;
const TIME_COST: u32 = 3;
const PARALLELISM: u32 = 1;

/// The `ARGON2` scheme backed by Argon2id.
pub struct Argon2Scheme {
    memory_cost_kib: u32,
    time_cost: u32,
    parallelism: u32,
}

impl Argon2Scheme {
    /// Creates the scheme with the default cost parameters.
    pub fn new() -> Self {
        Self::with_params(MEMORY_COST_KIB, TIME_COST, PARALLELISM)
    }

    /// Creates the scheme with explicit cost parameters.
    pub fn with_params(memory_cost_kib: u32, time_cost: u32, parallelism: u32) -> Self {
        Self {
            memory_cost_kib,
            time_cost,
            parallelism,
        }
    }

    fn hasher(&self) -> Result<Argon2<'static>, password_hash::Error> {
        let params = Params::new(self.memory_cost_kib, self.time_cost, self.parallelism, None)?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

impl Default for Argon2Scheme {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheme for Argon2Scheme {
    fn name(&self) -> &str {
        "ARGON2"
    }

    fn encode(&self, plain: &[u8]) -> Result<Vec<u8>, SchemeError> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = self
            .hasher()
            .map_err(|e| SchemeError::Hashing(format!("{e}")))?;
        let hash = argon2
            .hash_password(plain, &salt)
            .map_err(|e| SchemeError::Hashing(format!("{e}")))?;
        Ok(hash.to_string().into_bytes())
    }

    fn verify(&self, plain: &[u8], raw: &[u8]) -> Result<(), SchemeError> {
        let phc = std::str::from_utf8(raw).map_err(|e| SchemeError::Decoding(format!("{e}")))?;
        let parsed =
            PasswordHash::new(phc).map_err(|e| SchemeError::Decoding(format!("{e}")))?;

        // The PHC string carries its own parameters, so a default verifier
        // accepts payloads hashed under earlier cost settings.
        Argon2::default()
            .verify_password(plain, &parsed)
            .map_err(|_| SchemeError::PasswordMismatch)
    }
}
