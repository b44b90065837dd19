//! Salted SHA storage schemes (SSHA, SSHA256, SSHA512). The raw payload is
//! `salt || digest(plain || salt)` with the salt as long as the digest, the
//! layout directory servers expect for hashed userPassword values.

use std::marker::PhantomData;

use sha1::Sha1;
use sha2::{Digest, Sha256, Sha512};
use subtle::ConstantTimeEq;
use zeroize::Zeroize;

use crate::scheme::{generate_salt, Scheme, SchemeError};

/// Salted digest scheme generic over a RustCrypto hash function. The salt
/// length always equals the digest length.
pub struct SaltedShaScheme<D> {
    name: &'static str,
    _digest: PhantomData<D>,
}

impl SaltedShaScheme<Sha1> {
    /// `SSHA`: salted SHA-1 with a 20 byte salt and digest.
    pub fn sha1() -> Self {
        Self {
            name: "SSHA",
            _digest: PhantomData,
        }
    }
}

impl SaltedShaScheme<Sha256> {
    /// `SSHA256`: salted SHA-256 with a 32 byte salt and digest.
    pub fn sha256() -> Self {
        Self {
            name: "SSHA256",
            _digest: PhantomData,
        }
    }
}

impl SaltedShaScheme<Sha512> {
    /// `SSHA512`: salted SHA-512 with a 64 byte salt and digest.
    pub fn sha512() -> Self {
        Self {
            name: "SSHA512",
            _digest: PhantomData,
        }
    }
}

fn digest_with_salt<D: Digest>(plain: &[u8], salt: &[u8]) -> Vec<u8> {
    let mut hasher = D::new();
    hasher.update(plain);
    hasher.update(salt);
    hasher.finalize().to_vec()
}

impl<D> Scheme for SaltedShaScheme<D>
where
    D: Digest + Send + Sync,
{
    fn name(&self) -> &str {
        self.name
    }

    fn encode(&self, plain: &[u8]) -> Result<Vec<u8>, SchemeError> {
        let salt = generate_salt(<D as Digest>::output_size())?;
        let digest = digest_with_salt::<D>(plain, &salt);

        let mut raw = salt;
        raw.extend_from_slice(&digest);
        Ok(raw)
    }

    fn verify(&self, plain: &[u8], raw: &[u8]) -> Result<(), SchemeError> {
        let digest_len = <D as Digest>::output_size();
        if raw.len() != digest_len * 2 {
            return Err(SchemeError::Decoding(format!(
                "expected {} bytes of salt and digest, got {}",
                digest_len * 2,
                raw.len()
            )));
        }

        let (salt, stored) = raw.split_at(digest_len);
        let mut candidate = digest_with_salt::<D>(plain, salt);
        let matches = bool::from(candidate.ct_eq(stored));
        candidate.zeroize();

        if matches {
            Ok(())
        } else {
            Err(SchemeError::PasswordMismatch)
        }
    }
}
