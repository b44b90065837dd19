//! Scheme registry: maps RFC 3112 scheme names to bound envelopes and keeps
//! the default scheme used when callers encrypt without naming one. The
//! registry is built explicitly by its owner; nothing registers itself at
//! import time, and all mutation is lock-guarded so registration may happen
//! concurrently with verification traffic.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::scheme::{is_valid_name, normalize_name, Scheme, SchemeError};
use crate::schemes::{
    Argon2Scheme, BcryptScheme, Pbkdf2Scheme, PlainScheme, SaltedShaScheme,
};
use crate::syntax::{parse_envelope, Aps};

/// Scheme name a fresh registry encrypts with.
pub const DEFAULT_SCHEME: &str = "BCRYPT";

/// Mapping from normalized scheme names to bound [`Aps`] envelopes, plus the
/// mutable default-scheme name consulted by [`SchemeRegistry::encrypt`].
pub struct SchemeRegistry {
    schemes: RwLock<HashMap<String, Arc<Aps>>>,
    default_scheme: RwLock<String>,
}

impl SchemeRegistry {
    /// Creates an empty registry. The default scheme name starts as `BCRYPT`
    /// and takes effect once a scheme by that name is registered.
    pub fn new() -> Self {
        Self {
            schemes: RwLock::new(HashMap::new()),
            default_scheme: RwLock::new(DEFAULT_SCHEME.to_string()),
        }
    }

    /// Creates a registry populated with every built-in scheme at default
    /// parameters, encrypting with bcrypt until reconfigured.
    pub fn with_default_schemes() -> Self {
        let registry = Self::new();
        registry.register(Arc::new(PlainScheme));
        registry.register(Arc::new(BcryptScheme::new()));
        registry.register(Arc::new(Argon2Scheme::new()));
        registry.register(Arc::new(SaltedShaScheme::sha1()));
        registry.register(Arc::new(SaltedShaScheme::sha256()));
        registry.register(Arc::new(SaltedShaScheme::sha512()));
        registry.register(Arc::new(Pbkdf2Scheme::new()));
        registry
    }

    /// Registers a scheme under its upper-cased name, replacing any scheme
    /// already registered with it. Names outside the RFC 3112 alphabet are
    /// skipped.
    pub fn register(&self, scheme: Arc<dyn Scheme>) {
        let name = scheme.name();
        if !is_valid_name(name) {
            warn!(name, "skipping scheme with invalid name");
            return;
        }
        let key = normalize_name(name);
        debug!(scheme = %key, "registering password storage scheme");
        self.schemes.write().insert(key, Arc::new(Aps::new(scheme)));
    }

    /// Removes the scheme registered under the given name; no-op if absent.
    pub fn unregister(&self, name: &str) {
        self.schemes.write().remove(&normalize_name(name));
    }

    /// Case-insensitive lookup of a registered scheme's envelope.
    pub fn get(&self, name: &str) -> Option<Arc<Aps>> {
        self.schemes.read().get(&normalize_name(name)).cloned()
    }

    /// Registered scheme names, normalized and sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.schemes.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Name of the scheme [`SchemeRegistry::encrypt`] currently uses.
    pub fn default_scheme(&self) -> String {
        self.default_scheme.read().clone()
    }

    /// Changes the default scheme. The name must already be registered;
    /// unknown names are rejected so a bad configuration fails here rather
    /// than at the first encryption.
    pub fn set_default_scheme(&self, name: &str) -> Result<(), SchemeError> {
        let key = normalize_name(name);
        if !self.schemes.read().contains_key(&key) {
            return Err(SchemeError::UnknownScheme(key));
        }
        debug!(scheme = %key, "switching default password storage scheme");
        *self.default_scheme.write() = key;
        Ok(())
    }

    /// Encrypts a plaintext password with the default scheme. Fails with
    /// [`SchemeError::UnknownScheme`] if the default scheme has been
    /// unregistered since it was selected.
    pub fn encrypt(&self, plain: &str) -> Result<String, SchemeError> {
        let default = self.default_scheme();
        let aps = self
            .get(&default)
            .ok_or(SchemeError::UnknownScheme(default))?;
        aps.encrypt(plain)
    }

    /// Verifies a plaintext password against an encoded envelope. Dispatch is
    /// driven purely by the scheme name embedded in the envelope; the default
    /// scheme plays no part here.
    pub fn verify(&self, plain: &str, envelope: &str) -> Result<(), SchemeError> {
        let (name, _) = parse_envelope(envelope)?;
        let aps = self
            .get(name)
            .ok_or_else(|| SchemeError::UnknownScheme(normalize_name(name)))?;
        debug!(scheme = %normalize_name(name), "dispatching password verification");
        aps.verify(plain, envelope)
    }
}

impl Default for SchemeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SchemeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemeRegistry")
            .field("schemes", &self.names())
            .field("default_scheme", &self.default_scheme())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;

    use super::SchemeRegistry;
    use crate::scheme::{Scheme, SchemeError};
    use crate::schemes::{BcryptScheme, SaltedShaScheme};
    use crate::syntax::{parse_envelope, Aps};

    /// Registry tuned for tests: the expensive schemes run at their cheapest
    /// parameters so the suite stays fast.
    fn test_registry() -> SchemeRegistry {
        let registry = SchemeRegistry::with_default_schemes();
        registry.register(Arc::new(BcryptScheme::with_cost(4)));
        registry
    }

    #[test]
    fn encrypts_with_the_default_scheme() {
        let registry = test_registry();
        let envelope = registry
            .encrypt("password")
            .expect("encryption should succeed");
        assert!(envelope.starts_with("{BCRYPT}"));

        registry
            .verify("password", &envelope)
            .expect("password should verify");
        let err = registry.verify("wrongpassword", &envelope).unwrap_err();
        assert!(matches!(err, SchemeError::PasswordMismatch));
    }

    #[test]
    fn verifies_every_builtin_scheme() {
        let registry = test_registry();
        for name in ["PLAIN", "BCRYPT", "ARGON2", "SSHA", "SSHA256", "SSHA512", "PBKDF2"] {
            registry
                .set_default_scheme(name)
                .expect("built-in scheme should be registered");
            let envelope = registry
                .encrypt("password")
                .expect("encryption should succeed");
            assert!(envelope.starts_with(&format!("{{{name}}}")));
            registry
                .verify("password", &envelope)
                .unwrap_or_else(|e| panic!("{name} round trip should verify: {e}"));
            assert!(
                registry.verify("wrongpassword", &envelope).is_err(),
                "{name} should reject a wrong password"
            );
        }
    }

    #[test]
    fn randomized_schemes_produce_fresh_envelopes() {
        let registry = test_registry();
        for name in ["BCRYPT", "ARGON2", "SSHA", "SSHA256", "SSHA512", "PBKDF2"] {
            registry
                .set_default_scheme(name)
                .expect("built-in scheme should be registered");
            let first = registry.encrypt("password").expect("first encryption");
            let second = registry.encrypt("password").expect("second encryption");
            assert_ne!(first, second, "{name} should salt every encryption");
            registry
                .verify("password", &first)
                .expect("first envelope should verify");
            registry
                .verify("password", &second)
                .expect("second envelope should verify");
        }
    }

    #[test]
    fn plain_encryption_is_deterministic() {
        let registry = test_registry();
        registry
            .set_default_scheme("PLAIN")
            .expect("plain should be registered");
        let first = registry.encrypt("password").expect("first encryption");
        let second = registry.encrypt("password").expect("second encryption");
        assert_eq!(first, second);
    }

    #[test]
    fn ssha_payload_is_salt_plus_digest() {
        let registry = test_registry();
        registry
            .set_default_scheme("SSHA")
            .expect("ssha should be registered");
        let envelope = registry.encrypt("password").expect("encryption");
        let (_, payload) = parse_envelope(&envelope).expect("envelope should parse");
        let raw = STANDARD.decode(payload).expect("payload should be base64");
        assert_eq!(raw.len(), 40);
    }

    #[test]
    fn envelope_scheme_tags_are_case_insensitive() {
        let registry = test_registry();
        registry
            .set_default_scheme("SSHA")
            .expect("ssha should be registered");
        let envelope = registry.encrypt("password").expect("encryption");
        let lower = envelope.replacen("SSHA", "ssha", 1);
        registry
            .verify("password", &lower)
            .expect("lower-cased scheme tag should verify");
    }

    #[test]
    fn unknown_scheme_is_reported_as_such() {
        let registry = test_registry();
        let err = registry.verify("password", "{NOPE}abc").unwrap_err();
        assert!(matches!(err, SchemeError::UnknownScheme(name) if name == "NOPE"));
    }

    #[test]
    fn malformed_envelope_is_invalid_syntax() {
        let registry = test_registry();
        let err = registry.verify("password", "no-braces-here").unwrap_err();
        assert!(matches!(err, SchemeError::InvalidSyntax));
    }

    #[test]
    fn default_scheme_switch_is_visible_and_verifiable() {
        let registry = test_registry();
        registry
            .set_default_scheme("ssha")
            .expect("case-insensitive selection should work");
        assert_eq!(registry.default_scheme(), "SSHA");

        let envelope = registry.encrypt("password").expect("encryption");
        assert!(envelope.starts_with("{SSHA}"));

        registry
            .verify("password", &envelope)
            .expect("registry dispatch should verify");
        let bound = Aps::new(Arc::new(SaltedShaScheme::sha1()));
        bound
            .verify("password", &envelope)
            .expect("a directly bound SSHA envelope should verify too");
    }

    #[test]
    fn rejects_switching_to_an_unregistered_default() {
        let registry = test_registry();
        let err = registry.set_default_scheme("NOPE").unwrap_err();
        assert!(matches!(err, SchemeError::UnknownScheme(_)));
    }

    #[test]
    fn unregistering_the_default_fails_later_encryptions() {
        let registry = test_registry();
        registry.unregister("bcrypt");
        let err = registry.encrypt("password").unwrap_err();
        assert!(matches!(err, SchemeError::UnknownScheme(name) if name == "BCRYPT"));
    }

    #[test]
    fn skips_registration_of_invalid_names() {
        struct BadName;

        impl Scheme for BadName {
            fn name(&self) -> &str {
                "NO SPACES"
            }

            fn encode(&self, plain: &[u8]) -> Result<Vec<u8>, SchemeError> {
                Ok(plain.to_vec())
            }

            fn verify(&self, _plain: &[u8], _raw: &[u8]) -> Result<(), SchemeError> {
                Ok(())
            }
        }

        let registry = SchemeRegistry::new();
        registry.register(Arc::new(BadName));
        assert!(registry.get("NO SPACES").is_none());
        assert!(registry.names().is_empty());
    }

    #[test]
    fn registration_overwrites_by_normalized_name() {
        let registry = SchemeRegistry::new();
        registry.register(Arc::new(BcryptScheme::new()));
        registry.register(Arc::new(BcryptScheme::with_cost(4)));
        assert_eq!(registry.names(), vec!["BCRYPT".to_string()]);
    }
}
