//! Configuration loader that builds a scheme registry from a JSON file. The
//! shape mirrors deployment configs: pick the default scheme, then tune the
//! cost parameters of individual schemes.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;

use crate::registry::SchemeRegistry;
use crate::schemes::{Argon2Scheme, BcryptScheme, Pbkdf2Params, Pbkdf2Scheme};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file unreadable: {0}")]
    Io(String),
    #[error("config parse failed: {0}")]
    Parse(String),
    #[error("config rejected: {0}")]
    Invalid(String),
}

/// Bcrypt tuning.
#[derive(Debug, Deserialize)]
pub struct BcryptConfig {
    pub cost: u32,
}

/// Argon2id tuning.
#[derive(Debug, Deserialize)]
pub struct Argon2Config {
    #[serde(rename = "memoryCostKib")]
    pub memory_cost_kib: u32,
    #[serde(rename = "timeCost")]
    pub time_cost: u32,
    pub parallelism: u32,
}

/// Top-level scheme configuration. Every field is optional; an empty config
/// yields the stock registry with all built-in schemes at default parameters.
#[derive(Debug, Default, Deserialize)]
pub struct SchemesConfig {
    #[serde(rename = "defaultScheme")]
    pub default_scheme: Option<String>,
    pub bcrypt: Option<BcryptConfig>,
    pub argon2: Option<Argon2Config>,
    pub pbkdf2: Option<Pbkdf2Params>,
}

impl SchemesConfig {
    /// Builds a registry with every built-in scheme, applying the tuning from
    /// this config on top of the defaults.
    pub fn build_registry(&self) -> Result<SchemeRegistry, ConfigError> {
        let registry = SchemeRegistry::with_default_schemes();

        if let Some(bcrypt) = &self.bcrypt {
            registry.register(Arc::new(BcryptScheme::with_cost(bcrypt.cost)));
        }
        if let Some(argon2) = &self.argon2 {
            registry.register(Arc::new(Argon2Scheme::with_params(
                argon2.memory_cost_kib,
                argon2.time_cost,
                argon2.parallelism,
            )));
        }
        if let Some(pbkdf2) = &self.pbkdf2 {
            registry.register(Arc::new(Pbkdf2Scheme::with_params(pbkdf2.clone())));
        }
        if let Some(name) = &self.default_scheme {
            registry
                .set_default_scheme(name)
                .map_err(|e| ConfigError::Invalid(format!("{e}")))?;
        }

        Ok(registry)
    }
}

/// Loads the JSON configuration file and returns a registry built from it.
pub fn load_config(path: impl AsRef<Path>) -> Result<SchemeRegistry, ConfigError> {
    let raw = fs::read_to_string(&path).map_err(|e| ConfigError::Io(format!("{e}")))?;
    let config: SchemesConfig =
        serde_json::from_str(&raw).map_err(|e| ConfigError::Parse(format!("{e}")))?;
    config.build_registry()
}

#[cfg(test)]
mod tests {
    use std::fs;

    use serde_json::json;
    use tempfile::NamedTempFile;

    use super::{load_config, SchemesConfig};

    #[test]
    fn loads_and_applies_tuning() {
        let payload = json!({
            "defaultScheme": "ssha256",
            "bcrypt": { "cost": 4 },
            "pbkdf2": { "saltLength": 16, "iterations": 100, "keyLength": 32 }
        });

        let file = NamedTempFile::new().expect("temp file");
        fs::write(file.path(), serde_json::to_vec(&payload).unwrap()).unwrap();

        let registry = load_config(file.path()).expect("config should load");
        assert_eq!(registry.default_scheme(), "SSHA256");

        let envelope = registry
            .encrypt("password")
            .expect("encryption should succeed");
        assert!(envelope.starts_with("{SSHA256}"));
        registry
            .verify("password", &envelope)
            .expect("password should verify");
    }

    #[test]
    fn empty_config_yields_the_stock_registry() {
        let registry = SchemesConfig::default()
            .build_registry()
            .expect("empty config should build");
        assert_eq!(registry.default_scheme(), "BCRYPT");
        assert_eq!(
            registry.names(),
            vec!["ARGON2", "BCRYPT", "PBKDF2", "PLAIN", "SSHA", "SSHA256", "SSHA512"]
        );
    }

    #[test]
    fn rejects_an_unknown_default_scheme() {
        let file = NamedTempFile::new().expect("temp file");
        fs::write(file.path(), br#"{"defaultScheme": "NOPE"}"#).unwrap();

        let err = load_config(file.path()).unwrap_err();
        assert!(format!("{err}").contains("unknown password storage scheme"));
    }

    #[test]
    fn rejects_unreadable_files_and_bad_json() {
        assert!(load_config("/definitely/not/a/real/path.json").is_err());

        let file = NamedTempFile::new().expect("temp file");
        fs::write(file.path(), b"not json at all").unwrap();
        assert!(load_config(file.path()).is_err());
    }
}
