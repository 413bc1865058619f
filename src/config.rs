//! Operator key configuration
//!
//! An [`OperatorKeyConfig`] is validated as a whole when it is constructed;
//! there is no way to obtain one with an out-of-range operator code, key
//! version or shared secret. [`PruefzifferConfig`] is the JSON file format
//! read by deployments:
//!
//! ```json
//! {
//!   "enforce_fingerprint_check": true,
//!   "operators": [
//!     { "operator_code": "X", "key_version": 2, "shared_secret": "<hex>" }
//!   ]
//! }
//! ```

use pruefziffer_crypto::{derive_key, DerivedKey, KdfError, KeyError, SharedSecret};
use pruefziffer_protocol::{compute_prefix, KeyVersion, OperatorCode, PrefixError, RoutingPrefix};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;
use zeroize::Zeroizing;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid operator: {0}")]
    Operator(#[from] PrefixError),

    #[error("Invalid shared secret: {0}")]
    Secret(#[from] KeyError),

    #[error("Shared secret for operator entry {index} is not valid hex")]
    SecretEncoding { index: usize },

    #[error("Duplicate routing prefix {prefix:#04x} ({operator_code}/{key_version})")]
    DuplicatePrefix {
        prefix: u8,
        operator_code: char,
        key_version: u8,
    },

    #[error("No operator {operator_code} with key version {key_version} is configured")]
    OperatorNotFound { operator_code: char, key_version: u8 },

    #[error("Failed to parse configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::Operator(_) => {
                Some("Use a single uppercase letter A-Z as operator code and a key version 0-3")
            }
            Self::Secret(_) => Some("Shared secrets must be at least 32 bytes (64 hex characters)"),
            Self::DuplicatePrefix { .. } => {
                Some("Each operator/key-version pair may appear only once")
            }
            _ => None,
        }
    }
}

/// One operator's key material
#[derive(Debug, Clone)]
pub struct OperatorKeyConfig {
    operator_code: OperatorCode,
    key_version: KeyVersion,
    prefix: RoutingPrefix,
    shared_secret: SharedSecret,
}

impl OperatorKeyConfig {
    /// Validate operator code, key version and secret together
    pub fn new(
        operator_code: char,
        key_version: u8,
        shared_secret: Vec<u8>,
    ) -> Result<Self, ConfigError> {
        // wrap first so the secret is zeroized on every error path
        let shared_secret = SharedSecret::new(shared_secret)?;
        let operator_code = OperatorCode::new(operator_code)?;
        let key_version = KeyVersion::new(key_version)?;
        let prefix = compute_prefix(operator_code, key_version)?;

        Ok(Self {
            operator_code,
            key_version,
            prefix,
            shared_secret,
        })
    }

    pub fn operator_code(&self) -> OperatorCode {
        self.operator_code
    }

    pub fn key_version(&self) -> KeyVersion {
        self.key_version
    }

    pub fn prefix(&self) -> RoutingPrefix {
        self.prefix
    }

    pub fn shared_secret(&self) -> &SharedSecret {
        &self.shared_secret
    }

    /// Derive the token key for this operator
    pub fn derive_key(&self) -> Result<DerivedKey, KdfError> {
        derive_key(&self.shared_secret)
    }
}

fn default_enforce_fingerprint_check() -> bool {
    true
}

#[derive(Deserialize)]
struct ConfigFile {
    #[serde(default = "default_enforce_fingerprint_check")]
    enforce_fingerprint_check: bool,
    #[serde(default)]
    operators: Vec<OperatorEntry>,
}

// No Debug: the entry still holds the secret as plain hex.
#[derive(Deserialize)]
struct OperatorEntry {
    operator_code: String,
    key_version: u8,
    shared_secret: Zeroizing<String>,
}

impl OperatorEntry {
    fn into_config(self, index: usize) -> Result<OperatorKeyConfig, ConfigError> {
        let operator_code: OperatorCode = self.operator_code.parse()?;
        let secret = hex::decode(self.shared_secret.trim())
            .map_err(|_| ConfigError::SecretEncoding { index })?;
        OperatorKeyConfig::new(operator_code.as_char(), self.key_version, secret)
    }
}

/// Validated deployment configuration
#[derive(Debug, Clone)]
pub struct PruefzifferConfig {
    pub enforce_fingerprint_check: bool,
    pub operators: Vec<OperatorKeyConfig>,
}

impl PruefzifferConfig {
    pub fn new(operators: Vec<OperatorKeyConfig>) -> Self {
        Self {
            enforce_fingerprint_check: true,
            operators,
        }
    }

    pub fn with_fingerprint_check(mut self, enforce: bool) -> Self {
        self.enforce_fingerprint_check = enforce;
        self
    }

    /// Parse and validate a JSON configuration; any invalid entry fails the load
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = serde_json::from_str(json)?;
        let operators = file
            .operators
            .into_iter()
            .enumerate()
            .map(|(index, entry)| entry.into_config(index))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            enforce_fingerprint_check: file.enforce_fingerprint_check,
            operators,
        })
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = Zeroizing::new(fs::read_to_string(path)?);
        Self::from_json_str(&json)
    }

    /// Select the entry for one operator and key version
    pub fn operator(
        &self,
        operator_code: char,
        key_version: u8,
    ) -> Result<&OperatorKeyConfig, ConfigError> {
        self.operators
            .iter()
            .find(|op| {
                op.operator_code.as_char() == operator_code && op.key_version.value() == key_version
            })
            .ok_or(ConfigError::OperatorNotFound {
                operator_code,
                key_version,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret() -> Vec<u8> {
        (1..=32).collect()
    }

    #[test]
    fn test_valid_operator() {
        let config = OperatorKeyConfig::new('X', 2, secret()).unwrap();
        assert_eq!(config.prefix().as_byte(), 0xDE);
        assert_eq!(config.operator_code().as_char(), 'X');
        assert_eq!(config.key_version().value(), 2);
        assert_eq!(
            hex::encode(config.derive_key().unwrap().as_slice()),
            "831bab797a6b581ba9d5c43db81049c8"
        );
    }

    #[test]
    fn test_invalid_operator_inputs() {
        assert!(matches!(
            OperatorKeyConfig::new('x', 0, secret()),
            Err(ConfigError::Operator(PrefixError::InvalidOperatorCode(_)))
        ));
        assert!(matches!(
            OperatorKeyConfig::new('A', 4, secret()),
            Err(ConfigError::Operator(PrefixError::InvalidKeyVersion(4)))
        ));
        assert!(matches!(
            OperatorKeyConfig::new('A', 0, vec![0u8; 31]),
            Err(ConfigError::Secret(KeyError::SecretTooShort { got: 31, .. }))
        ));
    }

    #[test]
    fn test_debug_does_not_leak_secret() {
        let config = OperatorKeyConfig::new('X', 2, vec![0xAB; 32]).unwrap();
        let debug = format!("{:?}", config);
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains("171"));
    }

    #[test]
    fn test_json_config() {
        let json = format!(
            r#"{{"operators": [{{"operator_code": "X", "key_version": 2, "shared_secret": "{}"}}]}}"#,
            hex::encode(secret())
        );
        let config = PruefzifferConfig::from_json_str(&json).unwrap();
        assert!(config.enforce_fingerprint_check);
        assert_eq!(config.operators.len(), 1);
        assert_eq!(config.operator('X', 2).unwrap().prefix().as_byte(), 0xDE);
        assert!(matches!(
            config.operator('X', 1),
            Err(ConfigError::OperatorNotFound {
                operator_code: 'X',
                key_version: 1
            })
        ));
    }

    #[test]
    fn test_json_config_rejects_bad_entry() {
        let json = r#"{
            "enforce_fingerprint_check": false,
            "operators": [{"operator_code": "X", "key_version": 2, "shared_secret": "zz"}]
        }"#;
        assert!(matches!(
            PruefzifferConfig::from_json_str(json),
            Err(ConfigError::SecretEncoding { index: 0 })
        ));

        let json = r#"{"operators": [{"operator_code": "XY", "key_version": 0, "shared_secret": ""}]}"#;
        assert!(matches!(
            PruefzifferConfig::from_json_str(json),
            Err(ConfigError::Operator(_))
        ));
    }
}
