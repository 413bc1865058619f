//! Immutable routing-prefix → key map used by the verifier

use crate::config::{ConfigError, OperatorKeyConfig};
use crate::error::PruefzifferError;
use pruefziffer_crypto::DerivedKey;
use std::collections::HashMap;
use tracing::info;

/// Derived keys indexed by the full routing prefix byte
///
/// Built once from the operator configuration; there is no way to add or
/// replace a key afterwards, so shared references can be read from any
/// number of threads.
#[derive(Debug)]
pub struct KeyRegistry {
    keys: HashMap<u8, DerivedKey>,
}

impl KeyRegistry {
    /// Derive one key per operator entry
    ///
    /// Two entries with the same operator code and key version are rejected.
    pub fn new(configs: &[OperatorKeyConfig]) -> Result<Self, PruefzifferError> {
        let mut keys = HashMap::with_capacity(configs.len());

        for config in configs {
            let prefix = config.prefix();
            if keys.contains_key(&prefix.as_byte()) {
                return Err(ConfigError::DuplicatePrefix {
                    prefix: prefix.as_byte(),
                    operator_code: config.operator_code().as_char(),
                    key_version: config.key_version().value(),
                }
                .into());
            }
            keys.insert(prefix.as_byte(), config.derive_key()?);
            info!(
                operator_code = %config.operator_code(),
                key_version = %config.key_version(),
                prefix = %prefix,
                "Registered operator key"
            );
        }

        Ok(Self { keys })
    }

    /// Key for a raw prefix byte, if one is configured
    pub fn get(&self, prefix: u8) -> Option<&DerivedKey> {
        self.keys.get(&prefix)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Configured prefixes in ascending order
    pub fn prefixes(&self) -> Vec<u8> {
        let mut prefixes: Vec<u8> = self.keys.keys().copied().collect();
        prefixes.sort_unstable();
        prefixes
    }
}
