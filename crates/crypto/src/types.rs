//! Zeroizing cryptographic key types
//!
//! Key material never leaves these wrappers in printable form: `Debug` is
//! redacted and memory is cleared on drop.

use std::fmt;
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// Length of the derived AES-128-GCM key in bytes
pub const DERIVED_KEY_LENGTH: usize = 16;

/// Length of the AES-GCM nonce in bytes
pub const NONCE_LENGTH: usize = 12;

/// Minimum length of the pre-shared operator secret in bytes
pub const SHARED_SECRET_MIN_LENGTH: usize = 32;

/// AES-128 key (16 bytes) derived from an operator secret, zeroized on drop
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey(pub(crate) [u8; DERIVED_KEY_LENGTH]);

impl DerivedKey {
    /// Create a derived key from a 16-byte slice
    pub fn from_slice(bytes: &[u8]) -> Result<Self, KeyError> {
        if bytes.len() != DERIVED_KEY_LENGTH {
            return Err(KeyError::InvalidLength {
                expected: DERIVED_KEY_LENGTH,
                got: bytes.len(),
            });
        }
        let mut key = [0u8; DERIVED_KEY_LENGTH];
        key.copy_from_slice(bytes);
        Ok(DerivedKey(key))
    }

    /// Get a reference to the key bytes
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }
}

impl PartialEq for DerivedKey {
    fn eq(&self, other: &Self) -> bool {
        self.0[..].ct_eq(&other.0[..]).into()
    }
}

impl Eq for DerivedKey {}

impl fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DerivedKey([REDACTED])")
    }
}

/// Pre-shared operator secret (at least 32 bytes), zeroized on drop
#[derive(Clone)]
pub struct SharedSecret(Zeroizing<Vec<u8>>);

impl SharedSecret {
    /// Wrap secret bytes, enforcing the minimum length
    pub fn new(bytes: Vec<u8>) -> Result<Self, KeyError> {
        if bytes.len() < SHARED_SECRET_MIN_LENGTH {
            let got = bytes.len();
            drop(Zeroizing::new(bytes));
            return Err(KeyError::SecretTooShort {
                minimum: SHARED_SECRET_MIN_LENGTH,
                got,
            });
        }
        Ok(SharedSecret(Zeroizing::new(bytes)))
    }

    /// Get a reference to the secret bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SharedSecret([REDACTED; {} bytes])", self.0.len())
    }
}

/// 96-bit nonce (12 bytes)
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
pub struct Nonce96(pub(crate) [u8; NONCE_LENGTH]);

impl Nonce96 {
    /// Create a nonce from raw bytes
    pub fn new(bytes: [u8; NONCE_LENGTH]) -> Self {
        Nonce96(bytes)
    }

    /// Get a reference to the nonce bytes
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    /// Get a mutable reference to the nonce bytes
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.0
    }

    pub fn to_bytes(self) -> [u8; NONCE_LENGTH] {
        self.0
    }
}

/// Key-related errors
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum KeyError {
    #[error("Invalid key length: expected {expected}, got {got}")]
    InvalidLength { expected: usize, got: usize },

    #[error("Shared secret too short: need at least {minimum} bytes, got {got}")]
    SecretTooShort { minimum: usize, got: usize },
}
