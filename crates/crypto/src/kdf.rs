//! Derivation of the AES/GCM token key from the operator's shared secret
//!
//! HKDF-SHA256 without salt (RFC 5869 zero salt) and a fixed info string that
//! generator and verifier must agree on.

use crate::types::{DerivedKey, SharedSecret, DERIVED_KEY_LENGTH};
use hkdf::Hkdf;
use sha2::Sha256;
use thiserror::Error;
use zeroize::Zeroize;

/// HKDF info string binding the derived key to Prüfziffer version 2
pub const KDF_INFO: &[u8] = b"VSDM+ Version 2 AES/GCM";

#[derive(Debug, Error)]
pub enum KdfError {
    #[error("HKDF expand failed: {0}")]
    Expand(String),
}

impl From<hkdf::InvalidLength> for KdfError {
    fn from(e: hkdf::InvalidLength) -> Self {
        KdfError::Expand(e.to_string())
    }
}

/// Derive the 128-bit token key from a shared secret
///
/// Deterministic: the same secret always yields the same key. The minimum
/// secret length is enforced by [`SharedSecret`].
pub fn derive_key(shared_secret: &SharedSecret) -> Result<DerivedKey, KdfError> {
    derive_key_from_bytes(shared_secret.as_bytes())
}

/// Same as [`derive_key`] for callers holding raw bytes
pub fn derive_key_from_bytes(secret: &[u8]) -> Result<DerivedKey, KdfError> {
    let hkdf = Hkdf::<Sha256>::new(None, secret);
    let mut okm = [0u8; DERIVED_KEY_LENGTH];
    hkdf.expand(KDF_INFO, &mut okm)?;
    let key = DerivedKey(okm);
    okm.zeroize();
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counting_secret() -> SharedSecret {
        SharedSecret::new((1u8..=32).collect()).unwrap()
    }

    #[test]
    fn test_known_answer() {
        let key = derive_key(&counting_secret()).unwrap();
        assert_eq!(hex::encode(key.as_slice()), "831bab797a6b581ba9d5c43db81049c8");
    }

    #[test]
    fn test_all_zero_secret() {
        let key = derive_key_from_bytes(&[0u8; 32]).unwrap();
        assert_eq!(hex::encode(key.as_slice()), "824dd5b72a0620098605533da2d0a46c");
    }

    #[test]
    fn test_deterministic() {
        let a = derive_key(&counting_secret()).unwrap();
        let b = derive_key(&counting_secret()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_secrets_give_different_keys() {
        let a = derive_key(&counting_secret()).unwrap();
        let b = derive_key(&SharedSecret::new(vec![0x42; 48]).unwrap()).unwrap();
        assert_ne!(a, b);
    }
}
