//! AES-128-GCM helpers
//!
//! Cipher initialization, nonce generation and the seal/open pair used by the
//! token codec. 96-bit nonce, 128-bit tag, no associated data.

use crate::types::{DerivedKey, Nonce96};
use aes_gcm::aead::Aead;
use aes_gcm::{Aes128Gcm, KeyInit, Nonce};
use rand::{rngs::OsRng, RngCore};
use thiserror::Error;

/// Length of the GCM authentication tag in bytes
pub const TAG_LENGTH: usize = 16;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("Invalid key length")]
    InvalidKeyLength,

    #[error("Encryption failed")]
    EncryptionFailed,

    /// Authentication or decryption failure; deliberately carries no detail
    #[error("Decryption failed")]
    DecryptionFailed,

    #[error("Ciphertext has invalid length: expected {expected}, got {got}")]
    CiphertextLength { expected: usize, got: usize },
}

/// Create an AES-128-GCM cipher from a derived key
pub fn create_aes_cipher(key: &DerivedKey) -> Result<Aes128Gcm, CryptoError> {
    Aes128Gcm::new_from_slice(key.as_slice()).map_err(|_| CryptoError::InvalidKeyLength)
}

/// Generate a random 96-bit nonce for AES-GCM from the OS CSPRNG
pub fn generate_nonce() -> Nonce96 {
    let mut nonce = Nonce96::default();
    OsRng.fill_bytes(nonce.as_mut_slice());
    nonce
}

/// Encrypt `plaintext`, returning `ciphertext || tag`
pub fn seal(key: &DerivedKey, nonce: &Nonce96, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let cipher = create_aes_cipher(key)?;
    let ciphertext = cipher
        .encrypt(Nonce::from_slice(nonce.as_slice()), plaintext)
        .map_err(|_| CryptoError::EncryptionFailed)?;

    let expected = plaintext.len() + TAG_LENGTH;
    if ciphertext.len() != expected {
        return Err(CryptoError::CiphertextLength {
            expected,
            got: ciphertext.len(),
        });
    }
    Ok(ciphertext)
}

/// Decrypt and authenticate `ciphertext || tag`
pub fn open(key: &DerivedKey, nonce: &Nonce96, ciphertext: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let cipher = create_aes_cipher(key)?;
    cipher
        .decrypt(Nonce::from_slice(nonce.as_slice()), ciphertext)
        .map_err(|_| CryptoError::DecryptionFailed)
}
