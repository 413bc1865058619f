//! Prüfziffer Cryptographic Operations
//!
//! This crate provides the cryptographic building blocks of Prüfziffer V2:
//! - Zeroizing key types that clear memory and redact `Debug`
//! - HKDF-SHA256 derivation of the AES-128-GCM token key
//! - HCV fingerprint generation over ISO-8859-15 encoded reference data
//! - AES-128-GCM seal/open with OS-random nonces
//!
//! # Example
//!
//! ```
//! use pruefziffer_crypto::{derive_key, generate_hcv, generate_nonce, open, seal, SharedSecret};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let secret = SharedSecret::new(vec![0x42; 32])?;
//! let key = derive_key(&secret)?;
//!
//! let hcv = generate_hcv("20190212", "")?;
//! assert_eq!(hcv.to_hex(), "4885ee8394");
//!
//! let nonce = generate_nonce();
//! let sealed = seal(&key, &nonce, hcv.as_bytes())?;
//! assert_eq!(open(&key, &nonce, &sealed)?, hcv.as_bytes());
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod hcv;
pub mod helpers;
pub mod kdf;
pub mod latin9;
pub mod types;

// Re-export commonly used types
pub use hcv::{constant_time_eq, generate_hcv, Hcv, HcvError, HCV_LENGTH, REVOKED_FLAG};
pub use helpers::{create_aes_cipher, generate_nonce, open, seal, CryptoError, TAG_LENGTH};
pub use kdf::{derive_key, derive_key_from_bytes, KdfError, KDF_INFO};
pub use types::{
    DerivedKey, KeyError, Nonce96, SharedSecret, DERIVED_KEY_LENGTH, NONCE_LENGTH,
    SHARED_SECRET_MIN_LENGTH,
};
