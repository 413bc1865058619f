//! Unified error type for the Prüfziffer public API
//!
//! Each crate keeps its domain-specific error for precise handling; this type
//! collects them for callers of the root crate. Soft verification failures are
//! not errors: they are returned as [`crate::VerificationOutcome::Fail`].
//!
//! # Example
//!
//! ```no_run
//! use pruefziffer::{PruefzifferConfig, PruefzifferError, Verifier};
//!
//! fn load(path: &str) -> Result<Verifier, PruefzifferError> {
//!     let config = PruefzifferConfig::from_json_file(path)?;
//!     Verifier::from_config(&config)
//! }
//! ```

use thiserror::Error;

/// Unified error type for all Prüfziffer operations
///
/// # Error Categories
///
/// - **Configuration**: operator code, key version, secret, duplicate prefix, config file
/// - **Precondition**: KVNR shape or length, VB format, unknown card serial
/// - **Internal**: key derivation, AEAD and layout invariants that valid inputs never violate
#[derive(Debug, Error)]
pub enum PruefzifferError {
    /// Operator configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// KVNR shape or length error
    #[error("KVNR error: {0}")]
    Kvnr(#[from] pruefziffer_protocol::KvnrError),

    /// VB/street input error while computing an HCV
    #[error("HCV error: {0}")]
    Hcv(#[from] pruefziffer_crypto::HcvError),

    /// Reference database error
    #[error("Reference data error: {0}")]
    Reference(#[from] crate::reference::ReferenceError),

    /// Key derivation error
    #[error("Key derivation error: {0}")]
    Kdf(#[from] pruefziffer_crypto::KdfError),

    /// AEAD error on the generate path
    #[error("Crypto error: {0}")]
    Crypto(#[from] pruefziffer_crypto::CryptoError),

    /// Token frame layout error
    #[error("Frame error: {0}")]
    Frame(#[from] pruefziffer_protocol::FrameError),

    /// Plaintext record layout error
    #[error("Record error: {0}")]
    Record(#[from] pruefziffer_protocol::RecordError),
}

impl PruefzifferError {
    /// Returns a suggestion for resolving this error
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::Config(e) => e.suggestion(),
            Self::Kvnr(_) => Some("A KVNR is one uppercase letter followed by nine digits"),
            Self::Hcv(_) => Some("VB must be exactly 8 characters without spaces, e.g. 20190212"),
            _ => None,
        }
    }

    /// Returns true if the configuration is invalid
    pub fn is_config_error(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Returns true if a caller-supplied input was rejected
    pub fn is_precondition_error(&self) -> bool {
        matches!(self, Self::Kvnr(_) | Self::Hcv(_) | Self::Reference(_))
    }

    /// Returns true if an internal invariant was violated
    pub fn is_internal_error(&self) -> bool {
        matches!(
            self,
            Self::Kdf(_) | Self::Crypto(_) | Self::Frame(_) | Self::Record(_)
        )
    }
}
