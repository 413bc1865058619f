//! Token verification (records-system side)
//!
//! Verification runs a fixed sequence of checks and stops at the first one
//! that fails:
//!
//! 1. claimed KVNR shape (hard error)
//! 2. token text length
//! 3. expected fingerprint length
//! 4. base64 decoding and decoded length
//! 5. protocol version marker in the prefix
//! 6. key lookup by prefix
//! 7. AES-GCM decryption
//! 8. revoked flag
//! 9. freshness window
//! 10. fingerprint (when enforced)
//! 11. KVNR
//!
//! Malformed input never reaches key lookup or decryption. Authentication
//! failures are reported only as [`FailReason::DecryptionError`].

use crate::codec;
use crate::config::PruefzifferConfig;
use crate::error::PruefzifferError;
use crate::registry::KeyRegistry;
use pruefziffer_crypto::{constant_time_eq, HCV_LENGTH};
use pruefziffer_protocol::{
    FrameError, Kvnr, RecordView, RoutingPrefix, TokenFrame, TOKEN_TEXT_LENGTH,
};
use std::fmt;
use tracing::{debug, warn};

/// Why a token was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailReason {
    InvalidTokenLength,
    InvalidFingerprintLength,
    Base64Decode,
    InvalidDecodedLength,
    UnsupportedProtocolVersion,
    NoKeyForPrefix,
    DecryptionError,
    Revoked,
    TemporallyInvalid { age_seconds: i64 },
    FingerprintMismatch,
    KvnrMismatch,
}

impl fmt::Display for FailReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTokenLength => f.write_str("invalid token length"),
            Self::InvalidFingerprintLength => f.write_str("invalid HCV length"),
            Self::Base64Decode => f.write_str("token is not valid base64"),
            Self::InvalidDecodedLength => f.write_str("invalid decoded token length"),
            Self::UnsupportedProtocolVersion => f.write_str("unsupported protocol version"),
            Self::NoKeyForPrefix => f.write_str("no key for prefix"),
            Self::DecryptionError => f.write_str("decryption error"),
            Self::Revoked => f.write_str("eGK blocked"),
            Self::TemporallyInvalid { age_seconds } => {
                write!(f, "token not valid at this time (age {}s)", age_seconds)
            }
            Self::FingerprintMismatch => f.write_str("HCV mismatch"),
            Self::KvnrMismatch => f.write_str("KVNR mismatch"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VerificationOutcome {
    Success,
    Fail(FailReason),
}

impl VerificationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    pub fn fail_reason(&self) -> Option<FailReason> {
        match self {
            Self::Success => None,
            Self::Fail(reason) => Some(*reason),
        }
    }
}

impl fmt::Display for VerificationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => f.write_str("SUCCESS"),
            Self::Fail(reason) => write!(f, "FAIL: {}", reason),
        }
    }
}

/// Checks tokens against a claimed KVNR and an independently computed HCV
#[derive(Debug)]
pub struct Verifier {
    registry: KeyRegistry,
    enforce_fingerprint_check: bool,
}

impl Verifier {
    pub fn new(registry: KeyRegistry, enforce_fingerprint_check: bool) -> Self {
        Self {
            registry,
            enforce_fingerprint_check,
        }
    }

    /// Build the registry from every configured operator
    pub fn from_config(config: &PruefzifferConfig) -> Result<Self, PruefzifferError> {
        let registry = KeyRegistry::new(&config.operators)?;
        Ok(Self::new(registry, config.enforce_fingerprint_check))
    }

    pub fn registry(&self) -> &KeyRegistry {
        &self.registry
    }

    pub fn enforces_fingerprint_check(&self) -> bool {
        self.enforce_fingerprint_check
    }

    /// Verify a token at the current time
    pub fn verify(
        &self,
        token: &str,
        claimed_kvnr: &str,
        expected_fingerprint: &[u8],
    ) -> Result<VerificationOutcome, PruefzifferError> {
        self.verify_at(token, claimed_kvnr, expected_fingerprint, codec::now_epoch_seconds())
    }

    /// Verify a token at `now` (epoch seconds)
    ///
    /// Returns `Err` only for a malformed claimed KVNR or a violated internal
    /// invariant; anything wrong with the token itself is a
    /// [`VerificationOutcome::Fail`].
    pub fn verify_at(
        &self,
        token: &str,
        claimed_kvnr: &str,
        expected_fingerprint: &[u8],
        now: i64,
    ) -> Result<VerificationOutcome, PruefzifferError> {
        let claimed_kvnr = Kvnr::parse(claimed_kvnr)?;
        let outcome = self.check(token, &claimed_kvnr, expected_fingerprint, now)?;
        match outcome {
            VerificationOutcome::Success => debug!("Token verified"),
            VerificationOutcome::Fail(reason) => debug!(%reason, "Token rejected"),
        }
        Ok(outcome)
    }

    fn check(
        &self,
        token: &str,
        claimed_kvnr: &Kvnr,
        expected_fingerprint: &[u8],
        now: i64,
    ) -> Result<VerificationOutcome, PruefzifferError> {
        use FailReason::*;
        use VerificationOutcome::Fail;

        if token.chars().count() != TOKEN_TEXT_LENGTH {
            return Ok(Fail(InvalidTokenLength));
        }
        if expected_fingerprint.len() != HCV_LENGTH {
            return Ok(Fail(InvalidFingerprintLength));
        }

        let frame = match TokenFrame::decode_base64(token) {
            Ok(frame) => frame,
            Err(FrameError::InvalidTextLength(_)) => return Ok(Fail(InvalidTokenLength)),
            Err(FrameError::Base64(_)) => return Ok(Fail(Base64Decode)),
            Err(FrameError::InvalidLength(_)) => return Ok(Fail(InvalidDecodedLength)),
            Err(e @ FrameError::CiphertextLength(_)) => return Err(e.into()),
        };

        let Ok(prefix) = RoutingPrefix::from_byte(frame.prefix) else {
            return Ok(Fail(UnsupportedProtocolVersion));
        };
        let Some(key) = self.registry.get(prefix.as_byte()) else {
            return Ok(Fail(NoKeyForPrefix));
        };

        let plaintext = match codec::open_frame(&frame, key) {
            Ok(plaintext) => plaintext,
            Err(_) => {
                warn!(prefix = %prefix, "Token decryption failed");
                return Ok(Fail(DecryptionError));
            }
        };
        let record = RecordView::parse(&plaintext)?;

        if record.is_revoked() {
            return Ok(Fail(Revoked));
        }
        if !record.r_iat8.is_fresh_at(now) {
            return Ok(Fail(TemporallyInvalid {
                age_seconds: record.r_iat8.age_at(now),
            }));
        }
        if self.enforce_fingerprint_check
            && !constant_time_eq(&record.i_feld1, expected_fingerprint)
        {
            return Ok(Fail(FingerprintMismatch));
        }

        let token_kvnr = record.kvnr_array()?;
        if !constant_time_eq(&token_kvnr, claimed_kvnr.encoded_bytes()) {
            return Ok(Fail(KvnrMismatch));
        }

        Ok(VerificationOutcome::Success)
    }
}
