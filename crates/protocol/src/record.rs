//! Plaintext record sealed inside a token
//!
//! ```text
//! ┌──────────────┬──────────────┬────────────────┐
//! │ iFeld1 (5B)  │ r_iat8 (3B)  │ KVNR (10B)     │
//! └──────────────┴──────────────┴────────────────┘
//! ```
//!
//! `iFeld1` is the HCV with bit 7 of byte 0 used as the revoked flag.

use crate::kvnr::KVNR_LENGTH;
use crate::timestamp::{TruncatedIat, R_IAT8_LENGTH};
use thiserror::Error;

/// Length of the `iFeld1` field
pub const I_FELD1_LENGTH: usize = 5;

/// Total plaintext length
pub const PLAINTEXT_LENGTH: usize = I_FELD1_LENGTH + R_IAT8_LENGTH + KVNR_LENGTH;

/// Bit 7 of `iFeld1[0]`
pub const REVOKED_BIT: u8 = 0x80;

const HEADER_LENGTH: usize = I_FELD1_LENGTH + R_IAT8_LENGTH;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("plaintext must be {expected} bytes, got {got}")]
    InvalidLength { expected: usize, got: usize },

    #[error("KVNR field must be 10 bytes, got {got}")]
    InvalidKvnrLength { got: usize },
}

/// The fixed 18-byte record built on the generate side
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaintextRecord {
    pub i_feld1: [u8; I_FELD1_LENGTH],
    pub r_iat8: TruncatedIat,
    pub kvnr: [u8; KVNR_LENGTH],
}

impl PlaintextRecord {
    pub fn new(
        i_feld1: [u8; I_FELD1_LENGTH],
        r_iat8: TruncatedIat,
        kvnr: [u8; KVNR_LENGTH],
    ) -> Self {
        Self {
            i_feld1,
            r_iat8,
            kvnr,
        }
    }

    pub fn is_revoked(&self) -> bool {
        self.i_feld1[0] & REVOKED_BIT != 0
    }

    pub fn to_bytes(&self) -> [u8; PLAINTEXT_LENGTH] {
        let mut out = [0u8; PLAINTEXT_LENGTH];
        out[..I_FELD1_LENGTH].copy_from_slice(&self.i_feld1);
        out[I_FELD1_LENGTH..HEADER_LENGTH].copy_from_slice(self.r_iat8.as_bytes());
        out[HEADER_LENGTH..].copy_from_slice(&self.kvnr);
        out
    }

    /// Strict parse of an 18-byte plaintext
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, RecordError> {
        if bytes.len() != PLAINTEXT_LENGTH {
            return Err(RecordError::InvalidLength {
                expected: PLAINTEXT_LENGTH,
                got: bytes.len(),
            });
        }
        let view = RecordView::parse(bytes)?;
        let kvnr = view.kvnr_array()?;
        Ok(Self::new(view.i_feld1, view.r_iat8, kvnr))
    }
}

/// Borrowed view over a decrypted plaintext
///
/// Only the two leading fields are fixed; the KVNR field is whatever follows,
/// and its length is checked after the revocation, time and HCV checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordView<'a> {
    pub i_feld1: [u8; I_FELD1_LENGTH],
    pub r_iat8: TruncatedIat,
    pub kvnr: &'a [u8],
}

impl<'a> RecordView<'a> {
    pub fn parse(bytes: &'a [u8]) -> Result<Self, RecordError> {
        if bytes.len() < HEADER_LENGTH {
            return Err(RecordError::InvalidLength {
                expected: PLAINTEXT_LENGTH,
                got: bytes.len(),
            });
        }
        let mut i_feld1 = [0u8; I_FELD1_LENGTH];
        i_feld1.copy_from_slice(&bytes[..I_FELD1_LENGTH]);
        let mut r_iat8 = [0u8; R_IAT8_LENGTH];
        r_iat8.copy_from_slice(&bytes[I_FELD1_LENGTH..HEADER_LENGTH]);

        Ok(Self {
            i_feld1,
            r_iat8: TruncatedIat::from_bytes(r_iat8),
            kvnr: &bytes[HEADER_LENGTH..],
        })
    }

    pub fn is_revoked(&self) -> bool {
        self.i_feld1[0] & REVOKED_BIT != 0
    }

    pub fn kvnr_array(&self) -> Result<[u8; KVNR_LENGTH], RecordError> {
        self.kvnr
            .try_into()
            .map_err(|_| RecordError::InvalidKvnrLength {
                got: self.kvnr.len(),
            })
    }
}
