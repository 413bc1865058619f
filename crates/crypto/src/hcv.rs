//! HCV fingerprint derivation
//!
//! The HCV binds a token to reference data without carrying it: SHA-256 over
//! the Latin-9 encoded "Versicherungsbeginn" (VB, 8 characters) followed by the
//! trimmed street name (SAS), truncated to 40 bits. The most significant bit of
//! the first byte is cleared because the token layer uses it as the revoked flag.

use crate::latin9;
use sha2::{Digest, Sha256};
use std::fmt;
use subtle::ConstantTimeEq;
use thiserror::Error;

/// Length of an HCV in bytes
pub const HCV_LENGTH: usize = 5;

/// Required Latin-9 length of the VB field
pub const VB_LENGTH: usize = 8;

/// Bit in the first HCV byte reserved for the revoked flag
pub const REVOKED_FLAG: u8 = 0x80;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HcvError {
    #[error("VB must not contain spaces")]
    VbContainsSpace,

    #[error("VB must be 8 bytes when encoded in ISO-8859-15, got {got}")]
    VbInvalidLength { got: usize },

    #[error("HCV must be 5 bytes, got {got}")]
    InvalidLength { got: usize },

    #[error("HCV is not valid hex: {0}")]
    InvalidHex(String),
}

/// 5-byte fingerprint with the revoked bit cleared
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Hcv([u8; HCV_LENGTH]);

impl Hcv {
    /// Wrap raw fingerprint bytes
    ///
    /// The revoked bit is cleared so that every `Hcv` satisfies the same
    /// invariant as a freshly generated one.
    pub fn from_bytes(mut bytes: [u8; HCV_LENGTH]) -> Self {
        bytes[0] &= !REVOKED_FLAG;
        Hcv(bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, HcvError> {
        let array: [u8; HCV_LENGTH] = bytes
            .try_into()
            .map_err(|_| HcvError::InvalidLength { got: bytes.len() })?;
        Ok(Hcv::from_bytes(array))
    }

    /// Parse a 10-digit hex string, e.g. `"4885ee8394"`
    pub fn from_hex(s: &str) -> Result<Self, HcvError> {
        let bytes = hex::decode(s.trim()).map_err(|e| HcvError::InvalidHex(e.to_string()))?;
        Hcv::from_slice(&bytes)
    }

    pub fn as_bytes(&self) -> &[u8; HCV_LENGTH] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// The `iFeld1` token field: this HCV with the revoked flag applied
    pub fn with_revoked_flag(&self, revoked: bool) -> [u8; HCV_LENGTH] {
        let mut field = self.0;
        if revoked {
            field[0] |= REVOKED_FLAG;
        }
        field
    }
}

impl fmt::Display for Hcv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Hcv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hcv({})", self.to_hex())
    }
}

/// Compare two byte strings without early exit
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && bool::from(a.ct_eq(b))
}

/// Generate the HCV for a VB and street
///
/// # Steps
/// 1. VB must not contain spaces and must encode to exactly 8 Latin-9 bytes
/// 2. SAS is trimmed and Latin-9 encoded (any length)
/// 3. `SHA-256(vb || sas)`, first 5 bytes, MSB of byte 0 cleared
pub fn generate_hcv(vb: &str, sas: &str) -> Result<Hcv, HcvError> {
    if vb.contains(' ') {
        return Err(HcvError::VbContainsSpace);
    }
    let vb_bytes = latin9::encode(vb);
    if vb_bytes.len() != VB_LENGTH {
        return Err(HcvError::VbInvalidLength {
            got: vb_bytes.len(),
        });
    }

    let sas_bytes = latin9::encode(trim_control_and_space(sas));

    let mut hasher = Sha256::new();
    hasher.update(&vb_bytes);
    hasher.update(&sas_bytes);
    let digest = hasher.finalize();

    let mut h40 = [0u8; HCV_LENGTH];
    h40.copy_from_slice(&digest[..HCV_LENGTH]);
    Ok(Hcv::from_bytes(h40))
}

// Strips every leading/trailing char up to and including U+0020.
fn trim_control_and_space(s: &str) -> &str {
    s.trim_matches(|c: char| c <= ' ')
}
