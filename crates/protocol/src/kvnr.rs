//! Health-insurance number (KVNR) shape and wire encoding

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// KVNR length on the wire (one letter + nine digits)
pub const KVNR_LENGTH: usize = 10;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum KvnrError {
    #[error("KVNR must not be empty")]
    Empty,

    #[error("KVNR must start with a letter between 'A' and 'Z'")]
    InvalidFirstCharacter,

    #[error("KVNR must contain digits after the first character")]
    NonDigit,

    #[error("KVNR must be 10 characters long, got {got}")]
    InvalidLength { got: usize },
}

/// Check the KVNR shape: non-empty, `A-Z` first, ASCII digits after
///
/// The shape check does not enforce the length; a token carries exactly
/// [`KVNR_LENGTH`] bytes, so a shorter or longer claimed KVNR simply never
/// matches.
pub fn validate_kvnr(kvnr: &str) -> Result<(), KvnrError> {
    let mut chars = kvnr.chars();
    match chars.next() {
        None => return Err(KvnrError::Empty),
        Some(first) if !first.is_ascii_uppercase() => {
            return Err(KvnrError::InvalidFirstCharacter)
        }
        Some(_) => {}
    }
    if chars.all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(KvnrError::NonDigit)
    }
}

/// A KVNR that passed the shape check
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Kvnr(String);

impl Kvnr {
    pub fn parse(kvnr: &str) -> Result<Self, KvnrError> {
        validate_kvnr(kvnr)?;
        Ok(Kvnr(kvnr.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Single-byte encoding of the KVNR
    ///
    /// A valid KVNR is pure ASCII, so its Latin-9 bytes are its UTF-8 bytes.
    pub fn encoded_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// The fixed-width wire field; fails unless the KVNR is exactly 10 bytes
    pub fn to_wire_bytes(&self) -> Result<[u8; KVNR_LENGTH], KvnrError> {
        self.encoded_bytes()
            .try_into()
            .map_err(|_| KvnrError::InvalidLength {
                got: self.encoded_bytes().len(),
            })
    }
}

impl FromStr for Kvnr {
    type Err = KvnrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Kvnr::parse(s)
    }
}

impl fmt::Display for Kvnr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
