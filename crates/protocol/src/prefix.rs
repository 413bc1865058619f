//! Routing prefix (first byte of a Prüfziffer V2 frame)
//!
//! ```text
//! ┌───────────┬────────────────────────┬────────────────┐
//! │ V2 mark(1b)│ operator - 'A' (5b)    │ key version(2b)│
//! └───────────┴────────────────────────┴────────────────┘
//! ```
//!
//! The verifier selects its decryption key by the full prefix byte.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Bit 7 of the prefix: set for protocol version 2 and later
pub const PROTOCOL_V2_MARKER: u8 = 0x80;

/// Highest supported key version
pub const MAX_KEY_VERSION: u8 = 3;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PrefixError {
    #[error("operator code must be a single letter between 'A' and 'Z', got {0:?}")]
    InvalidOperatorCode(String),

    #[error("key version must be between 0 and 3, got {0}")]
    InvalidKeyVersion(u8),

    #[error("prefix must be between 128 and 255, got {0}")]
    OutOfRange(u16),

    #[error("prefix byte {0:#04x} does not carry the version 2 marker")]
    LegacyVersion(u8),
}

/// Operator identifier ("Betreiberkennung"), a single uppercase letter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OperatorCode(u8);

impl OperatorCode {
    pub fn new(code: char) -> Result<Self, PrefixError> {
        if code.is_ascii_uppercase() {
            Ok(OperatorCode(code as u8))
        } else {
            Err(PrefixError::InvalidOperatorCode(code.to_string()))
        }
    }

    pub fn as_char(self) -> char {
        self.0 as char
    }

    /// Zero-based position in the alphabet
    pub fn index(self) -> u8 {
        self.0 - b'A'
    }
}

impl FromStr for OperatorCode {
    type Err = PrefixError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => OperatorCode::new(c),
            _ => Err(PrefixError::InvalidOperatorCode(s.to_string())),
        }
    }
}

impl fmt::Display for OperatorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Key version of an operator's shared secret (0..=3)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyVersion(u8);

impl KeyVersion {
    pub fn new(version: u8) -> Result<Self, PrefixError> {
        if version <= MAX_KEY_VERSION {
            Ok(KeyVersion(version))
        } else {
            Err(PrefixError::InvalidKeyVersion(version))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl fmt::Display for KeyVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validated routing prefix in `[128, 255]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoutingPrefix(u8);

impl RoutingPrefix {
    /// Interpret a raw frame byte as a V2 routing prefix
    pub fn from_byte(byte: u8) -> Result<Self, PrefixError> {
        if is_protocol_v2(byte) {
            Ok(RoutingPrefix(byte))
        } else {
            Err(PrefixError::LegacyVersion(byte))
        }
    }

    pub fn as_byte(self) -> u8 {
        self.0
    }

    /// Operator encoded in the prefix; `None` for the six bit patterns past 'Z'
    pub fn operator_code(self) -> Option<OperatorCode> {
        let code = (b'A' + ((self.0 & !PROTOCOL_V2_MARKER) >> 2)) as char;
        OperatorCode::new(code).ok()
    }

    pub fn key_version(self) -> KeyVersion {
        KeyVersion(self.0 & MAX_KEY_VERSION)
    }
}

impl fmt::Display for RoutingPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.operator_code() {
            Some(code) => write!(f, "{:#04x} ({}/{})", self.0, code, self.key_version()),
            None => write!(f, "{:#04x} (?/{})", self.0, self.key_version()),
        }
    }
}

/// True if the version 2 marker bit is set
pub fn is_protocol_v2(byte: u8) -> bool {
    byte & PROTOCOL_V2_MARKER != 0
}

/// Compute the routing prefix `128 + ((operator - 'A') << 2) + key_version`
pub fn compute_prefix(
    operator: OperatorCode,
    version: KeyVersion,
) -> Result<RoutingPrefix, PrefixError> {
    let prefix = 128u16 + ((operator.index() as u16) << 2) + version.value() as u16;
    if !(128..=255).contains(&prefix) {
        return Err(PrefixError::OutOfRange(prefix));
    }
    Ok(RoutingPrefix(prefix as u8))
}
