//! Token frame: `prefix(1) || iv(12) || ciphertext+tag(34)`
//!
//! The 47-byte frame is carried as standard base64 with padding, which is
//! always 64 characters ending in a single `=`.

use crate::record::PLAINTEXT_LENGTH;
use base64::{engine::general_purpose::STANDARD, Engine};
use thiserror::Error;

/// AES-GCM IV length
pub const IV_LENGTH: usize = 12;

/// AES-GCM authentication tag length
pub const TAG_LENGTH: usize = 16;

/// Sealed plaintext including the tag
pub const CIPHERTEXT_LENGTH: usize = PLAINTEXT_LENGTH + TAG_LENGTH;

/// Raw frame length
pub const FRAME_LENGTH: usize = 1 + IV_LENGTH + CIPHERTEXT_LENGTH;

/// Length of the base64 token text
pub const TOKEN_TEXT_LENGTH: usize = 64;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FrameError {
    #[error("token must be 64 characters, got {0}")]
    InvalidTextLength(usize),

    #[error("token is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("decoded token must be 47 bytes, got {0}")]
    InvalidLength(usize),

    #[error("ciphertext must be 34 bytes, got {0}")]
    CiphertextLength(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenFrame {
    pub prefix: u8,
    pub iv: [u8; IV_LENGTH],
    pub ciphertext: [u8; CIPHERTEXT_LENGTH],
}

impl TokenFrame {
    /// Assemble a frame; the ciphertext must include the tag
    pub fn new(prefix: u8, iv: [u8; IV_LENGTH], ciphertext: &[u8]) -> Result<Self, FrameError> {
        let ciphertext = ciphertext
            .try_into()
            .map_err(|_| FrameError::CiphertextLength(ciphertext.len()))?;
        Ok(Self {
            prefix,
            iv,
            ciphertext,
        })
    }

    pub fn to_bytes(&self) -> [u8; FRAME_LENGTH] {
        let mut out = [0u8; FRAME_LENGTH];
        out[0] = self.prefix;
        out[1..1 + IV_LENGTH].copy_from_slice(&self.iv);
        out[1 + IV_LENGTH..].copy_from_slice(&self.ciphertext);
        out
    }

    pub fn to_base64(&self) -> String {
        STANDARD.encode(self.to_bytes())
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FrameError> {
        if bytes.len() != FRAME_LENGTH {
            return Err(FrameError::InvalidLength(bytes.len()));
        }
        let mut iv = [0u8; IV_LENGTH];
        iv.copy_from_slice(&bytes[1..1 + IV_LENGTH]);
        Self::new(bytes[0], iv, &bytes[1 + IV_LENGTH..])
    }

    /// Decode the token text
    ///
    /// Checks run in wire order: text length (in characters), base64, decoded
    /// length.
    pub fn decode_base64(token: &str) -> Result<Self, FrameError> {
        let chars = token.chars().count();
        if chars != TOKEN_TEXT_LENGTH {
            return Err(FrameError::InvalidTextLength(chars));
        }
        let bytes = STANDARD.decode(token)?;
        Self::from_bytes(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KNOWN_TOKEN: &str = "3gABAgMEBQYHCAkKC5g9jJjCYeK4mv/YSwlHvQ8vL/8sYWUdO0NL+uCw+oTDdsk=";

    #[test]
    fn test_lengths() {
        assert_eq!(CIPHERTEXT_LENGTH, 34);
        assert_eq!(FRAME_LENGTH, 47);
    }

    #[test]
    fn test_decode_known_token() {
        let frame = TokenFrame::decode_base64(KNOWN_TOKEN).unwrap();
        assert_eq!(frame.prefix, 0xDE);
        assert_eq!(frame.iv, [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11]);
        assert_eq!(frame.to_base64(), KNOWN_TOKEN);
        assert_eq!(TokenFrame::from_bytes(&frame.to_bytes()).unwrap(), frame);
    }

    #[test]
    fn test_encoded_text_shape() {
        let frame = TokenFrame::new(0x80, [0xFF; IV_LENGTH], &[0xAA; CIPHERTEXT_LENGTH]).unwrap();
        let text = frame.to_base64();
        assert_eq!(text.len(), TOKEN_TEXT_LENGTH);
        assert!(text.ends_with('='));
        assert!(!text.ends_with("=="));
    }

    #[test]
    fn test_text_length_checked_first() {
        assert_eq!(
            TokenFrame::decode_base64("!!!"),
            Err(FrameError::InvalidTextLength(3))
        );
    }

    #[test]
    fn test_text_length_counts_characters() {
        let token = format!("{}é", &KNOWN_TOKEN[..62]);
        assert_eq!(token.len(), TOKEN_TEXT_LENGTH);
        assert_eq!(
            TokenFrame::decode_base64(&token),
            Err(FrameError::InvalidTextLength(63))
        );
    }

    #[test]
    fn test_invalid_base64() {
        let token = "*".repeat(TOKEN_TEXT_LENGTH);
        assert!(matches!(
            TokenFrame::decode_base64(&token),
            Err(FrameError::Base64(_))
        ));
    }

    #[test]
    fn test_decoded_length() {
        // 64 characters without padding decode to 48 bytes
        let token = "A".repeat(TOKEN_TEXT_LENGTH);
        assert_eq!(
            TokenFrame::decode_base64(&token),
            Err(FrameError::InvalidLength(48))
        );
    }

    #[test]
    fn test_ciphertext_length() {
        assert_eq!(
            TokenFrame::new(0x80, [0; IV_LENGTH], &[0; 33]),
            Err(FrameError::CiphertextLength(33))
        );
    }
}
