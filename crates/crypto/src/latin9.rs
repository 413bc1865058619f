//! ISO-8859-15 (Latin-9) single-byte encoding
//!
//! Latin-9 equals Latin-1 except for eight code points. Characters without a
//! mapping are replaced by `?` (0x3F), which is what the reference platform
//! encoder emits; both token sides must produce identical bytes.

/// Byte substituted for characters that have no Latin-9 mapping
pub const REPLACEMENT_BYTE: u8 = b'?';

/// Encode a string into ISO-8859-15 bytes
pub fn encode(s: &str) -> Vec<u8> {
    s.chars()
        .map(|c| encode_char(c).unwrap_or(REPLACEMENT_BYTE))
        .collect()
}

/// Map a single character to its Latin-9 byte
pub fn encode_char(c: char) -> Option<u8> {
    match c {
        '\u{20AC}' => Some(0xA4),
        '\u{0160}' => Some(0xA6),
        '\u{0161}' => Some(0xA8),
        '\u{017D}' => Some(0xB4),
        '\u{017E}' => Some(0xB8),
        '\u{0152}' => Some(0xBC),
        '\u{0153}' => Some(0xBD),
        '\u{0178}' => Some(0xBE),
        // Latin-1 code points displaced by the entries above
        '\u{00A4}' | '\u{00A6}' | '\u{00A8}' | '\u{00B4}' | '\u{00B8}' | '\u{00BC}'
        | '\u{00BD}' | '\u{00BE}' => None,
        c if (c as u32) <= 0xFF => Some(c as u32 as u8),
        _ => None,
    }
}
