//! Truncated issued-at timestamp (`r_iat8`)
//!
//! Seconds since [`IAT_TIME_OFFSET`] shifted right by three (8-second
//! granularity), stored as the low 24 bits big-endian. A token is fresh while
//! `iat - 30 < now < iat + 1215`.

/// Epoch offset of `r_iat` (2025-01-01T00:00:00Z)
pub const IAT_TIME_OFFSET: i64 = 1_735_689_600;

/// Number of low bits dropped from `r_iat`
pub const IAT_SHIFT: u32 = 3;

/// Tolerated clock lead of the generator, exclusive
pub const CLOCK_SKEW_SECS: i64 = 30;

/// Validity period after issuance (20 minutes plus 15 seconds slack), exclusive
pub const VALIDITY_SECS: i64 = 20 * 60 + 15;

/// Encoded length of the field
pub const R_IAT8_LENGTH: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TruncatedIat([u8; R_IAT8_LENGTH]);

impl TruncatedIat {
    /// Truncate an epoch timestamp
    ///
    /// Takes the low three bytes of the 32-bit value, so timestamps outside the
    /// 24-bit range wrap rather than fail.
    pub fn from_epoch_seconds(now: i64) -> Self {
        let r_iat8 = now.wrapping_sub(IAT_TIME_OFFSET) >> IAT_SHIFT;
        let bytes = (r_iat8 as u32).to_be_bytes();
        TruncatedIat([bytes[1], bytes[2], bytes[3]])
    }

    pub fn from_bytes(bytes: [u8; R_IAT8_LENGTH]) -> Self {
        TruncatedIat(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; R_IAT8_LENGTH] {
        &self.0
    }

    /// The 24-bit counter value
    pub fn value(&self) -> u32 {
        u32::from_be_bytes([0, self.0[0], self.0[1], self.0[2]])
    }

    /// Reconstructed issuance time in epoch seconds (a multiple of 8 past the offset)
    pub fn issued_at(&self) -> i64 {
        ((self.value() as i64) << IAT_SHIFT) + IAT_TIME_OFFSET
    }

    /// Seconds elapsed between issuance and `now` (negative if issued in the future)
    ///
    /// Saturates at the `i64` bounds.
    pub fn age_at(&self, now: i64) -> i64 {
        now.saturating_sub(self.issued_at())
    }

    pub fn is_fresh_at(&self, now: i64) -> bool {
        let iat = self.issued_at();
        iat - CLOCK_SKEW_SECS < now && now < iat + VALIDITY_SECS
    }
}
