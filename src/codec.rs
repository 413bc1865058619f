//! Token codec: plaintext record → AES-128-GCM → frame → base64
//!
//! `encode` reads the wall clock and draws a fresh IV from the OS CSPRNG.
//! The `_at` variant takes the issuance time explicitly.

use crate::error::PruefzifferError;
use chrono::Utc;
use pruefziffer_crypto::{generate_nonce, open, seal, CryptoError, DerivedKey, Hcv, Nonce96};
use pruefziffer_protocol::{Kvnr, PlaintextRecord, RoutingPrefix, TokenFrame, TruncatedIat};
use zeroize::Zeroizing;

/// Current time in epoch seconds
pub fn now_epoch_seconds() -> i64 {
    Utc::now().timestamp()
}

/// Encode a token issued now
pub fn encode(
    prefix: RoutingPrefix,
    key: &DerivedKey,
    kvnr: &Kvnr,
    hcv: &Hcv,
    revoked: bool,
) -> Result<String, PruefzifferError> {
    encode_at(prefix, key, kvnr, hcv, revoked, now_epoch_seconds())
}

/// Encode a token issued at `now` (epoch seconds)
pub fn encode_at(
    prefix: RoutingPrefix,
    key: &DerivedKey,
    kvnr: &Kvnr,
    hcv: &Hcv,
    revoked: bool,
    now: i64,
) -> Result<String, PruefzifferError> {
    encode_with_nonce(prefix, key, kvnr, hcv, revoked, now, generate_nonce())
}

pub(crate) fn encode_with_nonce(
    prefix: RoutingPrefix,
    key: &DerivedKey,
    kvnr: &Kvnr,
    hcv: &Hcv,
    revoked: bool,
    now: i64,
    nonce: Nonce96,
) -> Result<String, PruefzifferError> {
    let record = PlaintextRecord::new(
        hcv.with_revoked_flag(revoked),
        TruncatedIat::from_epoch_seconds(now),
        kvnr.to_wire_bytes()?,
    );
    let plaintext = Zeroizing::new(record.to_bytes());

    let ciphertext = seal(key, &nonce, &plaintext[..])?;
    let frame = TokenFrame::new(prefix.as_byte(), nonce.to_bytes(), &ciphertext)?;
    Ok(frame.to_base64())
}

/// Decrypt the ciphertext of a decoded frame
///
/// Any authentication failure is reported as [`CryptoError::DecryptionFailed`]
/// without further detail.
pub fn open_frame(
    frame: &TokenFrame,
    key: &DerivedKey,
) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
    let nonce = Nonce96::new(frame.iv);
    open(key, &nonce, &frame.ciphertext).map(Zeroizing::new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pruefziffer_crypto::derive_key_from_bytes;
    use pruefziffer_protocol::{compute_prefix, KeyVersion, OperatorCode, IAT_TIME_OFFSET};

    const KNOWN_TOKEN: &str = "3gABAgMEBQYHCAkKC5g9jJjCYeK4mv/YSwlHvQ8vL/8sYWUdO0NL+uCw+oTDdsk=";
    const KNOWN_REVOKED_TOKEN: &str =
        "3gABAgMEBQYHCAkKCxg9jJjCYeK4mv/YSwlHvQ8vL8pUVYwIGUDlLl1ayYkxNAI=";

    struct Fixture {
        prefix: RoutingPrefix,
        key: DerivedKey,
        kvnr: Kvnr,
        hcv: Hcv,
        nonce: Nonce96,
        now: i64,
    }

    fn fixture() -> Fixture {
        let secret: Vec<u8> = (1..=32).collect();
        let mut iv = [0u8; 12];
        for (i, b) in iv.iter_mut().enumerate() {
            *b = i as u8;
        }
        Fixture {
            prefix: compute_prefix(
                OperatorCode::new('X').unwrap(),
                KeyVersion::new(2).unwrap(),
            )
            .unwrap(),
            key: derive_key_from_bytes(&secret).unwrap(),
            kvnr: Kvnr::parse("A123456789").unwrap(),
            hcv: Hcv::from_hex("4885ee8394").unwrap(),
            nonce: Nonce96::new(iv),
            now: IAT_TIME_OFFSET + 8000,
        }
    }

    #[test]
    fn test_known_answer() {
        let f = fixture();
        let token =
            encode_with_nonce(f.prefix, &f.key, &f.kvnr, &f.hcv, false, f.now, f.nonce).unwrap();
        assert_eq!(token, KNOWN_TOKEN);

        let revoked =
            encode_with_nonce(f.prefix, &f.key, &f.kvnr, &f.hcv, true, f.now, f.nonce).unwrap();
        assert_eq!(revoked, KNOWN_REVOKED_TOKEN);
    }

    #[test]
    fn test_open_frame() {
        let f = fixture();
        let frame = TokenFrame::decode_base64(KNOWN_TOKEN).unwrap();
        let plaintext = open_frame(&frame, &f.key).unwrap();

        let record = PlaintextRecord::from_bytes(&plaintext).unwrap();
        assert_eq!(&record.i_feld1, f.hcv.as_bytes());
        assert_eq!(record.r_iat8.issued_at(), f.now);
        assert_eq!(&record.kvnr, b"A123456789");
    }

    #[test]
    fn test_open_with_wrong_key() {
        let frame = TokenFrame::decode_base64(KNOWN_TOKEN).unwrap();
        let wrong = derive_key_from_bytes(&[0u8; 32]).unwrap();
        assert!(matches!(
            open_frame(&frame, &wrong),
            Err(CryptoError::DecryptionFailed)
        ));
    }

    #[test]
    fn test_fresh_nonce_per_token() {
        let f = fixture();
        let a = encode_at(f.prefix, &f.key, &f.kvnr, &f.hcv, false, f.now).unwrap();
        let b = encode_at(f.prefix, &f.key, &f.kvnr, &f.hcv, false, f.now).unwrap();
        assert_eq!(a.len(), 64);
        assert_ne!(a, b);
    }

    #[test]
    fn test_kvnr_must_be_ten_bytes() {
        let f = fixture();
        let short = Kvnr::parse("A12345678").unwrap();
        let err = encode(f.prefix, &f.key, &short, &f.hcv, false).unwrap_err();
        assert!(err.is_precondition_error());
    }
}
