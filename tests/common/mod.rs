//! Common test utilities for Prüfziffer integration tests

#![allow(dead_code)]

use std::path::PathBuf;

// Re-export commonly used types
pub use pruefziffer::prelude::*;
pub use pruefziffer_protocol::IAT_TIME_OFFSET;

/// Shared secret of the known-answer fixture: bytes 1..=32
pub fn fixture_secret() -> Vec<u8> {
    (1..=32).collect()
}

/// Token for operator X, key version 2, IV 00..0b, HCV 4885ee8394,
/// r_iat8 0x0003e8 and KVNR A123456789
pub const KNOWN_TOKEN: &str = "3gABAgMEBQYHCAkKC5g9jJjCYeK4mv/YSwlHvQ8vL/8sYWUdO0NL+uCw+oTDdsk=";

/// The known-answer token with the revoked flag set
pub const KNOWN_REVOKED_TOKEN: &str =
    "3gABAgMEBQYHCAkKCxg9jJjCYeK4mv/YSwlHvQ8vL8pUVYwIGUDlLl1ayYkxNAI=";

/// The known-answer frame behind a legacy prefix byte (0x5e)
pub const KNOWN_LEGACY_TOKEN: &str =
    "XgABAgMEBQYHCAkKC5g9jJjCYeK4mv/YSwlHvQ8vL/8sYWUdO0NL+uCw+oTDdsk=";

pub const KNOWN_KVNR: &str = "A123456789";
pub const KNOWN_HCV: &str = "4885ee8394";

/// Issuance time encoded in the known-answer tokens
pub const KNOWN_IAT: i64 = IAT_TIME_OFFSET + 8000;

pub fn fixture_config() -> OperatorKeyConfig {
    OperatorKeyConfig::new('X', 2, fixture_secret()).unwrap()
}

pub fn fixture_generator() -> Generator {
    Generator::new(&fixture_config()).unwrap()
}

pub fn fixture_verifier(enforce_fingerprint_check: bool) -> Verifier {
    let registry = KeyRegistry::new(&[fixture_config()]).unwrap();
    Verifier::new(registry, enforce_fingerprint_check)
}

pub fn known_hcv() -> Hcv {
    Hcv::from_hex(KNOWN_HCV).unwrap()
}

/// Path to a file under `tests/data`
pub fn data_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}
