//! Prüfziffer V2 Protocol Types
//!
//! This crate contains the wire layout of a Prüfziffer V2 token:
//! - Routing prefix (operator code and key version)
//! - KVNR shape validation
//! - Truncated issued-at timestamp and its freshness window
//! - The 18-byte plaintext record and the 47-byte frame
//!
//! This crate contains NO cryptographic operations and NO I/O.
//! It is purely focused on data structures and serialization.

pub mod frame;
pub mod kvnr;
pub mod prefix;
pub mod record;
pub mod timestamp;

// Re-export commonly used types
pub use frame::{
    FrameError, TokenFrame, CIPHERTEXT_LENGTH, FRAME_LENGTH, IV_LENGTH, TAG_LENGTH,
    TOKEN_TEXT_LENGTH,
};
pub use kvnr::{validate_kvnr, Kvnr, KvnrError, KVNR_LENGTH};
pub use prefix::{
    compute_prefix, is_protocol_v2, KeyVersion, OperatorCode, PrefixError, RoutingPrefix,
    MAX_KEY_VERSION, PROTOCOL_V2_MARKER,
};
pub use record::{
    PlaintextRecord, RecordError, RecordView, I_FELD1_LENGTH, PLAINTEXT_LENGTH, REVOKED_BIT,
};
pub use timestamp::{
    TruncatedIat, CLOCK_SKEW_SECS, IAT_TIME_OFFSET, R_IAT8_LENGTH, VALIDITY_SECS,
};
