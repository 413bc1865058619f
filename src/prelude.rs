//! Prüfziffer Prelude
//!
//! Commonly used types for generating and verifying tokens.
//!
//! ```rust
//! use pruefziffer::prelude::*;
//!
//! # fn example() -> Result<(), PruefzifferError> {
//! let hcv = generate_hcv("19981123", "Berliner Straße")?;
//! assert_eq!(hcv.to_hex(), "6545491d14");
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub use crate::config::{ConfigError, OperatorKeyConfig, PruefzifferConfig};
pub use crate::error::PruefzifferError;
pub use crate::generator::Generator;
pub use crate::reference::{ReferenceDb, ReferenceError, ReferenceRecord};
pub use crate::registry::KeyRegistry;
pub use crate::verifier::{FailReason, VerificationOutcome, Verifier};

// Re-export protocol types
pub use pruefziffer_protocol::{
    compute_prefix, KeyVersion, Kvnr, KvnrError, OperatorCode, RoutingPrefix, TokenFrame,
};

// Re-export crypto types
pub use pruefziffer_crypto::{generate_hcv, Hcv, HcvError};
