//! Prüfziffer V2: compact, encrypted, time-bound proof of an eGK card check
//!
//! A [`Generator`] seals the KVNR, an HCV fingerprint of the card's reference
//! data and a truncated issuance time into a 64-character token. A
//! [`Verifier`] opens the token with the key selected by its routing prefix and
//! checks revocation, freshness, fingerprint and KVNR.
//!
//! # Example
//!
//! ```
//! use pruefziffer::prelude::*;
//!
//! # fn example() -> Result<(), PruefzifferError> {
//! let config = OperatorKeyConfig::new('X', 2, vec![0x42; 32])?;
//! let generator = Generator::new(&config)?;
//! let verifier = Verifier::new(KeyRegistry::new(&[config])?, true);
//!
//! let hcv = generate_hcv("20190212", "")?;
//! let token = generator.generate("X123456789", &hcv, false)?;
//!
//! let outcome = verifier.verify(&token, "X123456789", hcv.as_bytes())?;
//! assert_eq!(outcome, VerificationOutcome::Success);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod codec;
pub mod config;
pub mod error;
pub mod generator;
pub mod prelude;
pub mod reference;
pub mod registry;
pub mod verifier;

pub use config::{ConfigError, OperatorKeyConfig, PruefzifferConfig};
pub use error::PruefzifferError;
pub use generator::Generator;
pub use reference::{ReferenceDb, ReferenceError, ReferenceRecord};
pub use registry::KeyRegistry;
pub use verifier::{FailReason, VerificationOutcome, Verifier};

pub use pruefziffer_crypto::{generate_hcv, Hcv, HcvError};
pub use pruefziffer_protocol::{validate_kvnr, Kvnr, KvnrError};
