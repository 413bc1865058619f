//! Reference database of card data keyed by ICCSN
//!
//! The JSON document maps each card serial to the fields a token is built from:
//!
//! ```json
//! { "ICCSN-1": { "KVNR": "X123456789", "VB": "20190212", "Strasse": "", "revoked": "false" } }
//! ```
//!
//! `revoked` may be a JSON boolean or a string; a string counts as revoked
//! only if it equals `"true"` ignoring case.

use serde::{Deserialize, Deserializer};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReferenceError {
    #[error("ICCSN not found in database: {0}")]
    NotFound(String),

    #[error("Failed to parse reference database: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to read reference database: {0}")]
    Io(#[from] std::io::Error),
}

/// Card data for one ICCSN
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReferenceRecord {
    #[serde(rename = "KVNR")]
    pub kvnr: String,
    /// Versicherungsbeginn
    #[serde(rename = "VB")]
    pub vb: String,
    #[serde(rename = "Strasse", default)]
    pub strasse: String,
    #[serde(default, deserialize_with = "deserialize_revoked")]
    pub revoked: bool,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RevokedFlag {
    Bool(bool),
    Text(String),
}

fn deserialize_revoked<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RevokedFlag::deserialize(deserializer)? {
        RevokedFlag::Bool(b) => b,
        RevokedFlag::Text(s) => s.eq_ignore_ascii_case("true"),
    })
}

#[derive(Debug, Clone, Default)]
pub struct ReferenceDb {
    records: HashMap<String, ReferenceRecord>,
}

impl ReferenceDb {
    pub fn from_records(records: HashMap<String, ReferenceRecord>) -> Self {
        Self { records }
    }

    pub fn from_json_str(json: &str) -> Result<Self, ReferenceError> {
        let records: HashMap<String, ReferenceRecord> = serde_json::from_str(json)?;
        Ok(Self { records })
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ReferenceError> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn lookup(&self, iccsn: &str) -> Result<&ReferenceRecord, ReferenceError> {
        self.records
            .get(iccsn)
            .ok_or_else(|| ReferenceError::NotFound(iccsn.to_string()))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DB: &str = r#"{
        "ICCSN-1": {"KVNR": "X123456789", "VB": "20190212", "Strasse": "", "revoked": "false"},
        "ICCSN-2": {"KVNR": "Y123456789", "VB": "19981123", "Strasse": "Berliner Straße", "revoked": "TRUE"},
        "ICCSN-3": {"KVNR": "Z123456789", "VB": "20010119", "Strasse": "Björnsonstraße", "revoked": true},
        "ICCSN-4": {"KVNR": "A123456789", "VB": "20040718", "revoked": "yes"}
    }"#;

    #[test]
    fn test_lookup() {
        let db = ReferenceDb::from_json_str(DB).unwrap();
        assert_eq!(db.len(), 4);

        let record = db.lookup("ICCSN-2").unwrap();
        assert_eq!(record.kvnr, "Y123456789");
        assert_eq!(record.strasse, "Berliner Straße");
    }

    #[test]
    fn test_revoked_parsing() {
        let db = ReferenceDb::from_json_str(DB).unwrap();
        assert!(!db.lookup("ICCSN-1").unwrap().revoked);
        assert!(db.lookup("ICCSN-2").unwrap().revoked);
        assert!(db.lookup("ICCSN-3").unwrap().revoked);
        assert!(!db.lookup("ICCSN-4").unwrap().revoked);
        assert_eq!(db.lookup("ICCSN-4").unwrap().strasse, "");
    }

    #[test]
    fn test_not_found() {
        let db = ReferenceDb::from_json_str(DB).unwrap();
        let err = db.lookup("ICCSN-0").unwrap_err();
        assert!(matches!(err, ReferenceError::NotFound(ref iccsn) if iccsn == "ICCSN-0"));
        assert_eq!(err.to_string(), "ICCSN not found in database: ICCSN-0");
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            ReferenceDb::from_json_str("[1, 2]"),
            Err(ReferenceError::Json(_))
        ));
    }
}
