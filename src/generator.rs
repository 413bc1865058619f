//! Token generation (card/terminal side)

use crate::codec;
use crate::config::OperatorKeyConfig;
use crate::error::PruefzifferError;
use crate::reference::{ReferenceDb, ReferenceRecord};
use pruefziffer_crypto::{generate_hcv, DerivedKey, Hcv};
use pruefziffer_protocol::{KeyVersion, Kvnr, OperatorCode, RoutingPrefix};
use tracing::{debug, info};

/// Issues tokens for a single operator and key version
///
/// The key is derived once at construction and reused for every token.
#[derive(Debug)]
pub struct Generator {
    operator_code: OperatorCode,
    key_version: KeyVersion,
    prefix: RoutingPrefix,
    key: DerivedKey,
}

impl Generator {
    pub fn new(config: &OperatorKeyConfig) -> Result<Self, PruefzifferError> {
        let key = config.derive_key()?;
        info!(
            operator_code = %config.operator_code(),
            key_version = %config.key_version(),
            prefix = %config.prefix(),
            "Generator initialized"
        );
        Ok(Self {
            operator_code: config.operator_code(),
            key_version: config.key_version(),
            prefix: config.prefix(),
            key,
        })
    }

    pub fn operator_code(&self) -> OperatorCode {
        self.operator_code
    }

    pub fn key_version(&self) -> KeyVersion {
        self.key_version
    }

    pub fn prefix(&self) -> RoutingPrefix {
        self.prefix
    }

    /// Generate a token issued now
    pub fn generate(
        &self,
        kvnr: &str,
        hcv: &Hcv,
        revoked: bool,
    ) -> Result<String, PruefzifferError> {
        self.generate_at(kvnr, hcv, revoked, codec::now_epoch_seconds())
    }

    /// Generate a token issued at `now` (epoch seconds)
    ///
    /// The KVNR must pass the shape check and be exactly 10 characters.
    pub fn generate_at(
        &self,
        kvnr: &str,
        hcv: &Hcv,
        revoked: bool,
        now: i64,
    ) -> Result<String, PruefzifferError> {
        let kvnr = Kvnr::parse(kvnr)?;
        let token = codec::encode_at(self.prefix, &self.key, &kvnr, hcv, revoked, now)?;
        debug!(prefix = %self.prefix, revoked, "Generated token");
        Ok(token)
    }

    /// Generate a token from a reference record, computing its HCV
    pub fn generate_for_record(
        &self,
        record: &ReferenceRecord,
    ) -> Result<String, PruefzifferError> {
        self.generate_for_record_at(record, codec::now_epoch_seconds())
    }

    pub fn generate_for_record_at(
        &self,
        record: &ReferenceRecord,
        now: i64,
    ) -> Result<String, PruefzifferError> {
        let hcv = generate_hcv(&record.vb, &record.strasse)?;
        self.generate_at(&record.kvnr, &hcv, record.revoked, now)
    }

    /// Look up a card serial and generate its token
    pub fn generate_for_card(
        &self,
        db: &ReferenceDb,
        iccsn: &str,
    ) -> Result<String, PruefzifferError> {
        let record = db.lookup(iccsn)?;
        self.generate_for_record(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::ReferenceError;
    use pruefziffer_protocol::{KvnrError, TokenFrame, IAT_TIME_OFFSET};

    fn generator() -> Generator {
        let config = OperatorKeyConfig::new('X', 2, (1..=32).collect()).unwrap();
        Generator::new(&config).unwrap()
    }

    #[test]
    fn test_token_carries_prefix() {
        let gen = generator();
        let hcv = generate_hcv("20190212", "").unwrap();
        let token = gen.generate("A123456789", &hcv, false).unwrap();

        assert_eq!(token.len(), 64);
        let frame = TokenFrame::decode_base64(&token).unwrap();
        assert_eq!(frame.prefix, 0xDE);
    }

    #[test]
    fn test_rejects_malformed_kvnr() {
        let gen = generator();
        let hcv = generate_hcv("20190212", "").unwrap();

        let err = gen.generate_at("a123456789", &hcv, false, IAT_TIME_OFFSET).unwrap_err();
        assert!(matches!(
            err,
            PruefzifferError::Kvnr(KvnrError::InvalidFirstCharacter)
        ));

        let err = gen.generate_at("A1234567890", &hcv, false, IAT_TIME_OFFSET).unwrap_err();
        assert!(matches!(
            err,
            PruefzifferError::Kvnr(KvnrError::InvalidLength { got: 11 })
        ));
    }

    #[test]
    fn test_record_with_bad_vb() {
        let gen = generator();
        let record = ReferenceRecord {
            kvnr: "A123456789".to_string(),
            vb: "2019 212".to_string(),
            strasse: String::new(),
            revoked: false,
        };
        assert!(matches!(
            gen.generate_for_record(&record),
            Err(PruefzifferError::Hcv(_))
        ));
    }

    #[test]
    fn test_unknown_card() {
        let gen = generator();
        let db = ReferenceDb::default();
        assert!(matches!(
            gen.generate_for_card(&db, "ICCSN-0"),
            Err(PruefzifferError::Reference(ReferenceError::NotFound(_)))
        ));
    }
}
