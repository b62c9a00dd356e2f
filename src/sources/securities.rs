use crate::core::{Isin, SecurityClassification, SecurityClassifier, SecurityRecord, TaxError};
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Input root for security registry JSON
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SecurityInput {
    pub securities: Vec<SecurityRecord>,
}

/// Known securities keyed by ISIN
#[derive(Debug, Default)]
pub struct SecurityRegistry {
    securities: HashMap<Isin, SecurityClassification>,
}

impl SecurityRegistry {
    /// Load from a `.json` file, or CSV for any other extension
    pub fn open(path: &Path) -> anyhow::Result<SecurityRegistry> {
        let reader = BufReader::new(File::open(path)?);
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::read_json(reader)
        } else {
            Self::read_csv(reader)
        }
    }

    /// Read from CSV with an `isin,type,accumulating,domicile,name` header
    pub fn read_csv<R: Read>(reader: R) -> anyhow::Result<SecurityRegistry> {
        let mut rdr = csv::Reader::from_reader(reader);
        let records = rdr
            .deserialize::<SecurityRecord>()
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_records(&records)?)
    }

    pub fn read_json<R: Read>(reader: R) -> anyhow::Result<SecurityRegistry> {
        let input: SecurityInput = serde_json::from_reader(reader)?;
        Ok(Self::from_records(&input.securities)?)
    }

    /// Validate every record. Later records for the same ISIN replace earlier ones.
    pub fn from_records(records: &[SecurityRecord]) -> Result<SecurityRegistry, TaxError> {
        let mut registry = SecurityRegistry::default();
        for record in records {
            let classification = SecurityClassification::try_from(record)?;
            if registry
                .securities
                .insert(record.isin.clone(), classification)
                .is_some()
            {
                log::warn!("Duplicate security record replaced: isin={}", record.isin);
            }
        }
        log::info!("{} securities loaded", registry.len());
        Ok(registry)
    }

    pub fn get(&self, isin: &Isin) -> Option<SecurityClassification> {
        self.securities.get(isin).copied()
    }

    pub fn len(&self) -> usize {
        self.securities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.securities.is_empty()
    }
}

#[async_trait]
impl SecurityClassifier for SecurityRegistry {
    async fn classify(&self, isin: &Isin) -> Result<SecurityClassification, TaxError> {
        self.get(isin).ok_or_else(|| TaxError::UnknownSecurity {
            isin: isin.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::country::{CountryCode, Jurisdiction};
    use crate::core::Security;

    fn isin(s: &str) -> Isin {
        s.parse().unwrap()
    }

    const CSV: &str = "isin,type,accumulating,domicile,name\n\
                       IE00B4L5Y983,ETF,true,IE,iShares Core MSCI World\n\
                       US0378331005,Stock,,US,Apple\n";

    #[tokio::test]
    async fn classify_from_csv() {
        let registry = SecurityRegistry::read_csv(CSV.as_bytes()).unwrap();
        assert_eq!(registry.len(), 2);

        let iwda = registry.classify(&isin("IE00B4L5Y983")).await.unwrap();
        assert_eq!(iwda.security, Security::Etf { accumulating: true });
        assert_eq!(iwda.domicile, CountryCode::IE);

        let aapl = registry.classify(&isin("US0378331005")).await.unwrap();
        assert_eq!(aapl.security, Security::Stock);
        assert_eq!(aapl.domicile, CountryCode::US);
    }

    #[tokio::test]
    async fn unknown_isin() {
        let registry = SecurityRegistry::read_csv(CSV.as_bytes()).unwrap();
        let err = registry.classify(&isin("LU0274208692")).await.unwrap_err();
        assert_eq!(
            err,
            TaxError::UnknownSecurity {
                isin: "LU0274208692".to_string()
            }
        );
    }

    #[tokio::test]
    async fn any_domicile_is_accepted() {
        let csv = "isin,type,accumulating,domicile,name\n\
                   KR7005930003,Stock,,kr,Samsung Electronics\n";
        let registry = SecurityRegistry::read_csv(csv.as_bytes()).unwrap();
        let samsung = registry.classify(&isin("KR7005930003")).await.unwrap();
        assert_eq!(samsung.security, Security::Stock);
        assert_eq!(samsung.domicile.to_string(), "KR");
        assert_eq!(samsung.domicile.jurisdiction(), Jurisdiction::Other);
    }

    #[test]
    fn malformed_domicile_rejected_on_load() {
        let csv = "isin,type,accumulating,domicile,name\nUS0378331005,Stock,,USA,\n";
        let err = SecurityRegistry::read_csv(csv.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("invalid country code"), "{err}");
    }

    #[test]
    fn classify_from_json() {
        let json = r#"{"securities": [
            {"isin": "LU0274208692", "type": "ETF", "accumulating": false, "domicile": "LU"}
        ]}"#;
        let registry = SecurityRegistry::read_json(json.as_bytes()).unwrap();
        assert_eq!(
            registry.get(&isin("LU0274208692")).map(|c| c.security),
            Some(Security::Etf {
                accumulating: false
            })
        );
    }

    #[test]
    fn etf_without_flag_rejected_on_load() {
        let csv = "isin,type,accumulating,domicile,name\nIE00B4L5Y983,ETF,,IE,\n";
        let err = SecurityRegistry::read_csv(csv.as_bytes()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TaxError>(),
            Some(TaxError::InvalidClassification { .. })
        ));
    }

    #[test]
    fn stock_with_flag_rejected_on_load() {
        let csv = "isin,type,accumulating,domicile,name\nUS0378331005,Stock,false,US,\n";
        assert!(SecurityRegistry::read_csv(csv.as_bytes()).is_err());
    }
}
