use super::country::CountryCode;
use super::error::TaxError;
use super::isin::Isin;
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of security, as stored in a security registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum SecurityType {
    #[serde(rename = "ETF", alias = "Etf", alias = "etf")]
    Etf,
    #[serde(alias = "stock")]
    Stock,
}

/// A classified security. Only funds carry the accumulating flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type")]
pub enum Security {
    #[serde(rename = "ETF")]
    Etf { accumulating: bool },
    Stock,
}

impl fmt::Display for Security {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Security::Etf { accumulating: true } => write!(f, "ETF (acc)"),
            Security::Etf { accumulating: false } => write!(f, "ETF (dist)"),
            Security::Stock => write!(f, "Stock"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecurityClassification {
    pub security: Security,
    pub domicile: CountryCode,
}

/// Raw security metadata record
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SecurityRecord {
    #[schemars(with = "String")]
    pub isin: Isin,
    #[serde(rename = "type")]
    pub security_type: SecurityType,
    /// Required for ETFs, must be absent for stocks
    #[serde(default)]
    pub accumulating: Option<bool>,
    #[schemars(with = "String")]
    pub domicile: CountryCode,
    #[serde(default)]
    pub name: Option<String>,
}

impl TryFrom<&SecurityRecord> for SecurityClassification {
    type Error = TaxError;

    fn try_from(record: &SecurityRecord) -> Result<Self, Self::Error> {
        let invalid = |reason: &str| TaxError::InvalidClassification {
            isin: record.isin.to_string(),
            reason: reason.to_string(),
        };
        let security = match (record.security_type, record.accumulating) {
            (SecurityType::Etf, Some(accumulating)) => Security::Etf { accumulating },
            (SecurityType::Etf, None) => return Err(invalid("ETF without accumulating flag")),
            (SecurityType::Stock, None) => Security::Stock,
            (SecurityType::Stock, Some(_)) => return Err(invalid("stock with accumulating flag")),
        };
        Ok(SecurityClassification {
            security,
            domicile: record.domicile,
        })
    }
}

/// Resolves an identifier to its classification and domicile
#[async_trait]
pub trait SecurityClassifier: Send + Sync {
    /// Fails with [`TaxError::UnknownSecurity`] if the identifier is not known.
    async fn classify(&self, isin: &Isin) -> Result<SecurityClassification, TaxError>;
}
