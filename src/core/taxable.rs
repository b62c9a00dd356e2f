use super::country::CountryCode;
use super::security::Security;
use rust_decimal::Decimal;
use serde::Serialize;

/// A transaction valued in the home currency and tagged with its security's classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxableTransaction {
    /// Value in home-currency minor units, possibly fractional after conversion
    pub value: Decimal,
    pub country_code: CountryCode,
    pub security: Security,
}
