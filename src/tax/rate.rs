use crate::core::{Jurisdiction, Security, TaxableTransaction};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use std::fmt;

/// Rate of the tax on stock exchange transactions, as a fraction of the traded value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TaxRate(Decimal);

impl TaxRate {
    /// Distributing funds, and funds domiciled in the EEA outside Belgium
    pub const REDUCED: TaxRate = TaxRate(dec!(0.0012));
    /// Stocks, and funds domiciled outside the EEA
    pub const STANDARD: TaxRate = TaxRate(dec!(0.0035));
    /// Accumulating funds domiciled in Belgium
    pub const ACCUMULATING: TaxRate = TaxRate(dec!(0.0132));

    pub fn value(self) -> Decimal {
        self.0
    }

    pub fn apply(self, amount: Decimal) -> Decimal {
        amount * self.0
    }
}

impl fmt::Display for TaxRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", (self.0 * dec!(100)).normalize())
    }
}

/// Tax rate applicable to a transaction
pub fn rate_for(t: &TaxableTransaction) -> TaxRate {
    match (t.security, t.country_code.jurisdiction()) {
        (Security::Stock, _) => TaxRate::STANDARD,
        (Security::Etf { accumulating: true }, Jurisdiction::Belgium) => TaxRate::ACCUMULATING,
        (Security::Etf { accumulating: false }, Jurisdiction::Belgium) => TaxRate::REDUCED,
        (Security::Etf { .. }, Jurisdiction::Eea) => TaxRate::REDUCED,
        (Security::Etf { .. }, Jurisdiction::Other) => TaxRate::STANDARD,
    }
}
