use super::error::TaxError;
use super::transaction::TransactionError;
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Currency every taxable value is expressed in
pub const HOME_CURRENCY: Currency = Currency::EUR;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, JsonSchema)]
pub enum Currency {
    EUR,
    USD,
    GBP,
    CHF,
    JPY,
    CAD,
    AUD,
    SEK,
    NOK,
    DKK,
    PLN,
    HKD,
}

impl Currency {
    pub const ALL: [Currency; 12] = [
        Currency::EUR,
        Currency::USD,
        Currency::GBP,
        Currency::CHF,
        Currency::JPY,
        Currency::CAD,
        Currency::AUD,
        Currency::SEK,
        Currency::NOK,
        Currency::DKK,
        Currency::PLN,
        Currency::HKD,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Currency::EUR => "EUR",
            Currency::USD => "USD",
            Currency::GBP => "GBP",
            Currency::CHF => "CHF",
            Currency::JPY => "JPY",
            Currency::CAD => "CAD",
            Currency::AUD => "AUD",
            Currency::SEK => "SEK",
            Currency::NOK => "NOK",
            Currency::DKK => "DKK",
            Currency::PLN => "PLN",
            Currency::HKD => "HKD",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Currency::EUR => "€",
            Currency::USD => "$",
            Currency::GBP => "£",
            Currency::JPY => "¥",
            other => other.code(),
        }
    }
}

impl FromStr for Currency {
    type Err = TransactionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_uppercase();
        Currency::ALL
            .into_iter()
            .find(|c| c.code() == code)
            .ok_or_else(|| TransactionError::UnknownCurrency(s.to_string()))
    }
}

impl<'de> Deserialize<'de> for Currency {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Source of historical exchange rates into the home currency
#[async_trait]
pub trait ExchangeRates: Send + Sync {
    /// Multiplier converting an amount in `currency` on `date` into the home currency.
    ///
    /// Fails with [`TaxError::RateUnavailable`] if no rate was published for that exact date.
    async fn exchange_rate(&self, currency: Currency, date: NaiveDate) -> Result<Decimal, TaxError>;
}

/// Convert an amount of minor units at the given rate
pub fn convert(value: i64, rate: Decimal) -> Decimal {
    Decimal::from(value) * rate
}
