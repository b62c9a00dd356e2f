use super::currency::Currency;
use super::isin::Isin;
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::io::Read;
use std::str::FromStr;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TransactionError {
    #[error("invalid ISIN: {0}")]
    InvalidIsin(String),
    #[error("transaction {row} has non-positive value {value}")]
    NonPositiveValue { row: usize, value: i64 },
    #[error("unknown currency: {0}")]
    UnknownCurrency(String),
    #[error("invalid country code (expected ISO 3166 alpha-2): {0}")]
    InvalidCountry(String),
    #[error("invalid date: {0}")]
    InvalidDate(String),
    #[error("invalid month (expected YYYY-MM): {0}")]
    InvalidMonth(String),
}

/// Input root for transaction JSON
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TransactionInput {
    pub transactions: Vec<RawTransaction>,
}

/// A transaction as exported by the broker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RawTransaction {
    /// Trade date (YYYY-MM-DD; a datetime is truncated to its date)
    #[serde(deserialize_with = "deserialize_date")]
    #[schemars(with = "String")]
    pub date: NaiveDate,
    /// ISIN of the traded security
    #[schemars(with = "String")]
    pub isin: Isin,
    /// Currency the trade was settled in
    pub currency: Currency,
    /// Trade value in minor units (cents), always positive
    pub value: i64,
}

/// Read transactions from CSV with a `date,isin,currency,value` header
pub fn read_transactions_csv<R: Read>(reader: R) -> anyhow::Result<Vec<RawTransaction>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let transactions = rdr
        .deserialize::<RawTransaction>()
        .collect::<Result<Vec<_>, _>>()?;
    validate(&transactions)?;
    log::debug!("{} transactions read from csv", transactions.len());
    Ok(transactions)
}

/// Read transactions from JSON
pub fn read_transactions_json<R: Read>(reader: R) -> anyhow::Result<Vec<RawTransaction>> {
    let input: TransactionInput = serde_json::from_reader(reader)?;
    validate(&input.transactions)?;
    log::debug!("{} transactions read from json", input.transactions.len());
    Ok(input.transactions)
}

fn validate(transactions: &[RawTransaction]) -> Result<(), TransactionError> {
    for (i, tx) in transactions.iter().enumerate() {
        if tx.value <= 0 {
            return Err(TransactionError::NonPositiveValue {
                row: i + 1,
                value: tx.value,
            });
        }
    }
    Ok(())
}

/// A calendar month, the declaration period of the tax
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Month {
    pub year: i32,
    pub month: u32,
}

impl Month {
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl FromStr for Month {
    type Err = TransactionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || TransactionError::InvalidMonth(s.to_string());
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        if !(1..=12).contains(&month) {
            return Err(invalid());
        }
        Ok(Month { year, month })
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

fn parse_date(s: &str) -> Result<NaiveDate, TransactionError> {
    let s = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Ok(dt.date());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Ok(dt.date());
    }
    Err(TransactionError::InvalidDate(s.to_string()))
}

fn deserialize_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let s: String = Deserialize::deserialize(deserializer)?;
    parse_date(&s).map_err(|err| serde::de::Error::custom(err.to_string()))
}
