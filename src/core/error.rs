use super::currency::Currency;
use chrono::NaiveDate;

/// Failure of a pipeline lookup. Any of these aborts enrichment of the whole batch.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum TaxError {
    #[error("unknown security: {isin}")]
    UnknownSecurity { isin: String },
    #[error("no {currency} exchange rate published for {date}")]
    RateUnavailable { currency: Currency, date: NaiveDate },
    #[error("invalid classification for {isin}: {reason}")]
    InvalidClassification { isin: String, reason: String },
}
