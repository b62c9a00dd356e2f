use crate::core::{Currency, ExchangeRates, TaxError, HOME_CURRENCY};
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::Read;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RateTableError {
    #[error("duplicate {currency} rate for {date}")]
    DuplicateRate { currency: Currency, date: NaiveDate },
    #[error("non-positive {currency} rate for {date}: {rate}")]
    NonPositiveRate {
        currency: Currency,
        date: NaiveDate,
        rate: Decimal,
    },
}

#[derive(Debug, Serialize, Deserialize)]
struct Record {
    currency: Currency,
    date: NaiveDate,
    rate: Decimal,
}

/// Daily exchange rates into the home currency
#[derive(Debug, Default)]
pub struct RateTable {
    rates: HashMap<(Currency, NaiveDate), Decimal>,
}

impl RateTable {
    /// Initialize the rate table from a `currency,date,rate` CSV file
    pub fn read_csv<R: Read>(reader: R) -> anyhow::Result<RateTable> {
        let mut rdr = csv::Reader::from_reader(reader);
        let mut table = RateTable::default();
        for record in rdr.deserialize::<Record>() {
            let record = record?;
            table.insert(record.currency, record.date, record.rate)?;
        }
        log::info!("{} exchange rates loaded", table.len());
        Ok(table)
    }

    pub fn insert(
        &mut self,
        currency: Currency,
        date: NaiveDate,
        rate: Decimal,
    ) -> Result<(), RateTableError> {
        if rate <= Decimal::ZERO {
            return Err(RateTableError::NonPositiveRate {
                currency,
                date,
                rate,
            });
        }
        if self.rates.insert((currency, date), rate).is_some() {
            return Err(RateTableError::DuplicateRate { currency, date });
        }
        Ok(())
    }

    /// Gets the rate published on that exact date, if any
    pub fn get(&self, currency: Currency, date: NaiveDate) -> Option<Decimal> {
        if currency == HOME_CURRENCY {
            return Some(Decimal::ONE);
        }
        self.rates.get(&(currency, date)).copied()
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

#[async_trait]
impl ExchangeRates for RateTable {
    async fn exchange_rate(&self, currency: Currency, date: NaiveDate) -> Result<Decimal, TaxError> {
        self.get(currency, date)
            .ok_or(TaxError::RateUnavailable { currency, date })
    }
}
