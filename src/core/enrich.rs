//! Enrichment of raw broker transactions into taxable transactions

use super::currency::{self, Currency, ExchangeRates, HOME_CURRENCY};
use super::error::TaxError;
use super::isin::Isin;
use super::security::{SecurityClassification, SecurityClassifier};
use super::taxable::TaxableTransaction;
use super::transaction::RawTransaction;
use chrono::NaiveDate;
use futures::stream::{self, StreamExt, TryStreamExt};
use rust_decimal::Decimal;
use std::collections::{BTreeSet, HashMap};

pub const DEFAULT_MAX_CONCURRENT_LOOKUPS: usize = 8;

#[derive(Debug, Clone, Copy)]
pub struct EnrichOptions {
    /// Upper bound on lookups in flight at once
    pub max_concurrent_lookups: usize,
}

impl Default for EnrichOptions {
    fn default() -> Self {
        EnrichOptions {
            max_concurrent_lookups: DEFAULT_MAX_CONCURRENT_LOOKUPS,
        }
    }
}

/// Classify and convert every transaction, preserving input order.
///
/// Each distinct ISIN and each distinct (currency, date) pair is looked up once. The first
/// failed lookup aborts the whole batch.
pub async fn enrich<C, R>(
    transactions: &[RawTransaction],
    classifier: &C,
    rates: &R,
    options: EnrichOptions,
) -> Result<Vec<TaxableTransaction>, TaxError>
where
    C: SecurityClassifier + ?Sized,
    R: ExchangeRates + ?Sized,
{
    let limit = options.max_concurrent_lookups.max(1);

    let isins: BTreeSet<&Isin> = transactions.iter().map(|tx| &tx.isin).collect();
    let conversions: BTreeSet<(Currency, NaiveDate)> = transactions
        .iter()
        .filter(|tx| tx.currency != HOME_CURRENCY)
        .map(|tx| (tx.currency, tx.date))
        .collect();

    let classifications: HashMap<&Isin, SecurityClassification> = stream::iter(isins)
        .map(|isin| async move {
            log::debug!("classifying {}", isin);
            let classification = classifier.classify(isin).await?;
            Ok::<_, TaxError>((isin, classification))
        })
        .buffer_unordered(limit)
        .try_collect()
        .await?;

    let exchange_rates: HashMap<(Currency, NaiveDate), Decimal> = stream::iter(conversions)
        .map(|key @ (currency, date)| async move {
            log::debug!("fetching {} rate for {}", currency, date);
            let rate = rates.exchange_rate(currency, date).await?;
            Ok::<_, TaxError>((key, rate))
        })
        .buffer_unordered(limit)
        .try_collect()
        .await?;

    log::info!(
        "{} securities classified, {} exchange rates resolved",
        classifications.len(),
        exchange_rates.len()
    );

    transactions
        .iter()
        .map(|tx| -> Result<TaxableTransaction, TaxError> {
            let classification = classifications.get(&tx.isin).ok_or_else(|| {
                TaxError::UnknownSecurity {
                    isin: tx.isin.to_string(),
                }
            })?;
            let value = if tx.currency == HOME_CURRENCY {
                Decimal::from(tx.value)
            } else {
                let rate = exchange_rates
                    .get(&(tx.currency, tx.date))
                    .copied()
                    .ok_or(TaxError::RateUnavailable {
                        currency: tx.currency,
                        date: tx.date,
                    })?;
                currency::convert(tx.value, rate)
            };
            Ok(TaxableTransaction {
                value,
                country_code: classification.domicile,
                security: classification.security,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::country::CountryCode;
    use crate::core::security::Security;
    use async_trait::async_trait;
    use rust_decimal_macros::dec;
    use std::sync::Mutex;

    #[derive(Default)]
    struct StubClassifier {
        known: HashMap<String, SecurityClassification>,
        calls: Mutex<Vec<String>>,
    }

    impl StubClassifier {
        fn with(mut self, isin: &str, security: Security, domicile: CountryCode) -> Self {
            self.known
                .insert(isin.to_string(), SecurityClassification { security, domicile });
            self
        }
    }

    #[async_trait]
    impl SecurityClassifier for StubClassifier {
        async fn classify(&self, isin: &Isin) -> Result<SecurityClassification, TaxError> {
            self.calls.lock().unwrap().push(isin.to_string());
            self.known
                .get(isin.as_str())
                .copied()
                .ok_or_else(|| TaxError::UnknownSecurity {
                    isin: isin.to_string(),
                })
        }
    }

    #[derive(Default)]
    struct StubRates {
        rates: HashMap<(Currency, NaiveDate), Decimal>,
        calls: Mutex<Vec<(Currency, NaiveDate)>>,
    }

    #[async_trait]
    impl ExchangeRates for StubRates {
        async fn exchange_rate(
            &self,
            currency: Currency,
            date: NaiveDate,
        ) -> Result<Decimal, TaxError> {
            self.calls.lock().unwrap().push((currency, date));
            self.rates
                .get(&(currency, date))
                .copied()
                .ok_or(TaxError::RateUnavailable { currency, date })
        }
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn tx(date_str: &str, isin: &str, currency: Currency, value: i64) -> RawTransaction {
        RawTransaction {
            date: date(date_str),
            isin: isin.parse().unwrap(),
            currency,
            value,
        }
    }

    fn classifier() -> StubClassifier {
        StubClassifier::default()
            .with(
                "IE00B4L5Y983",
                Security::Etf { accumulating: true },
                CountryCode::IE,
            )
            .with("US0378331005", Security::Stock, CountryCode::US)
    }

    fn rates() -> StubRates {
        let mut rates = StubRates::default();
        rates
            .rates
            .insert((Currency::USD, date("2022-02-25")), dec!(1.1216));
        rates
    }

    #[tokio::test]
    async fn classifies_and_converts() {
        let transactions = vec![
            tx("2022-02-21", "IE00B4L5Y983", Currency::EUR, 1000_00),
            tx("2022-02-25", "US0378331005", Currency::USD, 100_00),
        ];

        let taxable = enrich(&transactions, &classifier(), &rates(), EnrichOptions::default())
            .await
            .unwrap();

        assert_eq!(
            taxable,
            vec![
                TaxableTransaction {
                    value: dec!(100000),
                    country_code: CountryCode::IE,
                    security: Security::Etf { accumulating: true },
                },
                TaxableTransaction {
                    value: dec!(11216.00),
                    country_code: CountryCode::US,
                    security: Security::Stock,
                },
            ]
        );
    }

    #[tokio::test]
    async fn home_currency_passes_through_without_rate_lookup() {
        let rates = StubRates::default();
        let transactions = vec![tx("2022-02-21", "IE00B4L5Y983", Currency::EUR, 123_45)];

        let taxable = enrich(&transactions, &classifier(), &rates, EnrichOptions::default())
            .await
            .unwrap();

        assert_eq!(taxable[0].value, dec!(12345));
        assert!(rates.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn preserves_input_order() {
        let transactions: Vec<_> = (1..=20)
            .map(|i| {
                let isin = if i % 2 == 0 { "IE00B4L5Y983" } else { "US0378331005" };
                tx("2022-02-21", isin, Currency::EUR, i)
            })
            .collect();
        let options = EnrichOptions {
            max_concurrent_lookups: 3,
        };

        let taxable = enrich(&transactions, &classifier(), &rates(), options)
            .await
            .unwrap();

        let values: Vec<_> = taxable.iter().map(|t| t.value).collect();
        let expected: Vec<_> = (1..=20i64).map(Decimal::from).collect();
        assert_eq!(values, expected);
        assert_eq!(taxable[0].security, Security::Stock);
        assert_eq!(taxable[1].security, Security::Etf { accumulating: true });
    }

    #[tokio::test]
    async fn looks_up_each_key_once() {
        let classifier = classifier();
        let rates = rates();
        let transactions = vec![
            tx("2022-02-25", "US0378331005", Currency::USD, 100),
            tx("2022-02-25", "US0378331005", Currency::USD, 200),
            tx("2022-02-25", "IE00B4L5Y983", Currency::USD, 300),
        ];

        enrich(&transactions, &classifier, &rates, EnrichOptions::default())
            .await
            .unwrap();

        assert_eq!(classifier.calls.lock().unwrap().len(), 2);
        assert_eq!(rates.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn unknown_security_aborts_batch() {
        let transactions = vec![
            tx("2022-02-21", "IE00B4L5Y983", Currency::EUR, 1000_00),
            tx("2022-02-21", "LU0274208692", Currency::EUR, 1000_00),
        ];

        let err = enrich(&transactions, &classifier(), &rates(), EnrichOptions::default())
            .await
            .unwrap_err();

        assert_eq!(
            err,
            TaxError::UnknownSecurity {
                isin: "LU0274208692".to_string()
            }
        );
    }

    #[tokio::test]
    async fn missing_rate_is_not_defaulted() {
        let transactions = vec![tx("2022-02-26", "US0378331005", Currency::USD, 100_00)];

        let err = enrich(&transactions, &classifier(), &rates(), EnrichOptions::default())
            .await
            .unwrap_err();

        assert_eq!(
            err,
            TaxError::RateUnavailable {
                currency: Currency::USD,
                date: date("2022-02-26"),
            }
        );
    }

    #[tokio::test]
    async fn zero_concurrency_is_clamped() {
        let transactions = vec![tx("2022-02-21", "IE00B4L5Y983", Currency::EUR, 1)];
        let options = EnrichOptions {
            max_concurrent_lookups: 0,
        };

        let taxable = enrich(&transactions, &classifier(), &rates(), options)
            .await
            .unwrap();

        assert_eq!(taxable.len(), 1);
    }

    #[tokio::test]
    async fn empty_batch() {
        let taxable = enrich(&[], &classifier(), &rates(), EnrichOptions::default())
            .await
            .unwrap();
        assert!(taxable.is_empty());
    }
}
