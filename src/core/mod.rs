pub mod country;
pub mod currency;
pub mod enrich;
pub mod error;
pub mod isin;
pub mod security;
pub mod taxable;
pub mod transaction;

// Flat public surface for domain types and functions.
pub use country::Jurisdiction;
pub use currency::{Currency, ExchangeRates, HOME_CURRENCY};
pub use enrich::{enrich, EnrichOptions};
pub use error::TaxError;
pub use isin::Isin;
pub use security::{Security, SecurityClassification, SecurityClassifier, SecurityRecord};
pub use taxable::TaxableTransaction;
pub use transaction::{
    read_transactions_csv, read_transactions_json, Month, RawTransaction, TransactionInput,
};
