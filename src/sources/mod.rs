//! File-backed implementations of the classifier and exchange-rate lookups

pub mod rates;
pub mod securities;

pub use rates::RateTable;
pub use securities::{SecurityInput, SecurityRegistry};
