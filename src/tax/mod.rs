pub mod form;
pub mod rate;

pub use form::{aggregate, TaxForm};
pub use rate::rate_for;
