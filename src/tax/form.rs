use super::rate::{rate_for, TaxRate};
use crate::core::TaxableTransaction;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

/// One line of the declaration: all transactions taxed at the same rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormRow {
    /// Number of contributing transactions
    pub quantity: u64,
    /// Sum of transaction values, in home-currency minor units
    pub taxable_value: Decimal,
    /// `taxable_value` at the row's rate
    pub tax_value: Decimal,
}

/// Declaration rows keyed by tax rate
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct TaxForm {
    rows: BTreeMap<TaxRate, FormRow>,
}

impl TaxForm {
    /// Rows in ascending rate order
    pub fn iter(&self) -> impl Iterator<Item = (TaxRate, &FormRow)> {
        self.rows.iter().map(|(rate, row)| (*rate, row))
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn total_quantity(&self) -> u64 {
        self.rows.values().map(|r| r.quantity).sum()
    }

    pub fn total_value(&self) -> Decimal {
        self.rows.values().map(|r| r.taxable_value).sum()
    }

    pub fn total_tax(&self) -> Decimal {
        self.rows.values().map(|r| r.tax_value).sum()
    }
}

#[cfg(test)]
impl TaxForm {
    pub fn get(&self, rate: TaxRate) -> Option<&FormRow> {
        self.rows.get(&rate)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

/// Group transactions by tax rate and total each group
pub fn aggregate(transactions: &[TaxableTransaction]) -> TaxForm {
    let mut rows: BTreeMap<TaxRate, FormRow> = BTreeMap::new();

    for t in transactions {
        let row = rows.entry(rate_for(t)).or_default();
        row.quantity += 1;
        row.taxable_value += t.value;
    }

    for (rate, row) in rows.iter_mut() {
        row.tax_value = rate.apply(row.taxable_value);
    }

    TaxForm { rows }
}
