//! Taxable command - enriched transactions in input order, with their resolved rate

use super::PipelineArgs;
use crate::core::{TaxableTransaction, HOME_CURRENCY};
use crate::money::format_minor_units;
use crate::tax::rate_for;
use clap::Args;
use std::io;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct TaxableCommand {
    #[command(flatten)]
    pipeline: PipelineArgs,

    /// Output as CSV instead of formatted table
    #[arg(long, conflicts_with = "json")]
    csv: bool,

    /// Output as JSON instead of formatted table
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Tabled, serde::Serialize)]
struct TaxableRow {
    #[tabled(rename = "#")]
    #[serde(rename = "row_num")]
    row_num: usize,

    #[tabled(rename = "Security")]
    security: String,

    #[tabled(rename = "Domicile")]
    domicile: String,

    #[tabled(rename = "Value")]
    value: String,

    #[tabled(rename = "Rate")]
    rate: String,
}

impl TaxableCommand {
    pub async fn exec(&self) -> anyhow::Result<()> {
        let taxable = self.pipeline.taxable_transactions().await?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&taxable)?);
            return Ok(());
        }

        if self.csv {
            let rows = build_rows(&taxable, |value| value.normalize().to_string());
            let mut wtr = csv::Writer::from_writer(io::stdout());
            for row in rows {
                wtr.serialize(row)?;
            }
            wtr.flush()?;
            return Ok(());
        }

        if taxable.is_empty() {
            println!("No taxable transactions");
            return Ok(());
        }
        let rows = build_rows(&taxable, |value| {
            format_minor_units(value, HOME_CURRENCY.symbol())
        });
        let table = Table::new(rows)
            .with(Style::rounded())
            .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
            .to_string();
        println!("{}", table);
        Ok(())
    }
}

fn build_rows<F>(taxable: &[TaxableTransaction], format_value: F) -> Vec<TaxableRow>
where
    F: Fn(rust_decimal::Decimal) -> String,
{
    taxable
        .iter()
        .enumerate()
        .map(|(i, t)| TaxableRow {
            row_num: i + 1,
            security: t.security.to_string(),
            domicile: t.country_code.to_string(),
            value: format_value(t.value),
            rate: rate_for(t).to_string(),
        })
        .collect()
}
