//! Report command - declaration rows grouped by tax rate

use super::PipelineArgs;
use crate::core::HOME_CURRENCY;
use crate::money::format_minor_units;
use crate::tax::{aggregate, TaxForm};
use clap::Args;
use std::io;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct ReportCommand {
    #[command(flatten)]
    pipeline: PipelineArgs,

    /// Output as CSV instead of formatted table
    #[arg(long, conflicts_with = "json")]
    csv: bool,

    /// Output as JSON instead of formatted table
    #[arg(long)]
    json: bool,
}

/// Row for the declaration table output
#[derive(Debug, Clone, Tabled)]
struct FormLine {
    #[tabled(rename = "Rate")]
    rate: String,

    #[tabled(rename = "Transactions")]
    quantity: u64,

    #[tabled(rename = "Taxable Value")]
    taxable_value: String,

    #[tabled(rename = "Tax")]
    tax_value: String,
}

impl ReportCommand {
    pub async fn exec(&self) -> anyhow::Result<()> {
        let taxable = self.pipeline.taxable_transactions().await?;
        let form = aggregate(&taxable);

        if self.json {
            println!("{}", serde_json::to_string_pretty(&form)?);
            Ok(())
        } else if self.csv {
            write_csv(&form)
        } else {
            print_table(&form);
            Ok(())
        }
    }
}

fn form_lines(form: &TaxForm) -> Vec<FormLine> {
    let symbol = HOME_CURRENCY.symbol();
    form.iter()
        .map(|(rate, row)| FormLine {
            rate: rate.to_string(),
            quantity: row.quantity,
            taxable_value: format_minor_units(row.taxable_value, symbol),
            tax_value: format_minor_units(row.tax_value, symbol),
        })
        .collect()
}

fn print_table(form: &TaxForm) {
    if form.is_empty() {
        println!("No taxable transactions");
        return;
    }

    let symbol = HOME_CURRENCY.symbol();
    let mut lines = form_lines(form);
    lines.push(FormLine {
        rate: "Total".to_string(),
        quantity: form.total_quantity(),
        taxable_value: format_minor_units(form.total_value(), symbol),
        tax_value: format_minor_units(form.total_tax(), symbol),
    });

    let table = Table::new(lines)
        .with(Style::rounded())
        .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
        .to_string();
    println!("{}", table);
}

/// Raw decimal values, minor units
fn write_csv(form: &TaxForm) -> anyhow::Result<()> {
    #[derive(serde::Serialize)]
    struct Record {
        rate: String,
        quantity: u64,
        taxable_value: String,
        tax_value: String,
    }

    let mut wtr = csv::Writer::from_writer(io::stdout());
    for (rate, row) in form.iter() {
        wtr.serialize(Record {
            rate: rate.value().to_string(),
            quantity: row.quantity,
            taxable_value: row.taxable_value.normalize().to_string(),
            tax_value: row.tax_value.normalize().to_string(),
        })?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::country::CountryCode;
    use crate::core::{Security, TaxableTransaction};
    use rust_decimal_macros::dec;

    #[test]
    fn lines_are_formatted_in_home_currency() {
        let form = aggregate(&[
            TaxableTransaction {
                value: dec!(100000),
                country_code: CountryCode::IE,
                security: Security::Etf { accumulating: true },
            },
            TaxableTransaction {
                value: dec!(11216),
                country_code: CountryCode::US,
                security: Security::Stock,
            },
        ]);

        let lines = form_lines(&form);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].rate, "0.12%");
        assert_eq!(lines[0].taxable_value, "€ 1000,00");
        assert_eq!(lines[0].tax_value, "€ 1,20");
        assert_eq!(lines[1].rate, "0.35%");
        assert_eq!(lines[1].taxable_value, "€ 112,16");
        assert_eq!(lines[1].tax_value, "€ 0,40");
    }
}
