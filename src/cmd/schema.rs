//! Schema command - print expected input formats

use crate::core::TransactionInput;
use crate::sources::SecurityInput;
use clap::{Args, ValueEnum};
use schemars::schema_for;

#[derive(Args, Debug)]
pub struct SchemaCommand {
    /// Output format [default: json-schema, csv-fields for rates]
    #[arg(value_enum)]
    format: Option<SchemaFormat>,

    /// Input the schema describes
    #[arg(short, long, value_enum, default_value = "transactions")]
    input: SchemaInput,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SchemaFormat {
    /// JSON Schema for the input format
    JsonSchema,
    /// CSV header row with column names
    CsvHeader,
    /// CSV column descriptions
    CsvFields,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SchemaInput {
    Transactions,
    Securities,
    Rates,
}

impl SchemaCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        match self.format() {
            SchemaFormat::JsonSchema => self.print_json_schema(),
            SchemaFormat::CsvHeader => {
                let columns: Vec<_> = self.fields().iter().map(|(name, _, _)| *name).collect();
                println!("{}", columns.join(","));
                Ok(())
            }
            SchemaFormat::CsvFields => {
                println!("CSV Input Format");
                println!("================");
                println!();
                for (name, required, description) in self.fields() {
                    let req = if *required { "required" } else { "optional" };
                    println!("{:14} ({:8})  {}", name, req, description);
                }
                Ok(())
            }
        }
    }

    /// Rates are only read from CSV, so they have no JSON schema
    fn format(&self) -> SchemaFormat {
        match (self.format, self.input) {
            (Some(format), _) => format,
            (None, SchemaInput::Rates) => SchemaFormat::CsvFields,
            (None, _) => SchemaFormat::JsonSchema,
        }
    }

    fn print_json_schema(&self) -> anyhow::Result<()> {
        let schema = match self.input {
            SchemaInput::Transactions => schema_for!(TransactionInput),
            SchemaInput::Securities => schema_for!(SecurityInput),
            SchemaInput::Rates => anyhow::bail!("exchange rates are only read from CSV"),
        };
        println!("{}", serde_json::to_string_pretty(&schema)?);
        Ok(())
    }

    fn fields(&self) -> &'static [(&'static str, bool, &'static str)] {
        match self.input {
            SchemaInput::Transactions => TRANSACTION_FIELDS,
            SchemaInput::Securities => SECURITY_FIELDS,
            SchemaInput::Rates => RATE_FIELDS,
        }
    }
}

const TRANSACTION_FIELDS: &[(&str, bool, &str)] = &[
    ("date", true, "Trade date (YYYY-MM-DD)"),
    ("isin", true, "ISIN of the traded security"),
    ("currency", true, "Settlement currency (EUR, USD, GBP, ...)"),
    ("value", true, "Trade value in cents, positive"),
];

const SECURITY_FIELDS: &[(&str, bool, &str)] = &[
    ("isin", true, "ISIN of the security"),
    ("type", true, "ETF or Stock"),
    ("accumulating", false, "true/false, required for ETFs, empty for stocks"),
    ("domicile", true, "ISO 3166 alpha-2 country of domicile (IE, BE, US, ...)"),
    ("name", false, "Display name"),
];

const RATE_FIELDS: &[(&str, bool, &str)] = &[
    ("currency", true, "Currency the rate converts from"),
    ("date", true, "Publication date (YYYY-MM-DD)"),
    ("rate", true, "Multiplier into EUR"),
];
