pub mod report;
pub mod schema;
pub mod taxable;

use crate::core::{
    enrich, read_transactions_csv, read_transactions_json, EnrichOptions, Month, RawTransaction,
    TaxableTransaction,
};
use crate::sources::{RateTable, SecurityRegistry};
use anyhow::Context;
use clap::Args;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

/// Inputs shared by every command that runs the enrichment pipeline
#[derive(Args, Debug)]
pub struct PipelineArgs {
    /// Transactions file, CSV or JSON (or "-" for JSON on stdin)
    #[arg(short, long)]
    transactions: PathBuf,

    /// Exchange rates CSV (currency,date,rate)
    #[arg(short, long)]
    rates: PathBuf,

    /// Security registry, CSV or JSON
    #[arg(short, long)]
    securities: PathBuf,

    /// Only include transactions in this month (YYYY-MM)
    #[arg(short, long)]
    month: Option<Month>,

    /// Maximum number of lookups in flight at once
    #[arg(long, default_value_t = crate::core::enrich::DEFAULT_MAX_CONCURRENT_LOOKUPS)]
    concurrency: usize,
}

impl PipelineArgs {
    /// Read all inputs and enrich the selected transactions
    pub async fn taxable_transactions(&self) -> anyhow::Result<Vec<TaxableTransaction>> {
        let transactions = self.read_transactions()?;
        let rates = RateTable::read_csv(BufReader::new(
            File::open(&self.rates)
                .with_context(|| format!("opening rates {}", self.rates.display()))?,
        ))?;
        let securities = SecurityRegistry::open(&self.securities)
            .with_context(|| format!("loading securities {}", self.securities.display()))?;
        if rates.is_empty() {
            log::warn!("No exchange rates in {}", self.rates.display());
        }
        if securities.is_empty() {
            log::warn!("No securities in {}", self.securities.display());
        }

        let options = EnrichOptions {
            max_concurrent_lookups: self.concurrency,
        };
        let taxable = enrich(&transactions, &securities, &rates, options).await?;
        Ok(taxable)
    }

    fn read_transactions(&self) -> anyhow::Result<Vec<RawTransaction>> {
        let transactions = read_transactions(&self.transactions)
            .with_context(|| format!("reading transactions {}", self.transactions.display()))?;
        match self.month {
            Some(month) => {
                let total = transactions.len();
                let selected: Vec<_> = transactions
                    .into_iter()
                    .filter(|tx| month.contains(tx.date))
                    .collect();
                log::info!("{} of {} transactions in {}", selected.len(), total, month);
                Ok(selected)
            }
            None => Ok(transactions),
        }
    }
}

/// Read raw transactions from a CSV or JSON file (or JSON on stdin with "-")
pub fn read_transactions(path: &Path) -> anyhow::Result<Vec<RawTransaction>> {
    if path.as_os_str() == "-" {
        return read_from_stdin();
    }
    let reader = BufReader::new(File::open(path)?);
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        read_transactions_json(reader)
    } else {
        read_transactions_csv(reader)
    }
}

fn read_from_stdin() -> anyhow::Result<Vec<RawTransaction>> {
    let stdin = io::stdin();
    let mut reader = BufReader::new(stdin.lock());

    let mut buffer = Vec::new();
    reader.read_to_end(&mut buffer)?;

    if buffer.is_empty() {
        anyhow::bail!("No input received. Provide a file or pipe data to stdin.");
    }

    read_transactions_json(io::Cursor::new(buffer))
}
