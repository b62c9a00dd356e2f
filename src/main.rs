mod cmd;
mod core;
mod money;
mod sources;
mod tax;

use clap::{ArgAction, Parser, Subcommand};
use log::LevelFilter;

#[derive(Parser, Debug)]
#[command(
    name = "tobc",
    version,
    about = "Calculate the Belgian Tax on Stock Exchange Transactions (TOB)"
)]
struct Opts {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Declaration rows grouped by tax rate
    Report(cmd::report::ReportCommand),
    /// Enriched transactions with their tax rate
    Taxable(cmd::taxable::TaxableCommand),
    /// Print the expected input formats
    Schema(cmd::schema::SchemaCommand),
}

#[tokio::main]
async fn main() {
    let opts = Opts::parse();
    init_logging(opts.verbose);

    if let Err(err) = run(opts.command).await {
        log::error!("{err:#}");
        std::process::exit(1);
    }
}

async fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Report(report) => report.exec().await,
        Command::Taxable(taxable) => taxable.exec().await,
        Command::Schema(schema) => schema.exec(),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    let mut builder = pretty_env_logger::formatted_builder();
    builder.filter_level(level);
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    builder.init();
}
