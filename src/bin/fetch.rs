use clap::Parser;
use tracing::info;

use std::path::PathBuf;
use std::process::ExitCode;

use pinpoint::fetch::{Attributes, CollectionPolicy, FetchRequest, Fetcher};
use pinpoint::persist::write_table;
use pinpoint::settings::Settings;
use pinpoint::source::MemorySource;
use pinpoint::{Result, logging};

/// Fetch data from a dataset, either all attributes or a subset, and save it as CSV.
#[derive(Parser, Debug)]
#[command(
    name = "pinpoint-fetch",
    version,
    after_help = "Example:\n  pinpoint-fetch my_dataset --attributes A1 A2 A3 --output data.csv\n  pinpoint-fetch my_dataset --output data.csv"
)]
struct Args {
    /// Name of the dataset to connect to, e.g. Atomistic_Numerical_Simulations
    dataset: String,

    /// Attributes to extract; all attributes when omitted
    #[arg(long, value_name = "NAME", num_args = 1..)]
    attributes: Option<Vec<String>>,

    /// Output CSV file [default: data_from_database.csv]
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Collection to fetch when the dataset has several (default: the first)
    #[arg(long, value_name = "NAME")]
    collection: Option<String>,

    /// JSON document backing the data source (overrides source.path)
    #[arg(long, value_name = "PATH")]
    source: Option<PathBuf>,

    /// Enable verbose mode
    #[arg(long)]
    verbose: bool,

    /// Configuration file (otherwise pinpoint.toml or $PINPOINT_CONFIG)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

fn run(args: Args) -> Result<()> {
    let mut settings = Settings::load(args.config.as_deref())?;
    logging::init();
    if args.source.is_some() {
        settings.source.path = args.source;
    }

    let source = MemorySource::load(settings.source_path()?)?;
    let fetcher = Fetcher::new(&source, settings.credentials()?);
    let policy = match args.collection {
        Some(name) => CollectionPolicy::Named(name),
        None => settings.collection_policy(),
    };
    let request = FetchRequest::new(&args.dataset)
        .attributes(Attributes::from(args.attributes))
        .policy(policy);
    let table = fetcher.fetch(&request)?;
    if args.verbose || settings.verbose {
        info!(columns = ?table.columns(), rows = table.len(), "Fetched attributes");
    }

    let output = args.output.unwrap_or(settings.fetch.output);
    write_table(&table, &output, &format!("# pinpoint export: {}", args.dataset))?;
    println!("Processed attributes saved to {}", output.display());
    Ok(())
}

fn main() -> ExitCode {
    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
