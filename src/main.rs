use clap::Parser;

use std::path::PathBuf;
use std::process::ExitCode;

use pinpoint::refine::LineRefinement;
use pinpoint::select::{Selected, Selection};
use pinpoint::settings::Settings;
use pinpoint::{Result, logging};

/// Narrow a table down to one record and extract the attributes for the next simulation.
#[derive(Parser, Debug)]
#[command(
    name = "pinpoint-select",
    version,
    after_help = "Example:\n  pinpoint-select --file_path data_from_database.csv \\\n    --conditions conditions.json --attributes temperature pressure \\\n    --output attributes_for_simulation.json --verbose"
)]
struct Args {
    /// Path to the table file (banner line, header, records)
    #[arg(long = "file_path", value_name = "PATH")]
    file_path: PathBuf,

    /// JSON file of filtering conditions, e.g. {"temperature": "> 300", "pressure": ["<= 1"]}
    #[arg(long, value_name = "PATH")]
    conditions: PathBuf,

    /// Additional attributes to extract besides the mandatory ones
    #[arg(long, value_name = "NAME", num_args = 0..)]
    attributes: Vec<String>,

    /// Output JSON file [default: attributes_for_simulation.json]
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Give up after this many additional conditions
    #[arg(long = "max-refinements", value_name = "N")]
    max_refinements: Option<usize>,

    /// Enable verbose mode
    #[arg(long)]
    verbose: bool,

    /// Configuration file (otherwise pinpoint.toml or $PINPOINT_CONFIG)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

fn run(args: Args) -> Result<ExitCode> {
    let settings = Settings::load(args.config.as_deref())?;
    let verbose = args.verbose || settings.verbose;
    logging::init();

    let mut narrowing = settings.narrowing_options();
    narrowing.verbose = verbose;
    if args.max_refinements.is_some() {
        narrowing.max_refinements = args.max_refinements;
    }
    let mut extraction = settings.extractor_options();
    extraction.verbose = verbose;

    let selection = Selection {
        table: args.file_path,
        conditions: args.conditions,
        attributes: args.attributes,
        output: args.output.unwrap_or(settings.select.output),
        narrowing,
        extraction,
    };
    match selection.run(&mut LineRefinement::stdin())? {
        Selected::Saved(_) => {
            println!("Attributes saved to {}", selection.output.display());
            Ok(ExitCode::SUCCESS)
        }
        Selected::Unresolved(_) => Ok(ExitCode::from(2)),
    }
}

fn main() -> ExitCode {
    match run(Args::parse()) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
