//! Tracegraph CLI: run contact-tracing queries against a JSON dataset
//!
//! Loads the dataset into an in-memory store, runs one request and prints
//! the result.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use comfy_table::{ContentArrangement, Table};
use tracegraph::{
    ContactTracer, Dataset, InMemoryBackend, Params, RequestHandler, Response, TraceConfig,
};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "tracegraph", version, about = "Contact-tracing analytics CLI")]
struct Cli {
    /// Dataset of people, places and visits (JSON)
    #[arg(long, global = true, default_value = "dataset.json")]
    data: PathBuf,

    /// Analytic defaults (YAML)
    #[arg(long, global = true, env = "TRACEGRAPH_CONFIG")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: OutputFormat,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, clap::ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Distinct node labels
    Labels,
    /// Sick people who may have infected someone after confirmation
    Spreaders,
    /// Spreaders with the number of healthy people they met
    SpreadCounts,
    /// Sick people who visited many places after confirmation
    Careless {
        /// Places a sick person must exceed
        #[arg(long)]
        min_places: Option<usize>,
    },
    /// Sick people who stayed home after confirmation
    Careful,
    /// Healthy people each sick person should warn
    Inform {
        /// Minimum overlap in minutes
        #[arg(long, allow_hyphen_values = true)]
        threshold_minutes: Option<i64>,
    },
    /// Flag exposed healthy people as high risk
    FlagRisk {
        /// Minimum overlap in minutes
        #[arg(long, allow_hyphen_values = true)]
        threshold_minutes: Option<i64>,
    },
    /// Healthy people reached through shared places
    Companions {
        /// Person to start from
        name: String,

        /// Number of co-presence steps
        #[arg(long)]
        hops: Option<usize>,
    },
    /// Place type with the most sick visitors
    TopSite,
    /// Sick people among the given names
    SickFrom {
        /// Names to check
        #[arg(required = true)]
        names: Vec<String>,
    },
}

impl Commands {
    fn into_request(self) -> (&'static str, Params) {
        match self {
            Commands::Labels => ("listLabels", Params::new()),
            Commands::Spreaders => ("possibleSpreaders", Params::new()),
            Commands::SpreadCounts => ("possibleSpreadCounts", Params::new()),
            Commands::Careless { min_places } => (
                "carelessPeople",
                Params {
                    min_places,
                    ..Params::default()
                },
            ),
            Commands::Careful => ("sociallyCareful", Params::new()),
            Commands::Inform { threshold_minutes } => (
                "peopleToInform",
                Params {
                    threshold_minutes,
                    ..Params::default()
                },
            ),
            Commands::FlagRisk { threshold_minutes } => (
                "setHighRisk",
                Params {
                    threshold_minutes,
                    ..Params::default()
                },
            ),
            Commands::Companions { name, hops } => (
                "healthyCompanionsOf",
                Params {
                    name: Some(name),
                    hops,
                    ..Params::default()
                },
            ),
            Commands::TopSite => ("topSickSite", Params::new()),
            Commands::SickFrom { names } => ("sickFrom", Params::new().with_names(names)),
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => TraceConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => TraceConfig::default(),
    };

    let dataset = Dataset::from_file(&cli.data)
        .with_context(|| format!("reading dataset {}", cli.data.display()))?;
    let backend = InMemoryBackend::from_dataset(&dataset).context("loading dataset")?;
    let handler = RequestHandler::new(ContactTracer::with_config(backend, config));

    let (name, params) = cli.command.into_request();
    info!("Running {}", name);
    let response = handler.handle(name, &params).await?;

    match cli.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&response.to_json())?),
        OutputFormat::Table => print_table(&response),
    }
    Ok(())
}

fn print_table(response: &Response) {
    let records = response.records();
    if records.is_empty() {
        println!("(no results)");
        return;
    }

    let columns = response.columns();
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(&columns);

    for record in &records {
        let cells: Vec<String> = columns
            .iter()
            .map(|c| record.get(c).map(format_value).unwrap_or_default())
            .collect();
        table.add_row(cells);
    }

    println!("{}", table);
    println!("{} row(s)", records.len());
}

fn format_value(v: &tracegraph::PropertyValue) -> String {
    match v.as_array() {
        Some(items) => items
            .iter()
            .map(|item| item.to_string())
            .collect::<Vec<_>>()
            .join(", "),
        None => v.to_string(),
    }
}
