use std::path::{Path, PathBuf};

use aqi::Pollutant;
use catalog::{DEFAULT_RANK_LIMIT, Dataset, SortBy};
use clap::{Parser, Subcommand};
use layers::legend::Legend;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Air quality classification and dataset tools")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Classify one concentration (µg/m³)
    Classify {
        pollutant: String,

        #[arg(allow_negative_numbers = true)]
        value: f64,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Print the readings table
    Table {
        /// Dataset JSON (default: embedded sample)
        #[arg(long)]
        data: Option<PathBuf>,

        #[arg(long, default_value = "name")]
        sort: SortBy,

        /// Pollutant whose tier is shown in the last column
        #[arg(long, default_value = "pm25")]
        pollutant: Pollutant,
    },
    /// Most polluted and cleanest locations
    Rank {
        #[arg(long)]
        data: Option<PathBuf>,

        #[arg(long, default_value = "pm25")]
        pollutant: Pollutant,

        #[arg(long, default_value_t = DEFAULT_RANK_LIMIT)]
        limit: usize,
    },
    /// Per-pollutant statistics and the overall rating
    Summary {
        #[arg(long)]
        data: Option<PathBuf>,

        #[arg(long)]
        json: bool,
    },
    /// Tier colours and concentration ranges for a pollutant
    Legend { pollutant: Pollutant },
    /// Load and validate a dataset file
    Check { file: PathBuf },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = real_main(Args::parse()) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main(args: Args) -> Result<(), String> {
    match args.command {
        Command::Classify {
            pollutant,
            value,
            json,
        } => cmd_classify(&pollutant, value, json),
        Command::Table {
            data,
            sort,
            pollutant,
        } => {
            let mut points = load(data.as_deref())?.readings;
            catalog::sort_points(&mut points, sort);
            print!("{}", tools::render_table(&points, pollutant));
            Ok(())
        }
        Command::Rank {
            data,
            pollutant,
            limit,
        } => {
            let points = load(data.as_deref())?.readings;
            let rankings = catalog::rank(&points, pollutant, limit);
            print!("{}", tools::render_rankings(&rankings));
            Ok(())
        }
        Command::Summary { data, json } => {
            let points = load(data.as_deref())?.readings;
            let summary = catalog::summary(&points);
            if json {
                println!("{}", to_json(&summary)?);
            } else {
                print!("{}", tools::render_summary(&summary));
            }
            Ok(())
        }
        Command::Legend { pollutant } => {
            print!("{}", tools::render_legend(&Legend::for_pollutant(pollutant)));
            Ok(())
        }
        Command::Check { file } => cmd_check(&file),
    }
}

/// Unknown pollutant keys are not an error: they classify as `Unknown`.
fn cmd_classify(key: &str, value: f64, json: bool) -> Result<(), String> {
    let classification = aqi::classify_key(key, value);
    if json {
        println!("{}", to_json(&classification)?);
        return Ok(());
    }
    match Pollutant::from_key(key) {
        Some(p) => println!("{}", tools::render_classification(p, value, &classification)),
        None => println!("{key}: {value} -> {}", classification.label),
    }
    Ok(())
}

fn cmd_check(file: &Path) -> Result<(), String> {
    let (dataset, warnings) = Dataset::load_checked(file).map_err(|e| e.to_string())?;
    for w in &warnings {
        println!("warning: {w}");
    }
    println!(
        "{}: {} readings, {} factories, {} warnings",
        file.display(),
        dataset.readings.len(),
        dataset.factories.len(),
        warnings.len()
    );
    println!("fingerprint: {}", dataset.fingerprint().map_err(|e| e.to_string())?);
    Ok(())
}

fn load(path: Option<&Path>) -> Result<Dataset, String> {
    match path {
        Some(path) => {
            debug!("loading dataset from {}", path.display());
            Dataset::load(path).map_err(|e| e.to_string())
        }
        None => Dataset::sample().map_err(|e| e.to_string()),
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| e.to_string())
}
