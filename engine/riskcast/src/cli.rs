use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use riskcast_estimate::Domain;

#[derive(Debug, Parser)]
#[command(
    name = "riskcast",
    version,
    about = "Weather hazard risk classification and scenario estimates",
    long_about = "riskcast classifies 0-10 risk scores, estimates composite flooding and\n\
        cyclone risk from scenario factors, and renders stored prediction records.\n\n\
        EXAMPLES:\n\
        \n  riskcast classify 4.9\n\
        \n  riskcast estimate --domain flooding rainfall_factor=0.5 flood_probability=0.3\n\
        \n  riskcast estimate --domain cyclone --scenario storm.txt --explain\n\
        \n  riskcast assess flooding --rainfall-mm 80 --density 2500\n\
        \n  riskcast rainfall forecast.json --limit 24\n\
        \n  riskcast records flooding.json --kind flooding"
)]
pub struct Cli {
    /// Increase verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Configuration file (defaults to ./riskcast.toml when present)
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Classify a score and print its category and colour
    Classify(ClassifyArgs),

    /// Estimate composite risk from scenario factors
    ///
    /// Normalized factors left out of the scenario are derived from raw
    /// measurements when those are given: rainfall_factor from
    /// predicted_rainfall_mm, wind_factor from wind_speed, category_weight
    /// from category, distance_factor from distance_km,
    /// infrastructure_vulnerability from infrastructure_strength and
    /// population_factor from population_size.
    /// flood_probability is derived only when predicted_rainfall_mm and all
    /// three site factors are present.
    Estimate(EstimateArgs),

    /// Assess risk from raw conditions through the prediction wrappers
    #[command(subcommand)]
    Assess(AssessCommand),

    /// Hourly rainfall forecasts from an Open-Meteo payload
    Rainfall(RainfallArgs),

    /// Render stored prediction records from an API response
    Records(RecordsArgs),

    /// Describe the API request for a prediction listing without sending it
    Request(RequestArgs),
}

#[derive(Debug, Args, Clone)]
pub struct ClassifyArgs {
    /// Score on the 0-10 scale; unparseable input classifies as 0.00
    #[arg(value_name = "SCORE", allow_hyphen_values = true)]
    pub score: String,

    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args, Clone)]
pub struct EstimateArgs {
    /// Hazard formula to apply (flooding, cyclone)
    #[arg(short, long)]
    pub domain: Domain,

    /// Scenario file of `factor = value` assignments
    #[arg(long, value_name = "FILE")]
    pub scenario: Option<PathBuf>,

    /// Extra assignments such as `wind_factor=0.4`, applied after the file
    #[arg(value_name = "ASSIGNMENT")]
    pub assignments: Vec<String>,

    /// Show each term's contribution
    #[arg(long)]
    pub explain: bool,

    /// Add a bounded random perturbation to the score
    #[arg(long)]
    pub simulate_uncertainty: bool,

    /// Seed for --simulate-uncertainty
    #[arg(long, requires = "simulate_uncertainty")]
    pub seed: Option<u64>,

    /// Half-width of the perturbation (overrides the config)
    #[arg(long, requires = "simulate_uncertainty")]
    pub spread: Option<f64>,

    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Subcommand, Clone)]
pub enum AssessCommand {
    /// Flooding risk, water level and affected population
    Flooding(AssessFloodingArgs),
    /// Cyclone category, track and risk
    Cyclone(AssessCycloneArgs),
}

#[derive(Debug, Args, Clone)]
pub struct AssessFloodingArgs {
    #[arg(long, value_name = "MM", default_value_t = 0.0)]
    pub rainfall_mm: f64,
    #[arg(long, value_name = "0-10")]
    pub infrastructure: Option<f64>,
    #[arg(long, value_name = "0-10")]
    pub soil: Option<f64>,
    #[arg(long, value_name = "0-10")]
    pub vegetation: Option<f64>,
    /// People per km²
    #[arg(long)]
    pub density: Option<f64>,
    #[arg(long, value_name = "0-10")]
    pub drainage: Option<f64>,
    #[arg(long, value_name = "KM2")]
    pub base_area: Option<f64>,
    /// JSON linear model (overrides the config)
    #[arg(long, value_name = "FILE")]
    pub model: Option<PathBuf>,
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args, Clone)]
pub struct AssessCycloneArgs {
    #[arg(long, value_name = "KMH")]
    pub wind_kmh: Option<f64>,
    #[arg(long, value_name = "HPA")]
    pub pressure: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    pub lat: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    pub lon: Option<f64>,
    /// Direction of travel, degrees clockwise from north
    #[arg(long)]
    pub heading: Option<f64>,
    /// Forward speed in km/h
    #[arg(long)]
    pub speed: Option<f64>,
    /// Distance from the site in km
    #[arg(long)]
    pub distance: Option<f64>,
    #[arg(long, value_name = "0-10")]
    pub infrastructure: Option<f64>,
    #[arg(long)]
    pub population: Option<f64>,
    /// Let the track heading wander, seeded for reproducibility
    #[arg(long)]
    pub jitter_seed: Option<u64>,
    #[arg(long, value_name = "FILE")]
    pub model: Option<PathBuf>,
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args, Clone)]
pub struct RainfallArgs {
    /// Open-Meteo response saved as JSON
    #[arg(value_name = "OPEN_METEO_JSON")]
    pub file: PathBuf,
    /// Number of hours to forecast
    #[arg(long, default_value_t = 48)]
    pub limit: usize,
    #[arg(long, value_name = "FILE")]
    pub model: Option<PathBuf>,
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RecordKind {
    Rainfall,
    Flooding,
    Cyclone,
}

/// Filters shared by `records` and `request`.
#[derive(Debug, Args, Clone, Default)]
pub struct FilterArgs {
    #[arg(long)]
    pub location: Option<String>,
    /// Earliest date, YYYY-MM-DD
    #[arg(long)]
    pub from: Option<String>,
    /// Latest date, YYYY-MM-DD
    #[arg(long)]
    pub to: Option<String>,
    #[arg(long)]
    pub historical: Option<bool>,
}

#[derive(Debug, Args, Clone)]
pub struct RecordsArgs {
    /// API response saved as JSON (any envelope shape)
    #[arg(value_name = "API_JSON")]
    pub file: PathBuf,
    #[arg(long, value_enum)]
    pub kind: RecordKind,
    #[command(flatten)]
    pub filter: FilterArgs,
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args, Clone)]
pub struct RequestArgs {
    #[arg(value_enum)]
    pub kind: RecordKind,
    #[command(flatten)]
    pub filter: FilterArgs,
    /// Bearer token; falls back to RISKCAST_TOKEN
    #[arg(long)]
    pub token: Option<String>,
}
