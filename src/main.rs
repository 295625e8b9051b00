use std::path::PathBuf;
use std::process::ExitCode;

use chrono::NaiveDateTime;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use trip_planner::config::PlannerConfig;
use trip_planner::pipeline::{TripAnalysisPipeline, TripRequest};

/// Compare driving routes by estimated travel time.
#[derive(Debug, Parser)]
#[command(name = "trip-planner")]
struct Args {
    /// TOML configuration file. Defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Start point, address or "lat,lng".
    #[arg(long)]
    origin: String,
    /// End point, address or "lat,lng".
    #[arg(long)]
    destination: String,
    /// Planned departure, e.g. 2025-09-09T08:00. Leave out to depart now.
    #[arg(long, value_parser = parse_departure)]
    departure: Option<NaiveDateTime>,
}

fn parse_departure(text: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S"))
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            tracing::error!("{message}");
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), String> {
    if args.origin.trim().is_empty() || args.destination.trim().is_empty() {
        return Err("both origin and destination are required".to_string());
    }

    let config = match &args.config {
        Some(path) => PlannerConfig::from_file(path).map_err(|e| e.to_string())?,
        None => PlannerConfig::default(),
    }
    .with_env_credentials();

    let routes = config.build_route_provider().map_err(|e| e.to_string())?;
    let weather = config.build_weather_provider().map_err(|e| e.to_string())?;
    let estimator = config.build_estimator().map_err(|e| e.to_string())?;
    let pipeline = TripAnalysisPipeline::new(routes, weather, estimator).map_err(|e| e.to_string())?;

    let mut request = TripRequest::new(args.origin.trim(), args.destination.trim());
    request.departure = args.departure;

    let analysis = pipeline.analyze(&request).map_err(|e| e.to_string())?;
    let json = serde_json::to_string_pretty(&analysis).map_err(|e| e.to_string())?;
    println!("{json}");
    Ok(())
}
