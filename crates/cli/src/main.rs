//! HOS Compliance Scheduler CLI
//!
//! Plans a trip's fuel and rest stops and its daily duty logs, either
//! locally or against a running hos-server.

mod args;
mod client;
mod commands;
mod config;
mod output;

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use clap::{Args, Parser, Subcommand};
use commands::{limits, plan};
use hos_lib::limits::{DayLogMode, AVG_SPEED_MPH, PICKUP_DROPOFF_HOURS};
use hos_lib::models::{Coordinate, TripRequest};
use tracing_subscriber::EnvFilter;

const DEFAULT_API_URL: &str = "http://localhost:8080";

/// HOS Compliance Scheduler CLI
#[derive(Parser)]
#[command(name = "hos")]
#[command(author, version, about = "CLI for the HOS Compliance Scheduler", long_about = None)]
pub struct Cli {
    /// Scheduler server URL for --remote (can also be set via HOS_API_URL env var)
    #[arg(long, env = "HOS_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Output format
    #[arg(long, short, global = true)]
    pub format: Option<output::OutputFormat>,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Plan fuel and rest stops and build daily logs for a trip
    Plan(PlanArgs),

    /// Show the Hours-of-Service limits
    Limits {
        /// Ask the server instead of showing the built-in limits
        #[arg(long)]
        remote: bool,
    },
}

#[derive(Args)]
pub struct PlanArgs {
    /// Trip distance in miles
    #[arg(long)]
    pub miles: f64,

    /// Route duration hint in hours (defaults to driving time plus pickup and dropoff)
    #[arg(long)]
    pub duration: Option<f64>,

    /// Hours already used in the current cycle
    #[arg(long)]
    pub cycle_used: f64,

    /// Departure time as YYYY-MM-DDTHH:MM
    #[arg(long, value_parser = args::parse_departure)]
    pub departure: NaiveDateTime,

    /// Current location as lon,lat
    #[arg(long, value_parser = args::parse_coordinate, allow_hyphen_values = true)]
    pub origin: Option<Coordinate>,

    /// Pickup location as lon,lat
    #[arg(long, value_parser = args::parse_coordinate, allow_hyphen_values = true)]
    pub pickup: Option<Coordinate>,

    /// Dropoff location as lon,lat
    #[arg(long, value_parser = args::parse_coordinate, allow_hyphen_values = true)]
    pub dropoff: Option<Coordinate>,

    /// Day log mode: parity or stop-aware
    #[arg(long, value_parser = args::parse_mode)]
    pub mode: Option<DayLogMode>,

    /// Take rest stops in the sleeper berth
    #[arg(long)]
    pub sleeper_berth: bool,

    /// Plan on the server instead of locally
    #[arg(long)]
    pub remote: bool,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        output::print_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
            )
            .with_writer(std::io::stderr)
            .init();
    }

    let config = config::Config::load().unwrap_or_else(|e| {
        output::print_warning(&format!("Ignoring config file: {:#}", e));
        config::Config::default()
    });

    let format = cli
        .format
        .or_else(|| {
            config
                .default_format
                .as_deref()
                .and_then(output::OutputFormat::from_config)
        })
        .unwrap_or_default();
    let api_url = cli
        .api_url
        .clone()
        .or_else(|| config.api_url.clone())
        .unwrap_or_else(|| DEFAULT_API_URL.to_string());

    match cli.command {
        Commands::Plan(plan_args) => {
            let route = args::route_from(plan_args.origin, plan_args.pickup, plan_args.dropoff)?;
            let request = TripRequest {
                total_miles: plan_args.miles,
                total_duration_hours: plan_args
                    .duration
                    .unwrap_or(plan_args.miles / AVG_SPEED_MPH + 2.0 * PICKUP_DROPOFF_HOURS),
                cycle_hours_used: plan_args.cycle_used,
                departure_time: plan_args.departure,
                route,
            };

            if plan_args.remote {
                if plan_args.mode.is_some() || plan_args.sleeper_berth {
                    output::print_warning(
                        "--mode and --sleeper-berth are ignored with --remote, the server's settings apply",
                    );
                }
                let client = client::ApiClient::new(&api_url)?;
                plan::plan_trip(plan::Planner::Remote(&client), request, format).await?;
            } else {
                let mode = match plan_args.mode {
                    Some(mode) => mode,
                    None => config
                        .default_mode
                        .as_deref()
                        .map(args::parse_mode)
                        .transpose()
                        .context("Invalid default_mode in config file")?
                        .unwrap_or_default(),
                };
                let options = plan::local_options(mode, plan_args.sleeper_berth);
                plan::plan_trip(plan::Planner::Local(options), request, format).await?;
            }
        }
        Commands::Limits { remote } => {
            let client = if remote {
                Some(client::ApiClient::new(&api_url)?)
            } else {
                None
            };
            limits::show_limits(client.as_ref(), format).await?;
        }
    }

    Ok(())
}
