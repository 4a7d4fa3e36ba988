use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use trip_planner::{TripPlannerConfig, TripPreferences, telemetry, web};

#[derive(Parser)]
#[command(
    name = "trip-planner",
    version,
    about = "Travel itinerary planning service with live flight options"
)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve {
        /// Override the configured port
        #[arg(long)]
        port: Option<u16>,
    },
    /// Compose one itinerary and print it
    Plan {
        /// First day of the trip (YYYY-MM-DD)
        #[arg(long)]
        start: String,
        /// Last day of the trip (YYYY-MM-DD)
        #[arg(long)]
        end: String,
        #[arg(long)]
        source: Option<String>,
        #[arg(long)]
        destination: Option<String>,
        #[arg(long)]
        budget: Option<String>,
        #[arg(long)]
        travelers: Option<u32>,
        #[arg(long)]
        interests: Option<String>,
        /// Append live flight options
        #[arg(long)]
        flights: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut config = TripPlannerConfig::load_from_path(cli.config)?;
    let _telemetry = telemetry::init(&config.logging)?;

    match cli.command.unwrap_or(Command::Serve { port: None }) {
        Command::Serve { port } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            web::run(config).await
        }
        Command::Plan {
            start,
            end,
            source,
            destination,
            budget,
            travelers,
            interests,
            flights,
        } => {
            let mut prefs = TripPreferences::from_defaults(&config.defaults, &start, &end);
            if let Some(source) = source {
                prefs.source = source;
            }
            if let Some(destination) = destination {
                prefs.destination = destination;
            }
            if let Some(budget) = budget {
                prefs.budget = budget;
            }
            if let Some(travelers) = travelers {
                prefs.travelers = travelers;
            }
            if let Some(interests) = interests {
                prefs.interests = interests;
            }
            prefs.include_transportation |= flights;
            prefs.validate()?;

            let state = web::build_state(&config)?;
            let itinerary = state.composer.compose_itinerary(&prefs).await?;
            println!("{}", itinerary.parse());
            Ok(())
        }
    }
}
