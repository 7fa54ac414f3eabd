mod doctors;
mod hospitals;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "medfinder-cli")]
#[command(about = "Hospital and doctor lookup from the command line")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Hospitals (or another place type) around a coordinate
    Nearby {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
        /// Search radius in meters [default: 5000]
        #[arg(long)]
        radius: Option<u32>,
        /// Provider place type [default: hospital]
        #[arg(long = "type")]
        place_type: Option<String>,
    },
    /// Details for one place id
    Details {
        #[arg(long)]
        place_id: String,
    },
    /// Find a hospital by name, falling back to nearby candidates
    Find {
        #[arg(long)]
        name: String,
        #[arg(long = "type")]
        place_type: Option<String>,
    },
    /// Scrape one page of the doctor directory
    Doctors {
        #[arg(long)]
        city: String,
        #[arg(long)]
        specialty: String,
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        page: u32,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = medfinder_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Nearby {
            lat,
            lon,
            radius,
            place_type,
        } => hospitals::run_nearby(&config, lat, lon, radius, place_type.as_deref()).await,
        Commands::Details { place_id } => hospitals::run_details(&config, &place_id).await,
        Commands::Find { name, place_type } => {
            hospitals::run_find(&config, &name, place_type.as_deref()).await
        }
        Commands::Doctors {
            city,
            specialty,
            page,
        } => doctors::run_doctors(&config, &city, &specialty, page).await,
    }
}

/// Writes `value` to stdout as pretty JSON.
pub(crate) fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
