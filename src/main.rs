//! Nearest aircraft CLI
//!
//! Looks up the aircraft closest to a longitude/latitude pair, or to two
//! well-known landmarks when no coordinate is given.

use clap::Parser;
use skynear::{
    client::{ClientConfig, TrackingClient, DEFAULT_BASE_URL, DEFAULT_MARGIN_STEP},
    distance::Metric,
    nearest::{self, Nearest},
};
use std::fmt::Display;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Landmarks searched when no coordinate is given: (name, longitude, latitude).
const LANDMARKS: [(&str, f64, f64); 2] = [
    ("Eiffel Tower", 48.8584, 2.2945),
    ("John F. Kennedy Airport", 40.6413, -73.7781),
];

#[derive(Parser)]
#[command(name = "skynear")]
#[command(about = "Find the aircraft closest to a coordinate", long_about = None)]
struct Cli {
    /// Longitude of the search target
    #[arg(allow_negative_numbers = true, requires = "latitude")]
    longitude: Option<f64>,

    /// Latitude of the search target
    #[arg(allow_negative_numbers = true)]
    latitude: Option<f64>,

    /// Root URL of the tracking API
    #[arg(long, env = "OPENSKY_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Account name for authenticated requests
    #[arg(long, env = "OPENSKY_USERNAME")]
    username: Option<String>,

    /// Account password for authenticated requests
    #[arg(long, env = "OPENSKY_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Request timeout in seconds
    #[arg(long, default_value = "30")]
    timeout: u64,

    /// Initial box half-width and widening step, in degrees
    #[arg(long, default_value_t = DEFAULT_MARGIN_STEP)]
    margin: f64,

    /// Give up after this many widening rounds (default: never)
    #[arg(long)]
    max_widenings: Option<u32>,

    /// Distance metric used to rank aircraft (geodesic, direct)
    #[arg(long, default_value = "geodesic")]
    metric: Metric,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = ClientConfig::default()
        .with_base_url(cli.base_url.clone())
        .with_timeout(Duration::from_secs(cli.timeout))
        .with_margin_step(cli.margin)
        .with_max_widenings(cli.max_widenings);

    if let Some(username) = cli.username.clone() {
        config = config.with_credentials(username, cli.password.clone());
    }

    let client = TrackingClient::new(config)?;

    match (cli.longitude, cli.latitude) {
        (Some(longitude), Some(latitude)) => {
            println!("Looking for States near ({}, {})...", longitude, latitude);
            let found = nearest::locate(&client, longitude, latitude, cli.metric).await?;
            print_report(
                &format!("the given coordinates ({}, {})", longitude, latitude),
                &found,
            );
        }
        _ => {
            for (name, longitude, latitude) in LANDMARKS {
                println!("Looking for States near the {}...", name);
                let found = nearest::locate(&client, longitude, latitude, cli.metric).await?;
                print_report(&format!("the {}", name), &found);
                println!();
            }
        }
    }

    Ok(())
}

fn print_report(target: &str, found: &Nearest) {
    let state = &found.state;

    println!("Closest State to {}:", target);
    println!("  Distance: {:.3} km", found.distance);
    println!("  Callsign: {}", state.call_sign);
    println!("  Longitude: {}", or_unknown(state.coordinate.longitude));
    println!("  Latitude: {}", or_unknown(state.coordinate.latitude));
    println!("  Geometric Altitude: {}", or_unknown(state.geo_altitude));
    println!("  Country of Origin: {}", state.origin_country);
    println!("  ICAO24 ID: {}", state.icao24);
    println!("  Position Source: {}", state.position_source_kind());
}

fn or_unknown<T: Display>(value: Option<T>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
