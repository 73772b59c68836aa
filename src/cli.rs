use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use thiserror::Error;
use tracing::info;

use crate::algorithms::greedy::GreedyPlanner;
use crate::config::{load_config, OptimizerConfig};
use crate::error::{ConfigError, RoutingError};
use crate::models::Coordinate;
use crate::service::{handle_request, handle_request_routed, OptimizeRequest, OptimizeResponse};
use crate::utils::distance::haversine_distance_with_radius;
use crate::utils::routing::RoutingClient;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("routing error: {0}")]
    Routing(#[from] RoutingError),
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Shopping list plan optimizer", long_about = None)]
pub struct Cli {
    /// Optimizer settings (TOML); defaults apply when omitted
    #[arg(long)]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute cheapest, balanced and single-store plans for a shopping list
    Optimize(OptimizeArgs),
    /// Great-circle distance between two points
    Haversine(HaversineArgs),
}

#[derive(Args, Debug)]
pub struct OptimizeArgs {
    /// Shopping list JSON file, `-` for stdin
    #[arg(long)]
    pub items: PathBuf,
    #[arg(long, allow_negative_numbers = true)]
    pub lat: f64,
    #[arg(long, allow_negative_numbers = true)]
    pub lon: f64,
    /// Tolerance for visiting several stores, 0..=10
    #[arg(long, allow_negative_numbers = true)]
    pub slider: i32,
    #[arg(long, default_value = "")]
    pub cart_id: String,
    /// Ask the routing service for distances before optimizing
    #[arg(long)]
    pub routed: bool,
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Args, Debug)]
pub struct HaversineArgs {
    /// `lat,lon`
    #[arg(long, value_parser = parse_coordinate, allow_hyphen_values = true)]
    pub from: Coordinate,
    /// `lat,lon`
    #[arg(long, value_parser = parse_coordinate, allow_hyphen_values = true)]
    pub to: Coordinate,
}

pub fn parse_coordinate(value: &str) -> std::result::Result<Coordinate, String> {
    let (lat, lon) = value
        .split_once(',')
        .ok_or_else(|| format!("expected `lat,lon`, got `{value}`"))?;
    let lat = lat
        .trim()
        .parse::<f64>()
        .map_err(|err| format!("invalid latitude `{lat}`: {err}"))?;
    let lon = lon
        .trim()
        .parse::<f64>()
        .map_err(|err| format!("invalid longitude `{lon}`: {err}"))?;
    Ok(Coordinate::new(lat, lon))
}

/// Runs the command; `Ok(false)` means an error response was printed
pub async fn run(cli: Cli) -> Result<bool> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => OptimizerConfig::default(),
    };
    config.routing.apply_env();

    match cli.command {
        Commands::Optimize(args) => optimize(&config, args).await,
        Commands::Haversine(args) => {
            let km = haversine_distance_with_radius(args.from, args.to, config.earth_radius_km);
            println!("{km:.3}");
            Ok(true)
        }
    }
}

async fn optimize(config: &OptimizerConfig, args: OptimizeArgs) -> Result<bool> {
    let items_json = read_items(&args.items)?;
    let request = OptimizeRequest {
        cart_id: args.cart_id,
        user_lat: args.lat,
        user_lon: args.lon,
        slider: args.slider,
    };

    let response = if args.routed {
        let client = RoutingClient::new(&config.routing)?;
        if !client.is_configured() {
            info!("no routing service configured, using centroid distances");
        }
        handle_request_routed(config, &client, &request, &items_json).await
    } else {
        handle_request(&GreedyPlanner::new(config.clone()), &request, &items_json)
    };

    print_response(&response, args.pretty)?;
    Ok(!response.is_error())
}

fn read_items(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(std::fs::read_to_string(path)?)
    }
}

fn print_response(response: &OptimizeResponse, pretty: bool) -> Result<()> {
    let rendered = if pretty {
        serde_json::to_string_pretty(response)?
    } else {
        serde_json::to_string(response)?
    };
    println!("{rendered}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_coordinate() {
        assert_eq!(
            parse_coordinate("45.46, -9.19").unwrap(),
            Coordinate::new(45.46, -9.19)
        );
        assert!(parse_coordinate("45.46").is_err());
        assert!(parse_coordinate("north,9").is_err());
    }

    #[test]
    fn test_cli_parses_optimize() {
        let cli = Cli::try_parse_from([
            "cart-optimizer",
            "optimize",
            "--items",
            "cart.json",
            "--lat",
            "-33.9",
            "--lon",
            "18.4",
            "--slider",
            "-1",
        ])
        .unwrap();

        match cli.command {
            Commands::Optimize(args) => {
                assert_eq!(args.lat, -33.9);
                assert_eq!(args.slider, -1);
                assert!(!args.routed);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_run_writes_error_for_bad_slider() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, b"[]").unwrap();

        let cli = Cli {
            config: None,
            command: Commands::Optimize(OptimizeArgs {
                items: file.path().to_path_buf(),
                lat: 0.0,
                lon: 0.0,
                slider: 42,
                cart_id: String::new(),
                routed: false,
                pretty: false,
            }),
        };
        assert!(!run(cli).await.unwrap());
    }
}
