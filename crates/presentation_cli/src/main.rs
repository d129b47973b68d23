//! Location services CLI
//!
//! Command-line front end for geocoding, place search and routing.

#![allow(clippy::print_stdout)]

mod output;
mod settings;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use domain::Coordinate;
use location_services::{
    CredentialHolder, GeocodeOptions, Geocoder, GeocodingClient, HttpTransport,
    LocationServicesConfig, PlaceFinder, PlaceSearchClient, Router, RoutingClient, Transport,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Location services CLI
#[derive(Debug, Parser)]
#[command(name = "location-cli")]
#[command(author, version, about = "Geocoding, place search and routing from the command line", long_about = None)]
struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Configuration file (defaults to ./location.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Application client id (required for routing)
    #[arg(long, env = "CLIENTID", global = true)]
    client_id: Option<String>,

    /// Application client secret (required for routing)
    #[arg(long, env = "CLIENTSECRET", hide_env_values = true, global = true)]
    client_secret: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Convert an address or place name to candidate locations
    Geocode {
        /// Text to search for
        query: Option<String>,

        /// Category filter
        #[arg(long, default_value = "POI")]
        category: String,
    },

    /// Find places of given categories near a location
    ///
    /// Example: location-cli places --category Museum --near=-77.02,38.90
    Places {
        /// Place category (repeatable; defaults to landmarks, monuments and museums)
        #[arg(long = "category")]
        categories: Vec<String>,

        /// Search location as "x,y" (longitude,latitude)
        #[arg(long, allow_hyphen_values = true)]
        near: Option<Coordinate>,

        /// Maximum number of places
        #[arg(long)]
        limit: Option<u32>,
    },

    /// Get driving directions between stops
    ///
    /// Example: location-cli directions --stop=-77.02,38.90 --stop=-77.04,38.90
    Directions {
        /// Stop as "x,y" (repeatable; fewer than two uses the default stops)
        #[arg(long = "stop", allow_hyphen_values = true)]
        stops: Vec<Coordinate>,
    },

    /// Geocode the query if given, then route between the default stops
    Demo {
        /// Text to search for
        query: Option<String>,
    },
}

/// Determine log filter level from verbosity count
const fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Shared transport and configuration for one CLI run
struct Services {
    config: LocationServicesConfig,
    transport: Arc<dyn Transport>,
}

impl Services {
    fn new(config: LocationServicesConfig) -> anyhow::Result<Self> {
        let transport: Arc<dyn Transport> = Arc::new(HttpTransport::new(&config)?);
        Ok(Self { config, transport })
    }

    fn geocoder(&self) -> GeocodingClient {
        GeocodingClient::new(Arc::clone(&self.transport), &self.config)
    }

    fn places(&self) -> PlaceSearchClient {
        PlaceSearchClient::new(Arc::clone(&self.transport), &self.config)
    }

    fn router(&self, client_id: Option<String>, client_secret: Option<String>) -> anyhow::Result<RoutingClient> {
        let client_id = client_id.context("routing requires --client-id or CLIENTID")?;
        let client_secret =
            client_secret.context("routing requires --client-secret or CLIENTSECRET")?;

        let credentials = CredentialHolder::new(
            Arc::clone(&self.transport),
            client_id,
            client_secret,
            &self.config,
        )?;

        Ok(RoutingClient::new(
            Arc::clone(&self.transport),
            Arc::new(credentials),
            &self.config,
        ))
    }
}

async fn run_geocode(services: &Services, query: &str, options: &GeocodeOptions) -> anyhow::Result<()> {
    if query.trim().is_empty() {
        println!("Nothing to search for - done!");
        return Ok(());
    }

    let candidates = services
        .geocoder()
        .geocode(query, options)
        .await
        .map_err(|e| anyhow!("Geocoding error {e}"))?;

    println!("{}", output::geocode_report(query, &candidates)?);
    Ok(())
}

async fn run_directions(router: &RoutingClient, stops: &[Coordinate]) -> anyhow::Result<()> {
    let directions = router
        .get_directions(stops)
        .await
        .map_err(|e| anyhow!("Routing error {e}"))?;

    print!("{}", output::directions_report(&directions)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let filter = log_filter_from_verbosity(cli.verbose);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = settings::load(cli.config.as_deref()).context("invalid configuration")?;
    tracing::debug!(?config, "Configuration loaded");
    let services = Services::new(config)?;

    match cli.command {
        Commands::Geocode { query, category } => {
            let options = GeocodeOptions {
                category: Some(category),
                ..GeocodeOptions::poi()
            };
            run_geocode(&services, query.as_deref().unwrap_or_default(), &options).await?;
        },

        Commands::Places {
            categories,
            near,
            limit,
        } => {
            let places = services
                .places()
                .find_places(&categories, near, limit)
                .await
                .map_err(|e| anyhow!("Find places error {e}"))?;

            print!("{}", output::places_report(&categories, near, &places));
        },

        Commands::Directions { stops } => {
            let router = services.router(cli.client_id, cli.client_secret)?;
            run_directions(&router, &stops).await?;
        },

        Commands::Demo { query } => {
            if let Some(query) = query.filter(|q| !q.trim().is_empty()) {
                run_geocode(&services, &query, &GeocodeOptions::poi()).await?;
            }

            let router = services.router(cli.client_id, cli.client_secret)?;
            run_directions(&router, &[]).await?;
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("location-cli").chain(args.iter().copied()))
    }

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn log_filter_verbosity() {
        assert_eq!(log_filter_from_verbosity(0), "warn");
        assert_eq!(log_filter_from_verbosity(1), "info");
        assert_eq!(log_filter_from_verbosity(2), "debug");
        assert_eq!(log_filter_from_verbosity(3), "trace");
        assert_eq!(log_filter_from_verbosity(10), "trace");
    }

    #[test]
    fn parses_geocode() {
        let cli = parse(&["geocode", "1600 Pennsylvania Ave"]).unwrap();
        match cli.command {
            Commands::Geocode { query, category } => {
                assert_eq!(query.as_deref(), Some("1600 Pennsylvania Ave"));
                assert_eq!(category, "POI");
            },
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_geocode_without_query() {
        let cli = parse(&["geocode"]).unwrap();
        assert!(matches!(cli.command, Commands::Geocode { query: None, .. }));
    }

    #[test]
    fn parses_places_with_negative_coordinate() {
        let cli = parse(&[
            "places",
            "--category",
            "Museum",
            "--category",
            "Landmark",
            "--near",
            "-77.02,38.90",
            "--limit",
            "3",
        ])
        .unwrap();

        match cli.command {
            Commands::Places {
                categories,
                near,
                limit,
            } => {
                assert_eq!(categories, vec!["Museum", "Landmark"]);
                assert_eq!(near, Some(Coordinate::new_unchecked(-77.02, 38.90)));
                assert_eq!(limit, Some(3));
            },
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_places_defaults() {
        let cli = parse(&["places"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Places { ref categories, near: None, limit: None } if categories.is_empty()
        ));
    }

    #[test]
    fn parses_directions_stops() {
        let cli = parse(&["directions", "--stop=-77.02,38.90", "--stop", "-77.04,38.90"]).unwrap();
        match cli.command {
            Commands::Directions { stops } => {
                assert_eq!(stops.len(), 2);
                assert!((stops[1].x() - -77.04).abs() < f64::EPSILON);
            },
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_invalid_coordinate() {
        assert!(parse(&["directions", "--stop", "500,38.9"]).is_err());
        assert!(parse(&["places", "--near", "not-a-point"]).is_err());
    }

    #[test]
    fn credentials_from_flags() {
        let cli = parse(&["--client-id", "abc", "--client-secret", "xyz", "demo"]).unwrap();
        assert_eq!(cli.client_id.as_deref(), Some("abc"));
        assert_eq!(cli.client_secret.as_deref(), Some("xyz"));
        assert!(matches!(cli.command, Commands::Demo { query: None }));
    }

    #[test]
    fn routing_requires_credentials() {
        let services = Services::new(LocationServicesConfig::for_testing()).unwrap();
        let err = services.router(None, Some("secret".to_string())).unwrap_err();
        assert!(err.to_string().contains("client-id"));

        let err = services.router(Some("id".to_string()), None).unwrap_err();
        assert!(err.to_string().contains("client-secret"));

        assert!(services.router(Some("id".to_string()), Some("secret".to_string())).is_ok());
    }
}
