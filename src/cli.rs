//! Command-line interface parsing for Hava Durumu
//!
//! This module handles parsing of CLI arguments using clap and resolves them,
//! together with the loaded configuration, into the startup settings.

use std::path::PathBuf;
use std::str::FromStr;

use clap::Parser;
use thiserror::Error;

use crate::config::AppConfig;
use crate::data::Location;

/// Error types for CLI argument parsing
#[derive(Debug, Error, PartialEq)]
pub enum CliError {
    /// The coordinates could not be parsed or are out of range
    #[error("Invalid coordinates: '{0}'. Expected LAT,LON such as 41.01,28.95")]
    InvalidCoordinates(String),
}

/// A latitude/longitude pair given on the command line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl FromStr for Coordinates {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CliError::InvalidCoordinates(s.to_string());

        let (lat, lon) = s.split_once(',').ok_or_else(invalid)?;
        let latitude: f64 = lat.trim().parse().map_err(|_| invalid())?;
        let longitude: f64 = lon.trim().parse().map_err(|_| invalid())?;

        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(invalid());
        }

        Ok(Self {
            latitude,
            longitude,
        })
    }
}

/// Hava Durumu - current weather and forecasts in the terminal
#[derive(Parser, Debug)]
#[command(name = "havadurumu")]
#[command(about = "Current weather, hourly and daily forecasts, and city search")]
#[command(version)]
pub struct Cli {
    /// City to show on startup (defaults to the configured city)
    ///
    /// Examples:
    ///   havadurumu --city Ankara
    ///   havadurumu --coords 38.42,27.14
    #[arg(long, short, value_name = "CITY", conflicts_with = "coords")]
    pub city: Option<String>,

    /// Coordinates to show on startup
    #[arg(long, value_name = "LAT,LON", allow_hyphen_values = true)]
    pub coords: Option<Coordinates>,

    /// OpenWeatherMap API key
    #[arg(long, env = "OPENWEATHER_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Config file to use instead of the default location
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Write logs to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Open directly in the detail view
    #[arg(long)]
    pub detail: bool,
}

/// Settings derived from CLI arguments and configuration for application startup
#[derive(Debug, Clone, PartialEq)]
pub struct StartupConfig {
    /// Location loaded first
    pub location: Location,
    /// Whether to start in the detail view once data is loaded
    pub start_in_detail: bool,
}

impl StartupConfig {
    /// Resolves the startup location: coordinates, then city, then the
    /// configured default city.
    pub fn resolve(cli: &Cli, config: &AppConfig) -> Self {
        let location = match (&cli.coords, &cli.city) {
            (Some(coords), _) => Location::Coordinates {
                latitude: coords.latitude,
                longitude: coords.longitude,
            },
            (None, Some(city)) if !city.trim().is_empty() => Location::City(city.trim().to_string()),
            _ => Location::City(config.display.default_city.clone()),
        };

        Self {
            location,
            start_in_detail: cli.detail,
        }
    }
}
