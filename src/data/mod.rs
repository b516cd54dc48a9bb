//! Core data models for Hava Durumu
//!
//! This module contains the weather types shared by the API client, the
//! forecast aggregator and the screens.

pub mod weather;

pub use weather::{CitySearch, WeatherClient, WeatherError};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Seconds in one UTC calendar day
const SECONDS_PER_DAY: i64 = 86_400;

/// Where to fetch weather for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Location {
    /// A city name resolved by the weather service
    City(String),
    /// Latitude and longitude in decimal degrees
    Coordinates { latitude: f64, longitude: f64 },
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::City(name) => write!(f, "{}", name),
            Location::Coordinates {
                latitude,
                longitude,
            } => write!(f, "{:.2}, {:.2}", latitude, longitude),
        }
    }
}

/// One point-in-time forecast sample
///
/// Samples come from a forecast response in chronological order; nothing
/// downstream re-sorts them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSample {
    /// Seconds since the Unix epoch (UTC)
    pub timestamp: i64,
    /// Temperature in Celsius
    pub temperature: f64,
    pub temperature_min: f64,
    pub temperature_max: f64,
    /// Feels-like temperature in Celsius
    pub feels_like: f64,
    /// Relative humidity percentage, passed through unchecked
    pub humidity: i32,
    /// Pressure in hPa
    pub pressure: i32,
    /// Wind speed in m/s
    pub wind_speed: f64,
    /// Wind direction in degrees
    pub wind_direction: f64,
    /// Probability of precipitation (0-1)
    pub precipitation_probability: f64,
    /// Condition code such as "10d"
    pub condition_code: String,
    /// Localized condition description
    pub description: String,
}

impl ForecastSample {
    /// Whole UTC days since the epoch; any timezone offset is ignored
    pub fn day_index(&self) -> i64 {
        self.timestamp.div_euclid(SECONDS_PER_DAY)
    }

    /// UTC calendar date of the sample, if the timestamp is representable
    pub fn date(&self) -> Option<NaiveDate> {
        DateTime::<Utc>::from_timestamp(self.timestamp, 0).map(|dt| dt.date_naive())
    }
}

/// Current conditions for a location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    /// City name reported by the weather service
    pub city: String,
    /// ISO country code, if reported
    pub country: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    /// Observation time, seconds since the epoch
    pub timestamp: i64,
    /// Shift from UTC in seconds for the location
    pub timezone_offset: i64,
    pub temperature: f64,
    pub feels_like: f64,
    pub temperature_min: f64,
    pub temperature_max: f64,
    pub humidity: i32,
    pub pressure: i32,
    /// Sea-level pressure in hPa, if reported
    pub sea_level: Option<i32>,
    /// Wind speed in m/s
    pub wind_speed: f64,
    pub wind_direction: f64,
    /// Wind gust in m/s, if reported
    pub wind_gust: Option<f64>,
    /// Visibility in meters, if reported
    pub visibility: Option<u32>,
    /// Cloud cover percentage
    pub cloudiness: i32,
    pub sunrise: Option<i64>,
    pub sunset: Option<i64>,
    pub condition_code: String,
    pub description: String,
}

impl CurrentWeather {
    /// Coordinates of the observation, used to request the forecast
    pub fn location(&self) -> Location {
        Location::Coordinates {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

/// Forecast samples for a location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub city: String,
    /// Shift from UTC in seconds for the location
    pub timezone_offset: i64,
    /// Samples in chronological order (typically 3-hourly over 5 days)
    pub samples: Vec<ForecastSample>,
}

/// A city returned by the search endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CitySuggestion {
    pub id: u64,
    pub name: String,
    pub country: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

impl CitySuggestion {
    pub fn location(&self) -> Location {
        Location::Coordinates {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}
