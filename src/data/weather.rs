//! OpenWeatherMap API client
//!
//! This module fetches current conditions, the 5-day/3-hour forecast and
//! city search results from the OpenWeatherMap REST API and converts the
//! responses into our weather data structures.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use super::{CitySuggestion, CurrentWeather, Forecast, ForecastSample, Location};
use crate::config::WeatherConfig;

/// Base URL for the OpenWeatherMap API
pub const OPEN_WEATHER_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

/// Units requested from the API; temperatures in Celsius, wind in m/s
const UNITS: &str = "metric";

/// Number of matches requested from the search endpoint
const SEARCH_RESULT_COUNT: usize = 5;

/// Queries shorter than this are not sent to the search endpoint
const MIN_SEARCH_QUERY_LEN: usize = 2;

/// Errors that can occur when talking to the weather service
#[derive(Debug, Error)]
pub enum WeatherError {
    /// No API key was configured
    #[error("No OpenWeatherMap API key configured (use --api-key or OPENWEATHER_API_KEY)")]
    MissingApiKey,

    /// HTTP request failed before a response arrived
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// The request did not complete within the configured timeout
    #[error("Request timed out")]
    Timeout,

    /// The API key was rejected
    #[error("API key rejected by the weather service")]
    Unauthorized,

    /// The requested city or resource does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Any other non-success status
    #[error("Weather service returned status {status}: {message}")]
    Api { status: u16, message: String },

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),
}

impl WeatherError {
    /// Whether the error means the location does not exist, as opposed to a
    /// failing service
    pub fn is_not_found(&self) -> bool {
        matches!(self, WeatherError::NotFound(_))
    }
}

fn transport_error(err: reqwest::Error) -> WeatherError {
    if err.is_timeout() {
        WeatherError::Timeout
    } else {
        WeatherError::RequestFailed(err)
    }
}

/// Lookup of cities matching a partial name
#[async_trait]
pub trait CitySearch: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<CitySuggestion>, WeatherError>;
}

/// Client for the OpenWeatherMap API
#[derive(Debug, Clone)]
pub struct WeatherClient {
    client: Client,
    base_url: String,
    api_key: String,
    language: String,
}

impl WeatherClient {
    /// Create a new WeatherClient with default settings and the given API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: OPEN_WEATHER_BASE_URL.to_string(),
            api_key: api_key.into(),
            language: "tr".to_string(),
        }
    }

    /// Create a client from configuration, applying the request timeout
    ///
    /// # Returns
    /// * `Ok(WeatherClient)` - A ready client
    /// * `Err(WeatherError::MissingApiKey)` - If no API key is configured
    pub fn from_config(config: &WeatherConfig) -> Result<Self, WeatherError> {
        let api_key = config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or(WeatherError::MissingApiKey)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            ..Self::new(api_key)
        }
        .with_base_url(config.base_url.trim_end_matches('/'))
        .with_language(config.language.as_str()))
    }

    /// Point the client at a different API root
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Request descriptions in a different language
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Fetch current conditions for a city name or coordinates
    ///
    /// # Returns
    /// * `Ok(CurrentWeather)` - Current conditions for the location
    /// * `Err(WeatherError::NotFound)` - If the city is unknown
    /// * `Err(WeatherError)` - If the request or parsing fails
    pub async fn fetch_current(&self, location: &Location) -> Result<CurrentWeather, WeatherError> {
        let params = location_params(location);
        let body = self.get("weather", &params, location).await?;
        parse_current(&body)
    }

    /// Fetch the 5-day forecast in 3-hour steps for the given coordinates
    pub async fn fetch_forecast(&self, lat: f64, lon: f64) -> Result<Forecast, WeatherError> {
        let location = Location::Coordinates {
            latitude: lat,
            longitude: lon,
        };
        let params = location_params(&location);
        let body = self.get("forecast", &params, &location).await?;
        parse_forecast(&body)
    }

    /// Search cities whose name matches the query
    ///
    /// Queries shorter than two characters return an empty list without
    /// contacting the service.
    pub async fn search_cities(&self, query: &str) -> Result<Vec<CitySuggestion>, WeatherError> {
        let query = query.trim();
        if query.chars().count() < MIN_SEARCH_QUERY_LEN {
            return Ok(Vec::new());
        }

        let params = vec![
            ("q", query.to_string()),
            ("cnt", SEARCH_RESULT_COUNT.to_string()),
        ];
        let body = self
            .get("find", &params, &Location::City(query.to_string()))
            .await?;
        parse_find(&body)
    }

    /// Performs a GET against an endpoint and returns the body of a successful response
    async fn get(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
        target: &Location,
    ) -> Result<String, WeatherError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!(%url, target = %target, "requesting weather data");

        let response = self
            .client
            .get(&url)
            .query(params)
            .query(&[
                ("appid", self.api_key.as_str()),
                ("units", UNITS),
                ("lang", self.language.as_str()),
            ])
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;

        if status.is_success() {
            return Ok(body);
        }

        warn!(%url, status = status.as_u16(), "weather service returned an error");
        Err(status_error(status, &body, target))
    }
}

#[async_trait]
impl CitySearch for WeatherClient {
    async fn search(&self, query: &str) -> Result<Vec<CitySuggestion>, WeatherError> {
        self.search_cities(query).await
    }
}

fn location_params(location: &Location) -> Vec<(&'static str, String)> {
    match location {
        Location::City(name) => vec![("q", name.trim().to_string())],
        Location::Coordinates {
            latitude,
            longitude,
        } => vec![("lat", latitude.to_string()), ("lon", longitude.to_string())],
    }
}

/// Maps a non-success status to the matching error
fn status_error(status: StatusCode, body: &str, target: &Location) -> WeatherError {
    match status {
        StatusCode::UNAUTHORIZED => WeatherError::Unauthorized,
        StatusCode::NOT_FOUND => WeatherError::NotFound(target.to_string()),
        _ => {
            let message = serde_json::from_str::<ApiErrorBody>(body)
                .ok()
                .and_then(|b| b.message)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown").to_string());
            WeatherError::Api {
                status: status.as_u16(),
                message,
            }
        }
    }
}

/// Parse a `/weather` response body
fn parse_current(body: &str) -> Result<CurrentWeather, WeatherError> {
    let response: CurrentResponse = serde_json::from_str(body)?;
    let condition = response.weather.into_iter().next().unwrap_or_default();
    let wind = response.wind.unwrap_or_default();

    Ok(CurrentWeather {
        city: response.name,
        country: response.sys.country,
        latitude: response.coord.lat,
        longitude: response.coord.lon,
        timestamp: response.dt,
        timezone_offset: response.timezone,
        temperature: response.main.temp,
        feels_like: response.main.feels_like,
        temperature_min: response.main.temp_min,
        temperature_max: response.main.temp_max,
        humidity: response.main.humidity,
        pressure: response.main.pressure,
        sea_level: response.main.sea_level,
        wind_speed: wind.speed,
        wind_direction: wind.deg,
        wind_gust: wind.gust,
        visibility: response.visibility,
        cloudiness: response.clouds.map(|c| c.all).unwrap_or(0),
        sunrise: response.sys.sunrise,
        sunset: response.sys.sunset,
        condition_code: condition.icon,
        description: condition.description,
    })
}

/// Parse a `/forecast` response body, keeping the API's sample order
fn parse_forecast(body: &str) -> Result<Forecast, WeatherError> {
    let response: ForecastResponse = serde_json::from_str(body)?;

    let samples = response
        .list
        .into_iter()
        .map(|item| {
            let condition = item.weather.into_iter().next().unwrap_or_default();
            let wind = item.wind.unwrap_or_default();
            ForecastSample {
                timestamp: item.dt,
                temperature: item.main.temp,
                temperature_min: item.main.temp_min,
                temperature_max: item.main.temp_max,
                feels_like: item.main.feels_like,
                humidity: item.main.humidity,
                pressure: item.main.pressure,
                wind_speed: wind.speed,
                wind_direction: wind.deg,
                precipitation_probability: item.pop,
                condition_code: condition.icon,
                description: condition.description,
            }
        })
        .collect();

    Ok(Forecast {
        city: response.city.name,
        timezone_offset: response.city.timezone,
        samples,
    })
}

/// Parse a `/find` response body
fn parse_find(body: &str) -> Result<Vec<CitySuggestion>, WeatherError> {
    let response: FindResponse = serde_json::from_str(body)?;
    Ok(response
        .list
        .into_iter()
        .map(|item| CitySuggestion {
            id: item.id,
            name: item.name,
            country: item.sys.country,
            latitude: item.coord.lat,
            longitude: item.coord.lon,
        })
        .collect())
}

/// Error body returned with non-success statuses
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Coord {
    lat: f64,
    lon: f64,
}

/// Entry of the `weather` array
#[derive(Debug, Default, Deserialize)]
struct Condition {
    #[serde(default)]
    description: String,
    #[serde(default)]
    icon: String,
}

#[derive(Debug, Deserialize)]
struct MainReadings {
    temp: f64,
    feels_like: f64,
    temp_min: f64,
    temp_max: f64,
    pressure: i32,
    humidity: i32,
    sea_level: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
struct Wind {
    #[serde(default)]
    speed: f64,
    #[serde(default)]
    deg: f64,
    gust: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct Clouds {
    all: i32,
}

#[derive(Debug, Default, Deserialize)]
struct Sys {
    country: Option<String>,
    sunrise: Option<i64>,
    sunset: Option<i64>,
}

/// `/weather` response structure
#[derive(Debug, Deserialize)]
struct CurrentResponse {
    coord: Coord,
    #[serde(default)]
    weather: Vec<Condition>,
    main: MainReadings,
    visibility: Option<u32>,
    wind: Option<Wind>,
    clouds: Option<Clouds>,
    dt: i64,
    #[serde(default)]
    sys: Sys,
    #[serde(default)]
    timezone: i64,
    name: String,
}

/// `/forecast` response structure
#[derive(Debug, Deserialize)]
struct ForecastResponse {
    list: Vec<ForecastItem>,
    city: ForecastCity,
}

#[derive(Debug, Deserialize)]
struct ForecastItem {
    dt: i64,
    main: MainReadings,
    #[serde(default)]
    weather: Vec<Condition>,
    wind: Option<Wind>,
    #[serde(default)]
    pop: f64,
}

#[derive(Debug, Deserialize)]
struct ForecastCity {
    name: String,
    #[serde(default)]
    timezone: i64,
}

/// `/find` response structure
#[derive(Debug, Deserialize)]
struct FindResponse {
    #[serde(default)]
    list: Vec<FindItem>,
}

#[derive(Debug, Deserialize)]
struct FindItem {
    id: u64,
    name: String,
    coord: Coord,
    #[serde(default)]
    sys: Sys,
}
