//! Weather lookup for UV-aware briefings
//!
//! Uses the Open-Meteo forecast API (no key required). Only today's maximum UV
//! index, the current temperature and the WMO weather code are read.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::Location;

/// ---------------------------------------------------------------------------
/// Configuration Constants
/// ---------------------------------------------------------------------------

const FORECAST_PATH: &str = "/v1/forecast";

/// UV index at which sessions should be reconsidered
pub const HIGH_UV_THRESHOLD: f64 = 6.0;

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
  #[error("Invalid weather URL: {0}")]
  Url(String),

  #[error("HTTP request failed: {0}")]
  Request(#[from] reqwest::Error),

  #[error("API error: {0}")]
  Api(String),

  #[error("Forecast had no daily UV value")]
  MissingUv,
}

impl Serialize for WeatherError {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: serde::Serializer,
  {
    serializer.serialize_str(&self.to_string())
  }
}

/// ---------------------------------------------------------------------------
/// Weather Data
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherData {
  pub uv_index: f64,
  pub temperature: f64,
  /// WMO weather interpretation code
  pub code: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UvRisk {
  Low,
  Moderate,
  High,
  VeryHigh,
}

impl WeatherData {
  pub fn uv_risk(&self) -> UvRisk {
    match self.uv_index {
      uv if uv >= 8.0 => UvRisk::VeryHigh,
      uv if uv >= HIGH_UV_THRESHOLD => UvRisk::High,
      uv if uv >= 3.0 => UvRisk::Moderate,
      _ => UvRisk::Low,
    }
  }
}

/// Open-Meteo response (only the fields we read)
#[derive(Debug, Deserialize)]
struct ForecastResponse {
  current: CurrentConditions,
  daily: DailyForecast,
}

#[derive(Debug, Deserialize)]
struct CurrentConditions {
  temperature_2m: f64,
  weather_code: i64,
}

#[derive(Debug, Deserialize)]
struct DailyForecast {
  uv_index_max: Vec<Option<f64>>,
}

/// ---------------------------------------------------------------------------
/// Weather Client
/// ---------------------------------------------------------------------------

pub struct WeatherClient {
  client: Client,
  base_url: String,
}

impl WeatherClient {
  pub fn new(base_url: impl Into<String>) -> Self {
    Self {
      client: Client::new(),
      base_url: base_url.into(),
    }
  }

  fn forecast_url(&self, location: Location) -> Result<Url, WeatherError> {
    let mut url = Url::parse(&self.base_url)
      .and_then(|base| base.join(FORECAST_PATH))
      .map_err(|e| WeatherError::Url(e.to_string()))?;

    url
      .query_pairs_mut()
      .append_pair("latitude", &location.latitude.to_string())
      .append_pair("longitude", &location.longitude.to_string())
      .append_pair("current", "temperature_2m,weather_code")
      .append_pair("daily", "uv_index_max")
      .append_pair("timezone", "auto")
      .append_pair("forecast_days", "1");

    Ok(url)
  }

  /// Fetch today's conditions. Single attempt, no retry.
  pub async fn fetch(&self, location: Location) -> Result<WeatherData, WeatherError> {
    let url = self.forecast_url(location)?;
    log::debug!("Fetching weather from {}", url);

    let response = self.client.get(url).send().await?;

    if !response.status().is_success() {
      let status = response.status();
      let error_text = response.text().await.unwrap_or_default();
      return Err(WeatherError::Api(format!(
        "Forecast API error {}: {}",
        status, error_text
      )));
    }

    let forecast: ForecastResponse = response.json().await?;
    let uv_index = forecast
      .daily
      .uv_index_max
      .first()
      .copied()
      .flatten()
      .ok_or(WeatherError::MissingUv)?;

    Ok(WeatherData {
      uv_index,
      temperature: forecast.current.temperature_2m,
      code: forecast.current.weather_code,
    })
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
