//! Environment-driven configuration
//!
//! Values come from the process environment, optionally seeded from a `.env`
//! file by `dotenvy` at startup.

use std::env;
use std::path::PathBuf;

/// ---------------------------------------------------------------------------
/// Configuration Constants
/// ---------------------------------------------------------------------------

const DEFAULT_DB_PATH: &str = "ipl-tracker.db";
pub const DEFAULT_GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_WEATHER_API_URL: &str = "https://api.open-meteo.com";

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  #[error("Invalid value for {name}: {value}")]
  Invalid { name: &'static str, value: String },

  #[error("{0} is set but {1} is missing")]
  Incomplete(&'static str, &'static str),
}

/// ---------------------------------------------------------------------------
/// Configuration
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
  pub latitude: f64,
  pub longitude: f64,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub db_path: PathBuf,
  /// Where to look up the UV index; weather is skipped when unset
  pub location: Option<Location>,
  pub gemini_api_key: Option<String>,
  pub gemini_api_url: String,
  pub weather_api_url: String,
}

impl Default for AppConfig {
  fn default() -> Self {
    Self {
      db_path: PathBuf::from(DEFAULT_DB_PATH),
      location: None,
      gemini_api_key: None,
      gemini_api_url: DEFAULT_GEMINI_API_URL.to_string(),
      weather_api_url: DEFAULT_WEATHER_API_URL.to_string(),
    }
  }
}

impl AppConfig {
  pub fn from_env() -> Result<Self, ConfigError> {
    let defaults = Self::default();

    let latitude = parse_coordinate("IPL_LATITUDE", -90.0, 90.0)?;
    let longitude = parse_coordinate("IPL_LONGITUDE", -180.0, 180.0)?;
    let location = match (latitude, longitude) {
      (Some(latitude), Some(longitude)) => Some(Location { latitude, longitude }),
      (Some(_), None) => return Err(ConfigError::Incomplete("IPL_LATITUDE", "IPL_LONGITUDE")),
      (None, Some(_)) => return Err(ConfigError::Incomplete("IPL_LONGITUDE", "IPL_LATITUDE")),
      (None, None) => None,
    };

    Ok(Self {
      db_path: non_empty_var("IPL_DB_PATH")
        .map(PathBuf::from)
        .unwrap_or(defaults.db_path),
      location,
      gemini_api_key: non_empty_var("GEMINI_API_KEY"),
      gemini_api_url: non_empty_var("GEMINI_API_URL").unwrap_or(defaults.gemini_api_url),
      weather_api_url: non_empty_var("OPEN_METEO_URL").unwrap_or(defaults.weather_api_url),
    })
  }
}

fn non_empty_var(name: &str) -> Option<String> {
  env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_coordinate(name: &'static str, min: f64, max: f64) -> Result<Option<f64>, ConfigError> {
  let Some(raw) = non_empty_var(name) else {
    return Ok(None);
  };
  let value: f64 = raw.trim().parse().map_err(|_| ConfigError::Invalid {
    name,
    value: raw.clone(),
  })?;
  if !(min..=max).contains(&value) {
    return Err(ConfigError::Invalid { name, value: raw });
  }
  Ok(Some(value))
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;
  use serial_test::serial;

  const ALL_VARS: [&str; 6] = [
    "IPL_DB_PATH",
    "IPL_LATITUDE",
    "IPL_LONGITUDE",
    "GEMINI_API_KEY",
    "GEMINI_API_URL",
    "OPEN_METEO_URL",
  ];

  /// Every config var, unset unless overridden
  fn env_with(overrides: &[(&'static str, &'static str)]) -> Vec<(&'static str, Option<&'static str>)> {
    ALL_VARS
      .iter()
      .map(|k| {
        let value = overrides.iter().find(|(name, _)| name == k).map(|(_, v)| *v);
        (*k, value)
      })
      .collect()
  }

  #[test]
  #[serial]
  fn test_defaults_when_env_empty() {
    temp_env::with_vars(env_with(&[]), || {
      let config = AppConfig::from_env().expect("defaults should load");
      assert_eq!(config.db_path, PathBuf::from("ipl-tracker.db"));
      assert!(config.location.is_none());
      assert!(config.gemini_api_key.is_none());
      assert_eq!(config.weather_api_url, DEFAULT_WEATHER_API_URL);
    });
  }

  #[test]
  #[serial]
  fn test_reads_location_and_overrides() {
    let vars = env_with(&[
      ("IPL_DB_PATH", "/tmp/ipl/test.db"),
      ("IPL_LATITUDE", "40.4168"),
      ("IPL_LONGITUDE", "-3.7038"),
      ("GEMINI_API_KEY", "secret"),
      ("OPEN_METEO_URL", "http://localhost:9999"),
    ]);
    temp_env::with_vars(vars, || {
      let config = AppConfig::from_env().expect("config should load");
      assert_eq!(config.db_path, PathBuf::from("/tmp/ipl/test.db"));
      assert_eq!(
        config.location,
        Some(Location {
          latitude: 40.4168,
          longitude: -3.7038
        })
      );
      assert_eq!(config.gemini_api_key.as_deref(), Some("secret"));
      assert_eq!(config.weather_api_url, "http://localhost:9999");
    });
  }

  #[test]
  #[serial]
  fn test_latitude_without_longitude_is_rejected() {
    let vars = env_with(&[("IPL_LATITUDE", "40.0")]);
    temp_env::with_vars(vars, || {
      let err = AppConfig::from_env().unwrap_err();
      assert!(matches!(err, ConfigError::Incomplete("IPL_LATITUDE", _)));
    });
  }

  #[test]
  #[serial]
  fn test_out_of_range_latitude_is_rejected() {
    let vars = env_with(&[("IPL_LATITUDE", "123"), ("IPL_LONGITUDE", "0")]);
    temp_env::with_vars(vars, || {
      let err = AppConfig::from_env().unwrap_err();
      assert!(err.to_string().contains("IPL_LATITUDE"));
    });
  }
}
