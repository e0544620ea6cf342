use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default operation start: Sunday 28 December 2025
pub const DEFAULT_START_DATE: &str = "2025-12-28T00:00:00Z";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[derive(Default)]
pub enum VibrationIntensity {
  Low,
  #[default]
  High,
}

impl std::fmt::Display for VibrationIntensity {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Low => write!(f, "LOW"),
      Self::High => write!(f, "HIGH"),
    }
  }
}

impl std::str::FromStr for VibrationIntensity {
  type Err = String;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_ascii_uppercase().as_str() {
      "LOW" => Ok(Self::Low),
      "HIGH" => Ok(Self::High),
      _ => Err(format!("Unknown vibration intensity: {}", s)),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
  /// Operation start instant
  pub start_date: DateTime<Utc>,
  pub machine_cost: f64,
  /// Clinic price of one legs session
  pub session_value_legs: f64,
  /// Clinic price of one torso session
  pub session_value_torso: f64,
  pub vibration_intensity: VibrationIntensity,
  /// Manual override for holidays or sickness
  pub is_paused: bool,
}

impl Default for UserSettings {
  fn default() -> Self {
    Self {
      start_date: DateTime::parse_from_rfc3339(DEFAULT_START_DATE)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_default(),
      machine_cost: 349.0,
      session_value_legs: 60.0,
      session_value_torso: 50.0,
      vibration_intensity: VibrationIntensity::High,
      is_paused: false,
    }
  }
}
