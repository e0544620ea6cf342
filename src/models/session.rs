use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::timeline::local_day;

/// A completed (or abandoned) treatment session, written by the session logger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionLog {
  pub id: String,
  pub date: DateTime<Utc>,
  pub duration_seconds: i64,
  pub zones: Vec<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub notes: Option<String>,
  pub completed: bool,
  /// UV index at the time the session was logged
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub uv_index: Option<f64>,
}

impl SessionLog {
  /// Local calendar day the session belongs to
  pub fn calendar_day(&self) -> NaiveDate {
    local_day(&self.date)
  }
}

/// For inserting new sessions (without id, date)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSessionLog {
  pub duration_seconds: i64,
  pub zones: Vec<String>,
  pub notes: Option<String>,
  pub completed: bool,
  pub uv_index: Option<f64>,
}
