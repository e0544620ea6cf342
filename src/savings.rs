//! Return on the device purchase
//!
//! Each completed session is credited with what a clinic would have charged
//! for the same area: the legs value when any lower-body zone was treated,
//! the torso value otherwise.

use serde::Serialize;

use crate::models::{SessionLog, UserSettings};
use crate::zones::ZoneGroup;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsReport {
  pub sessions_counted: usize,
  pub total_savings: f64,
  pub machine_cost: f64,
  /// Amount still needed to cover the device; zero once paid off
  pub remaining: f64,
  pub break_even: bool,
}

pub fn session_value(log: &SessionLog, settings: &UserSettings) -> f64 {
  if log.zones.iter().any(|z| ZoneGroup::Lower.contains(z)) {
    settings.session_value_legs
  } else {
    settings.session_value_torso
  }
}

pub fn savings_report(logs: &[SessionLog], settings: &UserSettings) -> SavingsReport {
  let completed: Vec<&SessionLog> = logs.iter().filter(|l| l.completed).collect();
  let total_savings: f64 = completed.iter().map(|l| session_value(l, settings)).sum();

  SavingsReport {
    sessions_counted: completed.len(),
    total_savings,
    machine_cost: settings.machine_cost,
    remaining: (settings.machine_cost - total_savings).max(0.0),
    break_even: total_savings >= settings.machine_cost,
  }
}
