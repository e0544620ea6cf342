//! Settings store persistence
//!
//! Owns the operation start date. Stored dates are validated here so the
//! timeline only ever sees well-formed calendar values.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{Row, SqlitePool};

use crate::models::{UserSettings, VibrationIntensity};
use crate::timeline::local_midnight;

/// Parse a start date given as an RFC 3339 instant or a plain `YYYY-MM-DD`
/// day (taken as local midnight, so the stored start stays on the typed day)
pub fn parse_start_date(input: &str) -> Result<DateTime<Utc>, String> {
  let input = input.trim();
  if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
    return Ok(dt.with_timezone(&Utc));
  }
  NaiveDate::parse_from_str(input, "%Y-%m-%d")
    .ok()
    .and_then(local_midnight)
    .ok_or_else(|| format!("Invalid start date '{}': expected YYYY-MM-DD or RFC 3339", input))
}

pub async fn load_settings(pool: &SqlitePool) -> Result<UserSettings, String> {
  let row = sqlx::query(
    r#"
    SELECT start_date, machine_cost, session_value_legs, session_value_torso,
           vibration_intensity, is_paused
    FROM user_settings
    WHERE id = 1
    "#,
  )
  .fetch_optional(pool)
  .await
  .map_err(|e| format!("Failed to get settings: {}", e))?;

  let Some(row) = row else {
    return Ok(UserSettings::default());
  };

  let start_date: String = row.get("start_date");
  let vibration: String = row.get("vibration_intensity");

  Ok(UserSettings {
    start_date: parse_start_date(&start_date)?,
    machine_cost: row.get("machine_cost"),
    session_value_legs: row.get("session_value_legs"),
    session_value_torso: row.get("session_value_torso"),
    vibration_intensity: vibration.parse().unwrap_or_default(),
    is_paused: row.get("is_paused"),
  })
}

pub async fn save_settings(pool: &SqlitePool, settings: &UserSettings) -> Result<(), String> {
  sqlx::query(
    r#"
    INSERT INTO user_settings (
      id, start_date, machine_cost, session_value_legs, session_value_torso,
      vibration_intensity, is_paused, updated_at
    )
    VALUES (1, ?1, ?2, ?3, ?4, ?5, ?6, CURRENT_TIMESTAMP)
    ON CONFLICT(id) DO UPDATE SET
      start_date = excluded.start_date,
      machine_cost = excluded.machine_cost,
      session_value_legs = excluded.session_value_legs,
      session_value_torso = excluded.session_value_torso,
      vibration_intensity = excluded.vibration_intensity,
      is_paused = excluded.is_paused,
      updated_at = CURRENT_TIMESTAMP
    "#,
  )
  .bind(settings.start_date.to_rfc3339())
  .bind(settings.machine_cost)
  .bind(settings.session_value_legs)
  .bind(settings.session_value_torso)
  .bind(settings.vibration_intensity.to_string())
  .bind(settings.is_paused)
  .execute(pool)
  .await
  .map_err(|e| format!("Failed to save settings: {}", e))?;

  Ok(())
}

/// Change the operation start date; returns the stored instant
pub async fn update_start_date(pool: &SqlitePool, input: &str) -> Result<DateTime<Utc>, String> {
  let start_date = parse_start_date(input)?;
  let mut settings = load_settings(pool).await?;
  settings.start_date = start_date;
  save_settings(pool, &settings).await?;

  log::info!("Operation start date set to {}", start_date.to_rfc3339());
  Ok(start_date)
}

/// Partial update: only the provided fields change
#[derive(Debug, Clone, Default)]
pub struct SettingsUpdate {
  pub machine_cost: Option<f64>,
  pub session_value_legs: Option<f64>,
  pub session_value_torso: Option<f64>,
  pub vibration_intensity: Option<VibrationIntensity>,
  pub is_paused: Option<bool>,
}

pub async fn update_settings(pool: &SqlitePool, update: SettingsUpdate) -> Result<UserSettings, String> {
  let mut settings = load_settings(pool).await?;

  if let Some(cost) = update.machine_cost {
    settings.machine_cost = cost;
  }
  if let Some(value) = update.session_value_legs {
    settings.session_value_legs = value;
  }
  if let Some(value) = update.session_value_torso {
    settings.session_value_torso = value;
  }
  if let Some(intensity) = update.vibration_intensity {
    settings.vibration_intensity = intensity;
  }
  if let Some(paused) = update.is_paused {
    settings.is_paused = paused;
  }

  save_settings(pool, &settings).await?;
  Ok(settings)
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;
  use crate::timeline::{local_day, resolve_from, STATUS_PRE_OPERATION};
  use chrono::{Local, TimeZone};

  #[test]
  fn test_parse_plain_date_is_local_midnight() {
    let first = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();
    let parsed = parse_start_date("2026-02-01").unwrap();
    assert_eq!(local_day(&parsed), first);
    assert_eq!(parsed.with_timezone(&Local).time(), chrono::NaiveTime::MIN);
  }

  #[test]
  fn test_plain_start_date_day_before_is_pre_operation() {
    let first = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
    let start = parse_start_date("2026-03-01").unwrap();

    let eve = resolve_from(&start, first.pred_opt().unwrap());
    assert!(eve.is_pre_operation);
    assert_eq!(eve.status_message, STATUS_PRE_OPERATION);

    let day_one = resolve_from(&start, first);
    assert!(!day_one.is_pre_operation);
    assert_eq!(day_one.week_index, 0);
  }

  #[test]
  fn test_parse_rfc3339_instant() {
    let parsed = parse_start_date("2025-12-28T00:00:00.000Z").unwrap();
    assert_eq!(parsed, Utc.with_ymd_and_hms(2025, 12, 28, 0, 0, 0).unwrap());
  }

  #[test]
  fn test_parse_rejects_garbage() {
    let err = parse_start_date("next sunday").unwrap_err();
    assert!(err.contains("Invalid start date"));
  }

  #[tokio::test]
  async fn test_defaults_seeded_by_migration() {
    let pool = crate::test_utils::setup_test_db().await;

    let settings = load_settings(&pool).await.expect("Should load settings");
    assert_eq!(settings, UserSettings::default());

    crate::test_utils::teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_update_start_date_persists() {
    let pool = crate::test_utils::setup_test_db().await;

    update_start_date(&pool, "2026-03-01").await.expect("Should update");
    let settings = load_settings(&pool).await.unwrap();
    assert_eq!(local_day(&settings.start_date), NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());

    crate::test_utils::teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_invalid_start_date_leaves_store_untouched() {
    let pool = crate::test_utils::setup_test_db().await;

    assert!(update_start_date(&pool, "31/12/2025").await.is_err());
    let settings = load_settings(&pool).await.unwrap();
    assert_eq!(settings.start_date, UserSettings::default().start_date);

    crate::test_utils::teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_corrupt_stored_start_date_is_an_error() {
    let pool = crate::test_utils::setup_test_db().await;

    sqlx::query("UPDATE user_settings SET start_date = 'not-a-date' WHERE id = 1")
      .execute(&pool)
      .await
      .unwrap();
    let result = load_settings(&pool).await;
    assert!(result.is_err());

    crate::test_utils::teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_partial_update_keeps_other_fields() {
    let pool = crate::test_utils::setup_test_db().await;

    let updated = update_settings(
      &pool,
      SettingsUpdate {
        machine_cost: Some(299.0),
        is_paused: Some(true),
        ..Default::default()
      },
    )
    .await
    .expect("Should update");

    assert_eq!(updated.machine_cost, 299.0);
    assert!(updated.is_paused);
    assert_eq!(updated.session_value_legs, 60.0);

    let reloaded = load_settings(&pool).await.unwrap();
    assert_eq!(reloaded, updated);

    crate::test_utils::teardown_test_db(pool).await;
  }
}
