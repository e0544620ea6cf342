//! Test utilities and helpers for unit testing
//!
//! This module provides common test infrastructure including:
//! - Database and app state setup/teardown
//! - Session log seeding
//! - Mock data factories

use crate::config::AppConfig;
use crate::db::AppState;
use crate::models::{NewSessionLog, SessionLog, UserSettings};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use sqlx::SqlitePool;

/// ---------------------------------------------------------------------------
/// Database Test Utilities
/// ---------------------------------------------------------------------------

/// Create an in-memory SQLite database for testing
/// Runs all migrations and returns a ready-to-use pool
///
/// Uses max_connections(1) to prevent multiple pool connections from creating
/// isolated in-memory databases, which would cause intermittent test failures
pub async fn setup_test_db() -> SqlitePool {
  let pool = sqlx::sqlite::SqlitePoolOptions::new()
    .max_connections(1)
    .connect("sqlite::memory:")
    .await
    .expect("Failed to create in-memory database");

  sqlx::migrate!("./migrations")
    .run(&pool)
    .await
    .expect("Failed to run migrations");

  pool
}

/// Close a test database pool
pub async fn teardown_test_db(pool: SqlitePool) {
  pool.close().await;
}

/// App state over a fresh in-memory database with the given config
pub async fn setup_test_state(config: AppConfig) -> AppState {
  AppState {
    db: setup_test_db().await,
    config,
  }
}

/// Seed the database with sessions on consecutive protocol Sundays/Mondays
/// starting at the default operation start. Returns the recorded logs.
pub async fn seed_test_sessions(pool: &SqlitePool, count: usize) -> Vec<SessionLog> {
  let mut logs = Vec::new();

  for i in 0..count {
    // Alternate Sunday torso / Monday legs
    let week = (i / 2) as i64;
    let is_legs = i % 2 == 1;
    let day = default_start_day() + Duration::days(week * 7 + if is_legs { 1 } else { 0 });
    let zones = if is_legs {
      crate::zones::legs_zones()
    } else {
      crate::zones::torso_zones(week % 3 == 0)
    };

    let log = crate::sessions::record_session_at(
      pool,
      NewSessionLog {
        duration_seconds: if is_legs { 2400 } else { 1200 },
        zones,
        notes: None,
        completed: true,
        uv_index: Some(1.0),
      },
      noon_on(day),
    )
    .await
    .expect("Failed to seed session");

    logs.push(log);
  }

  logs
}

/// ---------------------------------------------------------------------------
/// Mock Data Factories
/// ---------------------------------------------------------------------------

/// Operation start used throughout the tests (a Sunday)
pub fn default_start_day() -> NaiveDate {
  NaiveDate::from_ymd_opt(2025, 12, 28).expect("valid date")
}

/// Local noon on a day, so the log lands on that calendar day in any zone
pub fn noon_on(day: NaiveDate) -> DateTime<Utc> {
  crate::timeline::local_noon(day).expect("noon exists locally")
}

pub fn mock_session_log(id: &str, day: NaiveDate) -> SessionLog {
  SessionLog {
    id: id.to_string(),
    date: noon_on(day),
    duration_seconds: 1800,
    zones: crate::zones::torso_zones(false),
    notes: None,
    completed: true,
    uv_index: None,
  }
}

pub fn mock_user_settings() -> UserSettings {
  UserSettings::default()
}

/// ---------------------------------------------------------------------------
/// Tests for Test Utilities
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_setup_db_creates_schema() {
    let pool = setup_test_db().await;

    let tables: Vec<(String,)> = sqlx::query_as(
      "SELECT name FROM sqlite_master WHERE type='table' AND name IN ('session_logs', 'user_settings')"
    )
    .fetch_all(&pool)
    .await
    .expect("Failed to query tables");

    assert_eq!(tables.len(), 2, "Expected 2 tables, got {}", tables.len());

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_seed_sessions_returns_correct_count() {
    let pool = setup_test_db().await;

    let logs = seed_test_sessions(&pool, 4).await;
    assert_eq!(logs.len(), 4);
    assert_eq!(logs[1].calendar_day(), NaiveDate::from_ymd_opt(2025, 12, 29).unwrap());

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM session_logs")
      .fetch_one(&pool)
      .await
      .expect("Failed to count sessions");

    assert_eq!(count, 4);

    teardown_test_db(pool).await;
  }

  #[test]
  fn test_mock_factories_create_valid_data() {
    let log = mock_session_log("a", default_start_day());
    assert_eq!(log.calendar_day(), default_start_day());
    assert_eq!(mock_user_settings().machine_cost, 349.0);
  }
}
