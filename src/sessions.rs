//! Session logger persistence
//!
//! The only writer of session logs. The timeline and calendar read snapshots
//! loaded from here and are re-invoked after a new session is recorded.

use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};

use crate::models::{NewSessionLog, SessionLog, UserSettings};
use crate::settings::save_settings;

/// Record a session logged now
pub async fn record_session(pool: &SqlitePool, new: NewSessionLog) -> Result<SessionLog, String> {
  record_session_at(pool, new, Utc::now()).await
}

/// Record a session at an explicit instant (backfilling a missed day)
pub async fn record_session_at(
  pool: &SqlitePool,
  new: NewSessionLog,
  at: DateTime<Utc>,
) -> Result<SessionLog, String> {
  if new.duration_seconds < 0 {
    return Err(format!(
      "Session duration cannot be negative: {}",
      new.duration_seconds
    ));
  }

  let log = SessionLog {
    id: next_session_id(pool, at).await?,
    date: at,
    duration_seconds: new.duration_seconds,
    zones: new.zones,
    notes: new.notes,
    completed: new.completed,
    uv_index: new.uv_index,
  };

  let zones_json = serde_json::to_string(&log.zones)
    .map_err(|e| format!("Failed to encode zones: {}", e))?;

  sqlx::query(
    r#"
    INSERT INTO session_logs
      (id, logged_at, duration_seconds, zones_json, notes, completed, uv_index)
    VALUES (?, ?, ?, ?, ?, ?, ?)
    "#,
  )
  .bind(&log.id)
  .bind(log.date.to_rfc3339())
  .bind(log.duration_seconds)
  .bind(&zones_json)
  .bind(&log.notes)
  .bind(log.completed)
  .bind(log.uv_index)
  .execute(pool)
  .await
  .map_err(|e| format!("Failed to record session: {}", e))?;

  log::info!(
    "Recorded session {} ({}s, {} zones)",
    log.id,
    log.duration_seconds,
    log.zones.len()
  );

  Ok(log)
}

/// Session ids are the millisecond timestamp of the session, bumped past any
/// id already taken
async fn next_session_id(pool: &SqlitePool, at: DateTime<Utc>) -> Result<String, String> {
  let mut candidate = at.timestamp_millis();
  loop {
    let taken: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM session_logs WHERE id = ?")
      .bind(candidate.to_string())
      .fetch_one(pool)
      .await
      .map_err(|e| format!("Failed to check session id: {}", e))?;
    if taken == 0 {
      return Ok(candidate.to_string());
    }
    candidate += 1;
  }
}

/// Load all session logs, newest first
pub async fn load_sessions(pool: &SqlitePool) -> Result<Vec<SessionLog>, String> {
  let rows = sqlx::query(
    r#"
    SELECT id, logged_at, duration_seconds, zones_json, notes, completed, uv_index
    FROM session_logs
    ORDER BY logged_at DESC, id DESC
    "#,
  )
  .fetch_all(pool)
  .await
  .map_err(|e| format!("Failed to load sessions: {}", e))?;

  let mut sessions = Vec::with_capacity(rows.len());
  for row in rows {
    let id: String = row.get("id");
    let logged_at: String = row.get("logged_at");
    let zones_json: String = row.get("zones_json");

    let date = DateTime::parse_from_rfc3339(&logged_at)
      .map(|dt| dt.with_timezone(&Utc))
      .map_err(|e| format!("Session {} has an invalid date '{}': {}", id, logged_at, e))?;
    let zones: Vec<String> = serde_json::from_str(&zones_json)
      .map_err(|e| format!("Session {} has invalid zones: {}", id, e))?;

    sessions.push(SessionLog {
      id,
      date,
      duration_seconds: row.get("duration_seconds"),
      zones,
      notes: row.get("notes"),
      completed: row.get("completed"),
      uv_index: row.get("uv_index"),
    });
  }

  Ok(sessions)
}

/// Most recent sessions, for the dashboard log list
pub async fn load_recent_sessions(pool: &SqlitePool, limit: usize) -> Result<Vec<SessionLog>, String> {
  let mut sessions = load_sessions(pool).await?;
  sessions.truncate(limit);
  Ok(sessions)
}

pub async fn count_sessions(pool: &SqlitePool) -> Result<i64, String> {
  sqlx::query_scalar("SELECT COUNT(*) FROM session_logs")
    .fetch_one(pool)
    .await
    .map_err(|e| format!("Failed to count sessions: {}", e))
}

/// Wipe every session and restore default settings
pub async fn reset_all_data(pool: &SqlitePool) -> Result<(), String> {
  sqlx::query("DELETE FROM session_logs")
    .execute(pool)
    .await
    .map_err(|e| format!("Failed to clear sessions: {}", e))?;

  save_settings(pool, &UserSettings::default()).await?;

  log::warn!("All session data cleared and settings reset");
  Ok(())
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
