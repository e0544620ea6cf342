use crate::db::AppState;
use crate::models::{NewSessionLog, SessionLog};
use crate::timeline::local_noon;
use crate::zones::ZoneGroup;
use chrono::NaiveDate;

/// ---------------------------------------------------------------------------
/// Session Logger Commands
/// ---------------------------------------------------------------------------

fn validate_zones(zones: &[String]) -> Result<(), String> {
  if zones.is_empty() {
    return Err("A session needs at least one zone".to_string());
  }

  let known = [ZoneGroup::Lower, ZoneGroup::Upper, ZoneGroup::ShoulderAddon];
  if let Some(unknown) = zones.iter().find(|z| !known.iter().any(|g| g.contains(z))) {
    return Err(format!("Unknown zone: {}", unknown));
  }

  Ok(())
}

/// Log a session that just finished
pub async fn log_session(state: &AppState, new: NewSessionLog) -> Result<SessionLog, String> {
  validate_zones(&new.zones)?;
  crate::sessions::record_session(&state.db, new).await
}

/// Backfill a session on a past day; it is stamped at local noon
pub async fn log_session_on(
  state: &AppState,
  new: NewSessionLog,
  day: NaiveDate,
) -> Result<SessionLog, String> {
  validate_zones(&new.zones)?;
  let stamp = local_noon(day).ok_or_else(|| format!("Noon does not exist locally on {}", day))?;
  crate::sessions::record_session_at(&state.db, new, stamp).await
}

/// Session log, newest first
pub async fn get_sessions(state: &AppState, limit: Option<usize>) -> Result<Vec<SessionLog>, String> {
  match limit {
    Some(limit) => crate::sessions::load_recent_sessions(&state.db, limit).await,
    None => crate::sessions::load_sessions(&state.db).await,
  }
}

/// Wipe every session and restore default settings
pub async fn reset_data(state: &AppState) -> Result<(), String> {
  crate::sessions::reset_all_data(&state.db).await
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::AppConfig;
  use crate::test_utils::{setup_test_state, teardown_test_db};

  fn legs() -> NewSessionLog {
    NewSessionLog {
      duration_seconds: 2400,
      zones: crate::zones::legs_zones(),
      notes: None,
      completed: true,
      uv_index: None,
    }
  }

  #[test]
  fn test_validate_zones() {
    assert!(validate_zones(&crate::zones::torso_zones(true)).is_ok());
    assert!(validate_zones(&[]).is_err());
    let err = validate_zones(&["Face".to_string()]).unwrap_err();
    assert!(err.contains("Face"));
  }

  #[tokio::test]
  async fn test_backfilled_session_lands_on_requested_day() {
    let state = setup_test_state(AppConfig::default()).await;
    let monday = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();

    let log = log_session_on(&state, legs(), monday).await.expect("Should log");
    assert_eq!(log.calendar_day(), monday);

    let all = get_sessions(&state, None).await.unwrap();
    assert_eq!(all, vec![log]);

    teardown_test_db(state.db).await;
  }

  #[tokio::test]
  async fn test_unknown_zone_is_not_recorded() {
    let state = setup_test_state(AppConfig::default()).await;
    let mut new = legs();
    new.zones.push("Back".to_string());

    assert!(log_session(&state, new).await.is_err());
    assert!(get_sessions(&state, None).await.unwrap().is_empty());

    teardown_test_db(state.db).await;
  }

  #[tokio::test]
  async fn test_reset_data_empties_log() {
    let state = setup_test_state(AppConfig::default()).await;
    log_session(&state, legs()).await.unwrap();
    log_session(&state, legs()).await.unwrap();
    assert_eq!(get_sessions(&state, Some(1)).await.unwrap().len(), 1);

    reset_data(&state).await.expect("Should reset");
    assert!(get_sessions(&state, None).await.unwrap().is_empty());

    teardown_test_db(state.db).await;
  }
}
