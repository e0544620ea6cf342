use crate::db::AppState;
use crate::models::UserSettings;
use crate::savings::{savings_report, SavingsReport};
use crate::settings::SettingsUpdate;
use crate::timeline::{resolve_now, TimelineStatus};

/// ---------------------------------------------------------------------------
/// Settings Commands
/// ---------------------------------------------------------------------------

pub async fn get_settings(state: &AppState) -> Result<UserSettings, String> {
  crate::settings::load_settings(&state.db).await
}

pub async fn update_settings(state: &AppState, update: SettingsUpdate) -> Result<UserSettings, String> {
  if let Some(cost) = update.machine_cost {
    if cost < 0.0 {
      return Err(format!("Machine cost cannot be negative: {}", cost));
    }
  }

  let settings = crate::settings::update_settings(&state.db, update).await?;
  log::info!("Settings updated");
  Ok(settings)
}

/// Move the operation start and return today's status under the new date
pub async fn set_start_date(state: &AppState, input: &str) -> Result<TimelineStatus, String> {
  let start = crate::settings::update_start_date(&state.db, input).await?;
  Ok(resolve_now(&start))
}

pub async fn get_savings(state: &AppState) -> Result<SavingsReport, String> {
  let settings = crate::settings::load_settings(&state.db).await?;
  let logs = crate::sessions::load_sessions(&state.db).await?;
  Ok(savings_report(&logs, &settings))
}
