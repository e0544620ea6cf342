pub mod briefing;
pub mod sessions;
pub mod settings;

use crate::calendar::{CalendarProjector, DayStatus, MonthView};
use crate::db::AppState;
use crate::savings::{savings_report, SavingsReport};
use crate::timeline::{local_day, resolve_from, resolve_now, TimelineStatus};
use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::Serialize;

/// Today's local calendar day
pub fn today() -> NaiveDate {
  Local::now().date_naive()
}

/// Operation start day from the settings store
async fn load_start_day(state: &AppState) -> Result<NaiveDate, String> {
  let settings = crate::settings::load_settings(&state.db).await?;
  Ok(local_day(&settings.start_date))
}

/// ---------------------------------------------------------------------------
/// Dashboard Status
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReport {
  pub timeline: TimelineStatus,
  pub is_paused: bool,
  pub sessions_logged: usize,
  pub savings: SavingsReport,
}

pub async fn get_status(state: &AppState) -> Result<StatusReport, String> {
  status_report(state, resolve_now).await
}

/// Dashboard status as it would be seen on `reference`
pub async fn get_status_on(state: &AppState, reference: NaiveDate) -> Result<StatusReport, String> {
  status_report(state, |start| resolve_from(start, reference)).await
}

async fn status_report<F>(state: &AppState, resolve_start: F) -> Result<StatusReport, String>
where
  F: FnOnce(&DateTime<Utc>) -> TimelineStatus,
{
  let settings = crate::settings::load_settings(&state.db).await?;
  let logs = crate::sessions::load_sessions(&state.db).await?;

  let timeline = resolve_start(&settings.start_date);
  log::debug!(
    "Resolved {} as {} week {} ({})",
    timeline.reference_date,
    timeline.phase,
    timeline.week_index,
    timeline.status_message
  );

  Ok(StatusReport {
    timeline,
    is_paused: settings.is_paused,
    sessions_logged: logs.len(),
    savings: savings_report(&logs, &settings),
  })
}

/// ---------------------------------------------------------------------------
/// Calendar
/// ---------------------------------------------------------------------------

pub async fn get_month_calendar(state: &AppState, year: i32, month: u32) -> Result<MonthView, String> {
  month_calendar_as_of(state, year, month, today()).await
}

pub async fn month_calendar_as_of(
  state: &AppState,
  year: i32,
  month: u32,
  today: NaiveDate,
) -> Result<MonthView, String> {
  let start = load_start_day(state).await?;
  let logs = crate::sessions::load_sessions(&state.db).await?;

  CalendarProjector::new(start, &logs, today)
    .month(year, month)
    .ok_or_else(|| format!("Invalid month: {}-{:02}", year, month))
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayDetail {
  pub status: DayStatus,
  /// Every session logged on the day; only the first one is classified
  pub sessions_on_day: usize,
}

pub async fn get_day_detail(state: &AppState, date: NaiveDate) -> Result<DayDetail, String> {
  day_detail_as_of(state, date, today()).await
}

pub async fn day_detail_as_of(
  state: &AppState,
  date: NaiveDate,
  today: NaiveDate,
) -> Result<DayDetail, String> {
  let start = load_start_day(state).await?;
  let logs = crate::sessions::load_sessions(&state.db).await?;
  let projector = CalendarProjector::new(start, &logs, today);

  Ok(DayDetail {
    status: projector.classify(date),
    sessions_on_day: projector.sessions_on(date),
  })
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
