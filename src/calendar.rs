//! Calendar Status Projector
//!
//! Classifies arbitrary calendar days (past, present, future) for the month
//! grid and the day-detail panel. Phase and week activation come from the same
//! routine the "today" resolver uses; this module layers session-day matching
//! against the session log on top.
//!
//! Unlike the resolver, off-session days get no forward-looking hint: a day is
//! either a Sunday/Monday session day of an active week, or it isn't.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::SessionLog;
use crate::timeline::{resolve_cadence, session_day_number, CadenceStatus, Phase, SessionType};
use crate::zones;

// ---------------------------------------------------------------------------
/// Day Classification: how a grid cell is painted
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DayClassification {
    /// Before the operation start
    PreOperation,
    /// Session day with a logged session
    SessionCompleted,
    /// Session day strictly before today, nothing logged
    SessionMissed,
    /// Session day today or later, nothing logged yet
    SessionUpcoming,
    /// Not a session day, but a session was logged anyway
    ExtraCredit,
    Rest,
}

impl DayClassification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PreOperation => "PRE_OPERATION",
            Self::SessionCompleted => "SESSION_COMPLETED",
            Self::SessionMissed => "SESSION_MISSED",
            Self::SessionUpcoming => "SESSION_UPCOMING",
            Self::ExtraCredit => "EXTRA_CREDIT",
            Self::Rest => "REST",
        }
    }
}

impl std::fmt::Display for DayClassification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
/// Day Status: one calendar cell plus its detail panel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayStatus {
    pub date: NaiveDate,
    /// None before the operation start
    pub phase: Option<Phase>,
    pub week_index: Option<i64>,
    pub is_active_week: bool,
    pub is_shoulder_week: bool,
    /// `Torso` or `Legs` on session days, None otherwise
    pub session_type: Option<SessionType>,
    pub zones: Vec<String>,
    /// First session logged on this calendar day
    pub log: Option<SessionLog>,
    pub classification: DayClassification,
    pub is_today: bool,
    pub is_past: bool,
}

/// Column in the Monday-first calendar grid (0 = Monday, 6 = Sunday).
///
/// Rendering only. Session selection uses `timeline::session_day_number`.
pub fn grid_column(date: NaiveDate) -> u32 {
    date.weekday().num_days_from_monday()
}

fn session_for_day(cadence: &CadenceStatus, date: NaiveDate) -> Option<(SessionType, Vec<String>)> {
    if !cadence.is_active_week {
        return None;
    }
    match session_day_number(date) {
        0 => Some((SessionType::Torso, zones::torso_zones(cadence.is_shoulder_week))),
        1 => Some((SessionType::Legs, zones::legs_zones())),
        _ => None,
    }
}

fn build_status(
    start: NaiveDate,
    target: NaiveDate,
    today: NaiveDate,
    log: Option<&SessionLog>,
) -> DayStatus {
    let cadence = resolve_cadence(start, target);
    let is_today = target == today;
    let is_past = target < today;

    if cadence.is_pre_operation {
        return DayStatus {
            date: target,
            phase: None,
            week_index: None,
            is_active_week: false,
            is_shoulder_week: false,
            session_type: None,
            zones: Vec::new(),
            log: log.cloned(),
            classification: DayClassification::PreOperation,
            is_today,
            is_past,
        };
    }

    let session = session_for_day(&cadence, target);

    let classification = match (&session, log) {
        (Some(_), Some(_)) => DayClassification::SessionCompleted,
        (Some(_), None) if is_past => DayClassification::SessionMissed,
        (Some(_), None) => DayClassification::SessionUpcoming,
        (None, Some(_)) => DayClassification::ExtraCredit,
        (None, None) => DayClassification::Rest,
    };

    let (session_type, zones) = match session {
        Some((session_type, zones)) => (Some(session_type), zones),
        None => (None, Vec::new()),
    };

    DayStatus {
        date: target,
        phase: Some(cadence.phase),
        week_index: Some(cadence.week_index),
        is_active_week: cadence.is_active_week,
        is_shoulder_week: cadence.is_shoulder_week,
        session_type,
        zones,
        log: log.cloned(),
        classification,
        is_today,
        is_past,
    }
}

/// Classify one day against an unindexed log slice.
///
/// `today` is the caller's current day and decides missed vs upcoming,
/// independent of `target`. When several logs share the target's calendar day
/// the first one in slice order is used.
pub fn classify_day(
    start: NaiveDate,
    logs: &[SessionLog],
    target: NaiveDate,
    today: NaiveDate,
) -> DayStatus {
    let log = logs.iter().find(|l| l.calendar_day() == target);
    build_status(start, target, today, log)
}

// ---------------------------------------------------------------------------
/// Log Index: session logs keyed by calendar day
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct LogIndex<'a> {
    by_day: HashMap<NaiveDate, (&'a SessionLog, usize)>,
}

impl<'a> LogIndex<'a> {
    /// Index logs by local calendar day; the first log seen for a day wins
    pub fn from_logs(logs: &'a [SessionLog]) -> Self {
        let mut by_day: HashMap<NaiveDate, (&'a SessionLog, usize)> = HashMap::new();
        for log in logs {
            by_day
                .entry(log.calendar_day())
                .and_modify(|(_, count)| *count += 1)
                .or_insert((log, 1));
        }
        Self { by_day }
    }

    pub fn first_on(&self, day: NaiveDate) -> Option<&'a SessionLog> {
        self.by_day.get(&day).map(|(log, _)| *log)
    }

    /// Number of sessions logged on a day (only the first is surfaced)
    pub fn sessions_on(&self, day: NaiveDate) -> usize {
        self.by_day.get(&day).map(|(_, count)| *count).unwrap_or(0)
    }
}

// ---------------------------------------------------------------------------
/// Calendar Projector: indexed classifier for a whole month view
// ---------------------------------------------------------------------------

pub struct CalendarProjector<'a> {
    start: NaiveDate,
    today: NaiveDate,
    index: LogIndex<'a>,
}

impl<'a> CalendarProjector<'a> {
    pub fn new(start: NaiveDate, logs: &'a [SessionLog], today: NaiveDate) -> Self {
        Self {
            start,
            today,
            index: LogIndex::from_logs(logs),
        }
    }

    pub fn classify(&self, target: NaiveDate) -> DayStatus {
        build_status(self.start, target, self.today, self.index.first_on(target))
    }

    /// Sessions logged on `day`, including the ones not surfaced
    pub fn sessions_on(&self, day: NaiveDate) -> usize {
        self.index.sessions_on(day)
    }

    /// Every day of a month, laid out for a Monday-first grid.
    /// Returns None for an invalid year/month.
    pub fn month(&self, year: i32, month: u32) -> Option<MonthView> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)?;
        let days = first
            .iter_days()
            .take_while(|d| d.month() == month)
            .map(|d| self.classify(d))
            .collect();

        Some(MonthView {
            year,
            month,
            leading_blanks: grid_column(first),
            days,
        })
    }
}

// ---------------------------------------------------------------------------
/// Month View
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthView {
    pub year: i32,
    pub month: u32,
    /// Empty cells before the 1st in a Monday-first grid
    pub leading_blanks: u32,
    pub days: Vec<DayStatus>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthSummary {
    pub completed: usize,
    pub missed: usize,
    pub upcoming: usize,
    pub extra_credit: usize,
    pub rest: usize,
    pub pre_operation: usize,
}

impl MonthView {
    pub fn summary(&self) -> MonthSummary {
        let mut summary = MonthSummary::default();
        for day in &self.days {
            match day.classification {
                DayClassification::SessionCompleted => summary.completed += 1,
                DayClassification::SessionMissed => summary.missed += 1,
                DayClassification::SessionUpcoming => summary.upcoming += 1,
                DayClassification::ExtraCredit => summary.extra_credit += 1,
                DayClassification::Rest => summary.rest += 1,
                DayClassification::PreOperation => summary.pre_operation += 1,
            }
        }
        summary
    }

    /// Grid rows of seven cells, None for padding
    pub fn weeks(&self) -> Vec<Vec<Option<&DayStatus>>> {
        let mut cells: Vec<Option<&DayStatus>> = vec![None; self.leading_blanks as usize];
        cells.extend(self.days.iter().map(Some));
        while cells.len() % 7 != 0 {
            cells.push(None);
        }
        cells.chunks(7).map(|row| row.to_vec()).collect()
    }

    pub fn previous(&self) -> (i32, u32) {
        shift_month(self.year, self.month, -1)
    }

    pub fn next(&self) -> (i32, u32) {
        shift_month(self.year, self.month, 1)
    }
}

/// Move a (year, month) pair by `delta` months
pub fn shift_month(year: i32, month: u32, delta: i32) -> (i32, u32) {
    let index = year * 12 + month as i32 - 1 + delta;
    (index.div_euclid(12), index.rem_euclid(12) as u32 + 1)
}

// ---------------------------------------------------------------------------
/// Tests
// ---------------------------------------------------------------------------
