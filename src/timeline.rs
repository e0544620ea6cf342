//! Phase Timeline Resolver
//!
//! Derives, for any calendar day, where the protocol stands:
//! - which phase is running (attack, transition, maintenance)
//! - which week since the operation start we are in
//! - whether this week is an active treatment week
//! - what session (if any) is due on that day
//!
//! Everything here is a pure function of two calendar days. Callers that hold
//! instants convert them with [`local_day`] first, so midnight truncation happens
//! in exactly one place.
//!
//! Day-of-week convention: session selection counts from Sunday
//! (0 = Sunday, 1 = Monday). The calendar grid counts from Monday. Use
//! [`session_day_number`] here and `calendar::grid_column` there; never mix them.

use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::zones;

/// Last week index (exclusive) of the attack phase
pub const ATTACK_WEEKS: i64 = 12;

/// Last week index (exclusive) of the transition phase
pub const TRANSITION_END_WEEK: i64 = 24;

/// chrono months are 1-based
const AUGUST: u32 = 8;

/// Maintenance sessions only run in the first days of the month
const MAINTENANCE_WINDOW_DAYS: u32 = 7;

pub const STATUS_OPERATIONAL: &str = "OPERATIONAL";
pub const STATUS_PRE_OPERATION: &str = "PRE-OPERATION";
pub const STATUS_REST_WEEK: &str = "REST WEEK";
pub const STATUS_AUGUST_HOLIDAY: &str = "AUGUST HOLIDAY";
pub const STATUS_STANDBY: &str = "STANDBY — AWAITING FIRST WEEK OF MONTH";

// ---------------------------------------------------------------------------
/// Phase: which regimen stage a week belongs to
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[derive(Default)]
pub enum Phase {
    /// Weeks 0-11: weekly sessions
    #[default]
    Attack,
    /// Weeks 12-23: every other week
    Transition,
    /// Week 24 onward: first week of each month, August off
    Maintenance,
}

impl Phase {
    /// Total partition of non-negative week indices
    pub fn for_week(week_index: i64) -> Self {
        if week_index >= TRANSITION_END_WEEK {
            Self::Maintenance
        } else if week_index >= ATTACK_WEEKS {
            Self::Transition
        } else {
            Self::Attack
        }
    }

    /// Human-readable name with cadence
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Attack => "ATTACK (WEEKLY)",
            Self::Transition => "TRANSITION (BI-WEEKLY)",
            Self::Maintenance => "MAINTENANCE (MONTHLY)",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Attack => write!(f, "ATTACK"),
            Self::Transition => write!(f, "TRANSITION"),
            Self::Maintenance => write!(f, "MAINTENANCE"),
        }
    }
}

impl std::str::FromStr for Phase {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ATTACK" => Ok(Self::Attack),
            "TRANSITION" => Ok(Self::Transition),
            "MAINTENANCE" => Ok(Self::Maintenance),
            _ => Err(format!("Unknown phase: {}", s)),
        }
    }
}

// ---------------------------------------------------------------------------
/// Session Type: category of the recommendation for a day
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionType {
    #[serde(rename = "TORSO")]
    Torso,
    #[serde(rename = "LEGS")]
    Legs,
    /// Advisory hint for the coming Sunday, not an activation signal
    #[serde(rename = "UPCOMING: TORSO")]
    UpcomingTorso,
    /// Nothing scheduled (pre-operation, rest week, holiday, standby)
    #[serde(rename = "WAITING")]
    Waiting,
}

impl SessionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Torso => "TORSO",
            Self::Legs => "LEGS",
            Self::UpcomingTorso => "UPCOMING: TORSO",
            Self::Waiting => "WAITING",
        }
    }
}

impl std::fmt::Display for SessionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
/// Cadence Status: output of the shared phase/activation routine
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CadenceStatus {
    pub elapsed_days: i64,
    /// Negative before the start date; ignore it when `is_pre_operation`
    pub week_index: i64,
    /// `Attack` by default before the start date
    pub phase: Phase,
    pub is_pre_operation: bool,
    pub is_active_week: bool,
    pub is_shoulder_week: bool,
    pub status_message: &'static str,
}

/// Convert an instant to the local calendar day it falls on
pub fn local_day(instant: &DateTime<Utc>) -> NaiveDate {
    instant.with_timezone(&Local).date_naive()
}

/// Instant of a local wall-clock time on `day`; None when a DST gap skips it
fn local_instant(day: NaiveDate, hour: u32) -> Option<DateTime<Utc>> {
    Local
        .from_local_datetime(&day.and_hms_opt(hour, 0, 0)?)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Local midnight of `day`, the instant a typed start date is stored as
pub fn local_midnight(day: NaiveDate) -> Option<DateTime<Utc>> {
    local_instant(day, 0)
}

/// Local noon of `day`; backfilled sessions are stamped here so they stay on it
pub fn local_noon(day: NaiveDate) -> Option<DateTime<Utc>> {
    local_instant(day, 12)
}

/// Sunday-based day number used for session selection (0 = Sunday, 1 = Monday)
pub fn session_day_number(date: NaiveDate) -> u32 {
    date.weekday().num_days_from_sunday()
}

/// Phase and week activation for `target`, measured from `start`.
///
/// Shared by the "today" resolver and the calendar projector.
pub fn resolve_cadence(start: NaiveDate, target: NaiveDate) -> CadenceStatus {
    let elapsed_days = (target - start).num_days();
    let week_index = elapsed_days.div_euclid(7);

    if elapsed_days < 0 {
        return CadenceStatus {
            elapsed_days,
            week_index,
            phase: Phase::Attack,
            is_pre_operation: true,
            is_active_week: false,
            is_shoulder_week: false,
            status_message: STATUS_PRE_OPERATION,
        };
    }

    let phase = Phase::for_week(week_index);

    let (is_active_week, is_shoulder_week, status_message) = match phase {
        // Shoulder add-on on weeks 0, 3, 6, 9
        Phase::Attack => (true, week_index % 3 == 0, STATUS_OPERATIONAL),
        // Parity counts from the operation start, not from phase entry:
        // week 12 rests, week 13 fires.
        Phase::Transition => {
            let active = week_index % 2 != 0;
            let message = if active {
                STATUS_OPERATIONAL
            } else {
                STATUS_REST_WEEK
            };
            (active, active, message)
        }
        Phase::Maintenance => {
            if target.month() == AUGUST {
                (false, false, STATUS_AUGUST_HOLIDAY)
            } else if target.day() <= MAINTENANCE_WINDOW_DAYS {
                (true, false, STATUS_OPERATIONAL)
            } else {
                (false, false, STATUS_STANDBY)
            }
        }
    };

    CadenceStatus {
        elapsed_days,
        week_index,
        phase,
        is_pre_operation: false,
        is_active_week,
        is_shoulder_week,
        status_message,
    }
}

// ---------------------------------------------------------------------------
/// Session Recommendation: what to do on the evaluated day
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecommendation {
    /// Date hint ("TODAY (SUNDAY)", "SUNDAY 4") or the status message when waiting
    pub label: String,
    pub zones: Vec<String>,
    #[serde(rename = "type")]
    pub session_type: SessionType,
}

impl SessionRecommendation {
    fn waiting(status_message: &str) -> Self {
        Self {
            label: status_message.to_string(),
            zones: Vec::new(),
            session_type: SessionType::Waiting,
        }
    }
}

/// Session for `reference` given its cadence.
///
/// Off-session days in an active week get a forward-looking torso hint for
/// the next Sunday.
pub fn recommend_session(cadence: &CadenceStatus, reference: NaiveDate) -> SessionRecommendation {
    if !cadence.is_active_week {
        return SessionRecommendation::waiting(cadence.status_message);
    }

    match session_day_number(reference) {
        0 => SessionRecommendation {
            label: "TODAY (SUNDAY)".to_string(),
            zones: zones::torso_zones(cadence.is_shoulder_week),
            session_type: SessionType::Torso,
        },
        1 => SessionRecommendation {
            label: "TODAY (MONDAY)".to_string(),
            zones: zones::legs_zones(),
            session_type: SessionType::Legs,
        },
        day => {
            let days_until_sunday = (7 - day) % 7;
            let next_sunday = reference + Duration::days(days_until_sunday as i64);
            SessionRecommendation {
                label: format!("SUNDAY {}", next_sunday.day()),
                zones: zones::torso_zones(false),
                session_type: SessionType::UpcomingTorso,
            }
        }
    }
}

// ---------------------------------------------------------------------------
/// Timeline Status: full resolver output for one reference day
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineStatus {
    pub reference_date: NaiveDate,
    pub phase: Phase,
    pub week_index: i64,
    pub elapsed_days: i64,
    pub is_pre_operation: bool,
    pub is_active_week: bool,
    pub is_shoulder_week: bool,
    pub status_message: String,
    pub session: SessionRecommendation,
}

impl TimelineStatus {
    /// One-based week number for display, None before the start date
    pub fn week_number(&self) -> Option<i64> {
        if self.is_pre_operation {
            None
        } else {
            Some(self.week_index + 1)
        }
    }
}

/// Resolve the protocol state for `reference`
pub fn resolve(start: NaiveDate, reference: NaiveDate) -> TimelineStatus {
    let cadence = resolve_cadence(start, reference);
    let session = recommend_session(&cadence, reference);

    TimelineStatus {
        reference_date: reference,
        phase: cadence.phase,
        week_index: cadence.week_index,
        elapsed_days: cadence.elapsed_days,
        is_pre_operation: cadence.is_pre_operation,
        is_active_week: cadence.is_active_week,
        is_shoulder_week: cadence.is_shoulder_week,
        status_message: cadence.status_message.to_string(),
        session,
    }
}

/// Resolve the protocol state for `reference`, from a stored start instant
pub fn resolve_from(start: &DateTime<Utc>, reference: NaiveDate) -> TimelineStatus {
    resolve(local_day(start), reference)
}

/// Resolve the protocol state for today, from a stored start instant
pub fn resolve_now(start: &DateTime<Utc>) -> TimelineStatus {
    resolve_from(start, Local::now().date_naive())
}

// ---------------------------------------------------------------------------
/// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn start() -> NaiveDate {
        day(2025, 12, 28)
    }

    #[test]
    fn test_phase_partition() {
        assert_eq!(Phase::for_week(0), Phase::Attack);
        assert_eq!(Phase::for_week(11), Phase::Attack);
        assert_eq!(Phase::for_week(12), Phase::Transition);
        assert_eq!(Phase::for_week(23), Phase::Transition);
        assert_eq!(Phase::for_week(24), Phase::Maintenance);
        assert_eq!(Phase::for_week(500), Phase::Maintenance);
    }

    #[test]
    fn test_start_sunday_is_shoulder_torso() {
        let status = resolve(start(), start());
        assert_eq!(status.week_index, 0);
        assert_eq!(status.phase, Phase::Attack);
        assert!(status.is_shoulder_week);
        assert_eq!(status.session.session_type, SessionType::Torso);
        assert_eq!(
            status.session.zones,
            vec!["Chest", "Abdomen", "Shoulders", "Arms (Gradient)"]
        );
        assert_eq!(status.session.label, "TODAY (SUNDAY)");
    }

    #[test]
    fn test_first_monday_is_legs() {
        let status = resolve(start(), day(2025, 12, 29));
        assert_eq!(status.week_index, 0);
        assert_eq!(status.session.session_type, SessionType::Legs);
        assert_eq!(status.session.zones, vec!["Thighs", "Knees", "Glutes"]);
    }

    #[test]
    fn test_attack_non_shoulder_week_torso_without_addon() {
        // Week 1 Sunday
        let status = resolve(start(), start() + Duration::days(7));
        assert_eq!(status.week_index, 1);
        assert!(!status.is_shoulder_week);
        assert_eq!(status.session.zones, vec!["Chest", "Abdomen"]);
    }

    #[test]
    fn test_attack_shoulder_weeks_every_third() {
        for week in 0..ATTACK_WEEKS {
            let status = resolve(start(), start() + Duration::days(week * 7 + 3));
            assert_eq!(status.phase, Phase::Attack);
            assert!(status.is_active_week);
            assert_eq!(status.is_shoulder_week, week % 3 == 0, "week {}", week);
        }
    }

    #[test]
    fn test_week_12_rests_and_week_13_fires() {
        let rest = resolve(start(), start() + Duration::days(84));
        assert_eq!(rest.phase, Phase::Transition);
        assert_eq!(rest.week_index, 12);
        assert!(!rest.is_active_week);
        assert_eq!(rest.status_message, STATUS_REST_WEEK);
        assert_eq!(rest.session.session_type, SessionType::Waiting);
        assert!(rest.session.zones.is_empty());

        let active = resolve(start(), start() + Duration::days(91));
        assert_eq!(active.phase, Phase::Transition);
        assert_eq!(active.week_index, 13);
        assert!(active.is_active_week);
        assert!(active.is_shoulder_week);
        assert_eq!(active.session.session_type, SessionType::Torso);
        assert_eq!(active.session.zones.len(), 4);
    }

    #[test]
    fn test_transition_parity_follows_absolute_week() {
        for week in ATTACK_WEEKS..TRANSITION_END_WEEK {
            for offset in 0..7 {
                let status = resolve(start(), start() + Duration::days(week * 7 + offset));
                assert_eq!(status.is_active_week, week % 2 != 0, "week {}", week);
            }
        }
    }

    #[test]
    fn test_maintenance_august_cease_fire() {
        // Week 31, Sunday 2 August 2026
        for d in 1..=31 {
            let status = resolve(start(), day(2026, 8, d));
            assert_eq!(status.phase, Phase::Maintenance);
            assert!(!status.is_active_week);
            assert_eq!(status.status_message, STATUS_AUGUST_HOLIDAY);
            assert!(status.session.zones.is_empty());
        }
    }

    #[test]
    fn test_maintenance_first_week_of_month_only() {
        for d in 1..=30 {
            let status = resolve(start(), day(2026, 9, d));
            assert_eq!(status.phase, Phase::Maintenance);
            assert_eq!(status.is_active_week, d <= 7, "day {}", d);
            if d > 7 {
                assert_eq!(status.status_message, STATUS_STANDBY);
            }
        }
    }

    #[test]
    fn test_maintenance_torso_has_no_shoulder_addon() {
        // Sunday 6 September 2026
        let status = resolve(start(), day(2026, 9, 6));
        assert_eq!(status.session.session_type, SessionType::Torso);
        assert_eq!(status.session.zones, vec!["Chest", "Abdomen"]);
    }

    #[test]
    fn test_pre_operation_waits() {
        for offset in 1..60 {
            let status = resolve(start(), start() - Duration::days(offset));
            assert!(status.is_pre_operation);
            assert!(!status.is_active_week);
            assert!(status.session.zones.is_empty());
            assert_eq!(status.session.session_type, SessionType::Waiting);
            assert_eq!(status.session.label, STATUS_PRE_OPERATION);
            assert_eq!(status.week_number(), None);
        }
    }

    #[test]
    fn test_day_before_start_is_pre_operation_not_week_zero() {
        let status = resolve(start(), day(2025, 12, 27));
        assert_eq!(status.elapsed_days, -1);
        assert_eq!(status.week_index, -1);
        assert!(status.is_pre_operation);
    }

    #[test]
    fn test_midweek_points_to_next_sunday() {
        // Wednesday 31 December 2025 -> Sunday 4 January 2026
        let status = resolve(start(), day(2025, 12, 31));
        assert!(status.is_active_week);
        assert_eq!(status.session.session_type, SessionType::UpcomingTorso);
        assert_eq!(status.session.label, "SUNDAY 4");
        assert_eq!(status.session.zones, vec!["Chest", "Abdomen"]);
    }

    #[test]
    fn test_saturday_points_to_tomorrow() {
        let status = resolve(start(), day(2026, 1, 3));
        assert_eq!(status.session.label, "SUNDAY 4");
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let a = resolve(start(), day(2026, 4, 5));
        let b = resolve(start(), day(2026, 4, 5));
        assert_eq!(a, b);
    }

    #[test]
    fn test_session_type_serializes_with_protocol_names() {
        let json = serde_json::to_string(&SessionType::UpcomingTorso).unwrap();
        assert_eq!(json, "\"UPCOMING: TORSO\"");

        let rec = resolve(start(), start()).session;
        let value = serde_json::to_value(&rec).unwrap();
        assert_eq!(value["type"], "TORSO");
    }

    #[test]
    fn test_phase_from_str() {
        assert_eq!("transition".parse::<Phase>().unwrap(), Phase::Transition);
        assert!("bogus".parse::<Phase>().is_err());
    }

    #[test]
    fn test_local_noon_stays_on_its_day() {
        for date in [start(), day(2026, 3, 29), day(2026, 10, 25), day(2026, 12, 31)] {
            let noon = local_noon(date).unwrap();
            assert_eq!(local_day(&noon), date);
        }
    }

    #[test]
    fn test_stored_start_at_local_midnight_keeps_its_day() {
        let stored = local_midnight(start()).unwrap();
        assert_eq!(local_day(&stored), start());

        let status = resolve_from(&stored, start());
        assert_eq!(status, resolve(start(), start()));
        assert!(!status.is_pre_operation);
        assert!(resolve_from(&stored, day(2025, 12, 27)).is_pre_operation);
    }

    #[test]
    fn test_resolve_now_uses_todays_local_date() {
        let stored = local_noon(start()).unwrap();
        let today = Local::now().date_naive();
        let status = resolve_now(&stored);
        assert_eq!(status.reference_date, today);
        assert_eq!(status, resolve(start(), today));
    }
}
