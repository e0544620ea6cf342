//! Command-line surface
//!
//! Parses arguments with `clap`, calls into `commands`, and renders results
//! either as plain text or as JSON (`--json`).

use std::io::{self, BufRead, Write};

use chrono::{Datelike, Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

use crate::calendar::{DayClassification, DayStatus, MonthView};
use crate::commands::{self, briefing, sessions, settings};
use crate::db::AppState;
use crate::llm::ChatTurn;
use crate::models::{NewSessionLog, SessionLog, VibrationIntensity};
use crate::settings::SettingsUpdate;
use crate::timeline::TimelineStatus;
use crate::zones;

/// ---------------------------------------------------------------------------
/// Arguments
/// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
  name = "ipl-tracker",
  version,
  about = "Sunday/Monday IPL protocol tracker",
  long_about = "Tracks a home IPL protocol: torso on Sundays, legs on Mondays, \
                weekly for 12 weeks, bi-weekly to week 24, then monthly."
)]
pub struct Cli {
  #[command(subcommand)]
  pub command: Command,

  /// Print results as JSON
  #[arg(long, global = true)]
  pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
  /// Current phase, week and today's session
  Status {
    /// Evaluate as of this day (YYYY-MM-DD) instead of today
    #[arg(long)]
    date: Option<NaiveDate>,
  },

  /// Month calendar with session outcomes
  Calendar {
    /// Year (defaults to the current year)
    #[arg(long)]
    year: Option<i32>,

    /// Month 1-12 (defaults to the current month)
    #[arg(long)]
    month: Option<u32>,
  },

  /// Classification of a single day
  Day {
    /// Day to inspect (YYYY-MM-DD)
    date: NaiveDate,
  },

  /// Record a finished session
  Log {
    #[arg(value_enum)]
    kind: SessionKind,

    /// Session length in minutes
    #[arg(long)]
    minutes: u32,

    /// Include the shoulder gradient on a torso session
    #[arg(long)]
    shoulders: bool,

    /// Backfill on this day (YYYY-MM-DD) instead of now
    #[arg(long)]
    date: Option<NaiveDate>,

    #[arg(long)]
    notes: Option<String>,

    /// UV index at session time
    #[arg(long)]
    uv: Option<f64>,

    /// Mark the session as abandoned
    #[arg(long)]
    incomplete: bool,
  },

  /// List logged sessions, newest first
  Sessions {
    #[arg(long, default_value_t = 20)]
    limit: usize,
  },

  /// Change the operation start date (YYYY-MM-DD or RFC 3339)
  SetStart { date: String },

  /// Show or change settings
  Settings {
    #[arg(long)]
    machine_cost: Option<f64>,

    #[arg(long)]
    legs_value: Option<f64>,

    #[arg(long)]
    torso_value: Option<f64>,

    /// LOW or HIGH
    #[arg(long)]
    vibration: Option<VibrationIntensity>,

    #[arg(long)]
    paused: Option<bool>,
  },

  /// Today's mission briefing
  Briefing,

  /// Talk to the intel officer; interactive when no message is given
  Chat { message: Option<String> },

  /// Delete every session and restore default settings
  Reset {
    /// Confirm the reset
    #[arg(long)]
    yes: bool,
  },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionKind {
  Torso,
  Legs,
}

impl SessionKind {
  fn zones(self, shoulders: bool) -> Vec<String> {
    match self {
      Self::Torso => zones::torso_zones(shoulders),
      Self::Legs => zones::legs_zones(),
    }
  }
}

/// ---------------------------------------------------------------------------
/// Dispatch
/// ---------------------------------------------------------------------------

pub async fn execute(cli: Cli, state: &AppState) -> Result<(), String> {
  let json = cli.json;

  match cli.command {
    Command::Status { date } => {
      let report = match date {
        Some(date) => commands::get_status_on(state, date).await?,
        None => commands::get_status(state).await?,
      };
      emit(json, &report, || {
        let mut out = render_timeline(&report.timeline);
        if report.is_paused {
          out.push_str("\nPAUSED (manual override)");
        }
        out.push_str(&format!(
          "\nSessions logged: {}  Savings: {:.0} / {:.0}{}",
          report.sessions_logged,
          report.savings.total_savings,
          report.savings.machine_cost,
          if report.savings.break_even { "  (paid off)" } else { "" }
        ));
        out
      })
    }

    Command::Calendar { year, month } => {
      let today = commands::today();
      let view = commands::get_month_calendar(
        state,
        year.unwrap_or_else(|| today.year()),
        month.unwrap_or_else(|| today.month()),
      )
      .await?;
      emit(json, &view, || render_month(&view))
    }

    Command::Day { date } => {
      let detail = commands::get_day_detail(state, date).await?;
      emit(json, &detail, || {
        let mut out = render_day(&detail.status);
        if detail.sessions_on_day > 1 {
          out.push_str(&format!("\n{} sessions logged this day", detail.sessions_on_day));
        }
        out
      })
    }

    Command::Log {
      kind,
      minutes,
      shoulders,
      date,
      notes,
      uv,
      incomplete,
    } => {
      let new = NewSessionLog {
        duration_seconds: i64::from(minutes) * 60,
        zones: kind.zones(shoulders),
        notes,
        completed: !incomplete,
        uv_index: uv,
      };
      let log = match date {
        Some(day) => sessions::log_session_on(state, new, day).await?,
        None => sessions::log_session(state, new).await?,
      };
      emit(json, &log, || format!("Logged {}", render_session(&log)))
    }

    Command::Sessions { limit } => {
      let logs = sessions::get_sessions(state, Some(limit)).await?;
      emit(json, &logs, || {
        if logs.is_empty() {
          return "No sessions logged".to_string();
        }
        logs.iter().map(render_session).collect::<Vec<_>>().join("\n")
      })
    }

    Command::SetStart { date } => {
      let status = settings::set_start_date(state, &date).await?;
      emit(json, &status, || render_timeline(&status))
    }

    Command::Settings {
      machine_cost,
      legs_value,
      torso_value,
      vibration,
      paused,
    } => {
      let update = SettingsUpdate {
        machine_cost,
        session_value_legs: legs_value,
        session_value_torso: torso_value,
        vibration_intensity: vibration,
        is_paused: paused,
      };
      let has_changes = update.machine_cost.is_some()
        || update.session_value_legs.is_some()
        || update.session_value_torso.is_some()
        || update.vibration_intensity.is_some()
        || update.is_paused.is_some();

      let current = if has_changes {
        settings::update_settings(state, update).await?
      } else {
        settings::get_settings(state).await?
      };
      emit(json, &current, || {
        format!(
          "Start date:      {}\nMachine cost:    {:.2}\nLegs value:      {:.2}\nTorso value:     {:.2}\nVibration:       {}\nPaused:          {}",
          current.start_date.format("%Y-%m-%d"),
          current.machine_cost,
          current.session_value_legs,
          current.session_value_torso,
          current.vibration_intensity,
          current.is_paused
        )
      })
    }

    Command::Briefing => {
      let report = briefing::get_briefing(state).await?;
      emit(json, &report, || {
        let mut out = String::new();
        if let Some(weather) = report.weather {
          out.push_str(&format!(
            "UV {:.1} ({:?})  {:.1}°C\n",
            weather.uv_index,
            weather.uv_risk(),
            weather.temperature
          ));
        }
        out.push_str(&report.text);
        out
      })
    }

    Command::Chat { message: Some(message) } => {
      let reply = briefing::chat_with_officer(state, &message, &[]).await?;
      emit(json, &reply, || reply.clone())
    }

    Command::Chat { message: None } => chat_loop(state).await,

    Command::Reset { yes } => {
      if !yes {
        return Err("Refusing to reset without --yes".to_string());
      }
      sessions::reset_data(state).await?;
      println!("All data cleared");
      Ok(())
    }
  }
}

fn emit<T: Serialize>(json: bool, value: &T, text: impl FnOnce() -> String) -> Result<(), String> {
  if json {
    let body =
      serde_json::to_string_pretty(value).map_err(|e| format!("Failed to encode output: {}", e))?;
    println!("{}", body);
  } else {
    println!("{}", text());
  }
  Ok(())
}

/// Read questions from stdin until EOF or `exit`, keeping the conversation
async fn chat_loop(state: &AppState) -> Result<(), String> {
  let stdin = io::stdin();
  let mut history: Vec<ChatTurn> = Vec::new();

  println!("Intel officer online. Type 'exit' to close the channel.");
  loop {
    print!("> ");
    io::stdout()
      .flush()
      .map_err(|e| format!("Failed to write prompt: {}", e))?;

    let mut line = String::new();
    let read = stdin
      .lock()
      .read_line(&mut line)
      .map_err(|e| format!("Failed to read input: {}", e))?;
    let message = line.trim();
    if read == 0 || message.eq_ignore_ascii_case("exit") {
      return Ok(());
    }
    if message.is_empty() {
      continue;
    }

    let reply = briefing::chat_with_officer(state, message, &history).await?;
    println!("{}", reply);
    history.push(ChatTurn::user(message));
    history.push(ChatTurn::model(reply));
  }
}

/// ---------------------------------------------------------------------------
/// Text Rendering
/// ---------------------------------------------------------------------------

pub fn render_timeline(status: &TimelineStatus) -> String {
  let week = match status.week_number() {
    Some(n) => format!("WEEK {}", n),
    None => format!("T-{} DAYS", -status.elapsed_days),
  };
  let zones = if status.session.zones.is_empty() {
    String::new()
  } else {
    format!("\nZones: {}", status.session.zones.join(", "))
  };

  format!(
    "{}  {}  [{}]\nNext: {} ({}){}",
    status.phase.display_name(),
    week,
    status.status_message,
    status.session.session_type,
    status.session.label,
    zones
  )
}

fn marker(classification: DayClassification) -> char {
  match classification {
    DayClassification::SessionCompleted => '*',
    DayClassification::SessionMissed => '!',
    DayClassification::SessionUpcoming => 'o',
    DayClassification::ExtraCredit => '+',
    DayClassification::PreOperation => '-',
    DayClassification::Rest => ' ',
  }
}

pub fn render_month(view: &MonthView) -> String {
  let mut out = format!("{:04}-{:02}\n Mo  Tu  We  Th  Fr  Sa  Su\n", view.year, view.month);

  for week in view.weeks() {
    let row: Vec<String> = week
      .iter()
      .map(|cell| match cell {
        Some(day) => format!("{:>3}{}", day.date.day(), marker(day.classification)),
        None => "    ".to_string(),
      })
      .collect();
    out.push_str(row.join("").trim_end());
    out.push('\n');
  }

  let summary = view.summary();
  out.push_str(&format!(
    "* completed {}  ! missed {}  o upcoming {}  + extra {}",
    summary.completed, summary.missed, summary.upcoming, summary.extra_credit
  ));

  let (prev_year, prev_month) = view.previous();
  let (next_year, next_month) = view.next();
  out.push_str(&format!(
    "\n< {:04}-{:02}    {:04}-{:02} >",
    prev_year, prev_month, next_year, next_month
  ));
  out
}

pub fn render_day(status: &DayStatus) -> String {
  let mut out = format!("{}  {}", status.date, status.classification);
  if let Some(phase) = status.phase {
    out.push_str(&format!("\nPhase: {}", phase.display_name()));
  }
  if let Some(session_type) = status.session_type {
    out.push_str(&format!("\nSession: {} ({})", session_type, status.zones.join(", ")));
  }
  if let Some(log) = &status.log {
    out.push_str(&format!("\nLogged: {}", render_session(log)));
  }
  out
}

fn render_session(log: &SessionLog) -> String {
  let mut out = format!(
    "{}  {} min  {}{}",
    log.date.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
    log.duration_seconds / 60,
    log.zones.join(", "),
    if log.completed { "" } else { "  (incomplete)" }
  );
  if let Some(notes) = &log.notes {
    out.push_str(&format!("  \"{}\"", notes));
  }
  out
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;
  use crate::calendar::CalendarProjector;
  use crate::timeline::resolve;

  fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
  }

  #[test]
  fn test_parse_log_command() {
    let cli = Cli::try_parse_from([
      "ipl-tracker",
      "log",
      "torso",
      "--minutes",
      "25",
      "--shoulders",
      "--date",
      "2026-01-04",
    ])
    .expect("Should parse");

    match cli.command {
      Command::Log {
        kind,
        minutes,
        shoulders,
        date,
        ..
      } => {
        assert_eq!(kind, SessionKind::Torso);
        assert_eq!(minutes, 25);
        assert!(shoulders);
        assert_eq!(date, Some(day(2026, 1, 4)));
        assert_eq!(kind.zones(shoulders).len(), 4);
      }
      other => panic!("unexpected command: {:?}", other),
    }
  }

  #[test]
  fn test_parse_settings_vibration() {
    let cli = Cli::try_parse_from(["ipl-tracker", "--json", "settings", "--vibration", "low"])
      .expect("Should parse");
    assert!(cli.json);
    assert!(matches!(
      cli.command,
      Command::Settings {
        vibration: Some(VibrationIntensity::Low),
        ..
      }
    ));
  }

  #[test]
  fn test_invalid_date_is_rejected() {
    assert!(Cli::try_parse_from(["ipl-tracker", "day", "04/01/2026"]).is_err());
  }

  #[test]
  fn test_render_timeline_pre_operation() {
    let status = resolve(day(2025, 12, 28), day(2025, 12, 25));
    let text = render_timeline(&status);
    assert!(text.contains("T-3 DAYS"));
    assert!(text.contains("PRE-OPERATION"));
  }

  #[test]
  fn test_render_month_grid() {
    let projector = CalendarProjector::new(day(2025, 12, 28), &[], day(2026, 1, 15));
    let view = projector.month(2026, 1).unwrap();
    let text = render_month(&view);

    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "2026-01");
    // Thursday 1st sits in the fourth column
    assert!(lines[2].starts_with("              1"));
    assert!(text.contains("  4!"));
    assert!(text.contains(" 18o"));
    assert!(text.ends_with("< 2025-12    2026-02 >"));
  }

  #[test]
  fn test_render_session_uses_local_time() {
    let log = crate::test_utils::mock_session_log("1", day(2026, 1, 4));
    let text = render_session(&log);
    assert!(text.starts_with("2026-01-04 12:00  30 min  "), "{}", text);
    assert!(!text.contains("incomplete"));
  }
}
