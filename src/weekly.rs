//! Weekly training frequency
//!
//! Builds the Monday-to-Sunday strip shown on the student home screen. Weeks
//! always start on Monday regardless of locale, and today is never counted as
//! missed: a workout can still be logged before the day ends.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

const WEEKDAY_LABELS: [&str; 7] = ["Seg", "Ter", "Qua", "Qui", "Sex", "Sáb", "Dom"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayStatus {
  Completed,
  Missed,
  Future,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekDayStatus {
  pub date: NaiveDate,
  pub status: DayStatus,
}

impl WeekDayStatus {
  /// Short pt-BR weekday label ("Seg".."Dom")
  pub fn label(&self) -> &'static str {
    WEEKDAY_LABELS[self.date.weekday().num_days_from_monday() as usize]
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekSummary {
  pub days: [WeekDayStatus; 7],
  /// Completed days inside the week
  pub completed: usize,
  /// Monday through today inclusive
  pub elapsed_days: usize,
}

impl WeekSummary {
  /// e.g. "3/4 treinos realizados"
  pub fn label(&self) -> String {
    format!("{}/{} treinos realizados", self.completed, self.elapsed_days)
  }
}

/// Monday and Sunday of the week containing `today`
pub fn week_bounds(today: NaiveDate) -> (NaiveDate, NaiveDate) {
  let offset = today.weekday().num_days_from_monday() as i64;
  let monday = today - Duration::days(offset);
  (monday, monday + Duration::days(6))
}

/// Classify each day of the current week.
///
/// `checkin_dates` may contain duplicates or dates outside the week; only the
/// distinct dates inside the Monday-Sunday window matter.
pub fn build_week_status(today: NaiveDate, checkin_dates: &[NaiveDate]) -> WeekSummary {
  let (monday, _) = week_bounds(today);
  let done: HashSet<NaiveDate> = checkin_dates.iter().copied().collect();

  let days: [WeekDayStatus; 7] = std::array::from_fn(|i| {
    let date = monday + Duration::days(i as i64);
    let status = if done.contains(&date) {
      DayStatus::Completed
    } else if date < today {
      DayStatus::Missed
    } else {
      DayStatus::Future
    };
    WeekDayStatus { date, status }
  });

  let completed = days
    .iter()
    .filter(|d| d.status == DayStatus::Completed)
    .count();
  let elapsed_days = (today.weekday().num_days_from_monday() as usize + 1).min(7);

  WeekSummary {
    days,
    completed,
    elapsed_days,
  }
}
