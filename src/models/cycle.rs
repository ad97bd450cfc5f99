use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A coach-defined training period with a checkin goal.
/// Rows come from the `training_cycles` table; the backend guarantees at most
/// one active cycle per student.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleGoal {
  pub id: String,
  pub student_id: String,
  pub name: String,
  pub start_date: NaiveDate,
  pub end_date: NaiveDate,
  pub duration_weeks: i32,
  pub target_checkins: i32,
  #[serde(default)]
  pub active: bool,
}
