use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One completed-workout record, compared by calendar day only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckinEvent {
  pub student_id: String,
  pub completed_on: NaiveDate,
  #[serde(default = "default_completed")]
  pub completed: bool,
}

fn default_completed() -> bool {
  true
}
