//! Reload-on-activation loaders for the progress screens.
//!
//! Each loader runs one fresh fetch and one pure computation. The screen keeps
//! whatever the latest call returned, so there is no caching or cancellation
//! here. Fetch failures are logged and treated as "no data"; only an invalid
//! cycle goal is reported as an error.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::backend::BackendClient;
use crate::error::AppError;
use crate::models::{CycleGoal, MeasurementField};
use crate::progress::{compute_cycle_progress, DerivedProgress};
use crate::trend::{extract_trend_for, Trend, TREND_WINDOW};
use crate::weekly::{build_week_status, week_bounds, WeekSummary};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleOverview {
  pub cycle: CycleGoal,
  pub progress: DerivedProgress,
}

/// Active cycle and its progress, or `None` when there is no active cycle
/// (or it could not be fetched).
pub async fn load_cycle_overview(
  backend: &BackendClient,
  access_token: &str,
  student_id: &str,
  today: NaiveDate,
) -> Result<Option<CycleOverview>, AppError> {
  let cycle = match backend.fetch_active_cycle(access_token, student_id).await {
    Ok(Some(cycle)) => cycle,
    Ok(None) => return Ok(None),
    Err(e) => {
      warn!(student_id, error = %e, "Active cycle unavailable");
      return Ok(None);
    }
  };

  let completed = backend
    .count_checkins(access_token, student_id, cycle.start_date, cycle.end_date)
    .await
    .unwrap_or_else(|e| {
      warn!(student_id, cycle_id = %cycle.id, error = %e, "Checkin count unavailable");
      0
    });

  let progress = compute_cycle_progress(&cycle, completed, today)?;
  Ok(Some(CycleOverview { cycle, progress }))
}

/// Current week's frequency strip
pub async fn load_week_summary(
  backend: &BackendClient,
  access_token: &str,
  student_id: &str,
  today: NaiveDate,
) -> WeekSummary {
  let (monday, sunday) = week_bounds(today);

  let dates = backend
    .fetch_checkin_dates(access_token, student_id, monday, sunday)
    .await
    .unwrap_or_else(|e| {
      warn!(student_id, error = %e, "Weekly checkins unavailable");
      Vec::new()
    });

  build_week_status(today, &dates)
}

/// Chart series for the latest measurements
pub async fn load_measurement_trend(
  backend: &BackendClient,
  access_token: &str,
  student_id: &str,
  field: MeasurementField,
) -> Trend {
  let records = backend
    .fetch_recent_measurements(access_token, student_id, TREND_WINDOW)
    .await
    .unwrap_or_else(|e| {
      warn!(student_id, error = %e, "Measurement history unavailable");
      Vec::new()
    });

  extract_trend_for(&records, field)
}
