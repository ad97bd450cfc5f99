//! Progress screen commands. The frontend calls these every time a screen
//! gains focus and keeps the latest answer.

use std::sync::Arc;
use tauri::State;

use crate::db::AppState;
use crate::error::AppError;
use crate::models::MeasurementField;
use crate::overview::{load_cycle_overview, load_measurement_trend, load_week_summary, CycleOverview};
use crate::session::valid_session;
use crate::trend::Trend;
use crate::weekly::WeekSummary;

/// Resolve the access token and the student being viewed. Coaches pass the
/// student's id; students omit it and see their own data.
async fn resolve_request(
  state: &AppState,
  student_id: Option<String>,
) -> Result<(String, String), AppError> {
  let session = valid_session(&state.db, &state.backend).await?;
  let student_id = student_id.unwrap_or_else(|| session.user_id.clone());
  Ok((session.access_token, student_id))
}

#[tauri::command]
pub async fn get_cycle_progress(
  state: State<'_, Arc<AppState>>,
  student_id: Option<String>,
) -> Result<Option<CycleOverview>, AppError> {
  let (token, student_id) = resolve_request(&state, student_id).await?;
  load_cycle_overview(&state.backend, &token, &student_id, state.config.today()).await
}

#[tauri::command]
pub async fn get_week_status(
  state: State<'_, Arc<AppState>>,
  student_id: Option<String>,
) -> Result<WeekSummary, AppError> {
  let (token, student_id) = resolve_request(&state, student_id).await?;
  Ok(load_week_summary(&state.backend, &token, &student_id, state.config.today()).await)
}

#[tauri::command]
pub async fn get_measurement_trend(
  state: State<'_, Arc<AppState>>,
  student_id: Option<String>,
  field: Option<MeasurementField>,
) -> Result<Trend, AppError> {
  let (token, student_id) = resolve_request(&state, student_id).await?;
  let field = field.unwrap_or_default();
  Ok(load_measurement_trend(&state.backend, &token, &student_id, field).await)
}
