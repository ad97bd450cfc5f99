//! Test utilities and helpers for unit testing
//!
//! This module provides common test infrastructure including:
//! - Database setup/teardown
//! - Mock data factories
//! - Date helpers

use crate::config::AppConfig;
use crate::models::{CycleGoal, MeasurementRecord};
use crate::session::Session;
use chrono::{Duration, FixedOffset, NaiveDate, Utc};
use sqlx::SqlitePool;
use url::Url;

/// ---------------------------------------------------------------------------
/// Database Test Utilities
/// ---------------------------------------------------------------------------

/// Create an in-memory SQLite database for testing
/// Runs all migrations and returns a ready-to-use pool
///
/// Uses max_connections(1) to prevent multiple pool connections from creating
/// isolated in-memory databases, which would cause intermittent test failures
pub async fn setup_test_db() -> SqlitePool {
  let pool = sqlx::sqlite::SqlitePoolOptions::new()
    .max_connections(1)
    .connect("sqlite::memory:")
    .await
    .expect("Failed to create in-memory database");

  sqlx::migrate!("./migrations")
    .run(&pool)
    .await
    .expect("Failed to run migrations");

  pool
}

/// Close a test database pool
pub async fn teardown_test_db(pool: SqlitePool) {
  pool.close().await;
}

/// ---------------------------------------------------------------------------
/// Mock Data Factories
/// ---------------------------------------------------------------------------

/// Config pointing at `backend_url` (usually a mockito server)
pub fn mock_app_config(backend_url: &str) -> AppConfig {
  AppConfig {
    backend_url: Url::parse(backend_url).expect("Invalid mock backend URL"),
    anon_key: "test-anon-key".to_string(),
    utc_offset: FixedOffset::west_opt(3 * 3600).expect("Invalid offset"),
  }
}

/// Session for `student-1` expiring `expires_in` from now
pub fn mock_session(expires_in: Duration) -> Session {
  Session {
    user_id: "student-1".to_string(),
    email: Some("aluna@example.com".to_string()),
    access_token: "access-1".to_string(),
    refresh_token: "refresh-1".to_string(),
    expires_at: Utc::now() + expires_in,
  }
}

pub fn mock_cycle_goal(target_checkins: i32, start_date: NaiveDate, end_date: NaiveDate) -> CycleGoal {
  let duration_weeks = ((end_date - start_date).num_days() / 7).max(1) as i32;
  CycleGoal {
    id: "cycle-1".to_string(),
    student_id: "student-1".to_string(),
    name: "Ciclo de Teste".to_string(),
    start_date,
    end_date,
    duration_weeks,
    target_checkins,
    active: true,
  }
}

pub fn mock_measurement(measured_on: NaiveDate, weight: Option<f64>) -> MeasurementRecord {
  MeasurementRecord {
    id: format!("m-{}", measured_on),
    student_id: "student-1".to_string(),
    measured_on,
    weight,
    ..Default::default()
  }
}

/// ---------------------------------------------------------------------------
/// Logging Helpers
/// ---------------------------------------------------------------------------

/// Install a thread-local subscriber at TRACE so every log argument is
/// formatted. `#[tokio::test]` runs on the current thread, so the guard covers
/// the whole test body.
pub fn capture_logs() -> tracing::subscriber::DefaultGuard {
  let subscriber = tracing_subscriber::fmt()
    .with_max_level(tracing::Level::TRACE)
    .with_writer(std::io::sink)
    .finish();
  tracing::subscriber::set_default(subscriber)
}

/// ---------------------------------------------------------------------------
/// Date Helpers
/// ---------------------------------------------------------------------------

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
  NaiveDate::from_ymd_opt(year, month, day).expect("Invalid test date")
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_setup_db_creates_schema() {
    let pool = setup_test_db().await;

    let tables: Vec<(String,)> = sqlx::query_as(
      "SELECT name FROM sqlite_master WHERE type='table' AND name = 'auth_session'",
    )
    .fetch_all(&pool)
    .await
    .expect("Failed to query tables");

    assert_eq!(tables.len(), 1);

    teardown_test_db(pool).await;
  }

  #[test]
  fn test_mock_factories_create_valid_data() {
    let goal = mock_cycle_goal(24, date(2024, 4, 1), date(2024, 5, 27));
    assert_eq!(goal.duration_weeks, 8);
    assert!(goal.end_date >= goal.start_date);

    let record = mock_measurement(date(2024, 4, 1), Some(62.0));
    assert_eq!(record.weight, Some(62.0));
    assert_eq!(record.waist, None);

    let config = mock_app_config("http://127.0.0.1:1234");
    assert_eq!(config.utc_offset.local_minus_utc(), -3 * 3600);
  }
}
