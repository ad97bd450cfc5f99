//! Client for the hosted backend
//!
//! The backend exposes an auth service (`/auth/v1`) and a REST view over the
//! relational tables (`/rest/v1`). Every request carries the project's anon key
//! in the `apikey` header; table reads also carry the user's bearer token so
//! row-level policies apply.

use chrono::NaiveDate;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};
use url::Url;

use crate::config::AppConfig;
use crate::error::AppError;
use crate::models::{CheckinEvent, CycleGoal, MeasurementRecord};
use crate::session::Session;

/// ---------------------------------------------------------------------------
/// Configuration Constants
/// ---------------------------------------------------------------------------

const AUTH_TOKEN_PATH: &str = "auth/v1/token";
const CYCLES_PATH: &str = "rest/v1/training_cycles";
const CHECKINS_PATH: &str = "rest/v1/workout_checkins";
const MEASUREMENTS_PATH: &str = "rest/v1/measurements";

/// ---------------------------------------------------------------------------
/// Auth Data Structures
/// ---------------------------------------------------------------------------

/// Response from the auth token endpoint
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
  pub access_token: String,
  pub refresh_token: String,
  pub expires_in: i64, // seconds
  pub user: AuthUser,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthUser {
  pub id: String,
  pub email: Option<String>,
}

#[derive(Debug, Serialize)]
struct PasswordGrant<'a> {
  email: &'a str,
  password: &'a str,
}

#[derive(Debug, Serialize)]
struct RefreshGrant<'a> {
  refresh_token: &'a str,
}

/// ---------------------------------------------------------------------------
/// Client
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct BackendClient {
  http: Client,
  base_url: Url,
  anon_key: String,
}

impl BackendClient {
  pub fn new(config: &AppConfig) -> Self {
    let mut base_url = config.backend_url.clone();
    if !base_url.path().ends_with('/') {
      let path = format!("{}/", base_url.path());
      base_url.set_path(&path);
    }

    Self {
      http: Client::new(),
      base_url,
      anon_key: config.anon_key.clone(),
    }
  }

  fn endpoint(&self, path: &str) -> Result<Url, AppError> {
    self
      .base_url
      .join(path)
      .map_err(|e| AppError::MissingConfig(format!("Invalid backend path {}: {}", path, e)))
  }

  fn authorized(&self, request: RequestBuilder, access_token: &str) -> RequestBuilder {
    request
      .header("apikey", &self.anon_key)
      .header("Authorization", format!("Bearer {}", access_token))
  }

  // -------------------------------------------------------------------------
  // Auth
  // -------------------------------------------------------------------------

  pub async fn sign_in_with_password(
    &self,
    email: &str,
    password: &str,
  ) -> Result<Session, AppError> {
    let mut url = self.endpoint(AUTH_TOKEN_PATH)?;
    url.query_pairs_mut().append_pair("grant_type", "password");

    let response = self
      .http
      .post(url)
      .header("apikey", &self.anon_key)
      .json(&PasswordGrant { email, password })
      .send()
      .await?;

    let token_response: TokenResponse = read_json(ensure_auth_success(response, "Sign in").await?).await?;
    Ok(Session::from_response(token_response))
  }

  pub async fn refresh_session(&self, refresh_token: &str) -> Result<Session, AppError> {
    let mut url = self.endpoint(AUTH_TOKEN_PATH)?;
    url.query_pairs_mut().append_pair("grant_type", "refresh_token");

    let response = self
      .http
      .post(url)
      .header("apikey", &self.anon_key)
      .json(&RefreshGrant { refresh_token })
      .send()
      .await?;

    let token_response: TokenResponse =
      read_json(ensure_auth_success(response, "Session refresh").await?).await?;
    Ok(Session::from_response(token_response))
  }

  // -------------------------------------------------------------------------
  // Training cycles
  // -------------------------------------------------------------------------

  /// The student's active cycle, if any
  #[tracing::instrument(skip(self, access_token))]
  pub async fn fetch_active_cycle(
    &self,
    access_token: &str,
    student_id: &str,
  ) -> Result<Option<CycleGoal>, AppError> {
    let mut url = self.endpoint(CYCLES_PATH)?;
    url
      .query_pairs_mut()
      .append_pair("select", "*")
      .append_pair("student_id", &format!("eq.{}", student_id))
      .append_pair("active", "eq.true")
      .append_pair("order", "start_date.desc")
      .append_pair("limit", "1");

    let response = self.authorized(self.http.get(url), access_token).send().await?;
    let cycles: Vec<CycleGoal> = read_json(ensure_success(response, "Fetch active cycle").await?).await?;

    debug!(found = !cycles.is_empty(), "Active cycle lookup");
    Ok(cycles.into_iter().next())
  }

  // -------------------------------------------------------------------------
  // Checkins
  // -------------------------------------------------------------------------

  fn checkin_range_url(
    &self,
    select: &str,
    student_id: &str,
    from: NaiveDate,
    to: NaiveDate,
  ) -> Result<Url, AppError> {
    let mut url = self.endpoint(CHECKINS_PATH)?;
    url
      .query_pairs_mut()
      .append_pair("select", select)
      .append_pair("student_id", &format!("eq.{}", student_id))
      .append_pair("completed", "eq.true")
      .append_pair("completed_on", &format!("gte.{}", from))
      .append_pair("completed_on", &format!("lte.{}", to));
    Ok(url)
  }

  /// Number of completed checkins between `from` and `to`, both inclusive.
  /// Asks the backend for an exact count instead of downloading the rows.
  #[tracing::instrument(skip(self, access_token))]
  pub async fn count_checkins(
    &self,
    access_token: &str,
    student_id: &str,
    from: NaiveDate,
    to: NaiveDate,
  ) -> Result<u32, AppError> {
    let url = self.checkin_range_url("completed_on", student_id, from, to)?;

    let response = self
      .authorized(self.http.head(url), access_token)
      .header("Prefer", "count=exact")
      .send()
      .await?;
    let response = ensure_success(response, "Count checkins").await?;

    let content_range = response
      .headers()
      .get("content-range")
      .and_then(|v| v.to_str().ok())
      .ok_or_else(|| AppError::Parse("Count response has no Content-Range header".into()))?;

    parse_content_range_total(content_range)
  }

  /// Calendar dates with a completed checkin between `from` and `to`.
  /// Dates may repeat when more than one workout was logged on a day.
  #[tracing::instrument(skip(self, access_token))]
  pub async fn fetch_checkin_dates(
    &self,
    access_token: &str,
    student_id: &str,
    from: NaiveDate,
    to: NaiveDate,
  ) -> Result<Vec<NaiveDate>, AppError> {
    let url = self.checkin_range_url("student_id,completed_on,completed", student_id, from, to)?;

    let response = self.authorized(self.http.get(url), access_token).send().await?;
    let events: Vec<CheckinEvent> = read_json(ensure_success(response, "Fetch checkins").await?).await?;

    Ok(
      events
        .into_iter()
        .filter(|e| e.completed)
        .map(|e| e.completed_on)
        .collect(),
    )
  }

  // -------------------------------------------------------------------------
  // Measurements
  // -------------------------------------------------------------------------

  /// The `limit` most recent measurements, returned oldest first
  #[tracing::instrument(skip(self, access_token))]
  pub async fn fetch_recent_measurements(
    &self,
    access_token: &str,
    student_id: &str,
    limit: usize,
  ) -> Result<Vec<MeasurementRecord>, AppError> {
    let mut url = self.endpoint(MEASUREMENTS_PATH)?;
    url
      .query_pairs_mut()
      .append_pair("select", "*")
      .append_pair("student_id", &format!("eq.{}", student_id))
      .append_pair("order", "measured_on.desc")
      .append_pair("limit", &limit.to_string());

    let response = self.authorized(self.http.get(url), access_token).send().await?;
    let mut records: Vec<MeasurementRecord> =
      read_json(ensure_success(response, "Fetch measurements").await?).await?;

    records.reverse();
    Ok(records)
  }
}

/// ---------------------------------------------------------------------------
/// Response Helpers
/// ---------------------------------------------------------------------------

async fn ensure_success(response: Response, action: &str) -> Result<Response, AppError> {
  let status = response.status();

  if status == StatusCode::UNAUTHORIZED {
    return Err(AppError::NotAuthenticated);
  }

  if !status.is_success() {
    let error_text = response.text().await.unwrap_or_default();
    return Err(AppError::Api(format!("{} failed ({}): {}", action, status, error_text)));
  }

  Ok(response)
}

/// The auth service answers bad credentials with 400, not 401
async fn ensure_auth_success(response: Response, action: &str) -> Result<Response, AppError> {
  let status = response.status();

  if status == StatusCode::BAD_REQUEST || status == StatusCode::UNAUTHORIZED {
    let error_text = response.text().await.unwrap_or_default();
    error!(%status, "{} rejected: {}", action, error_text);
    return Err(AppError::NotAuthenticated);
  }

  ensure_success(response, action).await
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, AppError> {
  let response_text = response.text().await?;

  serde_json::from_str(&response_text).map_err(|e| {
    error!(
      "Failed to parse backend response: {} (first 500 chars: {})",
      e,
      excerpt(&response_text, 500)
    );
    AppError::Parse(e.to_string())
  })
}

/// First `max_chars` characters of `text`, cut on a char boundary
fn excerpt(text: &str, max_chars: usize) -> &str {
  text
    .char_indices()
    .nth(max_chars)
    .map_or(text, |(i, _)| &text[..i])
}

/// `Content-Range: 0-24/25` or `*/25` -> 25
fn parse_content_range_total(value: &str) -> Result<u32, AppError> {
  value
    .rsplit('/')
    .next()
    .and_then(|total| total.trim().parse::<u32>().ok())
    .ok_or_else(|| AppError::Parse(format!("Unexpected Content-Range: {}", value)))
}
