//! Signed-in session, persisted locally so the app survives restarts.
//!
//! Tokens are issued by the backend's auth service; this module only stores
//! them and refreshes the access token shortly before it expires.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::backend::{BackendClient, TokenResponse};
use crate::db::DbPool;
use crate::error::AppError;

const TOKEN_REFRESH_BUFFER_MINUTES: i64 = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
  pub user_id: String,
  pub email: Option<String>,
  pub access_token: String,
  pub refresh_token: String,
  pub expires_at: DateTime<Utc>,
}

impl Session {
  pub fn from_response(resp: TokenResponse) -> Self {
    Self {
      user_id: resp.user.id,
      email: resp.user.email,
      access_token: resp.access_token,
      refresh_token: resp.refresh_token,
      expires_at: Utc::now() + Duration::seconds(resp.expires_in),
    }
  }

  pub fn needs_refresh(&self) -> bool {
    let buffer = Duration::minutes(TOKEN_REFRESH_BUFFER_MINUTES);
    Utc::now() + buffer >= self.expires_at
  }
}

/// ---------------------------------------------------------------------------
/// Database Helpers
/// ---------------------------------------------------------------------------

pub async fn save_session(db: &DbPool, session: &Session) -> Result<(), AppError> {
  sqlx::query(
    r#"
    INSERT INTO auth_session (id, user_id, email, access_token, refresh_token, expires_at)
    VALUES (1, ?1, ?2, ?3, ?4, ?5)
    ON CONFLICT(id) DO UPDATE SET
      user_id = excluded.user_id,
      email = excluded.email,
      access_token = excluded.access_token,
      refresh_token = excluded.refresh_token,
      expires_at = excluded.expires_at,
      updated_at = CURRENT_TIMESTAMP
    "#,
  )
  .bind(&session.user_id)
  .bind(&session.email)
  .bind(&session.access_token)
  .bind(&session.refresh_token)
  .bind(session.expires_at)
  .execute(db)
  .await?;

  Ok(())
}

pub async fn load_session(db: &DbPool) -> Result<Option<Session>, AppError> {
  let row: Option<(String, Option<String>, String, String, DateTime<Utc>)> = sqlx::query_as(
    "SELECT user_id, email, access_token, refresh_token, expires_at
         FROM auth_session WHERE id = 1",
  )
  .fetch_optional(db)
  .await?;

  Ok(row.map(
    |(user_id, email, access_token, refresh_token, expires_at)| Session {
      user_id,
      email,
      access_token,
      refresh_token,
      expires_at,
    },
  ))
}

pub async fn clear_session(db: &DbPool) -> Result<(), AppError> {
  sqlx::query("DELETE FROM auth_session").execute(db).await?;
  Ok(())
}

/// ---------------------------------------------------------------------------
/// Get Valid Session (with auto-refresh)
/// ---------------------------------------------------------------------------

/// Stored session with a usable access token, refreshing it if necessary.
/// A refresh the auth service rejects signs the user out.
pub async fn valid_session(db: &DbPool, backend: &BackendClient) -> Result<Session, AppError> {
  let session = load_session(db).await?.ok_or(AppError::NotAuthenticated)?;

  if !session.needs_refresh() {
    return Ok(session);
  }

  match backend.refresh_session(&session.refresh_token).await {
    Ok(refreshed) => {
      save_session(db, &refreshed).await?;
      info!(user_id = %refreshed.user_id, "Session auto-refreshed");
      Ok(refreshed)
    }
    Err(AppError::NotAuthenticated) => {
      warn!(user_id = %session.user_id, "Refresh token rejected, signing out");
      clear_session(db).await?;
      Err(AppError::NotAuthenticated)
    }
    Err(e) => Err(e),
  }
}
