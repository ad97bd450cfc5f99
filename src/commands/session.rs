//! Sign-in commands. Credentials go straight to the backend's auth service;
//! only the resulting session is kept on the device.

use serde::Serialize;
use std::sync::Arc;
use tauri::State;
use tracing::info;

use crate::db::AppState;
use crate::error::AppError;
use crate::session::{clear_session, load_session, save_session};

#[derive(Serialize)]
pub struct SessionStatus {
  pub is_authenticated: bool,
  pub user_id: Option<String>,
  pub email: Option<String>,
  pub expires_at: Option<String>,
  pub needs_refresh: bool,
}

#[tauri::command]
pub async fn sign_in(
  state: State<'_, Arc<AppState>>,
  email: String,
  password: String,
) -> Result<SessionStatus, AppError> {
  let session = state.backend.sign_in_with_password(&email, &password).await?;
  save_session(&state.db, &session).await?;

  info!(user_id = %session.user_id, "Signed in");
  Ok(SessionStatus {
    is_authenticated: true,
    user_id: Some(session.user_id.clone()),
    email: session.email.clone(),
    expires_at: Some(session.expires_at.to_rfc3339()),
    needs_refresh: false,
  })
}

#[tauri::command]
pub async fn sign_out(state: State<'_, Arc<AppState>>) -> Result<(), AppError> {
  clear_session(&state.db).await?;
  info!("Signed out");
  Ok(())
}

#[tauri::command]
pub async fn get_session_status(
  state: State<'_, Arc<AppState>>,
) -> Result<SessionStatus, AppError> {
  match load_session(&state.db).await? {
    Some(session) => Ok(SessionStatus {
      is_authenticated: true,
      needs_refresh: session.needs_refresh(),
      user_id: Some(session.user_id),
      email: session.email,
      expires_at: Some(session.expires_at.to_rfc3339()),
    }),
    None => Ok(SessionStatus {
      is_authenticated: false,
      user_id: None,
      email: None,
      expires_at: None,
      needs_refresh: false,
    }),
  }
}
