pub mod backend;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod overview;
pub mod progress;
pub mod session;
pub mod trend;
pub mod weekly;

#[cfg(feature = "app")]
mod commands;

#[cfg(test)]
mod test_utils;

#[cfg(feature = "app")]
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
  use config::AppConfig;
  use db::AppState;
  use std::sync::Arc;
  use tauri::Manager;

  // Load environment variables from .env file
  dotenvy::dotenv().ok();
  logging::init();

  let app = tauri::Builder::default()
    .plugin(tauri_plugin_opener::init())
    .setup(|app| {
      let config = AppConfig::from_env()?;
      let app_handle = app.handle().clone();
      tauri::async_runtime::block_on(async move {
        match db::initialize_db(&app_handle).await {
          Ok(pool) => {
            let state = Arc::new(AppState::new(pool, config));
            app_handle.manage(state);
            tracing::info!("Database ready");
          }
          Err(e) => {
            tracing::error!("Failed to initialize database: {}", e);
          }
        }
      });
      Ok(())
    })
    .invoke_handler(tauri::generate_handler![
      // Session commands
      commands::session::sign_in,
      commands::session::sign_out,
      commands::session::get_session_status,
      // Progress commands
      commands::progress::get_cycle_progress,
      commands::progress::get_week_status,
      commands::progress::get_measurement_trend,
    ])
    .build(tauri::generate_context!());

  let app = match app {
    Ok(app) => app,
    Err(e) => {
      tracing::error!("Error while building tauri application: {}", e);
      return;
    }
  };

  app.run(|app_handle, event| {
    if let tauri::RunEvent::Exit = event {
      if let Some(state) = app_handle.try_state::<Arc<AppState>>() {
        tauri::async_runtime::block_on(state.shutdown());
      }
    }
  });
}
