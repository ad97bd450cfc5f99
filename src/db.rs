use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use tracing::info;

use crate::backend::BackendClient;
use crate::config::AppConfig;

pub type DbPool = SqlitePool;

/// Application state built once at startup and handed to every command.
/// Nothing here is a global: tests build their own.
pub struct AppState {
  pub db: DbPool,
  pub config: AppConfig,
  pub backend: BackendClient,
}

impl AppState {
  pub fn new(db: DbPool, config: AppConfig) -> Self {
    let backend = BackendClient::new(&config);
    Self {
      db,
      config,
      backend,
    }
  }

  /// Close the pool; called when the app exits
  pub async fn shutdown(&self) {
    self.db.close().await;
    info!("Database closed");
  }
}

/// Open a connection pool for `db_url` and run migrations
pub async fn connect(db_url: &str) -> Result<DbPool, sqlx::Error> {
  let pool = SqlitePoolOptions::new()
    .max_connections(5)
    .connect(db_url)
    .await?;

  sqlx::migrate!("./migrations").run(&pool).await?;

  Ok(pool)
}

/// Get the path to the database file under the platform's app data dir
#[cfg(feature = "app")]
fn get_db_path<R: tauri::Runtime>(
  app: &tauri::AppHandle<R>,
) -> Result<std::path::PathBuf, Box<dyn std::error::Error>> {
  use tauri::Manager;

  let data_dir = app
    .path()
    .app_data_dir()
    .map_err(|e| format!("Failed to get app data dir: {}", e))?;

  // Create directory if it doesn't exist
  std::fs::create_dir_all(&data_dir)?;

  Ok(data_dir.join("coach-studio.db"))
}

/// Initialize the on-device database
#[cfg(feature = "app")]
pub async fn initialize_db<R: tauri::Runtime>(
  app: &tauri::AppHandle<R>,
) -> Result<DbPool, Box<dyn std::error::Error>> {
  let db_path = get_db_path(app)?;
  let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

  info!("Initializing database at: {}", db_path.display());
  let pool = connect(&db_url).await?;
  info!("Database initialized successfully");

  Ok(pool)
}
