use chrono::{FixedOffset, NaiveDate, Utc};
use std::env;
use url::Url;

use crate::error::AppError;

/// ---------------------------------------------------------------------------
/// Configuration Constants
/// ---------------------------------------------------------------------------

/// Brasília (UTC-3, no daylight saving)
const DEFAULT_UTC_OFFSET_MINUTES: i32 = -180;

/// ---------------------------------------------------------------------------
/// App Configuration
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct AppConfig {
  /// Base URL of the hosted backend (auth + REST)
  pub backend_url: Url,
  /// Public anon key sent as the `apikey` header
  pub anon_key: String,
  /// Offset used to turn "now" into today's calendar date
  pub utc_offset: FixedOffset,
}

impl AppConfig {
  pub fn from_env() -> Result<Self, AppError> {
    let raw_url =
      env::var("BACKEND_URL").map_err(|_| AppError::MissingConfig("BACKEND_URL".into()))?;
    let backend_url = Url::parse(&raw_url)
      .map_err(|e| AppError::MissingConfig(format!("BACKEND_URL is not a valid URL: {}", e)))?;

    let anon_key = env::var("BACKEND_ANON_KEY")
      .map_err(|_| AppError::MissingConfig("BACKEND_ANON_KEY".into()))?;

    let offset_minutes = match env::var("APP_UTC_OFFSET_MINUTES") {
      Ok(raw) => raw.trim().parse::<i32>().map_err(|_| {
        AppError::MissingConfig(format!("APP_UTC_OFFSET_MINUTES is not a number: {}", raw))
      })?,
      Err(_) => DEFAULT_UTC_OFFSET_MINUTES,
    };

    Ok(Self {
      backend_url,
      anon_key,
      utc_offset: offset_from_minutes(offset_minutes)?,
    })
  }

  /// Today's calendar date at the configured offset
  pub fn today(&self) -> NaiveDate {
    Utc::now().with_timezone(&self.utc_offset).date_naive()
  }
}

fn offset_from_minutes(minutes: i32) -> Result<FixedOffset, AppError> {
  FixedOffset::east_opt(minutes * 60).ok_or_else(|| {
    AppError::MissingConfig(format!("APP_UTC_OFFSET_MINUTES out of range: {}", minutes))
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use serial_test::serial;

  #[test]
  #[serial]
  fn test_from_env_with_defaults() {
    temp_env::with_vars(
      [
        ("BACKEND_URL", Some("https://project.backend.example")),
        ("BACKEND_ANON_KEY", Some("anon-key")),
        ("APP_UTC_OFFSET_MINUTES", None),
      ],
      || {
        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.backend_url.as_str(), "https://project.backend.example/");
        assert_eq!(config.anon_key, "anon-key");
        assert_eq!(config.utc_offset.local_minus_utc(), -3 * 3600);
      },
    );
  }

  #[test]
  #[serial]
  fn test_missing_url_is_reported() {
    temp_env::with_vars(
      [
        ("BACKEND_URL", None::<&str>),
        ("BACKEND_ANON_KEY", Some("anon-key")),
      ],
      || {
        let err = AppConfig::from_env().unwrap_err();
        assert!(matches!(err, AppError::MissingConfig(ref key) if key == "BACKEND_URL"));
      },
    );
  }

  #[test]
  #[serial]
  fn test_invalid_offset_rejected() {
    temp_env::with_vars(
      [
        ("BACKEND_URL", Some("https://project.backend.example")),
        ("BACKEND_ANON_KEY", Some("anon-key")),
        ("APP_UTC_OFFSET_MINUTES", Some("later")),
      ],
      || {
        assert!(AppConfig::from_env().is_err());
      },
    );

    temp_env::with_vars(
      [
        ("BACKEND_URL", Some("https://project.backend.example")),
        ("BACKEND_ANON_KEY", Some("anon-key")),
        ("APP_UTC_OFFSET_MINUTES", Some("2000")),
      ],
      || {
        assert!(AppConfig::from_env().is_err());
      },
    );
  }

  #[test]
  #[serial]
  fn test_custom_offset() {
    temp_env::with_vars(
      [
        ("BACKEND_URL", Some("https://project.backend.example")),
        ("BACKEND_ANON_KEY", Some("anon-key")),
        ("APP_UTC_OFFSET_MINUTES", Some("60")),
      ],
      || {
        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.utc_offset.local_minus_utc(), 3600);
      },
    );
  }
}
