//! Structured logging setup

use std::env;
use std::io;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
  /// JSON lines, one event per line
  Json,
  /// Full human readable line per event (timestamp, level, target, fields)
  Pretty,
  /// Abbreviated line per event
  Compact,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
  /// Default level for this crate (trace, debug, info, warn, error)
  pub level: String,
  pub format: LogFormat,
  /// Include source file and line numbers
  pub include_location: bool,
}

impl Default for LoggingConfig {
  fn default() -> Self {
    Self {
      level: "info".into(),
      format: LogFormat::Pretty,
      include_location: false,
    }
  }
}

impl LoggingConfig {
  pub fn from_env() -> Self {
    let level = env::var("RUST_LOG").unwrap_or_else(|_| "info".into());

    let format = match env::var("LOG_FORMAT").as_deref() {
      Ok("json") => LogFormat::Json,
      Ok("compact") => LogFormat::Compact,
      _ => LogFormat::Pretty,
    };

    Self {
      level,
      format,
      include_location: env::var("LOG_INCLUDE_LOCATION").is_ok(),
    }
  }

  fn env_filter(&self) -> EnvFilter {
    EnvFilter::try_new(&self.level)
      .unwrap_or_else(|_| EnvFilter::new("info"))
      // sqlx logs every statement at info
      .add_directive(
        "sqlx=warn"
          .parse()
          .unwrap_or_else(|_| tracing::Level::WARN.into()),
      )
  }

  /// Install the global subscriber. Calling this more than once is harmless:
  /// the first subscriber wins.
  pub fn init(&self) {
    let registry = tracing_subscriber::registry().with(self.env_filter());
    let base = fmt::layer()
      .with_file(self.include_location)
      .with_line_number(self.include_location)
      .with_target(true)
      .with_writer(io::stdout);

    let result = match self.format {
      LogFormat::Json => registry.with(base.json()).try_init(),
      LogFormat::Compact => registry.with(base.compact()).try_init(),
      LogFormat::Pretty => registry.with(base).try_init(),
    };

    if result.is_ok() {
      tracing::debug!(level = %self.level, format = ?self.format, "Logging initialized");
    }
  }
}

/// Initialize logging from the environment
pub fn init() {
  LoggingConfig::from_env().init();
}
