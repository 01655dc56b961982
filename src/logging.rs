// src/logging.rs
use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

const DEFAULT_FILTER: &str = "cv_builder=info,cvcraft=info,rocket=warn";

/// Log through `tracing` at the given level: `app_log!(info, "x = {}", x)`.
#[macro_export]
macro_rules! app_log {
    ($level:ident, $($arg:tt)+) => {
        tracing::$level!($($arg)+)
    };
}

/// Open a `tracing` span: `app_span!("export", format = %fmt)`.
#[macro_export]
macro_rules! app_span {
    ($name:expr $(, $($fields:tt)*)?) => {
        tracing::info_span!($name $(, $($fields)*)?)
    };
}

/// Install the global subscriber.
///
/// Human-readable output goes to stderr. When `CVCRAFT_LOG_FILE` is set, JSON
/// lines are written to that file instead (truncated on startup).
pub fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    match std::env::var("CVCRAFT_LOG_FILE") {
        Ok(path) => {
            let file = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&path)
                .with_context(|| format!("Failed to open log file: {}", path))?;

            Registry::default()
                .with(filter)
                .with(
                    fmt::layer()
                        .json()
                        .with_writer(Mutex::new(file))
                        .with_current_span(false)
                        .with_span_list(false),
                )
                .try_init()
                .context("Failed to install log subscriber")?;
        }
        Err(_) => {
            Registry::default()
                .with(filter)
                .with(fmt::layer().with_writer(std::io::stderr))
                .try_init()
                .context("Failed to install log subscriber")?;
        }
    }

    Ok(())
}
