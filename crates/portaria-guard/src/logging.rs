//! Structured logging bootstrap.
//!
//! Host applications call [`init_logging`] once at startup. The filter
//! honors `RUST_LOG` when set and falls back to the configured level;
//! JSON output is intended for production, text for development.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::LoggingSettings;

/// Initializes the global tracing subscriber from logging settings.
///
/// Safe to call more than once: subsequent calls leave the first
/// subscriber in place.
pub fn init_logging(settings: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.level));

    if settings.json {
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .try_init();
    } else {
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer())
            .try_init();
    }
}
