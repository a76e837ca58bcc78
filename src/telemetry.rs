//! # Telemetry
//!
//! Global `tracing` subscriber setup.
//!
//! `RUST_LOG` wins over the configured filter when set.

use crate::config::LogSettings;
use thiserror::Error;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};

/// Error installing the subscriber.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The configured filter does not parse.
    #[error("invalid log filter: {0}")]
    Filter(#[from] ParseError),

    /// A global subscriber is already installed.
    #[error("failed to install subscriber: {0}")]
    Init(#[from] TryInitError),
}

/// Builds the filter from `RUST_LOG`, falling back to `settings.filter`.
///
/// # Errors
///
/// Returns `TelemetryError::Filter` if the fallback filter does not parse.
pub fn env_filter(settings: &LogSettings) -> Result<EnvFilter, TelemetryError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => Ok(EnvFilter::try_new(&settings.filter)?),
    }
}

/// Installs the global subscriber.
///
/// # Errors
///
/// Returns an error if the filter is invalid or a subscriber is already set.
pub fn init(settings: &LogSettings) -> Result<(), TelemetryError> {
    let filter = env_filter(settings)?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    if settings.json {
        builder.json().finish().try_init()?;
    } else {
        builder.finish().try_init()?;
    }

    Ok(())
}
