pub mod config;
pub mod redactor;

pub use config::*;
pub use redactor::*;

use thiserror::Error;
use tracing_subscriber::{
    fmt::{self, time::ChronoUtc},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Logging bootstrap for the diagnosis prediction service
///
/// Symptom lists, gender and age are protected health information. The
/// service logs them only through a [`PhiRedactor`], which replaces each value
/// with a short hash so that the same input can be correlated across log lines
/// without being readable.
///
/// # Example
///
/// ```rust,no_run
/// use logger_redacted::{init_tracing, LoggerConfig, PhiRedactor};
///
/// # fn main() -> Result<(), logger_redacted::LoggerError> {
/// init_tracing(&LoggerConfig::for_service(false))?;
///
/// let redactor = PhiRedactor::new(true);
/// tracing::info!(symptoms = %redactor.redact_field("vomiting;cramping"), "Starting predict cause");
/// # Ok(())
/// # }
/// ```
#[derive(Error, Debug)]
pub enum LoggerError {
    #[error("Failed to initialise tracing subscriber: {0}")]
    Init(String),
}

/// Install the global tracing subscriber
///
/// `RUST_LOG` takes precedence over the directives derived from `config`.
pub fn init_tracing(config: &LoggerConfig) -> Result<(), LoggerError> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_directives()));

    let registry = tracing_subscriber::registry().with(env_filter);

    let result = if config.json {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_ansi(false)
                    .json(),
            )
            .try_init()
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_ansi(config.ansi),
            )
            .try_init()
    };

    result.map_err(|e| LoggerError::Init(e.to_string()))?;

    tracing::debug!(
        json = config.json,
        redaction = config.redaction_enabled,
        "Tracing initialised"
    );
    Ok(())
}
