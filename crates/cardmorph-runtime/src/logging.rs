#![forbid(unsafe_code)]

//! Structured log output.
//!
//! Every crate in the workspace emits `tracing` events; nothing here is
//! required to produce them. Hosts that want JSON lines on stderr without
//! wiring their own subscriber call [`init_json_logging`].
//!
//! The filter comes from `RUST_LOG` and falls back to [`DEFAULT_FILTER`].

use thiserror::Error;

/// Filter used when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_FILTER: &str = "cardmorph=info,cardmorph_runtime=info,cardmorph_engine=warn";

/// Why a subscriber could not be installed.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// A global subscriber is already set.
    #[error("failed to install log subscriber: {0}")]
    Install(String),
}

/// Install a JSON formatter as the global subscriber.
pub fn init_json_logging() -> Result<(), LoggingError> {
    use tracing_subscriber::EnvFilter;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_current_span(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| LoggingError::Install(e.to_string()))
}
