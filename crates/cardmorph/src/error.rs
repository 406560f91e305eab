#![forbid(unsafe_code)]

//! Top-level error type.
//!
//! The morph itself never fails; every variant here comes from an edge:
//! opening an overlay, rendering content, or loading configuration.

use cardmorph_runtime::{ConfigError, OpenError, RenderError};
use thiserror::Error;

/// Any error a cardmorph host can see.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Open(#[from] OpenError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl Error {
    /// Whether the failure is transient and the action can be retried once
    /// the current overlay has closed.
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Open(_))
    }
}

/// Standard result type for cardmorph APIs.
pub type Result<T> = std::result::Result<T, Error>;
