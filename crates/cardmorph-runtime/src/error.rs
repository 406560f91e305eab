#![forbid(unsafe_code)]

//! Errors at the edges of the morph runtime.
//!
//! The morph itself has no error phase; these cover the host shell and the
//! content error boundary.

use thiserror::Error;

/// Why an overlay could not be opened.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OpenError {
    /// Another overlay is open or opening.
    #[error("an overlay is already open")]
    AlreadyOpen,
    /// The previous overlay is still running its close sequence.
    #[error("the previous overlay is still closing")]
    StillClosing,
}

/// A content rendering failure caught by an error boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// Content data could not be rendered.
    #[error("malformed content: {0}")]
    MalformedContent(String),
    /// The renderer panicked.
    #[error("content renderer panicked: {0}")]
    Panicked(String),
}
