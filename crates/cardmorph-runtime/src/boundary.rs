#![forbid(unsafe_code)]

//! Error boundary around content rendering.
//!
//! Content inside a card grid or an expanded overlay is rendered by code the
//! morph does not control. [`ErrorBoundary::render`] runs it, and if it
//! returns a [`RenderError`] or panics, the boundary logs the failure and
//! yields its static [`FallbackPanel`] instead. The overlay engine and the
//! rest of the page keep running.
//!
//! The boundary is sticky: once tripped it keeps showing the fallback until
//! [`reset`](ErrorBoundary::reset) is called.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use tracing::error;

use crate::error::RenderError;

/// The static panel shown in place of failed content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackPanel {
    pub title: String,
    pub message: String,
}

impl Default for FallbackPanel {
    fn default() -> Self {
        Self {
            title: "Oops! Something went wrong.".to_owned(),
            message: "We're sorry for the inconvenience. Please try refreshing the page.".to_owned(),
        }
    }
}

/// What a boundary renders.
#[derive(Debug, PartialEq, Eq)]
pub enum BoundaryOutput<'a, T> {
    Content(T),
    Fallback(&'a FallbackPanel),
}

impl<T> BoundaryOutput<'_, T> {
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }

    /// The rendered content, if rendering succeeded.
    pub fn content(self) -> Option<T> {
        match self {
            Self::Content(content) => Some(content),
            Self::Fallback(_) => None,
        }
    }
}

/// Catches content rendering failures.
#[derive(Debug, Default)]
pub struct ErrorBoundary {
    fallback: FallbackPanel,
    error: Option<RenderError>,
}

impl ErrorBoundary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom fallback panel (builder pattern).
    #[must_use]
    pub fn with_fallback(mut self, fallback: FallbackPanel) -> Self {
        self.fallback = fallback;
        self
    }

    /// The failure that tripped the boundary, if any.
    pub fn error(&self) -> Option<&RenderError> {
        self.error.as_ref()
    }

    pub fn is_tripped(&self) -> bool {
        self.error.is_some()
    }

    /// Clear a previous failure so content is rendered again.
    pub fn reset(&mut self) {
        self.error = None;
    }

    /// Render through the boundary.
    pub fn render<T>(
        &mut self,
        render: impl FnOnce() -> Result<T, RenderError>,
    ) -> BoundaryOutput<'_, T> {
        if self.error.is_some() {
            return BoundaryOutput::Fallback(&self.fallback);
        }
        let outcome = panic::catch_unwind(AssertUnwindSafe(render))
            .unwrap_or_else(|payload| Err(RenderError::Panicked(panic_message(payload.as_ref()))));
        match outcome {
            Ok(content) => BoundaryOutput::Content(content),
            Err(err) => {
                error!(error = %err, "content rendering failed, showing fallback");
                self.error = Some(err);
                BoundaryOutput::Fallback(&self.fallback)
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_owned()
    }
}
