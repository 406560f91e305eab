#![forbid(unsafe_code)]

//! Core: geometry, environment, input events, and timing curves.
//!
//! # Role in cardmorph
//! `cardmorph-core` is the vocabulary layer. It owns the viewport-pixel
//! geometry that a morph is expressed in, the observable [`Environment`]
//! (viewport size, color scheme, reduced motion) that style computation
//! samples, the input [`Event`] types a mounted morph reacts to, and the
//! CSS-equivalent timing curves and transition descriptors.
//!
//! # How it fits in the system
//! `cardmorph-engine` maps `(phase, source rect, environment, content kind)`
//! to style descriptors using only the types defined here. The runtime
//! (`cardmorph-runtime`) feeds `Event` values into mounted instances and
//! keeps the `Environment` current.
//!
//! [`Environment`]: environment::Environment
//! [`Event`]: event::Event

pub mod animation;
pub mod environment;
pub mod event;
pub mod geometry;
pub mod logging;

pub use web_time::Duration;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, error, info, trace, warn};
