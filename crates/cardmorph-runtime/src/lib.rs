#![forbid(unsafe_code)]

//! cardmorph runtime
//!
//! Everything with an observable side effect: timers, listeners, mounted
//! instances and the host shell. The engine underneath is pure; this crate
//! decides when its phases advance.
//!
//! # Key Components
//!
//! - [`Scheduler`] - One-shot timers, with [`ManualScheduler`] (virtual
//!   clock, test spy) and [`ClockScheduler`] (wall clock)
//! - [`PhaseDriver`] - Consumes a phase plan with one outstanding timer
//! - [`ListenerRegistry`] - Global listener table with RAII guards
//! - [`MorphInstance`] - One mounted morph
//! - [`OverlayHost`] - Single-open-overlay shell
//! - [`ErrorBoundary`] - Fallback panel for failed content rendering
//! - [`MorphConfig`] - Policy-as-data tunables
//!
//! # How it fits in the system
//! `cardmorph-core` supplies geometry, events and the environment;
//! `cardmorph-engine` computes phases and styles; this crate owns the
//! lifecycle. The `cardmorph` facade re-exports all three.

pub mod boundary;
pub mod cancellation;
pub mod config;
pub mod driver;
pub mod error;
pub mod instance;
pub mod listeners;
#[cfg(feature = "tracing-json")]
pub mod logging;
pub mod overlay;
pub mod scheduler;

pub use boundary::{BoundaryOutput, ErrorBoundary, FallbackPanel};
pub use cancellation::{CancelReason, CancellationSource, CancellationToken};
pub use config::{ConfigError, KindPolicyConfig, MorphConfig, PanePolicyConfig};
pub use driver::PhaseDriver;
pub use error::{OpenError, RenderError};
pub use instance::{MorphAction, MorphCallbacks, MorphInstance, MountContext};
pub use listeners::{ListenerGuard, ListenerId, ListenerRegistry};
pub use overlay::{HostNotice, LAYOUT_NOTICE_DELAY, OverlayHost};
pub use scheduler::{ClockScheduler, FRAME_INTERVAL, ManualScheduler, Scheduler, SchedulerStats, TimerId};
