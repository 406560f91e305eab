#![forbid(unsafe_code)]

//! cardmorph public facade crate.
//!
//! A card-to-modal morph engine: a card captured at its on-screen rectangle
//! lifts, expands into a centered overlay, and later collapses back into
//! the exact rectangle it came from. This crate re-exports the stable
//! surface of the workspace and offers a prelude for day-to-day use.
//!
//! ```
//! use cardmorph::Duration;
//! use cardmorph::prelude::*;
//!
//! let env = Environment::new(Size::new(1200.0, 800.0));
//! let mut host: OverlayHost<u32, ManualScheduler> =
//!     OverlayHost::new(ManualScheduler::new(), env, MorphConfig::default());
//!
//! host.open(1, Rect::new(100.0, 50.0, 200.0, 150.0), ContentKind::Contact)?;
//! host.advance(Duration::from_secs(1));
//! assert_eq!(host.card().map(|m| m.phase()), Some(CardPhase::Expanded));
//! # Ok::<(), cardmorph::Error>(())
//! ```

mod error;

pub use error::{Error, Result};

// --- Core re-exports -------------------------------------------------------

pub use cardmorph_core::animation::{TimingCurve, Transition, TransitionProperty, TransitionSpec};
pub use cardmorph_core::environment::{ColorScheme, Environment, EnvironmentSnapshot};
pub use cardmorph_core::event::{Event, HitTarget, KeyCode, KeyEvent, PointerEvent};
pub use cardmorph_core::geometry::{Rect, Sides, Size};
pub use cardmorph_core::Duration;

// --- Engine re-exports -----------------------------------------------------

pub use cardmorph_engine::{
    BackdropConfig, BackdropStyle, CardDensity, CardPhase, CloseControl, ContentKind,
    ContentVisibility, DocumentKind, KindProfile, MorphFrame, MorphMachine, MorphPhase,
    MorphTimings, PaneLayout, PanePhase, PointerEvents, StaggerSchedule, StyleDescriptor,
    Viewport, interpolate,
};

// --- Runtime re-exports ----------------------------------------------------

pub use cardmorph_runtime::{
    BoundaryOutput, ClockScheduler, ConfigError, ErrorBoundary, FallbackPanel, HostNotice,
    ListenerRegistry, ManualScheduler, MorphAction, MorphCallbacks, MorphConfig, MorphInstance,
    MountContext, OpenError, OverlayHost, RenderError, Scheduler,
};

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        CardDensity, CardPhase, ContentKind, DocumentKind, Environment, Error, Event, HitTarget,
        ManualScheduler, MorphAction, MorphConfig, MorphPhase, OverlayHost, PanePhase, Rect,
        Result, Size, StyleDescriptor, Viewport,
    };

    pub use crate::{core, engine, runtime};
}

pub use cardmorph_core as core;
pub use cardmorph_engine as engine;
pub use cardmorph_runtime as runtime;
