#![forbid(unsafe_code)]

//! Engine: the pure half of a card-to-overlay morph.
//!
//! # Role in cardmorph
//! `cardmorph-engine` owns every decision that can be made without a clock:
//! which phases exist and in what order ([`phase`]), which transitions are
//! legal ([`machine`]), what the surface looks like at each phase
//! ([`style`]), which content layer is visible and interactive
//! ([`crossfade`]), how the scrim behaves ([`backdrop`]), and how a
//! two-pane surface splits ([`panes`]). All per-kind constants live in one
//! [`KindProfile`], chosen once from a [`ContentKind`].
//!
//! # How it fits in the system
//! `cardmorph-runtime` drives a [`MorphMachine`] through its plans with a
//! scheduler and asks [`MorphFrame::compute`] for the render state after
//! every phase change or environment change. Nothing in this crate has side
//! effects beyond optional `tracing` output.

pub mod backdrop;
pub mod crossfade;
pub mod frame;
pub mod kind;
pub mod machine;
pub mod panes;
pub mod phase;
pub mod style;

pub use backdrop::{BackdropConfig, BackdropStyle};
pub use crossfade::{CloseControl, ContentVisibility, Layer, LayerStyle, PointerEvents, StaggerSchedule};
pub use frame::MorphFrame;
pub use kind::{CardDensity, ContentKind, DocumentKind, KindProfile, MorphTimings};
pub use machine::{Advance, CloseRejected, MorphMachine, Stage};
pub use panes::{PaneArrangement, PaneLayout};
pub use phase::{CardPhase, GeometryKey, MorphPhase, PanePhase, PhaseStep, StepTarget, Wait};
pub use style::{StyleDescriptor, SurfaceFinish, Viewport, interpolate};
