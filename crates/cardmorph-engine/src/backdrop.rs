#![forbid(unsafe_code)]

//! Backdrop (scrim) controller.
//!
//! The scrim is visible while the morph is heading to or resting at the
//! expanded phase, and fades out as soon as closing begins. It accepts
//! pointer input only in the terminal expanded phase, so a stray click
//! during a transition cannot interrupt it.

use cardmorph_core::Duration;
use cardmorph_core::animation::{TimingCurve, Transition, TransitionProperty, TransitionSpec};
use cardmorph_core::event::HitTarget;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::crossfade::PointerEvents;
use crate::phase::MorphPhase;
use crate::style::Rgba;

/// Scrim appearance.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BackdropConfig {
    pub tint: Rgba,
    /// Backdrop blur radius in pixels.
    pub blur: f64,
    /// Opacity fade duration in milliseconds.
    pub fade_ms: u64,
}

impl Default for BackdropConfig {
    fn default() -> Self {
        Self {
            tint: Rgba::BLACK.with_alpha(0.6),
            blur: 4.0,
            fade_ms: 500,
        }
    }
}

impl BackdropConfig {
    pub fn fade(&self) -> Duration {
        Duration::from_millis(self.fade_ms)
    }
}

/// Scrim style at one phase.
#[derive(Debug, Clone, PartialEq)]
pub struct BackdropStyle {
    pub opacity: f64,
    pub pointer_events: PointerEvents,
    pub tint: Rgba,
    pub blur: f64,
    pub transition: TransitionSpec,
}

impl BackdropStyle {
    /// Whether a primary press on `target` should close the morph.
    ///
    /// Only presses on the scrim itself count, never presses that landed on
    /// the surface above it.
    pub fn dismisses_on(&self, target: HitTarget) -> bool {
        target == HitTarget::Backdrop && self.pointer_events.is_enabled()
    }
}

/// Scrim style at `phase`.
pub fn backdrop<P: MorphPhase>(phase: P, config: &BackdropConfig) -> BackdropStyle {
    BackdropStyle {
        opacity: if phase.approaching_expanded() { 1.0 } else { 0.0 },
        pointer_events: if phase.is_expanded() {
            PointerEvents::Auto
        } else {
            PointerEvents::None
        },
        tint: config.tint,
        blur: config.blur,
        transition: TransitionSpec::single(Transition::new(
            TransitionProperty::OPACITY,
            config.fade(),
            TimingCurve::EaseInOut,
        )),
    }
}
