#![forbid(unsafe_code)]

//! Content cross-fader.
//!
//! Both content layers stay mounted for the whole morph so their opacity
//! transitions have something to fade between. Per phase, one layer is
//! visible and interactive; the other fades out and has
//! `pointer-events: none`, even while it is still partially opaque.
//!
//! The expanded layer's ordered items (title, tags, body, gallery, actions)
//! enter with a per-index delay that grows with the index and leave in
//! reverse with a shorter step, see [`StaggerSchedule`].
//!
//! # Invariants
//!
//! - Exactly one of the two layers has `pointer-events: auto` at any phase.
//! - The expanded layer is visible only in the terminal expanded phase.
//! - The close control is interactive only in the terminal expanded phase.

use std::fmt;

use cardmorph_core::Duration;
use cardmorph_core::animation::{TimingCurve, Transition, TransitionProperty, TransitionSpec};

use crate::kind::{FadeTimings, StaggerTimings};
use crate::phase::MorphPhase;

/// Vertical offset of a stagger item while hidden.
pub const ITEM_OFFSET_Y: f64 = 16.0;

/// CSS `pointer-events`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PointerEvents {
    #[default]
    Auto,
    None,
}

impl PointerEvents {
    #[inline]
    pub const fn is_enabled(self) -> bool {
        matches!(self, Self::Auto)
    }

    const fn enabled_if(on: bool) -> Self {
        if on { Self::Auto } else { Self::None }
    }
}

impl fmt::Display for PointerEvents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Auto => "auto",
            Self::None => "none",
        })
    }
}

/// The two content renderings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    /// Card/button representation.
    Compact,
    /// Detail view.
    Expanded,
}

/// Opacity and input gating of one layer.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerStyle {
    pub opacity: f64,
    pub pointer_events: PointerEvents,
    pub transition: TransitionSpec,
}

impl LayerStyle {
    /// Visible and accepting input.
    pub fn is_live(&self) -> bool {
        self.opacity > 0.0 && self.pointer_events.is_enabled()
    }
}

/// Both layers at one phase.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentVisibility {
    pub compact: LayerStyle,
    pub expanded: LayerStyle,
}

impl ContentVisibility {
    /// Whether the compact layer is shown.
    pub fn show_compact(&self) -> bool {
        self.compact.opacity > 0.0
    }

    /// Whether the expanded layer is shown.
    pub fn show_expanded(&self) -> bool {
        self.expanded.opacity > 0.0
    }

    /// The layer that receives input.
    pub fn interactive(&self) -> Layer {
        if self.expanded.pointer_events.is_enabled() {
            Layer::Expanded
        } else {
            Layer::Compact
        }
    }

    /// Style of `layer`.
    pub fn layer(&self, layer: Layer) -> &LayerStyle {
        match layer {
            Layer::Compact => &self.compact,
            Layer::Expanded => &self.expanded,
        }
    }
}

/// Layer styles at `phase`.
pub fn visibility<P: MorphPhase>(phase: P, fades: &FadeTimings) -> ContentVisibility {
    let expanded = phase.is_expanded();
    let compact_delay = if phase.is_closing() {
        fades.compact_return_delay
    } else {
        Duration::ZERO
    };
    let expanded_delay = if expanded {
        fades.expanded_delay
    } else {
        Duration::ZERO
    };
    ContentVisibility {
        compact: LayerStyle {
            opacity: if expanded { 0.0 } else { 1.0 },
            pointer_events: PointerEvents::enabled_if(!expanded),
            transition: TransitionSpec::single(
                Transition::new(TransitionProperty::OPACITY, fades.compact, TimingCurve::EaseInOut)
                    .delay(compact_delay),
            ),
        },
        expanded: LayerStyle {
            opacity: if expanded { 1.0 } else { 0.0 },
            pointer_events: PointerEvents::enabled_if(expanded),
            transition: TransitionSpec::single(
                Transition::new(TransitionProperty::OPACITY, fades.expanded, TimingCurve::EaseOut)
                    .delay(expanded_delay),
            ),
        },
    }
}

/// The close control inside the expanded content.
#[derive(Debug, Clone, PartialEq)]
pub struct CloseControl {
    pub opacity: f64,
    pub scale: f64,
    pub pointer_events: PointerEvents,
    pub transition: TransitionSpec,
}

/// Close control at `phase`.
pub fn close_control<P: MorphPhase>(phase: P, fades: &FadeTimings) -> CloseControl {
    let shown = phase.is_expanded();
    CloseControl {
        opacity: if shown { 1.0 } else { 0.0 },
        scale: if shown { 1.0 } else { 0.5 },
        pointer_events: PointerEvents::enabled_if(shown),
        transition: TransitionSpec::single(Transition::new(
            TransitionProperty::OPACITY | TransitionProperty::TRANSFORM,
            fades.expanded,
            TimingCurve::EaseOut,
        )),
    }
}

// ============================================================================
// Stagger
// ============================================================================

/// Per-item delays for `count` ordered items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaggerSchedule {
    enter: Vec<Duration>,
    exit: Vec<Duration>,
    item: Duration,
}

/// Style of one staggered item.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemStyle {
    pub opacity: f64,
    pub translate_y: f64,
    pub transition: TransitionSpec,
}

impl StaggerSchedule {
    pub fn new(count: usize, timings: &StaggerTimings) -> Self {
        Self {
            enter: (0..count).map(|i| timings.enter_delay(i)).collect(),
            exit: (0..count).map(|i| timings.exit_delay(i, count)).collect(),
            item: timings.item,
        }
    }

    pub fn len(&self) -> usize {
        self.enter.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enter.is_empty()
    }

    /// Enter delays in item order.
    pub fn enter(&self) -> &[Duration] {
        &self.enter
    }

    /// Exit delays in item order.
    pub fn exit(&self) -> &[Duration] {
        &self.exit
    }

    /// Style of item `index` at `phase`; `None` past the end.
    pub fn item_style<P: MorphPhase>(&self, phase: P, index: usize) -> Option<ItemStyle> {
        let shown = phase.is_expanded();
        let delay = if shown {
            *self.enter.get(index)?
        } else {
            *self.exit.get(index)?
        };
        Some(ItemStyle {
            opacity: if shown { 1.0 } else { 0.0 },
            translate_y: if shown { 0.0 } else { ITEM_OFFSET_Y },
            transition: TransitionSpec::single(
                Transition::new(
                    TransitionProperty::OPACITY | TransitionProperty::TRANSFORM,
                    self.item,
                    TimingCurve::EaseOut,
                )
                .delay(delay),
            ),
        })
    }
}
