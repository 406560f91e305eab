#![forbid(unsafe_code)]

//! Style interpolator.
//!
//! [`interpolate`] is a pure function of `(phase, source rect, viewport,
//! profile)`. It holds no state, so hosts may call it on every render and
//! after every viewport change; an expanded morph re-centers simply because
//! the next call sees the new viewport.
//!
//! # Named geometries
//!
//! | Key | Rectangle | Transform | Radius | Shadow |
//! |-----|-----------|-----------|--------|--------|
//! | idle | source | identity | idle | idle |
//! | lifted | source | lift dy, lift scale | idle | lifted |
//! | separated | source widened about its center, kept inside the margins | lift dy | idle | lifted |
//! | expanded | `min(viewport - 2 * margin, max)` centered | identity | expanded | expanded |
//!
//! # Invariants
//!
//! - The idle rectangle is the sanitized source rectangle, bit for bit.
//! - The expanded rectangle never exceeds the viewport minus twice the
//!   margin on either axis.
//! - The transition attached to a phase is chosen by the leg that arrives at
//!   it; its duration comes from the kind's duration table.

use std::fmt;

use cardmorph_core::Duration;
use cardmorph_core::animation::{TimingCurve, Transition, TransitionProperty, TransitionSpec};
use cardmorph_core::environment::{DEFAULT_MOBILE_BREAKPOINT, EnvironmentSnapshot};
use cardmorph_core::geometry::{Rect, Size};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::kind::KindProfile;
use crate::phase::{GeometryKey, Leg, MorphPhase};

/// Duration of the background-color transition appended to every leg.
pub const THEME_TRANSITION: Duration = Duration::from_millis(500);

// ============================================================================
// Value types
// ============================================================================

/// An sRGB color with alpha.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::new(0, 0, 0, 1.0);
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0.0);

    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Same color, different alpha.
    #[must_use]
    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

/// One `box-shadow` layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowLayer {
    pub offset_x: f64,
    pub offset_y: f64,
    pub blur: f64,
    pub spread: f64,
    pub color: Rgba,
}

impl ShadowLayer {
    pub const fn new(offset_x: f64, offset_y: f64, blur: f64, spread: f64, color: Rgba) -> Self {
        Self {
            offset_x,
            offset_y,
            blur,
            spread,
            color,
        }
    }
}

impl fmt::Display for ShadowLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}px {}px {}px {}px {}",
            self.offset_x, self.offset_y, self.blur, self.spread, self.color
        )
    }
}

/// A `box-shadow` value; no layers means `none`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BoxShadow {
    layers: Vec<ShadowLayer>,
}

impl BoxShadow {
    pub const fn none() -> Self {
        Self { layers: Vec::new() }
    }

    pub fn single(layer: ShadowLayer) -> Self {
        Self { layers: vec![layer] }
    }

    #[must_use]
    pub fn with_layer(mut self, layer: ShadowLayer) -> Self {
        self.layers.push(layer);
        self
    }

    pub fn layers(&self) -> &[ShadowLayer] {
        &self.layers
    }

    pub fn is_none(&self) -> bool {
        self.layers.is_empty()
    }
}

impl fmt::Display for BoxShadow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.layers.is_empty() {
            return f.write_str("none");
        }
        for (i, layer) in self.layers.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{layer}")?;
        }
        Ok(())
    }
}

/// Vertical translation and uniform scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translate_y: f64,
    pub scale: f64,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        translate_y: 0.0,
        scale: 1.0,
    };

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_identity() {
            return f.write_str("none");
        }
        write!(f, "translateY({}px) scale({})", self.translate_y, self.scale)
    }
}

/// Surface chrome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SurfaceFinish {
    /// Translucent, blurred card surface.
    #[default]
    Glass,
    /// Opaque overlay surface.
    Solid,
}

/// Viewport as the interpolator sees it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub size: Size,
    /// Below the mobile breakpoint.
    pub mobile: bool,
}

impl Viewport {
    /// Viewport of `size` classified against `breakpoint`.
    pub fn new(size: Size, breakpoint: f64) -> Self {
        Self {
            size,
            mobile: size.width < breakpoint,
        }
    }

    /// Viewport of an environment snapshot.
    pub fn from_snapshot(snapshot: &EnvironmentSnapshot, breakpoint: f64) -> Self {
        Self {
            size: snapshot.viewport,
            mobile: snapshot.is_mobile(breakpoint),
        }
    }

    /// Bounds as a rectangle at the origin.
    pub fn bounds(&self) -> Rect {
        Rect::from_size(self.size)
    }
}

impl From<Size> for Viewport {
    fn from(size: Size) -> Self {
        Self::new(size, DEFAULT_MOBILE_BREAKPOINT)
    }
}

/// Concrete style for the morphing surface at one phase.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleDescriptor {
    pub rect: Rect,
    pub border_radius: f64,
    pub box_shadow: BoxShadow,
    pub opacity: f64,
    pub transform: Transform,
    pub transition: TransitionSpec,
    pub finish: SurfaceFinish,
}

impl StyleDescriptor {
    /// `(property, value)` pairs in a fixed order.
    pub fn declarations(&self) -> Vec<(&'static str, String)> {
        vec![
            ("top", format!("{}px", self.rect.top)),
            ("left", format!("{}px", self.rect.left)),
            ("width", format!("{}px", self.rect.width)),
            ("height", format!("{}px", self.rect.height)),
            ("border-radius", format!("{}px", self.border_radius)),
            ("box-shadow", self.box_shadow.to_string()),
            ("opacity", self.opacity.to_string()),
            ("transform", self.transform.to_string()),
            ("transition", self.transition.to_string()),
        ]
    }

    /// Inline-style string.
    pub fn to_css(&self) -> String {
        self.declarations()
            .into_iter()
            .map(|(k, v)| format!("{k}: {v};"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

// ============================================================================
// Geometry
// ============================================================================

/// Centered expanded rectangle for `profile` in `viewport`.
pub fn expanded_rect(viewport: Size, profile: &KindProfile) -> Rect {
    Rect::centered(viewport, profile.sizing.target_size(viewport))
}

/// Source widened about its center, kept within the overlay margins.
///
/// Kinds without a split profile stay at the source width.
pub fn separated_rect(source: Rect, viewport: &Viewport, profile: &KindProfile) -> Rect {
    let scale = profile.split.map_or(1.0, |split| {
        if viewport.mobile {
            split.separate_scale_mobile
        } else {
            split.separate_scale_desktop
        }
    });
    let bounds = viewport.bounds().inner(profile.sizing.margin(viewport.size));
    let width = (source.width * scale).min(bounds.width);
    source.with_width_about_center(width).shifted_within(bounds)
}

/// Rectangle for a named geometry.
pub fn geometry_rect(key: GeometryKey, source: Rect, viewport: &Viewport, profile: &KindProfile) -> Rect {
    match key {
        GeometryKey::Idle | GeometryKey::Lifted => source,
        GeometryKey::Separated => separated_rect(source, viewport, profile),
        GeometryKey::Expanded => expanded_rect(viewport.size, profile),
    }
}

/// Transition for the leg arriving at a phase.
pub fn leg_transition(leg: Leg, profile: &KindProfile) -> TransitionSpec {
    let timings = &profile.timings;
    let duration = leg.duration(timings);
    let group = match leg {
        Leg::Snap => return TransitionSpec::none(),
        Leg::Lift | Leg::Fall => Transition::new(
            TransitionProperty::TRANSFORM | TransitionProperty::BOX_SHADOW | TransitionProperty::OPACITY,
            duration,
            timings.lift_curve,
        ),
        Leg::Separate | Leg::Join => Transition::new(
            TransitionProperty::GEOMETRY | TransitionProperty::TRANSFORM | TransitionProperty::BOX_SHADOW,
            duration,
            timings.expand_curve,
        ),
        Leg::Expand | Leg::Collapse => Transition::new(
            TransitionProperty::GEOMETRY
                | TransitionProperty::TRANSFORM
                | TransitionProperty::BOX_SHADOW
                | TransitionProperty::BORDER_RADIUS
                | TransitionProperty::OPACITY,
            duration,
            timings.expand_curve,
        ),
    };
    TransitionSpec::single(group).then(Transition::new(
        TransitionProperty::BACKGROUND_COLOR,
        THEME_TRANSITION,
        TimingCurve::Ease,
    ))
}

/// Style of the morphing surface at `phase`.
pub fn interpolate<P: MorphPhase>(phase: P, source: Rect, viewport: &Viewport, profile: &KindProfile) -> StyleDescriptor {
    let source = source.sanitized();
    let key = phase.geometry();
    let rect = geometry_rect(key, source, viewport, profile);

    let transform = match key {
        GeometryKey::Idle | GeometryKey::Expanded => Transform::IDENTITY,
        GeometryKey::Lifted => Transform {
            translate_y: profile.lift.offset_y,
            scale: profile.lift.scale,
        },
        GeometryKey::Separated => Transform {
            translate_y: profile.lift.offset_y,
            scale: 1.0,
        },
    };
    let (border_radius, box_shadow) = match key {
        GeometryKey::Idle => (profile.radius.idle, profile.shadows.idle.clone()),
        GeometryKey::Lifted | GeometryKey::Separated => (profile.radius.idle, profile.shadows.lifted.clone()),
        GeometryKey::Expanded => (profile.radius.expanded, profile.shadows.expanded.clone()),
    };
    let leg = phase.leg();
    let opacity = if leg == Leg::Fall && profile.fade_on_fall {
        0.0
    } else {
        1.0
    };
    let finish = if key == GeometryKey::Expanded {
        SurfaceFinish::Solid
    } else {
        SurfaceFinish::Glass
    };

    StyleDescriptor {
        rect,
        border_radius,
        box_shadow,
        opacity,
        transform,
        transition: leg_transition(leg, profile),
        finish,
    }
}

/// Height of the single-pane media strip at `phase`, for kinds that have one.
/// Two-pane forms lay out media through [`crate::panes`] instead.
pub fn media_height<P: MorphPhase>(phase: P, viewport: &Viewport, profile: &KindProfile) -> Option<f64> {
    if P::TWO_PANE {
        return None;
    }
    let media = profile.media?;
    Some(match phase.geometry() {
        GeometryKey::Expanded => {
            if viewport.mobile {
                media.expanded_mobile
            } else {
                media.expanded_desktop
            }
        }
        _ => media.card,
    })
}
