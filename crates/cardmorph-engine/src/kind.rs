#![forbid(unsafe_code)]

//! Content kinds and their per-kind profiles.
//!
//! A morph is dispatched on its [`ContentKind`] exactly once, when the
//! instance is constructed: [`ContentKind::profile`] yields a
//! [`KindProfile`] carrying every sizing, timing, and styling constant the
//! rest of the engine needs. Nothing downstream branches on the kind again.
//!
//! # Invariants
//!
//! - [`MorphTimings`] is the single duration table for a kind. The phase
//!   plan (timer delays) and the transition descriptors (CSS durations) are
//!   both derived from it, so they cannot disagree.
//! - Viewport fractions lie in `(0, 1]`; the margin on each axis is
//!   `viewport * (1 - fraction) / 2`.
//! - Stagger enter delays are strictly increasing in item index; exit
//!   delays are strictly decreasing. A reduced-motion profile zeroes every
//!   delay instead.

use cardmorph_core::Duration;
use cardmorph_core::animation::{MORPH_IN_OUT, SNAP_OUT, STANDARD, TimingCurve};
use cardmorph_core::geometry::{Sides, Size};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::style::{BoxShadow, Rgba, ShadowLayer};

/// Source card density for project content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CardDensity {
    /// Small grid card with a short media strip.
    Compact,
    /// Full-size card.
    #[default]
    Regular,
}

/// Which document a document button opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DocumentKind {
    Resume,
    ExtendedCv,
    UndergraduateTranscript,
    GraduateTranscript,
}

impl DocumentKind {
    /// Human-readable title shown in the expanded header.
    pub const fn title(self) -> &'static str {
        match self {
            Self::Resume => "Resume",
            Self::ExtendedCv => "Extended CV",
            Self::UndergraduateTranscript => "Undergraduate Transcript",
            Self::GraduateTranscript => "Graduate Transcript",
        }
    }

    /// Label of the compact button that opens this document.
    pub fn button_label(self) -> String {
        format!("View {}", self.title())
    }
}

/// The closed set of things that can morph from a card into an overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum ContentKind {
    /// A project card opening its detail view.
    Project { density: CardDensity },
    /// A document button opening an embedded document viewer.
    Document { document: DocumentKind },
    /// The contact button opening the contact form.
    Contact,
}

impl ContentKind {
    /// Short label for logs.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Project { .. } => "project",
            Self::Document { .. } => "document",
            Self::Contact => "contact",
        }
    }

    /// Built-in profile for this kind.
    pub fn profile(&self) -> KindProfile {
        match *self {
            Self::Project { density } => KindProfile::project(density),
            Self::Document { .. } => KindProfile::document(),
            Self::Contact => KindProfile::contact(),
        }
    }
}

// ============================================================================
// Profile components
// ============================================================================

/// How the expanded height follows from the expanded width.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "rule", rename_all = "snake_case"))]
pub enum HeightRule {
    /// A fixed maximum.
    Fixed { max: f64 },
    /// Media at `aspect` ratio over the full width, plus a fixed body.
    MediaPlusBody { aspect: f64, body: f64 },
}

impl HeightRule {
    /// Maximum height for an expanded width of `width`.
    pub fn max_for_width(&self, width: f64) -> f64 {
        match *self {
            Self::Fixed { max } => max,
            Self::MediaPlusBody { aspect, body } => {
                if aspect > 0.0 {
                    width / aspect + body
                } else {
                    body
                }
            }
        }
    }
}

/// Expanded-geometry sizing rule.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ExpandedSizing {
    /// Upper bound on the expanded width.
    pub max_width: f64,
    /// Upper bound on the expanded height.
    pub max_height: HeightRule,
    /// Fraction of the viewport width available to the overlay.
    pub width_fraction: f64,
    /// Fraction of the viewport height available to the overlay.
    pub height_fraction: f64,
}

impl ExpandedSizing {
    /// Margin kept free on each side of the overlay.
    pub fn margin(&self, viewport: Size) -> Sides {
        Sides::symmetric(
            viewport.height * (1.0 - self.height_fraction) / 2.0,
            viewport.width * (1.0 - self.width_fraction) / 2.0,
        )
    }

    /// Space left for the overlay after margins.
    pub fn available(&self, viewport: Size) -> Size {
        viewport.shrink(self.margin(viewport))
    }

    /// Expanded size: `min(available, max)` on each axis.
    pub fn target_size(&self, viewport: Size) -> Size {
        let avail = self.available(viewport);
        let width = self.max_width.min(avail.width).max(0.0);
        let height = self.max_height.max_for_width(width).min(avail.height).max(0.0);
        Size::new(width, height)
    }
}

/// "Pick up the card" affordance.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LiftProfile {
    /// Vertical translation in pixels; negative is upward.
    pub offset_y: f64,
    /// Uniform scale applied while lifted.
    pub scale: f64,
}

/// Corner radii.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RadiusProfile {
    pub idle: f64,
    pub expanded: f64,
}

/// The duration table for one kind.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MorphTimings {
    /// Idle to lifted.
    #[cfg_attr(feature = "serde", serde(with = "duration_ms"))]
    pub lift: Duration,
    /// Lifted to expanded; also the two-pane separate and join legs.
    #[cfg_attr(feature = "serde", serde(with = "duration_ms"))]
    pub expand: Duration,
    /// Expanded back toward the source.
    #[cfg_attr(feature = "serde", serde(with = "duration_ms"))]
    pub collapse: Duration,
    /// Lifted back down to the source.
    #[cfg_attr(feature = "serde", serde(with = "duration_ms"))]
    pub fall: Duration,
    /// Curve for the lift and fall legs.
    pub lift_curve: TimingCurve,
    /// Curve for the expand, collapse, separate and join legs.
    pub expand_curve: TimingCurve,
}

impl MorphTimings {
    /// Same curves, every duration zero.
    #[must_use]
    pub fn reduced(&self) -> Self {
        Self {
            lift: Duration::ZERO,
            expand: Duration::ZERO,
            collapse: Duration::ZERO,
            fall: Duration::ZERO,
            ..*self
        }
    }

    /// Whether every duration is zero.
    pub fn is_instant(&self) -> bool {
        self.lift.is_zero() && self.expand.is_zero() && self.collapse.is_zero() && self.fall.is_zero()
    }

    /// Time from mount to the expanded phase, excluding the first frame.
    pub fn open_total(&self) -> Duration {
        self.lift + self.expand
    }
}

/// Cross-fade timings for the two content layers.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FadeTimings {
    /// Compact layer fade duration, both directions.
    #[cfg_attr(feature = "serde", serde(with = "duration_ms"))]
    pub compact: Duration,
    /// Delay before the compact layer re-appears on close.
    #[cfg_attr(feature = "serde", serde(with = "duration_ms"))]
    pub compact_return_delay: Duration,
    /// Expanded layer fade duration, both directions.
    #[cfg_attr(feature = "serde", serde(with = "duration_ms"))]
    pub expanded: Duration,
    /// Delay before the expanded layer appears on open.
    #[cfg_attr(feature = "serde", serde(with = "duration_ms"))]
    pub expanded_delay: Duration,
}

/// Stagger parameters for the expanded content's ordered items.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StaggerTimings {
    #[cfg_attr(feature = "serde", serde(with = "duration_ms"))]
    pub base: Duration,
    #[cfg_attr(feature = "serde", serde(with = "duration_ms"))]
    pub step: Duration,
    #[cfg_attr(feature = "serde", serde(with = "duration_ms"))]
    pub exit_step: Duration,
    /// Per-item fade duration.
    #[cfg_attr(feature = "serde", serde(with = "duration_ms"))]
    pub item: Duration,
}

impl StaggerTimings {
    /// Enter delay for item `index`.
    pub fn enter_delay(&self, index: usize) -> Duration {
        self.base.saturating_add(self.step.saturating_mul(steps(index)))
    }

    /// Exit delay for item `index` of `count`.
    pub fn exit_delay(&self, index: usize, count: usize) -> Duration {
        self.exit_step.saturating_mul(steps(count.saturating_sub(index)))
    }
}

fn steps(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

/// Single-pane media strip heights.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MediaProfile {
    /// Height while card-like.
    pub card: f64,
    /// Expanded height below the mobile breakpoint.
    pub expanded_mobile: f64,
    /// Expanded height at or above the mobile breakpoint.
    pub expanded_desktop: f64,
}

/// Two-pane split percentages.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SplitProfile {
    /// Separated width factor below the mobile breakpoint.
    pub separate_scale_mobile: f64,
    /// Separated width factor at or above the mobile breakpoint.
    pub separate_scale_desktop: f64,
    /// Card-like, desktop: image pane height (stacked).
    pub card_image_height_pct: f64,
    /// Card-like, mobile: image pane width (side-by-side).
    pub card_image_width_pct: f64,
    /// Separated/expanded, desktop: image pane width (side-by-side).
    pub open_image_width_pct: f64,
    /// Separated/expanded, mobile: image pane height (stacked).
    pub open_image_height_pct: f64,
}

/// Shadows per named geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct ShadowProfile {
    pub idle: BoxShadow,
    pub lifted: BoxShadow,
    pub expanded: BoxShadow,
}

/// Every constant a morph of one kind needs.
#[derive(Debug, Clone, PartialEq)]
pub struct KindProfile {
    pub sizing: ExpandedSizing,
    pub lift: LiftProfile,
    pub radius: RadiusProfile,
    pub timings: MorphTimings,
    pub fades: FadeTimings,
    pub stagger: StaggerTimings,
    pub shadows: ShadowProfile,
    /// Whether the surface fades out while falling back to the source.
    pub fade_on_fall: bool,
    /// Present for kinds with a media strip.
    pub media: Option<MediaProfile>,
    /// Present for kinds that support the two-pane form.
    pub split: Option<SplitProfile>,
}

const fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn deep_shadow() -> BoxShadow {
    BoxShadow::single(ShadowLayer::new(0.0, 25.0, 50.0, -12.0, Rgba::BLACK.with_alpha(0.5)))
}

impl KindProfile {
    /// Project detail view.
    pub fn project(density: CardDensity) -> Self {
        let compact = density == CardDensity::Compact;
        Self {
            sizing: ExpandedSizing {
                max_width: 900.0,
                max_height: HeightRule::MediaPlusBody {
                    aspect: 1.7,
                    body: 450.0,
                },
                width_fraction: 0.95,
                height_fraction: 0.9,
            },
            lift: LiftProfile {
                offset_y: -60.0,
                scale: 1.05,
            },
            radius: RadiusProfile {
                idle: 12.0,
                expanded: 12.0,
            },
            timings: MorphTimings {
                lift: ms(300),
                expand: ms(450),
                collapse: ms(450),
                fall: ms(300),
                lift_curve: MORPH_IN_OUT,
                expand_curve: MORPH_IN_OUT,
            },
            fades: FadeTimings {
                compact: ms(180),
                compact_return_delay: Duration::ZERO,
                expanded: ms(270),
                expanded_delay: ms(150),
            },
            stagger: StaggerTimings {
                base: ms(250),
                step: ms(75),
                exit_step: ms(40),
                item: ms(270),
            },
            shadows: ShadowProfile {
                idle: BoxShadow::none(),
                lifted: deep_shadow(),
                expanded: deep_shadow(),
            },
            fade_on_fall: true,
            media: Some(MediaProfile {
                card: if compact { 192.0 } else { 256.0 },
                expanded_mobile: 256.0,
                expanded_desktop: 320.0,
            }),
            split: Some(SplitProfile {
                separate_scale_mobile: 1.15,
                separate_scale_desktop: 1.5,
                card_image_height_pct: if compact { 70.0 } else { 55.0 },
                card_image_width_pct: if compact { 35.0 } else { 42.0 },
                open_image_width_pct: 45.0,
                open_image_height_pct: 40.0,
            }),
        }
    }

    /// Embedded document viewer.
    pub fn document() -> Self {
        Self {
            sizing: ExpandedSizing {
                max_width: 1024.0,
                max_height: HeightRule::Fixed { max: 900.0 },
                width_fraction: 0.95,
                height_fraction: 0.9,
            },
            lift: LiftProfile {
                offset_y: -60.0,
                scale: 1.02,
            },
            radius: RadiusProfile {
                idle: 8.0,
                expanded: 12.0,
            },
            timings: MorphTimings {
                lift: ms(350),
                expand: ms(500),
                collapse: ms(500),
                fall: ms(350),
                lift_curve: SNAP_OUT,
                expand_curve: STANDARD,
            },
            fades: FadeTimings {
                compact: ms(300),
                compact_return_delay: ms(100),
                expanded: ms(500),
                expanded_delay: ms(200),
            },
            stagger: StaggerTimings {
                base: ms(200),
                step: ms(60),
                exit_step: ms(30),
                item: ms(300),
            },
            shadows: ShadowProfile {
                idle: BoxShadow::none(),
                lifted: BoxShadow::single(ShadowLayer::new(0.0, 25.0, 30.0, -5.0, Rgba::BLACK.with_alpha(0.2)))
                    .with_layer(ShadowLayer::new(0.0, 15.0, 15.0, -5.0, Rgba::BLACK.with_alpha(0.1))),
                expanded: deep_shadow(),
            },
            fade_on_fall: false,
            media: None,
            split: None,
        }
    }

    /// Contact form.
    pub fn contact() -> Self {
        Self {
            sizing: ExpandedSizing {
                max_width: 600.0,
                max_height: HeightRule::Fixed { max: 680.0 },
                width_fraction: 0.9,
                height_fraction: 0.9,
            },
            lift: LiftProfile {
                offset_y: -40.0,
                scale: 1.05,
            },
            radius: RadiusProfile {
                idle: 8.0,
                expanded: 12.0,
            },
            timings: MorphTimings {
                lift: ms(300),
                expand: ms(450),
                collapse: ms(450),
                fall: ms(300),
                lift_curve: MORPH_IN_OUT,
                expand_curve: MORPH_IN_OUT,
            },
            fades: FadeTimings {
                compact: ms(100),
                compact_return_delay: Duration::ZERO,
                expanded: ms(300),
                expanded_delay: ms(150),
            },
            stagger: StaggerTimings {
                base: ms(150),
                step: ms(50),
                exit_step: ms(25),
                item: ms(270),
            },
            shadows: ShadowProfile {
                idle: BoxShadow::single(ShadowLayer::new(0.0, 1.0, 2.0, 0.0, Rgba::BLACK.with_alpha(0.05))),
                lifted: deep_shadow(),
                expanded: deep_shadow(),
            },
            fade_on_fall: true,
            media: None,
            split: None,
        }
    }

    /// This profile with zero-length timings, as used under reduced motion.
    #[must_use]
    pub fn with_reduced_motion(mut self) -> Self {
        self.timings = self.timings.reduced();
        self.fades = FadeTimings {
            compact: Duration::ZERO,
            compact_return_delay: Duration::ZERO,
            expanded: Duration::ZERO,
            expanded_delay: Duration::ZERO,
        };
        self.stagger = StaggerTimings {
            base: Duration::ZERO,
            step: Duration::ZERO,
            exit_step: Duration::ZERO,
            item: Duration::ZERO,
        };
        self
    }
}

#[cfg(feature = "serde")]
mod duration_ms {
    use cardmorph_core::Duration;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DESKTOP: Size = Size::new(1200.0, 800.0);

    #[test]
    fn project_target_is_width_capped() {
        let profile = ContentKind::Project {
            density: CardDensity::Regular,
        }
        .profile();
        let size = profile.sizing.target_size(DESKTOP);
        assert_eq!(size.width, 900.0);
        // 900 / 1.7 + 450 exceeds 800 * 0.9
        assert!((size.height - 720.0).abs() < 1e-9, "{size:?}");
    }

    #[test]
    fn document_and_contact_targets() {
        let doc = KindProfile::document().sizing.target_size(Size::new(1920.0, 1080.0));
        assert_eq!(doc, Size::new(1024.0, 900.0));
        let contact = KindProfile::contact().sizing.target_size(Size::new(500.0, 900.0));
        assert!((contact.width - 450.0).abs() < 1e-9);
        assert_eq!(contact.height, 680.0);
    }

    #[test]
    fn margins_follow_fractions() {
        let margin = KindProfile::contact().sizing.margin(Size::new(1000.0, 800.0));
        assert!((margin.left - 50.0).abs() < 1e-9);
        assert!((margin.top - 40.0).abs() < 1e-9);
    }

    #[test]
    fn density_changes_media_and_split() {
        let compact = KindProfile::project(CardDensity::Compact);
        let regular = KindProfile::project(CardDensity::Regular);
        assert_eq!(compact.media.map(|m| m.card), Some(192.0));
        assert_eq!(regular.media.map(|m| m.card), Some(256.0));
        assert_eq!(compact.split.map(|s| s.card_image_width_pct), Some(35.0));
        assert_eq!(regular.split.map(|s| s.card_image_width_pct), Some(42.0));
    }

    #[test]
    fn reduced_timings_keep_curves() {
        let timings = KindProfile::document().timings;
        let reduced = timings.reduced();
        assert!(reduced.is_instant());
        assert_eq!(reduced.lift_curve, timings.lift_curve);
        assert!(!timings.is_instant());
    }

    #[test]
    fn stagger_orders() {
        let stagger = KindProfile::project(CardDensity::Regular).stagger;
        assert_eq!(stagger.enter_delay(0), ms(250));
        assert_eq!(stagger.enter_delay(2), ms(400));
        assert_eq!(stagger.exit_delay(0, 4), ms(160));
        assert_eq!(stagger.exit_delay(3, 4), ms(40));
        assert_eq!(stagger.exit_delay(5, 4), Duration::ZERO);
    }

    #[test]
    fn stagger_saturates_for_huge_counts() {
        let stagger = KindProfile::project(CardDensity::Regular).stagger;
        assert!(stagger.enter_delay(usize::MAX) >= stagger.enter_delay(1_000));
        assert!(stagger.exit_delay(0, usize::MAX) >= stagger.exit_delay(0, 1_000));
    }

    #[test]
    fn reduced_motion_zeroes_the_stagger() {
        let stagger = KindProfile::project(CardDensity::Regular)
            .with_reduced_motion()
            .stagger;
        for index in 0..4 {
            assert_eq!(stagger.enter_delay(index), Duration::ZERO);
            assert_eq!(stagger.exit_delay(index, 4), Duration::ZERO);
        }
    }

    #[cfg(feature = "serde")]
    #[test]
    fn timings_serialize_as_milliseconds() {
        let timings = KindProfile::contact().timings;
        let value = serde_json::to_value(timings).expect("serialize");
        assert_eq!(value["lift"], 300);
        assert_eq!(value["collapse"], 450);
        let back: MorphTimings = serde_json::from_value(value).expect("deserialize");
        assert_eq!(back, timings);
    }

    #[test]
    fn document_labels() {
        assert_eq!(DocumentKind::ExtendedCv.button_label(), "View Extended CV");
        assert_eq!(
            ContentKind::Document {
                document: DocumentKind::Resume
            }
            .label(),
            "document"
        );
    }
}
