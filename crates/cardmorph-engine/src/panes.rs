#![forbid(unsafe_code)]

//! Two-pane layout.
//!
//! In the 7-phase form the surface holds an image pane and a content pane,
//! each absolutely positioned as percentages of the outer box. While the
//! surface is card-like the panes sit in the card arrangement; once it
//! separates they switch to the open arrangement, and they switch back when
//! it rejoins.
//!
//! | Geometry | Desktop | Mobile |
//! |----------|---------|--------|
//! | idle, lifted | stacked, image height = card % | side by side, image width = card % |
//! | separated, expanded | side by side, image width = open % | stacked, image height = open % |
//!
//! The two panes always tile the outer box: along the split axis their
//! extents sum to 100 %, across it both span 100 %.

use cardmorph_core::animation::{Transition, TransitionProperty, TransitionSpec};

use crate::kind::KindProfile;
use crate::phase::MorphPhase;
use crate::style::Viewport;

/// A rectangle in percent of the outer box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaneRect {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

/// How the panes are arranged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaneArrangement {
    /// Image above content.
    Stacked,
    /// Image left of content.
    SideBySide,
}

/// Pane rectangles at one phase.
#[derive(Debug, Clone, PartialEq)]
pub struct PaneLayout {
    pub arrangement: PaneArrangement,
    pub image: PaneRect,
    pub content: PaneRect,
    pub transition: TransitionSpec,
}

impl PaneLayout {
    fn split(arrangement: PaneArrangement, image_pct: f64) -> (PaneRect, PaneRect) {
        let image_pct = image_pct.clamp(0.0, 100.0);
        let rest = 100.0 - image_pct;
        match arrangement {
            PaneArrangement::Stacked => (
                PaneRect {
                    top: 0.0,
                    left: 0.0,
                    width: 100.0,
                    height: image_pct,
                },
                PaneRect {
                    top: image_pct,
                    left: 0.0,
                    width: 100.0,
                    height: rest,
                },
            ),
            PaneArrangement::SideBySide => (
                PaneRect {
                    top: 0.0,
                    left: 0.0,
                    width: image_pct,
                    height: 100.0,
                },
                PaneRect {
                    top: 0.0,
                    left: image_pct,
                    width: rest,
                    height: 100.0,
                },
            ),
        }
    }
}

/// Pane layout at `phase`; `None` for kinds without a two-pane form.
pub fn pane_layout<P: MorphPhase>(phase: P, viewport: &Viewport, profile: &KindProfile) -> Option<PaneLayout> {
    if !P::TWO_PANE {
        return None;
    }
    let split = profile.split?;
    let card_like = phase.geometry().is_card_like();
    let (arrangement, image_pct) = match (card_like, viewport.mobile) {
        (true, false) => (PaneArrangement::Stacked, split.card_image_height_pct),
        (true, true) => (PaneArrangement::SideBySide, split.card_image_width_pct),
        (false, false) => (PaneArrangement::SideBySide, split.open_image_width_pct),
        (false, true) => (PaneArrangement::Stacked, split.open_image_height_pct),
    };
    let (image, content) = PaneLayout::split(arrangement, image_pct);
    let duration = phase.leg().duration(&profile.timings);
    let transition = if duration.is_zero() {
        TransitionSpec::none()
    } else {
        TransitionSpec::single(Transition::new(
            TransitionProperty::GEOMETRY,
            duration,
            profile.timings.expand_curve,
        ))
    };
    Some(PaneLayout {
        arrangement,
        image,
        content,
        transition,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::{CardDensity, KindProfile};
    use crate::phase::PanePhase;
    use cardmorph_core::geometry::Size;

    fn desktop() -> Viewport {
        Viewport::from(Size::new(1280.0, 800.0))
    }

    fn mobile() -> Viewport {
        Viewport::from(Size::new(390.0, 844.0))
    }

    #[test]
    fn card_arrangement_depends_on_density() {
        let compact = KindProfile::project(CardDensity::Compact);
        let layout = pane_layout(PanePhase::Idle, &desktop(), &compact).expect("project splits");
        assert_eq!(layout.arrangement, PaneArrangement::Stacked);
        assert_eq!(layout.image.height, 70.0);

        let layout = pane_layout(PanePhase::Lifting, &mobile(), &compact).expect("project splits");
        assert_eq!(layout.arrangement, PaneArrangement::SideBySide);
        assert_eq!(layout.image.width, 35.0);
        assert_eq!(layout.content.width, 65.0);
    }

    #[test]
    fn open_arrangement_is_fixed() {
        let regular = KindProfile::project(CardDensity::Regular);
        for phase in [PanePhase::Separating, PanePhase::Expanded, PanePhase::Collapsing] {
            let layout = pane_layout(phase, &desktop(), &regular).expect("project splits");
            assert_eq!(layout.arrangement, PaneArrangement::SideBySide);
            assert_eq!((layout.image.width, layout.content.width), (45.0, 55.0));
            let layout = pane_layout(phase, &mobile(), &regular).expect("project splits");
            assert_eq!(layout.arrangement, PaneArrangement::Stacked);
            assert_eq!((layout.image.height, layout.content.top), (40.0, 40.0));
        }
    }

    #[test]
    fn panes_tile_the_box() {
        let profile = KindProfile::project(CardDensity::Regular);
        for viewport in [desktop(), mobile()] {
            for phase in PanePhase::ALL {
                let l = pane_layout(phase, &viewport, &profile).expect("project splits");
                match l.arrangement {
                    PaneArrangement::Stacked => {
                        assert_eq!(l.image.height + l.content.height, 100.0);
                        assert_eq!(l.content.top, l.image.height);
                    }
                    PaneArrangement::SideBySide => {
                        assert_eq!(l.image.width + l.content.width, 100.0);
                        assert_eq!(l.content.left, l.image.width);
                    }
                }
            }
        }
    }

    #[test]
    fn kinds_without_split_have_no_panes() {
        assert!(pane_layout(PanePhase::Expanded, &desktop(), &KindProfile::document()).is_none());
    }

    #[test]
    fn idle_panes_snap() {
        let profile = KindProfile::project(CardDensity::Regular);
        let layout = pane_layout(PanePhase::Idle, &desktop(), &profile).expect("project splits");
        assert!(layout.transition.is_none());
    }
}
