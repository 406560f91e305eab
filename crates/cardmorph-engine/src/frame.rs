#![forbid(unsafe_code)]

//! Everything a renderer needs for one phase, computed in one call.

use cardmorph_core::geometry::Rect;

use crate::backdrop::{BackdropConfig, BackdropStyle, backdrop};
use crate::crossfade::{CloseControl, ContentVisibility, close_control, visibility};
use crate::kind::KindProfile;
use crate::panes::{PaneLayout, pane_layout};
use crate::phase::MorphPhase;
use crate::style::{StyleDescriptor, Viewport, interpolate, media_height};

/// Derived render state of a morph at one phase.
#[derive(Debug, Clone, PartialEq)]
pub struct MorphFrame<P> {
    pub phase: P,
    pub surface: StyleDescriptor,
    pub content: ContentVisibility,
    pub close: CloseControl,
    pub backdrop: BackdropStyle,
    /// Two-pane split, for two-pane forms of kinds that have one.
    pub panes: Option<PaneLayout>,
    /// Media strip height, for single-pane forms of kinds that have one.
    pub media_height: Option<f64>,
}

impl<P: MorphPhase> MorphFrame<P> {
    /// Compute the frame for `phase`.
    pub fn compute(
        phase: P,
        source: Rect,
        viewport: &Viewport,
        profile: &KindProfile,
        backdrop_config: &BackdropConfig,
    ) -> Self {
        Self {
            phase,
            surface: interpolate(phase, source, viewport, profile),
            content: visibility(phase, &profile.fades),
            close: close_control(phase, &profile.fades),
            backdrop: backdrop(phase, backdrop_config),
            panes: pane_layout(phase, viewport, profile),
            media_height: media_height(phase, viewport, profile),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crossfade::Layer;
    use crate::kind::{CardDensity, KindProfile};
    use crate::phase::{CardPhase, PanePhase};
    use cardmorph_core::geometry::Size;

    #[test]
    fn expanded_frame_is_consistent() {
        let profile = KindProfile::project(CardDensity::Regular);
        let viewport = Viewport::from(Size::new(1200.0, 800.0));
        let frame = MorphFrame::compute(
            PanePhase::Expanded,
            Rect::new(100.0, 50.0, 200.0, 150.0),
            &viewport,
            &profile,
            &BackdropConfig::default(),
        );
        assert_eq!(frame.content.interactive(), Layer::Expanded);
        assert!(frame.close.pointer_events.is_enabled());
        assert!(frame.backdrop.pointer_events.is_enabled());
        assert!(frame.panes.is_some());
        assert_eq!(frame.media_height, None);
    }

    #[test]
    fn single_pane_project_uses_media_strip_only() {
        let frame = MorphFrame::compute(
            CardPhase::Expanded,
            Rect::new(100.0, 50.0, 200.0, 150.0),
            &Viewport::from(Size::new(1200.0, 800.0)),
            &KindProfile::project(CardDensity::Regular),
            &BackdropConfig::default(),
        );
        assert!(frame.panes.is_none());
        assert_eq!(frame.media_height, Some(320.0));
    }

    #[test]
    fn contact_frame_has_no_panes_or_media() {
        let frame = MorphFrame::compute(
            CardPhase::Lifted,
            Rect::new(0.0, 0.0, 120.0, 40.0),
            &Viewport::from(Size::new(800.0, 600.0)),
            &KindProfile::contact(),
            &BackdropConfig::default(),
        );
        assert!(frame.panes.is_none());
        assert!(frame.media_height.is_none());
        assert_eq!(frame.content.interactive(), Layer::Compact);
    }
}
