//! Property-based tests for random host interaction sequences.
//!
//! 1. At most one phase timer is outstanding per mounted overlay
//! 2. `StartFalling` always precedes `Closed` for the same selection, and
//!    each appears at most once per open
//! 3. No listener stays attached while nothing is open
//! 4. Phase index never decreases while an overlay stays mounted

use cardmorph_core::environment::Environment;
use cardmorph_core::event::{Event, HitTarget};
use cardmorph_core::geometry::{Rect, Size};
use cardmorph_engine::kind::{CardDensity, ContentKind};
use cardmorph_engine::phase::MorphPhase;
use cardmorph_runtime::{HostNotice, ManualScheduler, MorphConfig, OverlayHost, Scheduler};
use proptest::prelude::*;
use web_time::Duration;

#[derive(Debug, Clone)]
enum Op {
    Open(bool),
    Escape,
    Click(HitTarget),
    Close,
    Resize(f64, f64),
    Advance(u64),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        any::<bool>().prop_map(Op::Open),
        Just(Op::Escape),
        prop_oneof![
            Just(HitTarget::Backdrop),
            Just(HitTarget::Surface),
            Just(HitTarget::CloseButton),
        ]
        .prop_map(Op::Click),
        Just(Op::Close),
        (300.0f64..2000.0, 300.0f64..1400.0).prop_map(|(w, h)| Op::Resize(w, h)),
        (0u64..600).prop_map(Op::Advance),
    ]
}

fn current_index(host: &OverlayHost<u32, ManualScheduler>) -> Option<usize> {
    host.card()
        .map(|m| usize::from(m.phase().index()))
        .or_else(|| host.panes().map(|m| usize::from(m.phase().index())))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn host_sequences_hold_invariants(ops in prop::collection::vec(op_strategy(), 1..60)) {
        let mut host: OverlayHost<u32, ManualScheduler> = OverlayHost::new(
            ManualScheduler::new(),
            Environment::new(Size::new(1200.0, 800.0)),
            MorphConfig::default(),
        );
        let source = Rect::new(100.0, 50.0, 200.0, 150.0);
        let mut next_id = 0u32;
        let mut notices = Vec::new();
        let mut last_index: Option<(Option<u32>, usize)> = None;

        for op in ops {
            match op {
                Op::Open(two_pane) => {
                    let id = next_id;
                    let opened = if two_pane {
                        host.open_two_pane(id, source, CardDensity::Regular)
                    } else {
                        host.open(id, source, ContentKind::Contact)
                    };
                    if opened.is_ok() {
                        next_id += 1;
                    }
                }
                Op::Escape => {
                    host.handle_event(&Event::escape());
                }
                Op::Click(target) => {
                    host.handle_event(&Event::click(target));
                }
                Op::Close => {
                    host.request_close();
                }
                Op::Resize(w, h) => {
                    host.handle_event(&Event::resize(Size::new(w, h)));
                }
                Op::Advance(ms) => {
                    host.advance(Duration::from_millis(ms));
                }
            }

            prop_assert!(host.scheduler().pending() <= 1);
            if !host.is_open() {
                prop_assert!(host.listeners().is_empty());
            } else {
                prop_assert_eq!(host.listeners().len(), 2);
            }

            let selection = host.selection().copied();
            if let Some(index) = current_index(&host) {
                if let Some((prev_sel, prev_index)) = last_index {
                    if prev_sel == selection {
                        prop_assert!(index >= prev_index);
                    }
                }
                last_index = Some((selection, index));
            }
            notices.extend(host.drain_notices());
        }

        for id in 0..next_id {
            let falls: Vec<usize> = notices
                .iter()
                .enumerate()
                .filter(|(_, n)| **n == HostNotice::StartFalling(id))
                .map(|(i, _)| i)
                .collect();
            let closes: Vec<usize> = notices
                .iter()
                .enumerate()
                .filter(|(_, n)| **n == HostNotice::Closed(id))
                .map(|(i, _)| i)
                .collect();
            prop_assert!(falls.len() <= 1);
            prop_assert!(closes.len() <= 1);
            if let Some(close) = closes.first() {
                prop_assert_eq!(falls.len(), 1);
                prop_assert!(falls[0] < *close);
            }
        }
    }
}
