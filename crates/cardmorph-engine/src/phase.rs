#![forbid(unsafe_code)]

//! Phase forms and their schedules.
//!
//! Two phase shapes exist:
//!
//! ```text
//! CardPhase:  Entering → Lifted → Expanded → Collapsing → Falling → (unmount)
//! PanePhase:  Idle → Lifting → Separating → Expanded → Collapsing → Joining → Dropping → (unmount)
//! ```
//!
//! Both implement [`MorphPhase`], which fixes the order, maps each phase to a
//! named geometry and a travel leg, and produces the open and close plans as
//! explicit `(wait, target)` lists. The plans are data: a single driver
//! consumes them one step at a time, so there are no nested timers to leak.
//!
//! # Invariants
//!
//! - `index()` is strictly increasing along the sequence; unmount sits after
//!   the last phase.
//! - The open plan starts with [`Wait::NextFrame`] so the initial geometry is
//!   painted once before anything moves.
//! - Every close-plan delay comes from the same [`MorphTimings`] as the
//!   transition durations.
//! - Exactly one phase per form has `starts_falling() == true`, and it lies
//!   on the close path before unmount.

use std::fmt;

use cardmorph_core::Duration;

use crate::kind::MorphTimings;

/// What the driver waits for before applying a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wait {
    /// One paint of the current style.
    NextFrame,
    /// A fixed delay.
    Delay(Duration),
}

/// Where a step leads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepTarget<P> {
    Phase(P),
    /// Past the last phase: the host removes the instance.
    Unmount,
}

/// One entry of a phase plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseStep<P> {
    pub wait: Wait,
    pub target: StepTarget<P>,
}

impl<P> PhaseStep<P> {
    /// Advance to `phase` after `wait`.
    pub const fn to(wait: Wait, phase: P) -> Self {
        Self {
            wait,
            target: StepTarget::Phase(phase),
        }
    }

    /// Unmount after `wait`.
    pub const fn unmount(wait: Wait) -> Self {
        Self {
            wait,
            target: StepTarget::Unmount,
        }
    }
}

/// Named geometry a phase rests at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometryKey {
    /// The source rectangle, at-rest chrome.
    Idle,
    /// Source rectangle, raised and scaled.
    Lifted,
    /// Widened about the source center (two-pane only).
    Separated,
    /// Centered overlay.
    Expanded,
}

impl GeometryKey {
    /// Whether this geometry is card-shaped.
    pub const fn is_card_like(self) -> bool {
        matches!(self, Self::Idle | Self::Lifted)
    }
}

/// The travel leg that arrives at a phase. Selects duration and curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Leg {
    /// No travel: paint in place.
    Snap,
    Lift,
    Separate,
    Expand,
    Collapse,
    Join,
    Fall,
}

impl Leg {
    /// Duration of this leg from the kind's duration table.
    pub fn duration(self, timings: &MorphTimings) -> Duration {
        match self {
            Self::Snap => Duration::ZERO,
            Self::Lift => timings.lift,
            Self::Separate | Self::Expand | Self::Join => timings.expand,
            Self::Collapse => timings.collapse,
            Self::Fall => timings.fall,
        }
    }
}

/// Shared behavior of both phase forms.
pub trait MorphPhase: Copy + Eq + fmt::Debug + fmt::Display + 'static {
    /// Phase a fresh instance starts in.
    const INITIAL: Self;
    /// The terminal expanded phase.
    const EXPANDED: Self;
    /// Phase entered synchronously when a close is accepted.
    const CLOSE_ENTRY: Self;
    /// Whether this form animates a separate image pane and content pane.
    const TWO_PANE: bool;

    /// Position in the fixed order.
    fn index(self) -> u8;

    /// Index that unmount occupies, one past the last phase.
    fn unmount_index() -> u8;

    /// Named geometry this phase rests at.
    fn geometry(self) -> GeometryKey;

    /// Leg traveled to reach this phase.
    fn leg(self) -> Leg;

    /// Steps from [`Self::INITIAL`] to [`Self::EXPANDED`].
    fn open_plan(timings: &MorphTimings) -> Vec<PhaseStep<Self>>;

    /// Steps from [`Self::CLOSE_ENTRY`] to unmount.
    fn close_plan(timings: &MorphTimings) -> Vec<PhaseStep<Self>>;

    /// Whether entering this phase fires `on_start_falling`.
    fn starts_falling(self) -> bool;

    /// Whether this is the terminal expanded phase.
    fn is_expanded(self) -> bool {
        self == Self::EXPANDED
    }

    /// Whether this phase lies on the close path.
    fn is_closing(self) -> bool {
        self.index() >= Self::CLOSE_ENTRY.index()
    }

    /// Whether the morph is at or heading toward the expanded phase.
    fn approaching_expanded(self) -> bool {
        self.index() > Self::INITIAL.index() && self.index() <= Self::EXPANDED.index()
    }
}

// ============================================================================
// 5-phase form
// ============================================================================

/// Single-surface morph phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CardPhase {
    Entering,
    Lifted,
    Expanded,
    Collapsing,
    Falling,
}

impl CardPhase {
    /// All phases in order.
    pub const ALL: [CardPhase; 5] = [
        Self::Entering,
        Self::Lifted,
        Self::Expanded,
        Self::Collapsing,
        Self::Falling,
    ];

    /// Lowercase name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Entering => "entering",
            Self::Lifted => "lifted",
            Self::Expanded => "expanded",
            Self::Collapsing => "collapsing",
            Self::Falling => "falling",
        }
    }
}

impl fmt::Display for CardPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl MorphPhase for CardPhase {
    const INITIAL: Self = Self::Entering;
    const EXPANDED: Self = Self::Expanded;
    const CLOSE_ENTRY: Self = Self::Collapsing;
    const TWO_PANE: bool = false;

    fn index(self) -> u8 {
        self as u8
    }

    fn unmount_index() -> u8 {
        Self::ALL.len() as u8
    }

    fn geometry(self) -> GeometryKey {
        match self {
            Self::Entering | Self::Falling => GeometryKey::Idle,
            Self::Lifted | Self::Collapsing => GeometryKey::Lifted,
            Self::Expanded => GeometryKey::Expanded,
        }
    }

    fn leg(self) -> Leg {
        match self {
            Self::Entering => Leg::Snap,
            Self::Lifted => Leg::Lift,
            Self::Expanded => Leg::Expand,
            Self::Collapsing => Leg::Collapse,
            Self::Falling => Leg::Fall,
        }
    }

    fn open_plan(timings: &MorphTimings) -> Vec<PhaseStep<Self>> {
        vec![
            PhaseStep::to(Wait::NextFrame, Self::Lifted),
            PhaseStep::to(Wait::Delay(timings.lift), Self::Expanded),
        ]
    }

    fn close_plan(timings: &MorphTimings) -> Vec<PhaseStep<Self>> {
        vec![
            PhaseStep::to(Wait::Delay(timings.collapse), Self::Falling),
            PhaseStep::unmount(Wait::Delay(timings.fall)),
        ]
    }

    fn starts_falling(self) -> bool {
        self == Self::Falling
    }
}

// ============================================================================
// 7-phase form
// ============================================================================

/// Two-pane morph phases: the image and content panes separate before
/// expanding and rejoin before dropping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PanePhase {
    Idle,
    Lifting,
    Separating,
    Expanded,
    Collapsing,
    Joining,
    Dropping,
}

impl PanePhase {
    /// All phases in order.
    pub const ALL: [PanePhase; 7] = [
        Self::Idle,
        Self::Lifting,
        Self::Separating,
        Self::Expanded,
        Self::Collapsing,
        Self::Joining,
        Self::Dropping,
    ];

    /// Lowercase name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Lifting => "lifting",
            Self::Separating => "separating",
            Self::Expanded => "expanded",
            Self::Collapsing => "collapsing",
            Self::Joining => "joining",
            Self::Dropping => "dropping",
        }
    }
}

impl fmt::Display for PanePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl MorphPhase for PanePhase {
    const INITIAL: Self = Self::Idle;
    const EXPANDED: Self = Self::Expanded;
    const CLOSE_ENTRY: Self = Self::Collapsing;
    const TWO_PANE: bool = true;

    fn index(self) -> u8 {
        self as u8
    }

    fn unmount_index() -> u8 {
        Self::ALL.len() as u8
    }

    fn geometry(self) -> GeometryKey {
        match self {
            Self::Idle | Self::Dropping => GeometryKey::Idle,
            Self::Lifting | Self::Joining => GeometryKey::Lifted,
            Self::Separating | Self::Collapsing => GeometryKey::Separated,
            Self::Expanded => GeometryKey::Expanded,
        }
    }

    fn leg(self) -> Leg {
        match self {
            Self::Idle => Leg::Snap,
            Self::Lifting => Leg::Lift,
            Self::Separating => Leg::Separate,
            Self::Expanded => Leg::Expand,
            Self::Collapsing => Leg::Collapse,
            Self::Joining => Leg::Join,
            Self::Dropping => Leg::Fall,
        }
    }

    fn open_plan(timings: &MorphTimings) -> Vec<PhaseStep<Self>> {
        vec![
            PhaseStep::to(Wait::NextFrame, Self::Lifting),
            PhaseStep::to(Wait::Delay(timings.lift), Self::Separating),
            PhaseStep::to(Wait::Delay(timings.expand), Self::Expanded),
        ]
    }

    fn close_plan(timings: &MorphTimings) -> Vec<PhaseStep<Self>> {
        vec![
            PhaseStep::to(Wait::Delay(timings.collapse), Self::Joining),
            PhaseStep::to(Wait::Delay(timings.expand), Self::Dropping),
            PhaseStep::unmount(Wait::Delay(timings.fall)),
        ]
    }

    fn starts_falling(self) -> bool {
        self == Self::Dropping
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::KindProfile;

    fn target_index<P: MorphPhase>(target: StepTarget<P>) -> u8 {
        match target {
            StepTarget::Phase(p) => p.index(),
            StepTarget::Unmount => P::unmount_index(),
        }
    }

    fn assert_plans_monotonic<P: MorphPhase>(timings: &MorphTimings) {
        let mut last = P::INITIAL.index();
        for step in P::open_plan(timings) {
            let next = target_index(step.target);
            assert!(next > last, "open plan goes backwards at {:?}", step);
            last = next;
        }
        assert_eq!(last, P::EXPANDED.index());

        let mut last = P::CLOSE_ENTRY.index();
        assert!(last > P::EXPANDED.index());
        for step in P::close_plan(timings) {
            let next = target_index(step.target);
            assert!(next > last, "close plan goes backwards at {:?}", step);
            last = next;
        }
        assert_eq!(last, P::unmount_index());
    }

    #[test]
    fn plans_are_monotonic() {
        let timings = KindProfile::document().timings;
        assert_plans_monotonic::<CardPhase>(&timings);
        assert_plans_monotonic::<PanePhase>(&timings);
    }

    #[test]
    fn first_open_step_waits_for_a_frame() {
        let timings = KindProfile::contact().timings;
        assert_eq!(CardPhase::open_plan(&timings)[0].wait, Wait::NextFrame);
        assert_eq!(PanePhase::open_plan(&timings)[0].wait, Wait::NextFrame);
    }

    #[test]
    fn plan_delays_come_from_the_duration_table() {
        let timings = KindProfile::document().timings;
        let open = CardPhase::open_plan(&timings);
        assert_eq!(open[1].wait, Wait::Delay(timings.lift));
        let close = CardPhase::close_plan(&timings);
        assert_eq!(close[0].wait, Wait::Delay(timings.collapse));
        assert_eq!(close[1].wait, Wait::Delay(timings.fall));
        assert_eq!(
            Leg::Collapse.duration(&timings),
            timings.collapse,
        );
    }

    #[test]
    fn geometry_mapping_mirrors() {
        assert_eq!(CardPhase::Entering.geometry(), CardPhase::Falling.geometry());
        assert_eq!(CardPhase::Lifted.geometry(), CardPhase::Collapsing.geometry());
        assert_eq!(PanePhase::Lifting.geometry(), PanePhase::Joining.geometry());
        assert_eq!(PanePhase::Separating.geometry(), PanePhase::Collapsing.geometry());
        assert_eq!(PanePhase::Idle.geometry(), PanePhase::Dropping.geometry());
    }

    #[test]
    fn exactly_one_falling_trigger() {
        assert_eq!(CardPhase::ALL.iter().filter(|p| p.starts_falling()).count(), 1);
        assert_eq!(PanePhase::ALL.iter().filter(|p| p.starts_falling()).count(), 1);
        assert!(PanePhase::Dropping.is_closing());
    }

    #[test]
    fn approaching_expanded_window() {
        let approaching: Vec<_> = PanePhase::ALL.iter().filter(|p| p.approaching_expanded()).collect();
        assert_eq!(
            approaching,
            vec![&PanePhase::Lifting, &PanePhase::Separating, &PanePhase::Expanded]
        );
        assert!(!CardPhase::Entering.approaching_expanded());
        assert!(CardPhase::Lifted.approaching_expanded());
        assert!(!CardPhase::Collapsing.approaching_expanded());
    }
}
