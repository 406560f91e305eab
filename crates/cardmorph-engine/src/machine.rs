#![forbid(unsafe_code)]

//! The phase machine.
//!
//! [`MorphMachine`] owns the current phase and decides which transitions are
//! legal. It does not schedule anything: it hands out plans
//! ([`MorphMachine::open_plan`], [`MorphMachine::request_close`]) and accepts
//! their steps back through [`MorphMachine::apply`].
//!
//! # Invariants
//!
//! - The phase index never decreases. A step whose target is not strictly
//!   ahead of the current phase is rejected.
//! - A close is accepted only in the terminal expanded phase. Requests in any
//!   other phase are ignored, never queued.
//! - Once closing starts, open-plan targets are rejected, so the open and
//!   close sequences never interleave.
//! - After unmount every further step is rejected.
//!
//! # Failure Modes
//!
//! | Condition | Behavior |
//! |-----------|----------|
//! | `request_close` before expanded | `Err(CloseRejected)`, phase unchanged |
//! | `request_close` while closing | `Err(CloseRejected)`, phase unchanged |
//! | Backwards or stale step | `None`, phase unchanged |

use std::fmt;

use cardmorph_core::logging::{debug, warn};

use crate::kind::MorphTimings;
use crate::phase::{MorphPhase, PhaseStep, StepTarget};

/// Coarse lifecycle of a machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Heading to or resting at the expanded phase.
    Open,
    /// On the close path.
    Closing,
    /// Unmounted.
    Done,
}

/// Returned when a close request is not honored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CloseRejected<P> {
    /// Phase at the time of the request.
    pub phase: P,
}

impl<P: fmt::Display> fmt::Display for CloseRejected<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "close ignored in phase {}", self.phase)
    }
}

impl<P: fmt::Debug + fmt::Display> std::error::Error for CloseRejected<P> {}

/// Result of an accepted step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Advance<P> {
    pub from: P,
    /// `None` when the step unmounted the morph.
    pub to: Option<P>,
    /// Entering `to` fires `on_start_falling`.
    pub start_falling: bool,
}

impl<P> Advance<P> {
    /// Whether this step unmounted the morph.
    pub fn is_unmount(&self) -> bool {
        self.to.is_none()
    }
}

/// Phase owner for one morph instance.
#[derive(Debug, Clone)]
pub struct MorphMachine<P: MorphPhase> {
    phase: P,
    stage: Stage,
    timings: MorphTimings,
}

impl<P: MorphPhase> MorphMachine<P> {
    /// A machine in the initial phase, committed to opening.
    pub fn new(timings: MorphTimings) -> Self {
        Self {
            phase: P::INITIAL,
            stage: Stage::Open,
            timings,
        }
    }

    /// Current phase.
    #[inline]
    pub fn phase(&self) -> P {
        self.phase
    }

    /// Current stage.
    #[inline]
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Duration table in use.
    pub fn timings(&self) -> &MorphTimings {
        &self.timings
    }

    /// Whether the terminal expanded phase is active.
    pub fn is_expanded(&self) -> bool {
        self.stage == Stage::Open && self.phase.is_expanded()
    }

    /// Whether the machine has unmounted.
    pub fn is_done(&self) -> bool {
        self.stage == Stage::Done
    }

    /// Steps from the initial phase to expanded.
    pub fn open_plan(&self) -> Vec<PhaseStep<P>> {
        P::open_plan(&self.timings)
    }

    /// Begin closing.
    ///
    /// On success the machine is already in [`MorphPhase::CLOSE_ENTRY`] and
    /// the returned plan leads from there to unmount.
    pub fn request_close(&mut self) -> Result<Vec<PhaseStep<P>>, CloseRejected<P>> {
        if !self.is_expanded() {
            debug!(phase = %self.phase, "close request ignored");
            return Err(CloseRejected { phase: self.phase });
        }
        let from = self.phase;
        self.phase = P::CLOSE_ENTRY;
        self.stage = Stage::Closing;
        debug!(from = %from, to = %self.phase, index = self.phase.index(), "phase advanced");
        Ok(P::close_plan(&self.timings))
    }

    /// Apply one plan step.
    ///
    /// Returns `None` if the step is not strictly ahead of the current phase,
    /// crosses from the open plan into the close path, or arrives after
    /// unmount.
    pub fn apply(&mut self, target: StepTarget<P>) -> Option<Advance<P>> {
        if self.stage == Stage::Done {
            warn!(?target, "step after unmount rejected");
            return None;
        }
        let from = self.phase;
        match target {
            StepTarget::Phase(to) => {
                let legal = to.index() > from.index()
                    && match self.stage {
                        Stage::Open => to.index() <= P::EXPANDED.index(),
                        Stage::Closing => to.is_closing(),
                        Stage::Done => false,
                    };
                if !legal {
                    warn!(from = %from, to = %to, "out-of-order step rejected");
                    return None;
                }
                self.phase = to;
                debug!(from = %from, to = %to, index = to.index(), "phase advanced");
                Some(Advance {
                    from,
                    to: Some(to),
                    start_falling: to.starts_falling(),
                })
            }
            StepTarget::Unmount => {
                if self.stage != Stage::Closing {
                    warn!(from = %from, "unmount step outside close path rejected");
                    return None;
                }
                self.stage = Stage::Done;
                debug!(from = %from, "morph unmounted");
                Some(Advance {
                    from,
                    to: None,
                    start_falling: false,
                })
            }
        }
    }
}
