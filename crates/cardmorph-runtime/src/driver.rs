#![forbid(unsafe_code)]

//! Single-task phase driver.
//!
//! A [`PhaseDriver`] consumes a plan (a list of `(wait, target)` steps) one
//! step at a time. At most one timer is outstanding: the next step's timer
//! is scheduled only after the current step has been handed back and
//! applied, so a slow frame delays the remaining chain uniformly and steps
//! can never race or reorder.
//!
//! # Invariants
//!
//! - `armed` holds the only pending timer this driver owns.
//! - [`PhaseDriver::cancel`] cancels that timer and drops the rest of the
//!   plan; after it, nothing this driver scheduled can fire.
//! - A fired id that does not match `armed`, or that arrives after the
//!   cancellation token was cancelled, is ignored.

use std::collections::VecDeque;

use cardmorph_engine::phase::PhaseStep;
use tracing::trace;

use crate::cancellation::CancellationToken;
use crate::scheduler::{Scheduler, TimerId};

/// Drives one plan through a scheduler.
#[derive(Debug)]
pub struct PhaseDriver<P> {
    queue: VecDeque<PhaseStep<P>>,
    armed: Option<(TimerId, PhaseStep<P>)>,
    token: CancellationToken,
}

impl<P: Copy + std::fmt::Debug> PhaseDriver<P> {
    pub fn new(token: CancellationToken) -> Self {
        Self {
            queue: VecDeque::new(),
            armed: None,
            token,
        }
    }

    /// Replace the current plan with `plan` and arm its first step.
    pub fn start(&mut self, plan: Vec<PhaseStep<P>>, scheduler: &dyn Scheduler) {
        self.cancel(scheduler);
        self.queue = plan.into();
        self.arm_next(scheduler);
    }

    /// Hand back the step for a fired timer, if it is ours.
    ///
    /// The caller applies the step, then calls [`arm_next`](Self::arm_next).
    pub fn fire(&mut self, id: TimerId) -> Option<PhaseStep<P>> {
        if self.token.is_cancelled() {
            trace!(%id, reason = ?self.token.reason(), "fired after cancellation, ignored");
            self.armed = None;
            self.queue.clear();
            return None;
        }
        match self.armed {
            Some((armed, step)) if armed == id => {
                self.armed = None;
                Some(step)
            }
            _ => None,
        }
    }

    /// Schedule the next queued step. No-op if a step is armed or the plan is
    /// exhausted.
    pub fn arm_next(&mut self, scheduler: &dyn Scheduler) {
        if self.armed.is_some() || self.token.is_cancelled() {
            return;
        }
        if let Some(step) = self.queue.pop_front() {
            let id = scheduler.schedule(step.wait);
            trace!(%id, wait = ?step.wait, target = ?step.target, "step armed");
            self.armed = Some((id, step));
        }
    }

    /// Cancel the armed timer and drop the remaining plan.
    pub fn cancel(&mut self, scheduler: &dyn Scheduler) {
        if let Some((id, _)) = self.armed.take() {
            scheduler.cancel(id);
        }
        self.queue.clear();
    }

    /// Whether a timer is outstanding.
    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    /// Whether nothing is armed or queued.
    pub fn is_idle(&self) -> bool {
        self.armed.is_none() && self.queue.is_empty()
    }

    /// Steps not yet armed.
    pub fn queued(&self) -> usize {
        self.queue.len()
    }
}
