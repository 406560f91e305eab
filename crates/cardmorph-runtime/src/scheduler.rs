#![forbid(unsafe_code)]

//! The scheduling primitive.
//!
//! A morph never sleeps. It asks a [`Scheduler`] for a timer, returns to the
//! event loop, and is told later which timer fired. Two implementations:
//!
//! - [`ManualScheduler`] runs on a virtual clock that only moves when told
//!   to. Tests and deterministic replays use it; its [`SchedulerStats`] make
//!   it a spy on every schedule, cancel and fire.
//! - [`ClockScheduler`] runs on wall-clock time (`web_time::Instant`) and is
//!   polled by the host's event loop.
//!
//! # Invariants
//!
//! - Timer ids are never reused within one scheduler.
//! - A cancelled timer never fires.
//! - Timers fire in due-time order; ties fire in scheduling order.
//! - A [`Wait::NextFrame`] timer is due one frame interval after it was
//!   scheduled, so the style applied before it is painted at least once.

use std::cell::RefCell;
use std::fmt;

use cardmorph_engine::phase::Wait;
use tracing::trace;
use web_time::{Duration, Instant};

use crate::cancellation::CancellationToken;

/// Default frame interval (60 Hz).
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Handle to a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

impl TimerId {
    /// Raw id.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer#{}", self.0)
    }
}

/// Counters kept by every scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SchedulerStats {
    pub scheduled: u64,
    pub cancelled: u64,
    pub fired: u64,
}

/// A source of one-shot timers.
pub trait Scheduler {
    /// Schedule a one-shot timer.
    fn schedule(&self, wait: Wait) -> TimerId;

    /// Cancel a pending timer. Returns `false` if it already fired or was
    /// cancelled.
    fn cancel(&self, id: TimerId) -> bool;

    /// Remove and return every timer that is due now, in firing order.
    fn take_due(&self) -> Vec<TimerId>;

    /// Number of pending timers.
    fn pending(&self) -> usize;

    /// Counters so far.
    fn stats(&self) -> SchedulerStats;
}

#[derive(Debug, Clone, Copy)]
struct Entry<T> {
    id: TimerId,
    due: T,
}

/// Pending timers ordered by `(due, id)`.
#[derive(Debug)]
struct TimerQueue<T> {
    next_id: u64,
    entries: Vec<Entry<T>>,
    stats: SchedulerStats,
}

impl<T: Copy + PartialOrd> TimerQueue<T> {
    fn new() -> Self {
        Self {
            next_id: 1,
            entries: Vec::new(),
            stats: SchedulerStats::default(),
        }
    }

    fn push(&mut self, due: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        // Keep sorted by due time; equal due times stay in insertion order.
        let pos = self.entries.partition_point(|e| e.due <= due);
        self.entries.insert(pos, Entry { id, due });
        self.stats.scheduled += 1;
        id
    }

    fn remove(&mut self, id: TimerId) -> bool {
        match self.entries.iter().position(|e| e.id == id) {
            Some(pos) => {
                self.entries.remove(pos);
                self.stats.cancelled += 1;
                true
            }
            None => false,
        }
    }

    fn take_until(&mut self, now: T) -> Vec<TimerId> {
        let split = self.entries.partition_point(|e| e.due <= now);
        let fired: Vec<TimerId> = self.entries.drain(..split).map(|e| e.id).collect();
        self.stats.fired += fired.len() as u64;
        fired
    }

    fn earliest(&self) -> Option<T> {
        self.entries.first().map(|e| e.due)
    }

    fn contains(&self, id: TimerId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }
}

// ============================================================================
// ManualScheduler
// ============================================================================

#[derive(Debug)]
struct ManualState {
    now: Duration,
    queue: TimerQueue<Duration>,
}

/// Virtual-clock scheduler.
///
/// Time starts at zero and moves only through [`advance`](Self::advance) or
/// [`advance_to_next`](Self::advance_to_next).
#[derive(Debug)]
pub struct ManualScheduler {
    frame_interval: Duration,
    state: RefCell<ManualState>,
}

impl Default for ManualScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self {
            frame_interval: FRAME_INTERVAL,
            state: RefCell::new(ManualState {
                now: Duration::ZERO,
                queue: TimerQueue::new(),
            }),
        }
    }

    /// Set the frame interval (builder pattern).
    #[must_use]
    pub fn with_frame_interval(mut self, interval: Duration) -> Self {
        self.frame_interval = interval;
        self
    }

    /// Virtual time elapsed.
    pub fn now(&self) -> Duration {
        self.state.borrow().now
    }

    /// Whether `id` is still pending.
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.state.borrow().queue.contains(id)
    }

    /// Due time of the earliest pending timer.
    pub fn next_due(&self) -> Option<Duration> {
        self.state.borrow().queue.earliest()
    }

    /// Move the clock forward by `dt` and return everything now due.
    ///
    /// Timers scheduled by the caller while handling the result are not
    /// included, even if they would be due within `dt`. Use
    /// [`advance_to_next`](Self::advance_to_next) to step through chains.
    pub fn advance(&self, dt: Duration) -> Vec<TimerId> {
        let mut state = self.state.borrow_mut();
        state.now += dt;
        let now = state.now;
        state.queue.take_until(now)
    }

    /// Step to the earliest due time not later than `limit` and return the
    /// timers due there. If nothing is due by `limit`, the clock moves to
    /// `limit` and the result is empty.
    pub fn advance_to_next(&self, limit: Duration) -> Vec<TimerId> {
        let mut state = self.state.borrow_mut();
        match state.queue.earliest() {
            Some(due) if due <= limit => {
                state.now = state.now.max(due);
                let now = state.now;
                state.queue.take_until(now)
            }
            _ => {
                state.now = state.now.max(limit);
                Vec::new()
            }
        }
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, wait: Wait) -> TimerId {
        let mut state = self.state.borrow_mut();
        let delay = match wait {
            Wait::NextFrame => self.frame_interval,
            Wait::Delay(d) => d,
        };
        let due = state.now + delay;
        let id = state.queue.push(due);
        trace!(%id, due_ms = due.as_millis() as u64, "timer scheduled");
        id
    }

    fn cancel(&self, id: TimerId) -> bool {
        let removed = self.state.borrow_mut().queue.remove(id);
        if removed {
            trace!(%id, "timer cancelled");
        }
        removed
    }

    fn take_due(&self) -> Vec<TimerId> {
        let mut state = self.state.borrow_mut();
        let now = state.now;
        state.queue.take_until(now)
    }

    fn pending(&self) -> usize {
        self.state.borrow().queue.entries.len()
    }

    fn stats(&self) -> SchedulerStats {
        self.state.borrow().queue.stats
    }
}

// ============================================================================
// ClockScheduler
// ============================================================================

/// Wall-clock scheduler, polled by the host loop.
#[derive(Debug)]
pub struct ClockScheduler {
    frame_interval: Duration,
    queue: RefCell<TimerQueue<Instant>>,
}

impl Default for ClockScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl ClockScheduler {
    pub fn new() -> Self {
        Self {
            frame_interval: FRAME_INTERVAL,
            queue: RefCell::new(TimerQueue::new()),
        }
    }

    /// Set the frame interval (builder pattern).
    #[must_use]
    pub fn with_frame_interval(mut self, interval: Duration) -> Self {
        self.frame_interval = interval;
        self
    }

    /// Deadline of the earliest pending timer.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.queue.borrow().earliest()
    }

    /// Time until the earliest pending timer is due, zero if overdue.
    pub fn time_until_next(&self) -> Option<Duration> {
        self.next_deadline()
            .map(|at| at.saturating_duration_since(Instant::now()))
    }

    /// Block, dispatching timers as they fall due, until nothing is pending
    /// or `token` is cancelled. Returns the number of timers dispatched.
    ///
    /// `dispatch` may schedule further timers on this scheduler.
    pub fn run_until_idle(&self, token: &CancellationToken, mut dispatch: impl FnMut(TimerId)) -> usize {
        let mut dispatched = 0;
        while let Some(wait) = self.time_until_next() {
            if token.wait_timeout(wait) {
                break;
            }
            for id in self.take_due() {
                dispatch(id);
                dispatched += 1;
            }
        }
        dispatched
    }
}

impl Scheduler for ClockScheduler {
    fn schedule(&self, wait: Wait) -> TimerId {
        let delay = match wait {
            Wait::NextFrame => self.frame_interval,
            Wait::Delay(d) => d,
        };
        let id = self.queue.borrow_mut().push(Instant::now() + delay);
        trace!(%id, delay_ms = delay.as_millis() as u64, "timer scheduled");
        id
    }

    fn cancel(&self, id: TimerId) -> bool {
        let removed = self.queue.borrow_mut().remove(id);
        if removed {
            trace!(%id, "timer cancelled");
        }
        removed
    }

    fn take_due(&self) -> Vec<TimerId> {
        self.queue.borrow_mut().take_until(Instant::now())
    }

    fn pending(&self) -> usize {
        self.queue.borrow().entries.len()
    }

    fn stats(&self) -> SchedulerStats {
        self.queue.borrow().stats
    }
}
