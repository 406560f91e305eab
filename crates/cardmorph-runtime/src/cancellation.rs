//! Cooperative cancellation for a morph's timer chain.
//!
//! Every mounted instance owns one [`CancellationSource`]. Teardown cancels
//! it with a [`CancelReason`], and the phase driver checks the matching
//! [`CancellationToken`] before handing back any fired step, so a timer that
//! slips through after teardown (for example one already taken from a
//! wall-clock queue) is dropped instead of advancing a dead morph.
//!
//! The first reason wins; later cancels are no-ops. Tokens are
//! `Send + Sync` so a host that delivers timers from another thread can
//! check them before posting back to its event loop.
//!
//! ```
//! use cardmorph_runtime::cancellation::{CancelReason, CancellationSource};
//!
//! let source = CancellationSource::new();
//! let token = source.token();
//! assert!(source.cancel(CancelReason::Unmounted));
//! assert!(!source.cancel(CancelReason::Closed));
//! assert_eq!(token.reason(), Some(CancelReason::Unmounted));
//! ```

#![forbid(unsafe_code)]

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex};

use web_time::Duration;

/// Why a timer chain stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CancelReason {
    /// The close sequence ran to completion.
    Closed,
    /// The host unmounted the instance early.
    Unmounted,
    /// The host loop is shutting down.
    Shutdown,
}

impl fmt::Display for CancelReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Closed => "closed",
            Self::Unmounted => "unmounted",
            Self::Shutdown => "shutdown",
        })
    }
}

struct Flag {
    // Fast path for `is_cancelled`; `reason` is authoritative.
    set: AtomicBool,
    reason: Mutex<Option<CancelReason>>,
    wake: Condvar,
}

impl Flag {
    fn reason(&self) -> Option<CancelReason> {
        *self.reason.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Triggers cancellation. Dropping it does not cancel.
pub struct CancellationSource {
    flag: Arc<Flag>,
}

/// Observes a [`CancellationSource`]; clones share the flag.
#[derive(Clone)]
pub struct CancellationToken {
    flag: Arc<Flag>,
}

impl CancellationSource {
    pub fn new() -> Self {
        Self {
            flag: Arc::new(Flag {
                set: AtomicBool::new(false),
                reason: Mutex::new(None),
                wake: Condvar::new(),
            }),
        }
    }

    pub fn token(&self) -> CancellationToken {
        CancellationToken {
            flag: Arc::clone(&self.flag),
        }
    }

    /// Cancel with `reason` and wake any waiter. Returns `false` if already
    /// cancelled.
    pub fn cancel(&self, reason: CancelReason) -> bool {
        let mut slot = self.flag.reason.lock().unwrap_or_else(|e| e.into_inner());
        if slot.is_some() {
            return false;
        }
        *slot = Some(reason);
        self.flag.set.store(true, Ordering::Release);
        self.flag.wake.notify_all();
        true
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.set.load(Ordering::Acquire)
    }
}

impl Default for CancellationSource {
    fn default() -> Self {
        Self::new()
    }
}

impl CancellationToken {
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.flag.set.load(Ordering::Acquire)
    }

    /// The reason given to the first cancel, if any.
    pub fn reason(&self) -> Option<CancelReason> {
        self.flag.reason()
    }

    /// Block until cancelled or `timeout` elapses. Returns whether the token
    /// is cancelled.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        if self.is_cancelled() {
            return true;
        }
        if timeout.is_zero() {
            return false;
        }
        let slot = self.flag.reason.lock().unwrap_or_else(|e| e.into_inner());
        let (slot, _) = self
            .flag
            .wake
            .wait_timeout_while(slot, timeout, |reason| reason.is_none())
            .unwrap_or_else(|e| e.into_inner());
        slot.is_some()
    }
}

impl fmt::Debug for CancellationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancellationSource")
            .field("reason", &self.flag.reason())
            .finish()
    }
}

impl fmt::Debug for CancellationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancellationToken")
            .field("reason", &self.flag.reason())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn first_reason_wins() {
        let source = CancellationSource::new();
        let token = source.token().clone();
        assert_eq!(token.reason(), None);
        assert!(source.cancel(CancelReason::Closed));
        assert!(!source.cancel(CancelReason::Shutdown));
        assert!(token.is_cancelled() && source.is_cancelled());
        assert_eq!(token.reason(), Some(CancelReason::Closed));
    }

    #[test]
    fn dropping_the_source_leaves_tokens_live() {
        let token = CancellationSource::new().token();
        assert!(!token.is_cancelled());
        assert!(!token.wait_timeout(Duration::ZERO));
    }

    #[test]
    fn waiter_wakes_on_cancel() {
        let source = CancellationSource::new();
        let token = source.token();
        let waiter = thread::spawn(move || token.wait_timeout(Duration::from_secs(10)));
        thread::sleep(Duration::from_millis(20));
        source.cancel(CancelReason::Shutdown);
        assert!(waiter.join().expect("waiter thread"));
    }

    #[test]
    fn wait_times_out_uncancelled() {
        let source = CancellationSource::new();
        assert!(!source.token().wait_timeout(Duration::from_millis(5)));
    }

    #[test]
    fn reason_display() {
        assert_eq!(CancelReason::Unmounted.to_string(), "unmounted");
    }
}
