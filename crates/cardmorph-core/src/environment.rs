#![forbid(unsafe_code)]

//! Observable environment context.
//!
//! The [`Environment`] is injected into every mounted morph instead of being
//! re-queried from global state during style computation. The host owns the
//! writer side (it reacts to window resize, color-scheme and motion
//! preference changes); instances hold an [`EnvironmentObserver`] and poll it
//! to learn whether their style must be recomputed.
//!
//! # Invariants
//!
//! - The revision counter increases by exactly one per effective change.
//!   Setting a value equal to the current one is not a change.
//! - Observers never miss a change: `poll()` reports `Some` iff the revision
//!   moved since the observer's last poll, regardless of how many changes
//!   happened in between.
//!
//! The environment is single-threaded (`Rc`), matching the event loop that
//! drives morphs.

use std::cell::RefCell;
use std::rc::Rc;

use crate::geometry::Size;

/// Viewport width below which layouts switch to their mobile form.
pub const DEFAULT_MOBILE_BREAKPOINT: f64 = 768.0;

/// Preferred color scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum ColorScheme {
    #[default]
    Light,
    Dark,
}

/// An immutable sample of the environment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvironmentSnapshot {
    /// Current viewport size.
    pub viewport: Size,
    /// Current color scheme.
    pub color_scheme: ColorScheme,
    /// Whether the user asked for reduced motion.
    pub reduced_motion: bool,
}

impl EnvironmentSnapshot {
    /// Whether the viewport is narrower than `breakpoint`.
    #[inline]
    pub fn is_mobile(&self, breakpoint: f64) -> bool {
        self.viewport.width < breakpoint
    }

    /// Whether the viewport is taller than it is wide.
    #[inline]
    pub fn is_portrait(&self) -> bool {
        self.viewport.height > self.viewport.width
    }
}

#[derive(Debug)]
struct EnvState {
    snapshot: EnvironmentSnapshot,
    revision: u64,
}

/// Shared, observable environment handle.
///
/// Cloning yields another handle to the same state.
#[derive(Debug, Clone)]
pub struct Environment {
    inner: Rc<RefCell<EnvState>>,
}

impl Environment {
    /// Create an environment with the given viewport, light scheme, and
    /// full motion.
    pub fn new(viewport: Size) -> Self {
        Self {
            inner: Rc::new(RefCell::new(EnvState {
                snapshot: EnvironmentSnapshot {
                    viewport,
                    color_scheme: ColorScheme::Light,
                    reduced_motion: false,
                },
                revision: 0,
            })),
        }
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> EnvironmentSnapshot {
        self.inner.borrow().snapshot
    }

    /// Current viewport size.
    pub fn viewport(&self) -> Size {
        self.inner.borrow().snapshot.viewport
    }

    /// Current revision. Starts at zero.
    pub fn revision(&self) -> u64 {
        self.inner.borrow().revision
    }

    /// Update the viewport. Returns `true` if the value changed.
    pub fn set_viewport(&self, viewport: Size) -> bool {
        self.update(|snap| {
            if snap.viewport == viewport {
                false
            } else {
                snap.viewport = viewport;
                true
            }
        })
    }

    /// Update the color scheme. Returns `true` if the value changed.
    pub fn set_color_scheme(&self, scheme: ColorScheme) -> bool {
        self.update(|snap| {
            if snap.color_scheme == scheme {
                false
            } else {
                snap.color_scheme = scheme;
                true
            }
        })
    }

    /// Update the reduced-motion preference. Returns `true` if it changed.
    pub fn set_reduced_motion(&self, reduced: bool) -> bool {
        self.update(|snap| {
            if snap.reduced_motion == reduced {
                false
            } else {
                snap.reduced_motion = reduced;
                true
            }
        })
    }

    /// Create an observer that has already seen the current revision.
    pub fn observe(&self) -> EnvironmentObserver {
        EnvironmentObserver {
            env: self.clone(),
            seen: self.revision(),
        }
    }

    fn update(&self, f: impl FnOnce(&mut EnvironmentSnapshot) -> bool) -> bool {
        let mut state = self.inner.borrow_mut();
        let changed = f(&mut state.snapshot);
        if changed {
            state.revision += 1;
            crate::logging::trace!(revision = state.revision, "environment changed");
        }
        changed
    }
}

/// Poll-based subscription to an [`Environment`].
#[derive(Debug, Clone)]
pub struct EnvironmentObserver {
    env: Environment,
    seen: u64,
}

impl EnvironmentObserver {
    /// Return the new snapshot if the environment changed since the last poll.
    pub fn poll(&mut self) -> Option<EnvironmentSnapshot> {
        let revision = self.env.revision();
        if revision == self.seen {
            return None;
        }
        self.seen = revision;
        Some(self.env.snapshot())
    }

    /// Current snapshot, without marking it as seen.
    pub fn current(&self) -> EnvironmentSnapshot {
        self.env.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_update_is_not_a_change() {
        let env = Environment::new(Size::new(1200.0, 800.0));
        assert!(!env.set_viewport(Size::new(1200.0, 800.0)));
        assert_eq!(env.revision(), 0);
        assert!(env.set_viewport(Size::new(1000.0, 800.0)));
        assert_eq!(env.revision(), 1);
    }

    #[test]
    fn observer_sees_coalesced_changes_once() {
        let env = Environment::new(Size::new(1200.0, 800.0));
        let mut observer = env.observe();
        assert!(observer.poll().is_none());

        env.set_viewport(Size::new(800.0, 600.0));
        env.set_color_scheme(ColorScheme::Dark);
        let snap = observer.poll().expect("change observed");
        assert_eq!(snap.viewport, Size::new(800.0, 600.0));
        assert_eq!(snap.color_scheme, ColorScheme::Dark);
        assert!(observer.poll().is_none());
    }

    #[test]
    fn clones_share_state() {
        let env = Environment::new(Size::new(1200.0, 800.0));
        let other = env.clone();
        other.set_reduced_motion(true);
        assert!(env.snapshot().reduced_motion);
    }

    #[test]
    fn mobile_and_portrait_queries() {
        let env = Environment::new(Size::new(390.0, 844.0));
        let snap = env.snapshot();
        assert!(snap.is_mobile(DEFAULT_MOBILE_BREAKPOINT));
        assert!(snap.is_portrait());
        env.set_viewport(Size::new(1280.0, 720.0));
        assert!(!env.snapshot().is_mobile(DEFAULT_MOBILE_BREAKPOINT));
    }
}
