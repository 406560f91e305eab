#![forbid(unsafe_code)]

//! Timing curves and transition descriptors.
//!
//! A morph never animates values itself: each phase emits a target style and
//! a [`TransitionSpec`] describing how the renderer should travel to it. This
//! module defines the CSS-equivalent vocabulary for that description, plus
//! [`TimingCurve::apply`] so renderers without a native transition engine
//! can sample the same curves.
//!
//! # Invariants
//!
//! - `TimingCurve::apply(0.0) == 0.0` and `apply(1.0) == 1.0` for every curve.
//! - Input progress is clamped to `[0.0, 1.0]`.
//! - Formatting a curve yields its CSS `<easing-function>` spelling.

pub mod transition;

pub use transition::{Transition, TransitionProperty, TransitionSpec};

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Symmetric in-out curve used by project and contact morphs.
pub const MORPH_IN_OUT: TimingCurve = TimingCurve::cubic(0.65, 0.0, 0.35, 1.0);

/// Fast-out, long-settle curve used for small lifts and drops.
pub const SNAP_OUT: TimingCurve = TimingCurve::cubic(0.2, 0.8, 0.2, 1.0);

/// Standard material-style curve used for full-screen expansion.
pub const STANDARD: TimingCurve = TimingCurve::cubic(0.4, 0.0, 0.2, 1.0);

/// A CSS timing function.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum TimingCurve {
    Linear,
    Ease,
    EaseIn,
    EaseOut,
    EaseInOut,
    CubicBezier(CubicBezier),
}

impl Default for TimingCurve {
    fn default() -> Self {
        Self::Ease
    }
}

impl TimingCurve {
    /// A `cubic-bezier(x1, y1, x2, y2)` curve.
    pub const fn cubic(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self::CubicBezier(CubicBezier { x1, y1, x2, y2 })
    }

    /// The equivalent cubic Bézier, or `None` for `linear`.
    pub fn as_bezier(self) -> Option<CubicBezier> {
        match self {
            Self::Linear => None,
            Self::Ease => Some(CubicBezier::new(0.25, 0.1, 0.25, 1.0)),
            Self::EaseIn => Some(CubicBezier::new(0.42, 0.0, 1.0, 1.0)),
            Self::EaseOut => Some(CubicBezier::new(0.0, 0.0, 0.58, 1.0)),
            Self::EaseInOut => Some(CubicBezier::new(0.42, 0.0, 0.58, 1.0)),
            Self::CubicBezier(b) => Some(b),
        }
    }

    /// Map linear progress `t` to eased progress.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self.as_bezier() {
            None => t,
            Some(b) => b.solve(t),
        }
    }
}

impl fmt::Display for TimingCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linear => f.write_str("linear"),
            Self::Ease => f.write_str("ease"),
            Self::EaseIn => f.write_str("ease-in"),
            Self::EaseOut => f.write_str("ease-out"),
            Self::EaseInOut => f.write_str("ease-in-out"),
            Self::CubicBezier(b) => write!(f, "cubic-bezier({}, {}, {}, {})", b.x1, b.y1, b.x2, b.y2),
        }
    }
}

/// Control points of a unit cubic Bézier with fixed endpoints (0,0) and (1,1).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CubicBezier {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl CubicBezier {
    /// Create a curve. `x1`/`x2` are clamped to `[0, 1]` as CSS requires.
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self {
            x1: x1.clamp(0.0, 1.0),
            y1,
            x2: x2.clamp(0.0, 1.0),
            y2,
        }
    }

    fn sample(a1: f64, a2: f64, t: f64) -> f64 {
        // B(t) = 3(1-t)^2 t a1 + 3(1-t) t^2 a2 + t^3
        let inv = 1.0 - t;
        3.0 * inv * inv * t * a1 + 3.0 * inv * t * t * a2 + t * t * t
    }

    fn sample_dx(&self, t: f64) -> f64 {
        let inv = 1.0 - t;
        3.0 * inv * inv * self.x1 + 6.0 * inv * t * (self.x2 - self.x1) + 3.0 * t * t * (1.0 - self.x2)
    }

    /// Solve for the parameter whose x equals `x`, then return its y.
    pub fn solve(&self, x: f64) -> f64 {
        let x = x.clamp(0.0, 1.0);
        if x == 0.0 || x == 1.0 {
            return x;
        }

        // Newton-Raphson first; fall back to bisection when the slope is flat.
        let mut t = x;
        for _ in 0..8 {
            let err = Self::sample(self.x1, self.x2, t) - x;
            if err.abs() < 1e-7 {
                return Self::sample(self.y1, self.y2, t);
            }
            let d = self.sample_dx(t);
            if d.abs() < 1e-6 {
                break;
            }
            t -= err / d;
        }

        let (mut lo, mut hi) = (0.0_f64, 1.0_f64);
        t = x;
        for _ in 0..64 {
            let cur = Self::sample(self.x1, self.x2, t);
            if (cur - x).abs() < 1e-7 {
                break;
            }
            if cur < x {
                lo = t;
            } else {
                hi = t;
            }
            t = (lo + hi) / 2.0;
        }
        Self::sample(self.y1, self.y2, t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_are_fixed() {
        for curve in [
            TimingCurve::Linear,
            TimingCurve::Ease,
            TimingCurve::EaseIn,
            TimingCurve::EaseOut,
            TimingCurve::EaseInOut,
            MORPH_IN_OUT,
            SNAP_OUT,
            STANDARD,
        ] {
            assert_eq!(curve.apply(0.0), 0.0, "{curve}");
            assert_eq!(curve.apply(1.0), 1.0, "{curve}");
        }
    }

    #[test]
    fn apply_clamps_input() {
        assert_eq!(TimingCurve::Linear.apply(-0.5), 0.0);
        assert_eq!(TimingCurve::Linear.apply(1.5), 1.0);
    }

    #[test]
    fn symmetric_curve_is_half_at_half() {
        let mid = MORPH_IN_OUT.apply(0.5);
        assert!((mid - 0.5).abs() < 1e-4, "got {mid}");
    }

    #[test]
    fn snap_out_front_loads_motion() {
        assert!(SNAP_OUT.apply(0.25) > 0.5);
    }

    #[test]
    fn curves_are_monotonic() {
        for curve in [MORPH_IN_OUT, SNAP_OUT, STANDARD, TimingCurve::Ease] {
            let mut prev = 0.0;
            for i in 0..=100 {
                let v = curve.apply(i as f64 / 100.0);
                assert!(v >= prev - 1e-6, "{curve} not monotonic at {i}");
                prev = v;
            }
        }
    }

    #[test]
    fn css_spelling() {
        assert_eq!(MORPH_IN_OUT.to_string(), "cubic-bezier(0.65, 0, 0.35, 1)");
        assert_eq!(TimingCurve::EaseInOut.to_string(), "ease-in-out");
    }

    #[test]
    fn bezier_new_clamps_x() {
        let b = CubicBezier::new(-1.0, 2.0, 3.0, -1.0);
        assert_eq!(b.x1, 0.0);
        assert_eq!(b.x2, 1.0);
        assert_eq!(b.y1, 2.0);
    }
}
