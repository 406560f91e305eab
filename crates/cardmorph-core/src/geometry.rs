#![forbid(unsafe_code)]

//! Geometric primitives in viewport pixels.
//!
//! All coordinates are CSS pixels relative to the viewport origin (top-left),
//! which is what a bounding-client-rect snapshot reports. Values are `f64`
//! so a rectangle can be carried from capture to interpolation without
//! rounding.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in viewport pixels.
///
/// Used for the captured source rectangle of a morph and for every
/// geometry derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rect {
    /// Top edge.
    pub top: f64,
    /// Left edge.
    pub left: f64,
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl Rect {
    /// The zero-sized rectangle at the origin.
    pub const ZERO: Rect = Rect::new(0.0, 0.0, 0.0, 0.0);

    /// Create a new rectangle.
    #[inline]
    pub const fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }

    /// Create a rectangle at the origin with the given size.
    #[inline]
    pub const fn from_size(size: Size) -> Self {
        Self::new(0.0, 0.0, size.width, size.height)
    }

    /// Right edge (exclusive).
    #[inline]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Horizontal center.
    #[inline]
    pub fn center_x(&self) -> f64 {
        self.left + self.width / 2.0
    }

    /// Vertical center.
    #[inline]
    pub fn center_y(&self) -> f64 {
        self.top + self.height / 2.0
    }

    /// Size of the rectangle.
    #[inline]
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Check if the rectangle has zero area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Check if a point is inside the rectangle.
    #[inline]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.left && x < self.right() && y >= self.top && y < self.bottom()
    }

    /// Replace non-finite coordinates with zero and negative extents with an
    /// empty extent.
    ///
    /// A triggering element that has not been laid out yet reports garbage
    /// or zeros; the morph treats that as a point origin instead of failing.
    #[must_use]
    pub fn sanitized(self) -> Self {
        fn finite(v: f64) -> f64 {
            if v.is_finite() { v } else { 0.0 }
        }
        Self {
            top: finite(self.top),
            left: finite(self.left),
            width: finite(self.width).max(0.0),
            height: finite(self.height).max(0.0),
        }
    }

    /// Rectangle of `size` centered in a viewport of `viewport` size.
    #[must_use]
    pub fn centered(viewport: Size, size: Size) -> Self {
        Self::new(
            (viewport.height - size.height) / 2.0,
            (viewport.width - size.width) / 2.0,
            size.width,
            size.height,
        )
    }

    /// Rectangle of `width` keeping this rectangle's horizontal center.
    #[must_use]
    pub fn with_width_about_center(&self, width: f64) -> Self {
        Self::new(self.top, self.center_x() - width / 2.0, width, self.height)
    }

    /// Shift the rectangle so it lies inside `bounds` where possible.
    ///
    /// A rectangle larger than `bounds` on an axis is pinned to the
    /// bound's leading edge on that axis; its size is never changed.
    #[must_use]
    pub fn shifted_within(&self, bounds: Rect) -> Self {
        let max_left = bounds.right() - self.width;
        let max_top = bounds.bottom() - self.height;
        let left = if max_left < bounds.left {
            bounds.left
        } else {
            self.left.clamp(bounds.left, max_left)
        };
        let top = if max_top < bounds.top {
            bounds.top
        } else {
            self.top.clamp(bounds.top, max_top)
        };
        Self::new(top, left, self.width, self.height)
    }

    /// Create a new rectangle inside the current one with the given margin.
    #[must_use]
    pub fn inner(&self, margin: Sides) -> Rect {
        Rect {
            top: self.top + margin.top,
            left: self.left + margin.left,
            width: (self.width - margin.horizontal_sum()).max(0.0),
            height: (self.height - margin.vertical_sum()).max(0.0),
        }
    }
}

/// A width/height pair in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Size {
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl Size {
    /// A zero-sized value.
    pub const ZERO: Size = Size::new(0.0, 0.0);

    /// Create a new size.
    #[inline]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Check if the size has zero area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Size remaining after removing `margin` from each edge, never negative.
    #[must_use]
    pub fn shrink(&self, margin: Sides) -> Size {
        Size::new(
            (self.width - margin.horizontal_sum()).max(0.0),
            (self.height - margin.vertical_sum()).max(0.0),
        )
    }

    /// Component-wise minimum.
    #[must_use]
    pub fn min(&self, other: Size) -> Size {
        Size::new(self.width.min(other.width), self.height.min(other.height))
    }
}

/// Edge offsets (top, right, bottom, left) in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Sides {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Sides {
    /// The same offset on all four edges.
    pub const fn all(val: f64) -> Self {
        Self {
            top: val,
            right: val,
            bottom: val,
            left: val,
        }
    }

    /// Vertical offsets on top/bottom, horizontal offsets on left/right.
    pub const fn symmetric(vertical: f64, horizontal: f64) -> Self {
        Self {
            top: vertical,
            right: horizontal,
            bottom: vertical,
            left: horizontal,
        }
    }

    /// Sum of left and right.
    pub fn horizontal_sum(&self) -> f64 {
        self.left + self.right
    }

    /// Sum of top and bottom.
    pub fn vertical_sum(&self) -> f64 {
        self.top + self.bottom
    }
}

impl From<f64> for Sides {
    fn from(val: f64) -> Self {
        Self::all(val)
    }
}

impl From<(f64, f64)> for Sides {
    fn from((vertical, horizontal): (f64, f64)) -> Self {
        Self::symmetric(vertical, horizontal)
    }
}

#[cfg(test)]
mod tests {
    use super::{Rect, Sides, Size};

    #[test]
    fn rect_contains_edges() {
        let rect = Rect::new(3.0, 2.0, 4.0, 5.0);
        assert!(rect.contains(2.0, 3.0));
        assert!(rect.contains(5.5, 7.5));
        assert!(!rect.contains(6.0, 3.0));
        assert!(!rect.contains(2.0, 8.0));
    }

    #[test]
    fn centered_places_size_in_middle() {
        let rect = Rect::centered(Size::new(1200.0, 800.0), Size::new(900.0, 600.0));
        assert_eq!(rect, Rect::new(100.0, 150.0, 900.0, 600.0));
    }

    #[test]
    fn sanitized_replaces_garbage() {
        let rect = Rect::new(f64::NAN, 10.0, -4.0, f64::INFINITY).sanitized();
        assert_eq!(rect, Rect::new(0.0, 10.0, 0.0, 0.0));
        assert!(rect.is_empty());
    }

    #[test]
    fn sanitized_is_identity_for_valid_rects() {
        let rect = Rect::new(100.0, 50.0, 200.0, 150.0);
        assert_eq!(rect.sanitized(), rect);
    }

    #[test]
    fn shifted_within_clamps_position_only() {
        let bounds = Rect::new(10.0, 10.0, 100.0, 100.0);
        let rect = Rect::new(0.0, 90.0, 40.0, 20.0).shifted_within(bounds);
        assert_eq!(rect, Rect::new(10.0, 70.0, 40.0, 20.0));

        let oversized = Rect::new(50.0, 50.0, 300.0, 20.0).shifted_within(bounds);
        assert_eq!(oversized.left, 10.0);
        assert_eq!(oversized.width, 300.0);
    }

    #[test]
    fn width_about_center_keeps_center() {
        let rect = Rect::new(0.0, 100.0, 200.0, 50.0);
        let wide = rect.with_width_about_center(300.0);
        assert_eq!(wide.center_x(), rect.center_x());
        assert_eq!(wide.width, 300.0);
    }

    #[test]
    fn inner_and_shrink_never_negative() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        let inner = rect.inner(Sides::all(8.0));
        assert_eq!(inner.width, 0.0);
        assert_eq!(inner.height, 0.0);
        assert_eq!(Size::new(10.0, 4.0).shrink(Sides::from((1.0, 2.0))), Size::new(6.0, 2.0));
    }

    #[test]
    fn sides_sums() {
        let sides = Sides {
            top: 1.0,
            right: 2.0,
            bottom: 3.0,
            left: 4.0,
        };
        assert_eq!(sides.horizontal_sum(), 6.0);
        assert_eq!(sides.vertical_sum(), 4.0);
    }
}
