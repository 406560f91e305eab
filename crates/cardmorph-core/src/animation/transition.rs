#![forbid(unsafe_code)]

//! Transition descriptors: which properties travel, for how long, on which
//! curve.
//!
//! A [`TransitionSpec`] formats to a CSS `transition` value, e.g.
//! `top 450ms cubic-bezier(0.65, 0, 0.35, 1), left 450ms ...`. The empty
//! spec formats to `none`, which renderers use to snap to a geometry
//! without animating (the first paint at the source rectangle).

use std::fmt;

use bitflags::bitflags;
use web_time::Duration;

use super::TimingCurve;

bitflags! {
    /// Animatable style properties.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TransitionProperty: u16 {
        const TOP              = 1 << 0;
        const LEFT             = 1 << 1;
        const WIDTH            = 1 << 2;
        const HEIGHT           = 1 << 3;
        const TRANSFORM        = 1 << 4;
        const BOX_SHADOW       = 1 << 5;
        const OPACITY          = 1 << 6;
        const BORDER_RADIUS    = 1 << 7;
        const BACKGROUND_COLOR = 1 << 8;
        /// CSS `all`. Formats alone, ignoring any other bits.
        const ALL              = 1 << 15;

        /// Position and size.
        const GEOMETRY = Self::TOP.bits() | Self::LEFT.bits() | Self::WIDTH.bits() | Self::HEIGHT.bits();
    }
}

impl TransitionProperty {
    const NAMES: [(TransitionProperty, &'static str); 9] = [
        (Self::TOP, "top"),
        (Self::LEFT, "left"),
        (Self::WIDTH, "width"),
        (Self::HEIGHT, "height"),
        (Self::TRANSFORM, "transform"),
        (Self::BOX_SHADOW, "box-shadow"),
        (Self::OPACITY, "opacity"),
        (Self::BORDER_RADIUS, "border-radius"),
        (Self::BACKGROUND_COLOR, "background-color"),
    ];

    /// CSS property names in declaration order.
    pub fn css_names(self) -> Vec<&'static str> {
        if self.contains(Self::ALL) {
            return vec!["all"];
        }
        Self::NAMES
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect()
    }
}

/// One transition group sharing duration, curve, and delay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub properties: TransitionProperty,
    pub duration: Duration,
    pub curve: TimingCurve,
    pub delay: Duration,
}

impl Transition {
    /// Create a transition with no delay.
    pub const fn new(properties: TransitionProperty, duration: Duration, curve: TimingCurve) -> Self {
        Self {
            properties,
            duration,
            curve,
            delay: Duration::ZERO,
        }
    }

    /// Set the delay.
    #[must_use]
    pub const fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Delay plus duration.
    pub fn end(&self) -> Duration {
        self.delay + self.duration
    }
}

/// An ordered list of transitions; empty means `none`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TransitionSpec {
    transitions: Vec<Transition>,
}

impl TransitionSpec {
    /// No transition: changes apply immediately.
    pub const fn none() -> Self {
        Self {
            transitions: Vec::new(),
        }
    }

    /// A spec with a single transition group.
    pub fn single(transition: Transition) -> Self {
        Self {
            transitions: vec![transition],
        }
    }

    /// Append another transition group (builder pattern).
    #[must_use]
    pub fn then(mut self, transition: Transition) -> Self {
        self.transitions.push(transition);
        self
    }

    /// Whether this is `none`.
    pub fn is_none(&self) -> bool {
        self.transitions.is_empty()
    }

    /// The transition groups.
    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// Latest end time among groups that animate any of `properties`.
    pub fn settles_after(&self, properties: TransitionProperty) -> Duration {
        self.transitions
            .iter()
            .filter(|t| t.properties.contains(TransitionProperty::ALL) || t.properties.intersects(properties))
            .map(Transition::end)
            .max()
            .unwrap_or(Duration::ZERO)
    }
}

impl fmt::Display for TransitionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.transitions.is_empty() {
            return f.write_str("none");
        }
        let mut first = true;
        for t in &self.transitions {
            for name in t.properties.css_names() {
                if !first {
                    f.write_str(", ")?;
                }
                first = false;
                write!(f, "{name} {}ms {}", t.duration.as_millis(), t.curve)?;
                if !t.delay.is_zero() {
                    write!(f, " {}ms", t.delay.as_millis())?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::MORPH_IN_OUT;

    #[test]
    fn none_formats_as_none() {
        assert_eq!(TransitionSpec::none().to_string(), "none");
        assert!(TransitionSpec::default().is_none());
    }

    #[test]
    fn formats_each_property() {
        let spec = TransitionSpec::single(Transition::new(
            TransitionProperty::TRANSFORM | TransitionProperty::BOX_SHADOW,
            Duration::from_millis(300),
            MORPH_IN_OUT,
        ))
        .then(Transition::new(
            TransitionProperty::BACKGROUND_COLOR,
            Duration::from_millis(500),
            TimingCurve::Ease,
        ));
        assert_eq!(
            spec.to_string(),
            "transform 300ms cubic-bezier(0.65, 0, 0.35, 1), \
             box-shadow 300ms cubic-bezier(0.65, 0, 0.35, 1), \
             background-color 500ms ease"
        );
    }

    #[test]
    fn all_overrides_other_bits() {
        let names = (TransitionProperty::ALL | TransitionProperty::TOP).css_names();
        assert_eq!(names, vec!["all"]);
    }

    #[test]
    fn delay_is_formatted() {
        let spec = TransitionSpec::single(
            Transition::new(TransitionProperty::OPACITY, Duration::from_millis(270), TimingCurve::EaseOut)
                .delay(Duration::from_millis(150)),
        );
        assert_eq!(spec.to_string(), "opacity 270ms ease-out 150ms");
    }

    #[test]
    fn settles_after_considers_matching_groups() {
        let spec = TransitionSpec::single(Transition::new(
            TransitionProperty::GEOMETRY,
            Duration::from_millis(450),
            MORPH_IN_OUT,
        ))
        .then(Transition::new(
            TransitionProperty::BACKGROUND_COLOR,
            Duration::from_millis(500),
            TimingCurve::Ease,
        ));
        assert_eq!(spec.settles_after(TransitionProperty::WIDTH), Duration::from_millis(450));
        assert_eq!(spec.settles_after(TransitionProperty::OPACITY), Duration::ZERO);
    }
}
