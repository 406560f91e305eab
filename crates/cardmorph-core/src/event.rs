#![forbid(unsafe_code)]

//! Canonical input/event types.
//!
//! These are the events a host forwards to a mounted morph: key presses
//! (for Escape-to-close), pointer presses already hit-tested against the
//! overlay's layers, and viewport resizes.
//!
//! # Design Notes
//!
//! - Pointer coordinates are viewport pixels.
//! - Hit-testing happens in the host; a pointer event carries the
//!   [`HitTarget`] it landed on, mirroring an event whose target is the
//!   listening element itself versus one of its descendants.
//! - `Modifiers` use bitflags for easy combination.

use bitflags::bitflags;

use crate::geometry::Size;

/// Canonical input event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    /// A keyboard event.
    Key(KeyEvent),

    /// A pointer event.
    Pointer(PointerEvent),

    /// The viewport was resized.
    Resize {
        /// New viewport width in pixels.
        width: f64,
        /// New viewport height in pixels.
        height: f64,
    },
}

impl Event {
    /// Shorthand for a plain Escape key press.
    #[must_use]
    pub const fn escape() -> Self {
        Self::Key(KeyEvent::new(KeyCode::Escape))
    }

    /// Shorthand for a primary-button press on `target`.
    #[must_use]
    pub const fn click(target: HitTarget) -> Self {
        Self::Pointer(PointerEvent::new(
            PointerEventKind::Down(PointerButton::Primary),
            target,
        ))
    }

    /// Shorthand for a resize to `size`.
    #[must_use]
    pub const fn resize(size: Size) -> Self {
        Self::Resize {
            width: size.width,
            height: size.height,
        }
    }

    /// Which listener category receives this event.
    #[must_use]
    pub const fn listener_kind(&self) -> ListenerKind {
        match self {
            Self::Key(_) => ListenerKind::KeyDown,
            Self::Pointer(_) => ListenerKind::PointerDown,
            Self::Resize { .. } => ListenerKind::Resize,
        }
    }
}

/// Global listener categories a morph may install.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ListenerKind {
    /// Window `keydown`.
    KeyDown,
    /// Window `resize`.
    Resize,
    /// Pointer presses on the overlay.
    PointerDown,
}

/// A keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// The key code that was pressed.
    pub code: KeyCode,

    /// Modifier keys held during the event.
    pub modifiers: Modifiers,

    /// The type of key event (press, repeat, or release).
    pub kind: KeyEventKind,
}

impl KeyEvent {
    /// Create a new key event with default modifiers and Press kind.
    #[must_use]
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::NONE,
            kind: KeyEventKind::Press,
        }
    }

    /// Create a key event with modifiers.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Create a key event with a specific kind.
    #[must_use]
    pub const fn with_kind(mut self, kind: KeyEventKind) -> Self {
        self.kind = kind;
        self
    }

    /// Whether this is an Escape press (not a repeat or release).
    #[must_use]
    pub const fn is_escape_press(&self) -> bool {
        matches!(self.code, KeyCode::Escape) && matches!(self.kind, KeyEventKind::Press)
    }
}

/// Key codes for keyboard events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A regular character key.
    Char(char),
    /// Enter/Return key.
    Enter,
    /// Escape key.
    Escape,
    /// Tab key.
    Tab,
    /// Space bar.
    Space,
}

/// The type of key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyEventKind {
    /// Key was pressed.
    #[default]
    Press,
    /// Key is being held (repeat event).
    Repeat,
    /// Key was released.
    Release,
}

bitflags! {
    /// Modifier keys that can be held during an event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// No modifiers.
        const NONE  = 0b0000;
        /// Shift key.
        const SHIFT = 0b0001;
        /// Alt/Option key.
        const ALT   = 0b0010;
        /// Control key.
        const CTRL  = 0b0100;
        /// Super/Meta/Command key.
        const SUPER = 0b1000;
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::NONE
    }
}

/// Which overlay layer a pointer event landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HitTarget {
    /// The dimmed scrim itself, not any element above it.
    Backdrop,
    /// The morphing surface or any of its descendants.
    Surface,
    /// The close control inside the expanded content.
    CloseButton,
}

/// A pointer event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// The type of pointer event.
    pub kind: PointerEventKind,
    /// Hit-tested target.
    pub target: HitTarget,
    /// Modifier keys held during the event.
    pub modifiers: Modifiers,
}

impl PointerEvent {
    /// Create a new pointer event.
    #[must_use]
    pub const fn new(kind: PointerEventKind, target: HitTarget) -> Self {
        Self {
            kind,
            target,
            modifiers: Modifiers::NONE,
        }
    }

    /// Whether this is a primary-button press.
    #[must_use]
    pub const fn is_primary_down(&self) -> bool {
        matches!(self.kind, PointerEventKind::Down(PointerButton::Primary))
    }
}

/// The type of pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerEventKind {
    /// Button pressed down.
    Down(PointerButton),
    /// Button released.
    Up(PointerButton),
    /// Pointer moved.
    Moved,
}

/// Pointer button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_shorthand_is_press() {
        let Event::Key(key) = Event::escape() else {
            panic!("expected key event");
        };
        assert!(key.is_escape_press());
        assert!(!key.with_kind(KeyEventKind::Release).is_escape_press());
    }

    #[test]
    fn click_is_primary_down() {
        let Event::Pointer(p) = Event::click(HitTarget::Backdrop) else {
            panic!("expected pointer event");
        };
        assert!(p.is_primary_down());
        assert_eq!(p.target, HitTarget::Backdrop);
    }

    #[test]
    fn listener_kinds() {
        assert_eq!(Event::escape().listener_kind(), ListenerKind::KeyDown);
        assert_eq!(
            Event::resize(Size::new(10.0, 10.0)).listener_kind(),
            ListenerKind::Resize
        );
        assert_eq!(
            Event::click(HitTarget::Surface).listener_kind(),
            ListenerKind::PointerDown
        );
    }

    #[test]
    fn modifiers_combine() {
        let key = KeyEvent::new(KeyCode::Char('w')).with_modifiers(Modifiers::CTRL | Modifiers::SHIFT);
        assert!(key.modifiers.contains(Modifiers::CTRL));
        assert!(!key.modifiers.contains(Modifiers::ALT));
    }
}
