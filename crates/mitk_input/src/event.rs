//! Raw input events.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{UNKNOWN_CONSTANT, constant_name};

/// A 2D display position in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance(&self, other: &Point2D) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

// ============================================================================
// Event Type
// ============================================================================

/// Numeric event type (`Type_*` constants).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct EventType(pub i32);

impl EventType {
    pub const NONE: Self = Self(0);
    pub const TIMER: Self = Self(1);
    pub const MOUSE_BUTTON_PRESS: Self = Self(2);
    pub const MOUSE_BUTTON_RELEASE: Self = Self(3);
    pub const MOUSE_BUTTON_DBL_CLICK: Self = Self(4);
    pub const MOUSE_MOVE: Self = Self(5);
    pub const KEY_PRESS: Self = Self(6);
    pub const KEY_RELEASE: Self = Self(7);
    pub const WHEEL: Self = Self(31);
    /// First id available for application-defined events.
    pub const USER: Self = Self(1000);
    pub const TD_MOUSE_INPUT: Self = Self(1094);
    pub const TD_MOUSE_KEY_DOWN: Self = Self(1095);
    pub const MAX_USER: Self = Self(65535);
    /// Type of a description whose `TYPE` attribute named an unknown constant.
    pub const UNKNOWN: Self = Self(UNKNOWN_CONSTANT);

    /// Whether this is one of the mouse button/move event types.
    pub fn is_mouse(&self) -> bool {
        matches!(
            *self,
            Self::MOUSE_BUTTON_PRESS
                | Self::MOUSE_BUTTON_RELEASE
                | Self::MOUSE_BUTTON_DBL_CLICK
                | Self::MOUSE_MOVE
                | Self::WHEEL
        )
    }

    /// Whether this is a key press or release.
    pub fn is_key(&self) -> bool {
        matches!(*self, Self::KEY_PRESS | Self::KEY_RELEASE)
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match constant_name("Type_", self.0) {
            Some(name) => f.write_str(name),
            None => write!(f, "Type({})", self.0),
        }
    }
}

// ============================================================================
// Button State
// ============================================================================

bitflags::bitflags! {
    /// Mouse button and keyboard modifier state (`BS_*` constants).
    ///
    /// Used both for the button that triggered an event and for the state of
    /// all buttons and modifiers at the time of the event.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct ButtonState: u32 {
        const LEFT_BUTTON = 0x0001;
        const RIGHT_BUTTON = 0x0002;
        const MID_BUTTON = 0x0004;
        const MOUSE_BUTTON_MASK = 0x0007;
        const SHIFT = 0x0100;
        const CONTROL = 0x0200;
        const ALT = 0x0400;
        const META = 0x0800;
        const KEY_BUTTON_MASK = 0x0f00;
        const KEYPAD = 0x4000;
    }
}

impl ButtonState {
    /// No button and no modifier (`BS_NoButton`).
    pub const NO_BUTTON: Self = Self::empty();

    /// Build from a raw value read from a behavior file.
    ///
    /// Unknown bits are kept so that a value of `-1` never compares equal to a
    /// real device state.
    pub fn from_raw(value: i32) -> Self {
        Self::from_bits_retain(value as u32)
    }

    /// The raw value as stored in behavior files.
    pub fn raw(&self) -> i32 {
        self.bits() as i32
    }

    /// Only the mouse button bits.
    pub fn mouse_buttons(&self) -> Self {
        *self & Self::MOUSE_BUTTON_MASK
    }

    /// Only the keyboard modifier bits.
    pub fn modifiers(&self) -> Self {
        *self & Self::KEY_BUTTON_MASK
    }
}

// ============================================================================
// Key
// ============================================================================

/// Key code (`Key_*` constants).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Key(pub i32);

impl Key {
    pub const ESCAPE: Self = Self(0x1000);
    pub const TAB: Self = Self(0x1001);
    pub const BACKSPACE: Self = Self(0x1003);
    pub const RETURN: Self = Self(0x1004);
    pub const ENTER: Self = Self(0x1005);
    pub const INSERT: Self = Self(0x1006);
    pub const DELETE: Self = Self(0x1007);
    pub const HOME: Self = Self(0x1010);
    pub const END: Self = Self(0x1011);
    pub const LEFT: Self = Self(0x1012);
    pub const UP: Self = Self(0x1013);
    pub const RIGHT: Self = Self(0x1014);
    pub const DOWN: Self = Self(0x1015);
    pub const PAGE_UP: Self = Self(0x1016);
    pub const PAGE_DOWN: Self = Self(0x1017);
    pub const SHIFT: Self = Self(0x1020);
    pub const CONTROL: Self = Self(0x1021);
    pub const ALT: Self = Self(0x1023);
    pub const SPACE: Self = Self(0x20);
    /// No key involved (`Key_none`); used by mouse events.
    pub const NONE: Self = Self(0xffff);

    /// Key code of an ASCII letter or digit, as used by `Key_A`..`Key_Z` and
    /// `Key_0`..`Key_9`.
    pub fn from_char(c: char) -> Option<Self> {
        let c = c.to_ascii_uppercase();
        if c.is_ascii_uppercase() || c.is_ascii_digit() {
            Some(Self(c as i32))
        } else {
            None
        }
    }
}

impl Default for Key {
    fn default() -> Self {
        Self::NONE
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match constant_name("Key_", self.0) {
            Some(name) => f.write_str(name),
            None => write!(f, "Key({:#x})", self.0),
        }
    }
}

// ============================================================================
// Input Event
// ============================================================================

/// A raw device event as reported by a render window.
///
/// `button` is the button that caused the event (empty for moves and keys),
/// `button_state` is the state of all buttons and modifiers *before* the event.
/// Mouse events carry a display position; key events do not.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InputEvent {
    pub event_type: EventType,
    pub button: ButtonState,
    pub button_state: ButtonState,
    pub key: Key,
    pub display_position: Option<Point2D>,
    /// Wheel steps, positive away from the user. 0 for everything but wheel events.
    #[serde(default)]
    pub wheel_delta: i32,
}

impl InputEvent {
    pub fn new(
        event_type: EventType,
        button: ButtonState,
        button_state: ButtonState,
        key: Key,
        display_position: Option<Point2D>,
    ) -> Self {
        Self {
            event_type,
            button,
            button_state,
            key,
            display_position,
            wheel_delta: 0,
        }
    }

    /// Mouse button pressed at `position`.
    pub fn mouse_press(button: ButtonState, modifiers: ButtonState, position: Point2D) -> Self {
        Self::new(
            EventType::MOUSE_BUTTON_PRESS,
            button,
            modifiers,
            Key::NONE,
            Some(position),
        )
    }

    /// Mouse button released at `position`. `state` still contains the button.
    pub fn mouse_release(button: ButtonState, state: ButtonState, position: Point2D) -> Self {
        Self::new(
            EventType::MOUSE_BUTTON_RELEASE,
            button,
            state,
            Key::NONE,
            Some(position),
        )
    }

    /// Mouse moved to `position` with `state` held.
    pub fn mouse_move(state: ButtonState, position: Point2D) -> Self {
        Self::new(
            EventType::MOUSE_MOVE,
            ButtonState::NO_BUTTON,
            state,
            Key::NONE,
            Some(position),
        )
    }

    /// Mouse wheel turned by `delta` steps at `position`.
    pub fn wheel(delta: i32, state: ButtonState, position: Point2D) -> Self {
        Self {
            wheel_delta: delta,
            ..Self::new(
                EventType::WHEEL,
                ButtonState::NO_BUTTON,
                state,
                Key::NONE,
                Some(position),
            )
        }
    }

    /// Key pressed with the given modifiers.
    pub fn key_press(key: Key, modifiers: ButtonState) -> Self {
        Self::new(
            EventType::KEY_PRESS,
            ButtonState::NO_BUTTON,
            modifiers,
            key,
            None,
        )
    }

    /// Key released with the given modifiers.
    pub fn key_release(key: Key, modifiers: ButtonState) -> Self {
        Self::new(
            EventType::KEY_RELEASE,
            ButtonState::NO_BUTTON,
            modifiers,
            key,
            None,
        )
    }

    /// Whether the event carries a display position.
    pub fn is_positional(&self) -> bool {
        self.display_position.is_some()
    }
}
