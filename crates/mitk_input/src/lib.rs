//! mitk_input - Device-level input vocabulary for the interaction engine
//!
//! This crate describes raw input events the way a render window reports them:
//! an event type, the button that changed, the button/modifier state and a key
//! code. It also carries the fixed table of symbolic constants that behavior
//! files use to name those values.

mod constants;
mod event;

pub use constants::{
    EVENT_CONSTANTS, UNKNOWN_CONSTANT, constant_name, lookup_constant, parse_int, resolve_constant,
};
pub use event::{ButtonState, EventType, InputEvent, Key, Point2D};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::event::{ButtonState, EventType, InputEvent, Key, Point2D};
}
