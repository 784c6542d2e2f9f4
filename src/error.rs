//! Error types for loading behavior descriptions.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading or initializing the interaction engine.
///
/// Only load paths return these. Event dispatch reports misses through `bool`
/// and `Option` so that one misbehaving state machine cannot abort the
/// dispatch of an event.
#[derive(Error, Debug)]
pub enum InteractionError {
    /// I/O error while reading a behavior file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// XML syntax error
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Behavior file could not be found
    #[error("Behavior file not found: {path:?}")]
    FileNotFound {
        /// Path that was requested
        path: PathBuf,
    },

    /// An attribute value could not be interpreted
    #[error("Invalid value '{value}' for attribute {attribute} on <{element}>")]
    InvalidAttribute {
        /// Element carrying the attribute
        element: String,
        /// Attribute name
        attribute: String,
        /// Raw attribute value
        value: String,
    },

    /// A state-machine pattern was requested that was never loaded
    #[error("Unknown state machine pattern: {name}")]
    UnknownPattern {
        /// Name of the requested pattern
        name: String,
    },

    /// Dispatch was attempted before initialization (or after shutdown)
    #[error("Global interaction is not initialized")]
    NotInitialized,
}

impl InteractionError {
    /// Create an invalid attribute error.
    pub fn invalid_attribute(element: &str, attribute: &str, value: &str) -> Self {
        Self::InvalidAttribute {
            element: element.to_string(),
            attribute: attribute.to_string(),
            value: value.to_string(),
        }
    }

    /// Create an unknown pattern error.
    pub fn unknown_pattern(name: impl Into<String>) -> Self {
        Self::UnknownPattern { name: name.into() }
    }
}

impl From<quick_xml::events::attributes::AttrError> for InteractionError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Self::Xml(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_attribute_message() {
        let err = InteractionError::invalid_attribute("state", "ID", "abc");
        assert_eq!(
            err.to_string(),
            "Invalid value 'abc' for attribute ID on <state>"
        );
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: InteractionError = io.into();
        assert!(matches!(err, InteractionError::Io(_)));
    }
}
