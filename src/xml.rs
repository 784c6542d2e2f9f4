//! Shared helpers for reading behavior XML.
//!
//! Both the event mapper and the state machine factory read the same kind of
//! document: upper-case attribute names and integers that may be written in
//! decimal or `0x` hexadecimal.

use quick_xml::events::BytesStart;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::InteractionError;

/// Where a behavior description comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BehaviorSource {
    /// Read the document from a file
    File(PathBuf),
    /// Use the given string as the document
    Str(String),
}

impl BehaviorSource {
    pub fn file(path: impl AsRef<Path>) -> Self {
        Self::File(path.as_ref().to_path_buf())
    }

    pub fn string(xml: impl Into<String>) -> Self {
        Self::Str(xml.into())
    }

    /// Load the document text.
    pub fn read(&self) -> Result<String, InteractionError> {
        match self {
            Self::File(path) => {
                if !path.exists() {
                    return Err(InteractionError::FileNotFound { path: path.clone() });
                }
                Ok(std::fs::read_to_string(path)?)
            }
            Self::Str(xml) => Ok(xml.clone()),
        }
    }

    /// Short label for log output.
    pub fn describe(&self) -> String {
        match self {
            Self::File(path) => format!("{:?}", path),
            Self::Str(xml) => format!("<inline xml, {} bytes>", xml.len()),
        }
    }
}

/// Local name of an element as an owned string.
pub(crate) fn element_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.name().as_ref()).to_string()
}

/// Attributes of one element, keyed by upper-case name.
#[derive(Debug, Clone, Default)]
pub(crate) struct Attributes {
    element: String,
    values: HashMap<String, String>,
}

impl Attributes {
    pub(crate) fn parse(e: &BytesStart<'_>) -> Result<Self, InteractionError> {
        let mut values = HashMap::new();
        for attr in e.attributes() {
            let attr = attr?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).to_ascii_uppercase();
            let value = attr.unescape_value()?.to_string();
            values.insert(key, value);
        }
        Ok(Self {
            element: element_name(e),
            values,
        })
    }

    pub(crate) fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Attribute value or an empty string.
    pub(crate) fn string(&self, name: &str) -> String {
        self.get(name).unwrap_or_default().to_string()
    }

    /// Integer attribute in decimal or hex. Missing attributes are `Ok(None)`.
    pub(crate) fn int(&self, name: &str) -> Result<Option<i32>, InteractionError> {
        match self.get(name) {
            None => Ok(None),
            Some(raw) => mitk_input::parse_int(raw)
                .map(Some)
                .ok_or_else(|| InteractionError::invalid_attribute(&self.element, name, raw)),
        }
    }

    /// Integer attribute, falling back to `default` with a warning when the
    /// value cannot be parsed.
    pub(crate) fn int_or(&self, name: &str, default: i32) -> i32 {
        match self.int(name) {
            Ok(value) => value.unwrap_or(default),
            Err(e) => {
                log::warn!("{}; using {}", e, default);
                default
            }
        }
    }

    /// Boolean attribute (`TRUE`, `true` or `1`).
    pub(crate) fn flag(&self, name: &str) -> bool {
        self.get(name).is_some_and(parse_bool)
    }
}

pub(crate) fn parse_bool(raw: &str) -> bool {
    matches!(raw.trim(), "TRUE" | "true" | "True" | "1")
}
