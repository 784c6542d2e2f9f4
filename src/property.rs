//! Typed action parameters.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Value of one action parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PropertyValue {
    Bool(bool),
    Int(i32),
    Float(f32),
    Double(f64),
    String(String),
}

impl PropertyValue {
    /// Parse a parameter element (`boolParameter`, `intParameter`, ...).
    ///
    /// Returns `None` for unknown element names or unparsable values.
    pub fn parse(element: &str, raw: &str) -> Option<Self> {
        let raw_trimmed = raw.trim();
        match element {
            "boolParameter" => Some(Self::Bool(crate::xml::parse_bool(raw_trimmed))),
            "intParameter" => mitk_input::parse_int(raw_trimmed).map(Self::Int),
            "floatParameter" => raw_trimmed.parse().ok().map(Self::Float),
            "doubleParameter" => raw_trimmed.parse().ok().map(Self::Double),
            "stringParameter" => Some(Self::String(raw.to_string())),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Numeric value widened to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(v) => Some(f64::from(*v)),
            Self::Float(v) => Some(f64::from(*v)),
            Self::Double(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }
}

/// Named parameters attached to an action.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyList {
    values: BTreeMap<String, PropertyValue>,
}

impl PropertyList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: impl Into<String>, value: PropertyValue) {
        self.values.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.values.get(name)
    }

    pub fn get_int(&self, name: &str) -> Option<i32> {
        self.get(name)?.as_int()
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name)?.as_bool()
    }

    pub fn get_f64(&self, name: &str) -> Option<f64> {
        self.get(name)?.as_f64()
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name)?.as_str()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_each_kind() {
        assert_eq!(
            PropertyValue::parse("boolParameter", "TRUE"),
            Some(PropertyValue::Bool(true))
        );
        assert_eq!(
            PropertyValue::parse("intParameter", "0x10"),
            Some(PropertyValue::Int(16))
        );
        assert_eq!(
            PropertyValue::parse("floatParameter", "1.5"),
            Some(PropertyValue::Float(1.5))
        );
        assert_eq!(
            PropertyValue::parse("doubleParameter", "-2.25"),
            Some(PropertyValue::Double(-2.25))
        );
        assert_eq!(
            PropertyValue::parse("stringParameter", "hello"),
            Some(PropertyValue::String("hello".into()))
        );
        assert_eq!(PropertyValue::parse("intParameter", "five"), None);
        assert_eq!(PropertyValue::parse("colorParameter", "red"), None);
    }

    #[test]
    fn test_typed_lookup() {
        let mut list = PropertyList::new();
        list.set("DIRECTION_X", PropertyValue::Int(5));
        list.set("FACTOR", PropertyValue::Float(0.5));
        assert_eq!(list.get_int("DIRECTION_X"), Some(5));
        assert_eq!(list.get_f64("DIRECTION_X"), Some(5.0));
        assert_eq!(list.get_f64("FACTOR"), Some(0.5));
        assert_eq!(list.get_bool("DIRECTION_X"), None);
        assert_eq!(list.len(), 2);
    }
}
