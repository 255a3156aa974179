//! Property values stored on nodes and edges

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Property value type
///
/// Timestamps are kept as Unix milliseconds so that visit intervals compare
/// without allocation; use [`PropertyValue::as_timestamp`] to get a
/// `DateTime<Utc>` back.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropertyValue {
    String(String),
    Integer(i64),
    DateTime(i64),
    Array(Vec<PropertyValue>),
    Null,
}

impl PropertyValue {
    pub fn is_null(&self) -> bool {
        matches!(self, PropertyValue::Null)
    }

    pub fn as_string(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            PropertyValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Raw milliseconds of a datetime value
    pub fn as_datetime(&self) -> Option<i64> {
        match self {
            PropertyValue::DateTime(ms) => Some(*ms),
            _ => None,
        }
    }

    /// Datetime value as a UTC timestamp
    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        self.as_datetime()
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
    }

    pub fn as_array(&self) -> Option<&Vec<PropertyValue>> {
        match self {
            PropertyValue::Array(arr) => Some(arr),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            PropertyValue::String(_) => "String",
            PropertyValue::Integer(_) => "Integer",
            PropertyValue::DateTime(_) => "DateTime",
            PropertyValue::Array(_) => "Array",
            PropertyValue::Null => "Null",
        }
    }

    /// JSON rendering used by record output
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            PropertyValue::String(s) => serde_json::Value::String(s.clone()),
            PropertyValue::Integer(i) => serde_json::Value::from(*i),
            PropertyValue::DateTime(_) => match self.as_timestamp() {
                Some(ts) => serde_json::Value::String(ts.to_rfc3339()),
                None => serde_json::Value::Null,
            },
            PropertyValue::Array(arr) => {
                serde_json::Value::Array(arr.iter().map(PropertyValue::to_json).collect())
            }
            PropertyValue::Null => serde_json::Value::Null,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::String(s) => write!(f, "{}", s),
            PropertyValue::Integer(i) => write!(f, "{}", i),
            PropertyValue::DateTime(ms) => match self.as_timestamp() {
                Some(ts) => write!(f, "{}", ts.to_rfc3339()),
                None => write!(f, "DateTime({})", ms),
            },
            PropertyValue::Array(arr) => {
                write!(f, "[")?;
                for (i, val) in arr.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", val)?;
                }
                write!(f, "]")
            }
            PropertyValue::Null => write!(f, "null"),
        }
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        PropertyValue::String(s)
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        PropertyValue::String(s.to_string())
    }
}

impl From<i64> for PropertyValue {
    fn from(i: i64) -> Self {
        PropertyValue::Integer(i)
    }
}

impl From<usize> for PropertyValue {
    fn from(i: usize) -> Self {
        PropertyValue::Integer(i as i64)
    }
}

impl From<DateTime<Utc>> for PropertyValue {
    fn from(ts: DateTime<Utc>) -> Self {
        PropertyValue::DateTime(ts.timestamp_millis())
    }
}

impl From<Vec<String>> for PropertyValue {
    fn from(items: Vec<String>) -> Self {
        PropertyValue::Array(items.into_iter().map(PropertyValue::String).collect())
    }
}

/// Property map for node and edge properties
pub type PropertyMap = HashMap<String, PropertyValue>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_roundtrip_through_millis() {
        let ts = Utc.with_ymd_and_hms(2021, 3, 14, 10, 30, 0).unwrap();
        let value: PropertyValue = ts.into();
        assert_eq!(value.type_name(), "DateTime");
        assert_eq!(value.as_timestamp(), Some(ts));
        assert_eq!(value.as_string(), None);
    }

    #[test]
    fn test_array_of_names_renders_as_json_list() {
        let value: PropertyValue = vec!["Alice".to_string(), "Bob".to_string()].into();
        assert_eq!(value.to_json(), serde_json::json!(["Alice", "Bob"]));
        assert_eq!(format!("{}", value), "[Alice, Bob]");
    }

    #[test]
    fn test_count_conversion() {
        let value: PropertyValue = 11usize.into();
        assert_eq!(value.as_integer(), Some(11));
        assert_eq!(value.to_json(), serde_json::json!(11));
    }
}
