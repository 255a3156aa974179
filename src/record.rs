//! Named-field result rows
//!
//! Callers key result fields by name (`sickName`, `nbHealthy`, ...), never by
//! position, so a [`Record`] is an ordered map from field name to value.

use crate::graph::PropertyValue;
use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// A single result row
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    bindings: IndexMap<String, PropertyValue>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a field to a value, keeping first-bind column order
    pub fn bind(&mut self, field: impl Into<String>, value: impl Into<PropertyValue>) {
        self.bindings.insert(field.into(), value.into());
    }

    /// Builder form of [`Record::bind`]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.bind(field, value);
        self
    }

    pub fn get(&self, field: &str) -> Option<&PropertyValue> {
        self.bindings.get(field)
    }

    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(PropertyValue::as_string)
    }

    pub fn get_int(&self, field: &str) -> Option<i64> {
        self.get(field).and_then(PropertyValue::as_integer)
    }

    /// String list field, e.g. `peopleToInform`
    pub fn get_str_list(&self, field: &str) -> Option<Vec<&str>> {
        self.get(field)?
            .as_array()?
            .iter()
            .map(PropertyValue::as_string)
            .collect()
    }

    pub fn has(&self, field: &str) -> bool {
        self.bindings.contains_key(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> + '_ {
        self.bindings.keys().map(String::as_str)
    }

    pub fn bindings(&self) -> &IndexMap<String, PropertyValue> {
        &self.bindings
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.bindings
                .iter()
                .map(|(k, v)| (k.clone(), v.to_json()))
                .collect(),
        )
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.bindings.len()))?;
        for (k, v) in &self.bindings {
            map.serialize_entry(k, &v.to_json())?;
        }
        map.end()
    }
}

/// Typed rows convertible into named-field records
pub trait ToRecord {
    /// Field names in output order
    fn columns() -> &'static [&'static str];

    fn to_record(&self) -> Record;
}

/// A result set
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct RecordBatch {
    pub columns: Vec<String>,
    pub records: Vec<Record>,
}

impl RecordBatch {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            records: Vec::new(),
        }
    }

    /// Batch of typed rows with the row type's columns
    pub fn from_rows<T: ToRecord>(rows: &[T]) -> Self {
        Self {
            columns: T::columns().iter().map(|c| c.to_string()).collect(),
            records: rows.iter().map(ToRecord::to_record).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn push(&mut self, record: Record) {
        self.records.push(record);
    }

    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    /// Every value of one string column, in row order
    pub fn column_strs(&self, field: &str) -> Vec<&str> {
        self.records.iter().filter_map(|r| r.get_str(field)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct LabelRow(&'static str);

    impl ToRecord for LabelRow {
        fn columns() -> &'static [&'static str] {
            &["label"]
        }

        fn to_record(&self) -> Record {
            Record::new().with("label", self.0)
        }
    }

    #[test]
    fn test_record_binding_keeps_order() {
        let record = Record::new().with("sickName", "Alice").with("nbHealthy", 3i64);

        assert_eq!(record.fields().collect::<Vec<_>>(), vec!["sickName", "nbHealthy"]);
        assert_eq!(record.get_str("sickName"), Some("Alice"));
        assert_eq!(record.get_int("nbHealthy"), Some(3));
        assert!(!record.has("nbPlaces"));
    }

    #[test]
    fn test_string_list_field() {
        let record = Record::new()
            .with("sickName", "Alice")
            .with("peopleToInform", vec!["Bob".to_string(), "Carol".to_string()]);

        assert_eq!(record.get_str_list("peopleToInform"), Some(vec!["Bob", "Carol"]));
        assert_eq!(record.get_str_list("sickName"), None);
    }

    #[test]
    fn test_record_json() {
        let record = Record::new().with("placeType", "Bar").with("nbOfSickVisits", 2i64);
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            serde_json::json!({"placeType": "Bar", "nbOfSickVisits": 2})
        );
        assert_eq!(record.to_json(), serde_json::to_value(&record).unwrap());
    }

    #[test]
    fn test_batch_from_rows() {
        let batch = RecordBatch::from_rows(&[LabelRow("Person"), LabelRow("Place")]);
        assert_eq!(batch.columns, vec!["label".to_string()]);
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.column_strs("label"), vec!["Person", "Place"]);

        let empty = RecordBatch::from_rows::<LabelRow>(&[]);
        assert!(empty.is_empty());
        assert_eq!(empty.columns.len(), 1);
    }
}
