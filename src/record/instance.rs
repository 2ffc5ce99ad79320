//! Records: named attributes plus an optional schema
//!
//! Construction:
//! 1. Start from an empty attribute set
//! 2. Copy in the mapping, if any
//! 3. Overlay the named arguments (they win on collision)
//! 4. Validate, unless the record type defers it

use std::collections::BTreeMap;
use std::ops::Index;
use std::sync::Arc;

use crate::observability::{log_event_with_fields, Event};
use crate::schema::{RecordError, RecordResult, RecordType, SchemaValidator};

use super::value::Value;

/// Field name to value
pub type Attributes = BTreeMap<String, Value>;

/// A record instance.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    record_type: Arc<RecordType>,
    attributes: Attributes,
}

impl Record {
    /// Builds a record from an optional mapping and named arguments.
    ///
    /// # Errors
    ///
    /// When the type validates on init, returns the first
    /// `RequiredAttributeMissing` or `RequiredAttributeInvalid`.
    pub fn new<I, K, V>(
        record_type: &Arc<RecordType>,
        mapping: Option<Attributes>,
        named: I,
    ) -> RecordResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let record = Self::assemble(record_type, mapping, named);

        if record.record_type.check_on_init() {
            record.validate()?;
        }

        Ok(record)
    }

    /// Builds a record from a mapping alone.
    pub fn from_mapping(record_type: &Arc<RecordType>, mapping: Attributes) -> RecordResult<Self> {
        Self::new(record_type, Some(mapping), std::iter::empty::<(String, Value)>())
    }

    /// Builds a record from named arguments alone.
    pub fn from_entries<I, K, V>(record_type: &Arc<RecordType>, named: I) -> RecordResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Self::new(record_type, None, named)
    }

    /// Builds a record from a JSON object.
    ///
    /// Anything but a JSON object is rejected with `NotAMapping`.
    pub fn from_json(record_type: &Arc<RecordType>, json: serde_json::Value) -> RecordResult<Self> {
        match Value::from(json) {
            Value::Map(mapping) => Self::from_mapping(record_type, mapping),
            other => Err(RecordError::NotAMapping {
                record_type: record_type.name().to_string(),
                actual: other.type_tag(),
            }),
        }
    }

    /// Builds a record of the unrestricted base type.
    ///
    /// The base type requires nothing, so this cannot fail.
    pub fn untyped<I, K, V>(mapping: Option<Attributes>, named: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Self::assemble(&RecordType::base(), mapping, named)
    }

    /// Merges the mapping and named arguments, named winning. No validation.
    fn assemble<I, K, V>(
        record_type: &Arc<RecordType>,
        mapping: Option<Attributes>,
        named: I,
    ) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let mut attributes = mapping.unwrap_or_default();
        attributes.extend(named.into_iter().map(|(k, v)| (k.into(), v.into())));

        let record = Self {
            record_type: Arc::clone(record_type),
            attributes,
        };

        log_event_with_fields(
            Event::RecordLoaded,
            &[
                ("attributes", &record.attributes.len().to_string()),
                ("record_type", record.record_type.name()),
            ],
        );

        record
    }

    /// The record's concrete type
    pub fn record_type(&self) -> &Arc<RecordType> {
        &self.record_type
    }

    /// True when the record's type is `name` or descends from it
    pub fn is_instance_of(&self, name: &str) -> bool {
        self.record_type.is_subtype_of(name)
    }

    /// Returns the attribute named `name`, if present
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Mutable access to an attribute. Not validated.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.attributes.get_mut(name)
    }

    /// Assigns a field, returning the previous value. Not validated.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.attributes.insert(name.into(), value.into())
    }

    /// Removes an attribute, returning its value. Not validated.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.attributes.remove(name)
    }

    /// True if the record has an attribute named `name`
    pub fn contains(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// Number of attributes
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// True if the record has no attributes
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Attribute names in ascending order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.attributes.keys().map(String::as_str)
    }

    /// Attributes in ascending name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// All attributes
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Consumes the record, returning its attributes
    pub fn into_attributes(self) -> Attributes {
        self.attributes
    }

    /// Re-runs validation against the record's own type.
    pub fn validate(&self) -> RecordResult<()> {
        self.validate_against(&self.record_type)
    }

    /// Validates against another type's effective schema, e.g. an ancestor's.
    ///
    /// Errors still name the record's own type.
    pub fn validate_against(&self, record_type: &RecordType) -> RecordResult<()> {
        SchemaValidator::new(record_type)
            .reporting_as(self.record_type.name())
            .validate(&self.attributes)
    }
}

impl<'a> Index<&'a str> for Record {
    type Output = Value;

    /// Panics if the record has no such attribute
    fn index(&self, name: &'a str) -> &Value {
        match self.attributes.get(name) {
            Some(value) => value,
            None => panic!("{} record has no attribute `{}`", self.record_type.name(), name),
        }
    }
}

impl<'a> IntoIterator for &'a Record {
    type Item = (&'a String, &'a Value);
    type IntoIter = std::collections::btree_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.attributes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::RequiredAttribute;
    use serde_json::json;

    fn mapping(entries: &[(&str, i64)]) -> Attributes {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), Value::from(*v)))
            .collect()
    }

    #[test]
    fn test_construct_from_mapping() {
        let record = Record::untyped(
            Some(mapping(&[("k1", 1), ("k2", 2)])),
            std::iter::empty::<(&str, Value)>(),
        );
        assert_eq!(record["k1"], Value::Int(1));
        assert_eq!(record.len(), 2);
    }

    #[test]
    fn test_named_overrides_mapping() {
        let record = Record::untyped(Some(mapping(&[("k", 1), ("m", 2)])), [("k", 10)]);
        assert_eq!(record.get("k"), Some(&Value::Int(10)));
        assert_eq!(record.get("m"), Some(&Value::Int(2)));
    }

    #[test]
    fn test_set_and_remove() {
        let mut record = Record::untyped(None, [("a", "x")]);

        assert_eq!(record.set("a", "y"), Some(Value::from("x")));
        assert_eq!(record.set("b", 3), None);
        assert!(record.contains("b"));
        assert_eq!(record.remove("a"), Some(Value::from("y")));
        assert_eq!(record.keys().collect::<Vec<_>>(), vec!["b"]);
    }

    #[test]
    fn test_get_mut() {
        let mut record = Record::untyped(None, [("n", 1)]);
        if let Some(value) = record.get_mut("n") {
            *value = Value::from(2);
        }
        assert_eq!(record["n"], Value::Int(2));
    }

    #[test]
    #[should_panic(expected = "no attribute `missing`")]
    fn test_index_missing_panics() {
        let record = Record::untyped(None, [("a", 1)]);
        let _ = &record["missing"];
    }

    #[test]
    fn test_from_json_requires_object() {
        let base = RecordType::base();
        assert!(Record::from_json(&base, json!({"a": 1})).is_ok());

        let err = Record::from_json(&base, json!([1, 2])).unwrap_err();
        assert_eq!(err.code(), "RECORD_NOT_A_MAPPING");
    }

    #[test]
    fn test_validation_on_init() {
        let point = RecordType::builder("Point")
            .required("x", RequiredAttribute::any())
            .build();

        assert!(Record::from_entries(&point, [("x", 0)]).is_ok());
        let err = Record::from_entries(&point, [("y", 0)]).unwrap_err();
        assert_eq!(err.field(), Some("x"));
    }

    #[test]
    fn test_untyped_uses_base_type() {
        let record = Record::untyped(Some(mapping(&[("a", 1)])), [("b", 2)]);
        assert_eq!(record.record_type().name(), "Record");
        assert_eq!(record.len(), 2);
        assert!(record.validate().is_ok());
    }

    #[test]
    fn test_validate_against_names_own_type() {
        let coordinate = RecordType::builder("CartesianCoordinate")
            .required("x", RequiredAttribute::any())
            .build();
        let spatial = RecordType::builder("SpatialCoordinate")
            .extends(&coordinate)
            .check_on_init(false)
            .build();

        let record = Record::from_entries(&spatial, [("y", 1)]).unwrap();
        match record.validate_against(&coordinate).unwrap_err() {
            RecordError::RequiredAttributeMissing { record_type, field } => {
                assert_eq!(record_type, "SpatialCoordinate");
                assert_eq!(field, "x");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_is_instance_of() {
        let point = RecordType::builder("Point").build();
        let record = Record::from_entries(&point, [("x", 1)]).unwrap();

        assert!(record.is_instance_of("Point"));
        assert!(record.is_instance_of("Record"));
        assert!(!record.is_instance_of("Other"));
    }

    #[test]
    fn test_iteration_in_name_order() {
        let record = Record::untyped(None, [("b", 2), ("a", 1)]);
        let names: Vec<_> = record.iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["a", "b"]);

        let count = (&record).into_iter().count();
        assert_eq!(count, 2);
    }
}
