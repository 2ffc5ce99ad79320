//! Record Construction Invariant Tests
//!
//! - Mapping entries and named arguments are merged
//! - Named arguments win on key collision
//! - Every merged key is readable and writable as a field

use std::collections::BTreeMap;

use dynrecord::{Attributes, Record, RecordType, Value};
use serde_json::json;

fn mapping(entries: &[(&str, &str)]) -> Attributes {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), Value::from(*v)))
        .collect()
}

#[test]
fn test_construct_with_mapping() {
    let record = Record::from_mapping(&RecordType::base(), mapping(&[("k1", "v1"), ("k2", "v2")]))
        .unwrap();

    assert_eq!(record["k1"].as_str(), Some("v1"));
    assert_eq!(record["k2"].as_str(), Some("v2"));
}

#[test]
fn test_construct_with_named_arguments() {
    let record = Record::from_entries(&RecordType::base(), [("k1", "v1"), ("k2", "v2")]).unwrap();

    assert_eq!(record.get("k1"), Some(&Value::from("v1")));
    assert_eq!(record.get("k2"), Some(&Value::from("v2")));
}

#[test]
fn test_construct_with_both() {
    let record = Record::new(
        &RecordType::base(),
        Some(mapping(&[("k3", "v3")])),
        [("k1", "v1"), ("k2", "v2")],
    )
    .unwrap();

    for (key, expected) in [("k1", "v1"), ("k2", "v2"), ("k3", "v3")] {
        assert_eq!(record[key].as_str(), Some(expected));
    }
    assert_eq!(record.len(), 3);
}

#[test]
fn test_disjoint_inputs_yield_union() {
    let m = mapping(&[("a", "1"), ("b", "2")]);
    let kw = [("c", "3"), ("d", "4")];

    let record = Record::untyped(Some(m.clone()), kw);

    let mut expected: BTreeMap<String, Value> = m;
    expected.extend(kw.iter().map(|(k, v)| (k.to_string(), Value::from(*v))));
    assert_eq!(record.attributes(), &expected);
}

#[test]
fn test_named_arguments_win() {
    let record = Record::untyped(
        Some(mapping(&[("shared", "from mapping"), ("only_mapping", "m")])),
        [("shared", "from named")],
    );

    assert_eq!(record["shared"].as_str(), Some("from named"));
    assert_eq!(record["only_mapping"].as_str(), Some("m"));
}

#[test]
fn test_empty_construction() {
    let record = Record::untyped(None, std::iter::empty::<(&str, Value)>());
    assert!(record.is_empty());
    assert!(record.validate().is_ok());
}

#[test]
fn test_fields_are_mutable() {
    let mut record = Record::from_json(&RecordType::base(), json!({"count": 1})).unwrap();

    record.set("count", 2);
    record.set("added", "later");

    assert_eq!(record["count"], Value::Int(2));
    assert!(record.contains("added"));
}

#[test]
fn test_json_numbers_keep_their_kind() {
    let record = Record::from_json(
        &RecordType::base(),
        json!({"int": 3, "float": 3.5, "nested": {"inner": true}}),
    )
    .unwrap();

    assert_eq!(record["int"], Value::Int(3));
    assert_eq!(record["float"], Value::Float(3.5));
    assert_eq!(
        record["nested"].as_map().and_then(|m| m.get("inner")),
        Some(&Value::Bool(true))
    );
}

#[test]
fn test_into_attributes_round_trip() {
    let record = Record::untyped(None, [("a", 1), ("b", 2)]);
    let attributes = record.clone().into_attributes();

    let rebuilt = Record::from_mapping(&RecordType::base(), attributes).unwrap();
    assert_eq!(rebuilt, record);
}
