//! Attribute values
//!
//! `Value` is a closed set of kinds. User-defined nominal types are
//! `Object`s tagged with a `Class`; nested records carry their record type.
//! Both answer "is instance of" through their lineage.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::schema::TypeTag;

use super::instance::Record;

/// A nominal type with single-parent inheritance.
#[derive(Debug, PartialEq, Eq)]
pub struct Class {
    /// Own name first, then each ancestor
    lineage: Vec<String>,
}

impl Class {
    /// A root class
    pub fn new(name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            lineage: vec![name.into()],
        })
    }

    /// A class deriving from `parent`
    pub fn extends(name: impl Into<String>, parent: &Class) -> Arc<Self> {
        let mut lineage = Vec::with_capacity(parent.lineage.len() + 1);
        lineage.push(name.into());
        lineage.extend(parent.lineage.iter().cloned());
        Arc::new(Self { lineage })
    }

    /// The class's own name
    pub fn name(&self) -> &str {
        &self.lineage[0]
    }

    pub fn lineage(&self) -> &[String] {
        &self.lineage
    }

    /// True when `name` is this class or an ancestor
    pub fn is_subclass_of(&self, name: &str) -> bool {
        self.lineage.iter().any(|n| n == name)
    }
}

/// An instance of a `Class`, with its own fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Object {
    class: Arc<Class>,
    fields: BTreeMap<String, Value>,
}

impl Object {
    /// An instance of `class` with no fields
    pub fn new(class: &Arc<Class>) -> Self {
        Self {
            class: Arc::clone(class),
            fields: BTreeMap::new(),
        }
    }

    /// Adds a field, builder style
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// The object's class
    pub fn class(&self) -> &Class {
        &self.class
    }

    /// Returns a field, if present
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Assigns a field, returning the previous value
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(name.into(), value.into())
    }
}

/// Any attribute value a record can hold
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
    Object(Object),
    Record(Box<Record>),
}

impl Value {
    /// The value's concrete type
    pub fn type_tag(&self) -> TypeTag {
        match self {
            Value::Null => TypeTag::Null,
            Value::Bool(_) => TypeTag::Bool,
            Value::Int(_) => TypeTag::Int,
            Value::Float(_) => TypeTag::Float,
            Value::Str(_) => TypeTag::Str,
            Value::List(_) => TypeTag::List,
            Value::Map(_) => TypeTag::Map,
            Value::Object(obj) => TypeTag::named(obj.class().name()),
            Value::Record(record) => TypeTag::named(record.record_type().name()),
        }
    }

    /// Exact match, or any supertype: `bool` is an `int`, and nominal
    /// values match every type in their lineage.
    pub fn is_instance_of(&self, tag: &TypeTag) -> bool {
        match (self, tag) {
            (Value::Bool(_), TypeTag::Int) => true,
            (Value::Object(obj), TypeTag::Named(name)) => obj.class().is_subclass_of(name),
            (Value::Record(record), TypeTag::Named(name)) => {
                record.record_type().is_subtype_of(name)
            }
            _ => self.type_tag() == *tag,
        }
    }

    /// True for `Null`
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The bool, if this is one
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The int, if this is one
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Floats, and ints widened to float
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// The string, if this is one
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// The items, if this is a list
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// The entries, if this is a map
    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// The object, if this is one
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// The nested record, if this is one
    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(record) => Some(record),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{:?}", x),
            Value::Str(s) => write!(f, "{:?}", s),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Map(map) => {
                write!(f, "{{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{:?}: {}", k, v)?;
                }
                write!(f, "}}")
            }
            Value::Object(obj) => write!(f, "<{}>", obj.class().name()),
            Value::Record(record) => write!(f, "<{} record>", record.record_type().name()),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<f32> for Value {
    fn from(x: f32) -> Self {
        Value::Float(f64::from(x))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Null, Into::into)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Value::Map(map)
    }
}

impl From<Object> for Value {
    fn from(obj: Object) -> Self {
        Value::Object(obj)
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::Record(Box::new(record))
    }
}

/// Integers that fit in an `i64` become `Int`, objects `Map`. Every other
/// number, including integers above `i64::MAX`, becomes `Float`.
impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::Str(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => {
                Value::Map(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}
