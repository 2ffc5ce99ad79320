//! Type constraints and required-attribute markers
//!
//! Constraint tags:
//! - null, bool, int, float, str, list, map: primitive kinds
//! - any other name: a nominal type (a `Class` or a record type)
//!
//! "Any type" is the absence of a constraint on a `RequiredAttribute`.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Type tag for values and for required-attribute constraints
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TypeTag {
    /// Absent value
    Null,
    /// Boolean
    Bool,
    /// 64-bit signed integer
    Int,
    /// 64-bit floating point
    Float,
    /// UTF-8 string
    Str,
    /// Ordered list of values
    List,
    /// String-keyed map of values
    Map,
    /// Nominal type, matched against a value's lineage
    Named(String),
}

impl TypeTag {
    /// Creates a nominal type tag
    pub fn named(name: impl Into<String>) -> Self {
        TypeTag::Named(name.into())
    }

    /// Parses a constraint name as written in declaration files.
    ///
    /// Unrecognised names are nominal types.
    pub fn parse(name: &str) -> Self {
        match name {
            "null" => TypeTag::Null,
            "bool" => TypeTag::Bool,
            "int" => TypeTag::Int,
            "float" => TypeTag::Float,
            "str" => TypeTag::Str,
            "list" => TypeTag::List,
            "map" => TypeTag::Map,
            other => TypeTag::Named(other.to_string()),
        }
    }

    /// Returns the type name for error messages
    pub fn type_name(&self) -> &str {
        match self {
            TypeTag::Null => "null",
            TypeTag::Bool => "bool",
            TypeTag::Int => "int",
            TypeTag::Float => "float",
            TypeTag::Str => "str",
            TypeTag::List => "list",
            TypeTag::Map => "map",
            TypeTag::Named(name) => name,
        }
    }

    /// Returns true for nominal tags
    pub fn is_named(&self) -> bool {
        matches!(self, TypeTag::Named(_))
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name())
    }
}

impl From<&str> for TypeTag {
    fn from(name: &str) -> Self {
        TypeTag::parse(name)
    }
}

/// Declarative marker: the attribute must be present, optionally with a type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequiredAttribute {
    /// Expected type, `None` accepts any value
    pub constraint: Option<TypeTag>,
}

impl RequiredAttribute {
    /// Required, any type
    pub fn any() -> Self {
        Self { constraint: None }
    }

    /// Required with the given type
    pub fn of(tag: TypeTag) -> Self {
        Self {
            constraint: Some(tag),
        }
    }

    /// Required bool attribute
    pub fn bool() -> Self {
        Self::of(TypeTag::Bool)
    }

    /// Required int attribute
    pub fn int() -> Self {
        Self::of(TypeTag::Int)
    }

    /// Required float attribute
    pub fn float() -> Self {
        Self::of(TypeTag::Float)
    }

    /// Required string attribute
    pub fn string() -> Self {
        Self::of(TypeTag::Str)
    }

    /// Required attribute of a nominal type (or any of its subtypes)
    pub fn named(name: impl Into<String>) -> Self {
        Self::of(TypeTag::named(name))
    }

    /// Returns the constraint's name, or "any"
    pub fn constraint_name(&self) -> &str {
        self.constraint.as_ref().map_or("any", TypeTag::type_name)
    }
}

/// Field name to requirement. Ordered, so validation order is stable.
pub type RequiredAttributes = BTreeMap<String, RequiredAttribute>;

/// Equivalence table: declared constraint to extra acceptable types.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Equivalences {
    table: BTreeMap<TypeTag, BTreeSet<TypeTag>>,
}

impl Equivalences {
    /// Creates an empty table (strict matching only)
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept `alternate` wherever `declared` is required.
    pub fn allow(&mut self, declared: TypeTag, alternate: TypeTag) {
        self.table.entry(declared).or_default().insert(alternate);
    }

    /// Makes two types acceptable in place of each other.
    pub fn interchange(&mut self, a: TypeTag, b: TypeTag) {
        self.allow(a.clone(), b.clone());
        self.allow(b, a);
    }

    /// Returns the extra types accepted for `declared`.
    pub fn extra_allowed_types(&self, declared: &TypeTag) -> impl Iterator<Item = &TypeTag> {
        self.table.get(declared).into_iter().flatten()
    }

    /// Overlays another table on top of this one.
    pub fn merge(&mut self, other: &Equivalences) {
        for (declared, alternates) in &other.table {
            self.table
                .entry(declared.clone())
                .or_default()
                .extend(alternates.iter().cloned());
        }
    }

    /// Iterates over (declared, alternates) entries in tag order
    pub fn iter(&self) -> impl Iterator<Item = (&TypeTag, &BTreeSet<TypeTag>)> {
        self.table.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}
