//! Record type descriptors
//!
//! Each record type owns one explicit schema value, computed once when the
//! type is built: the parent's effective required attributes overlaid with
//! the type's own declarations. The most-derived declaration wins.

use std::sync::Arc;

use crate::observability::{log_event_with_fields, Event};

use super::types::{Equivalences, RequiredAttribute, RequiredAttributes, TypeTag};

/// Name of the root record type every other type descends from
pub const BASE_RECORD_TYPE: &str = "Record";

/// An immutable record type: name, lineage and effective schema.
#[derive(Debug, PartialEq)]
pub struct RecordType {
    name: String,
    /// Own name first, then each ancestor, ending at the base type
    lineage: Vec<String>,
    declared: RequiredAttributes,
    required: RequiredAttributes,
    equivalences: Equivalences,
    inherits_equivalences: bool,
    check_on_init: bool,
}

impl RecordType {
    /// The unrestricted base type
    pub fn base() -> Arc<Self> {
        Arc::new(Self {
            name: BASE_RECORD_TYPE.to_string(),
            lineage: vec![BASE_RECORD_TYPE.to_string()],
            declared: RequiredAttributes::new(),
            required: RequiredAttributes::new(),
            equivalences: Equivalences::new(),
            inherits_equivalences: true,
            check_on_init: true,
        })
    }

    /// Starts a new type extending the base type
    pub fn builder(name: impl Into<String>) -> RecordTypeBuilder {
        RecordTypeBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Own name followed by every ancestor's name
    pub fn lineage(&self) -> &[String] {
        &self.lineage
    }

    /// Name of the direct parent, `None` for the base type
    pub fn parent_name(&self) -> Option<&str> {
        self.lineage.get(1).map(String::as_str)
    }

    /// True when `name` is this type or one of its ancestors
    pub fn is_subtype_of(&self, name: &str) -> bool {
        self.lineage.iter().any(|n| n == name)
    }

    /// Requirements declared directly on this type
    pub fn declared_attributes(&self) -> &RequiredAttributes {
        &self.declared
    }

    /// Effective requirements, including every ancestor's
    pub fn required_attributes(&self) -> &RequiredAttributes {
        &self.required
    }

    /// Whether construction validates immediately
    pub fn check_on_init(&self) -> bool {
        self.check_on_init
    }

    pub fn equivalences(&self) -> &Equivalences {
        &self.equivalences
    }

    /// False when the type discarded its parent's equivalence table
    pub fn inherits_equivalences(&self) -> bool {
        self.inherits_equivalences
    }

    /// Types accepted in place of `declared` beyond exact or subtype match.
    pub fn extra_allowed_types(&self, declared: &TypeTag) -> impl Iterator<Item = &TypeTag> {
        self.equivalences.extra_allowed_types(declared)
    }
}

/// Builds a `RecordType` from a parent and its own declarations.
#[derive(Debug)]
pub struct RecordTypeBuilder {
    name: String,
    parent: Option<Arc<RecordType>>,
    declared: RequiredAttributes,
    equivalences: Equivalences,
    inherit_equivalences: bool,
    check_on_init: Option<bool>,
}

impl RecordTypeBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            declared: RequiredAttributes::new(),
            equivalences: Equivalences::new(),
            inherit_equivalences: true,
            check_on_init: None,
        }
    }

    /// Sets the parent type (defaults to the base type)
    pub fn extends(mut self, parent: &Arc<RecordType>) -> Self {
        self.parent = Some(Arc::clone(parent));
        self
    }

    /// Declares a required attribute, replacing any inherited declaration
    pub fn required(mut self, field: impl Into<String>, attribute: RequiredAttribute) -> Self {
        self.declared.insert(field.into(), attribute);
        self
    }

    /// Declares several required attributes at once
    pub fn required_attributes<I, K>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = (K, RequiredAttribute)>,
        K: Into<String>,
    {
        self.declared
            .extend(attributes.into_iter().map(|(k, a)| (k.into(), a)));
        self
    }

    /// Accept `alternate` where `declared` is required
    pub fn equivalent(mut self, declared: TypeTag, alternate: TypeTag) -> Self {
        self.equivalences.allow(declared, alternate);
        self
    }

    /// Make two types acceptable in place of each other
    pub fn interchangeable(mut self, a: TypeTag, b: TypeTag) -> Self {
        self.equivalences.interchange(a, b);
        self
    }

    /// Start from an empty equivalence table instead of the parent's
    pub fn without_inherited_equivalences(mut self) -> Self {
        self.inherit_equivalences = false;
        self
    }

    /// Enables or disables validation at construction
    pub fn check_on_init(mut self, enabled: bool) -> Self {
        self.check_on_init = Some(enabled);
        self
    }

    pub fn build(self) -> Arc<RecordType> {
        let parent = self.parent.unwrap_or_else(RecordType::base);

        let mut lineage = Vec::with_capacity(parent.lineage.len() + 1);
        lineage.push(self.name.clone());
        lineage.extend(parent.lineage.iter().cloned());

        let mut required = parent.required.clone();
        for (field, attribute) in &self.declared {
            required.insert(field.clone(), attribute.clone());
        }

        let mut equivalences = if self.inherit_equivalences {
            parent.equivalences.clone()
        } else {
            Equivalences::new()
        };
        equivalences.merge(&self.equivalences);

        let record_type = RecordType {
            name: self.name,
            lineage,
            declared: self.declared,
            required,
            equivalences,
            inherits_equivalences: self.inherit_equivalences,
            check_on_init: self.check_on_init.unwrap_or(parent.check_on_init),
        };

        log_event_with_fields(
            Event::RecordTypeDefined,
            &[
                ("parent", parent.name()),
                ("record_type", record_type.name()),
                ("required", &record_type.required.len().to_string()),
            ],
        );

        Arc::new(record_type)
    }
}
