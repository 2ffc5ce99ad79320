//! Type registry
//!
//! - Record types and nominal classes registered by name
//! - Registered types are immutable
//! - Declarations name their parent; a batch is defined parents-first
//! - A batch is committed only when every declaration in it succeeds

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use crate::config::RegistryConfig;
use crate::observability::{log_event_with_fields, Event};
use crate::record::Class;

use super::errors::{RecordError, RecordResult};
use super::record_type::{RecordType, BASE_RECORD_TYPE};
use super::types::{Equivalences, RequiredAttribute, RequiredAttributes, TypeTag};

/// A record type described by its parent's name rather than its parent.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDeclaration {
    pub name: String,
    /// Parent type name, the base type when absent
    pub extends: Option<String>,
    /// Inherited from the parent when absent
    pub check_on_init: Option<bool>,
    pub required: RequiredAttributes,
    pub equivalences: Equivalences,
    pub inherit_equivalences: bool,
}

impl TypeDeclaration {
    /// Declares a direct subtype of the base type with no requirements.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extends: None,
            check_on_init: None,
            required: RequiredAttributes::new(),
            equivalences: Equivalences::new(),
            inherit_equivalences: true,
        }
    }

    /// Sets the parent type by name
    pub fn extends(mut self, parent: impl Into<String>) -> Self {
        self.extends = Some(parent.into());
        self
    }

    /// Declares a required attribute
    pub fn required(mut self, field: impl Into<String>, attribute: RequiredAttribute) -> Self {
        self.required.insert(field.into(), attribute);
        self
    }

    /// Accepts `alternate` wherever `declared` is required
    pub fn equivalent(mut self, declared: TypeTag, alternate: TypeTag) -> Self {
        self.equivalences.allow(declared, alternate);
        self
    }

    /// Starts from an empty equivalence table instead of the parent's
    pub fn without_inherited_equivalences(mut self) -> Self {
        self.inherit_equivalences = false;
        self
    }

    /// Overrides the parent's validation toggle
    pub fn check_on_init(mut self, enabled: bool) -> Self {
        self.check_on_init = Some(enabled);
        self
    }

    /// Parent name, defaulting to the base type
    pub fn parent(&self) -> &str {
        self.extends.as_deref().unwrap_or(BASE_RECORD_TYPE)
    }

    fn nominal_names(&self) -> impl Iterator<Item = &str> {
        let constraints = self.required.values().filter_map(|a| a.constraint.as_ref());
        let equivalents = self
            .equivalences
            .iter()
            .flat_map(|(declared, alternates)| std::iter::once(declared).chain(alternates));

        constraints
            .chain(equivalents)
            .filter(|tag| tag.is_named())
            .map(TypeTag::type_name)
    }
}

/// Registry of record types and nominal classes, by name.
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    config: RegistryConfig,
    types: HashMap<String, Arc<RecordType>>,
    classes: HashMap<String, Arc<Class>>,
}

impl TypeRegistry {
    /// Creates a registry holding only the base record type.
    pub fn new(config: RegistryConfig) -> Self {
        let base = RecordType::base();
        let mut types = HashMap::new();
        types.insert(base.name().to_string(), base);

        Self {
            config,
            types,
            classes: HashMap::new(),
        }
    }

    /// The registry's configuration
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Registers a built record type.
    pub fn register(&mut self, record_type: Arc<RecordType>) -> RecordResult<()> {
        if self.exists(record_type.name()) {
            return Err(RecordError::DuplicateType(record_type.name().to_string()));
        }
        self.types.insert(record_type.name().to_string(), record_type);
        Ok(())
    }

    /// Registers a nominal class so strict declarations may name it.
    pub fn register_class(&mut self, class: Arc<Class>) -> RecordResult<()> {
        if self.exists(class.name()) {
            return Err(RecordError::DuplicateType(class.name().to_string()));
        }
        self.classes.insert(class.name().to_string(), class);
        Ok(())
    }

    /// Looks up a record type by name
    pub fn get(&self, name: &str) -> Option<Arc<RecordType>> {
        self.types.get(name).cloned()
    }

    /// Like `get`, but a missing type is an error.
    pub fn require(&self, name: &str) -> RecordResult<Arc<RecordType>> {
        self.get(name)
            .ok_or_else(|| RecordError::UnknownType(name.to_string()))
    }

    /// True if a record type or class is registered under `name`.
    pub fn exists(&self, name: &str) -> bool {
        self.types.contains_key(name) || self.classes.contains_key(name)
    }

    /// Number of record types, the base type included.
    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    /// Builds and registers a record type from a declaration.
    ///
    /// The parent must already be registered.
    pub fn define(&mut self, declaration: &TypeDeclaration) -> RecordResult<Arc<RecordType>> {
        if self.exists(&declaration.name) {
            return Err(RecordError::DuplicateType(declaration.name.clone()));
        }
        if self.config.strict_type_names {
            self.check_type_names(declaration, &BTreeSet::new())?;
        }
        self.build_and_register(declaration)
    }

    /// Defines a batch of declarations, parents first, in any input order.
    ///
    /// Either every declaration is registered or none is. Returns the number
    /// of record types defined.
    ///
    /// # Errors
    ///
    /// - `DuplicateType` if a name is already registered or repeated
    /// - `UnknownParent` if an ancestor is neither registered nor in the batch
    /// - `CyclicInheritance` if the batch's `extends` chain loops
    /// - `UnknownType` under strict names, for an unresolvable nominal name
    pub fn define_all<I>(&mut self, declarations: I) -> RecordResult<usize>
    where
        I: IntoIterator<Item = TypeDeclaration>,
    {
        let mut pending: BTreeMap<String, TypeDeclaration> = BTreeMap::new();
        for declaration in declarations {
            if self.exists(&declaration.name) || pending.contains_key(&declaration.name) {
                return Err(RecordError::DuplicateType(declaration.name));
            }
            pending.insert(declaration.name.clone(), declaration);
        }

        if self.config.strict_type_names {
            let batch: BTreeSet<&str> = pending.keys().map(String::as_str).collect();
            for declaration in pending.values() {
                self.check_type_names(declaration, &batch)?;
            }
        }

        let mut staged = self.clone();
        let count = staged.define_in_order(pending)?;
        *self = staged;

        log_event_with_fields(
            Event::DeclarationsDefined,
            &[
                ("count", &count.to_string()),
                ("types", &self.type_count().to_string()),
            ],
        );

        Ok(count)
    }

    fn define_in_order(
        &mut self,
        mut pending: BTreeMap<String, TypeDeclaration>,
    ) -> RecordResult<usize> {
        let mut defined = 0;

        while !pending.is_empty() {
            let ready: Vec<String> = pending
                .values()
                .filter(|decl| self.types.contains_key(decl.parent()))
                .map(|decl| decl.name.clone())
                .collect();

            if ready.is_empty() {
                if let Some(start) = pending.keys().next() {
                    return Err(unresolved_error(&pending, start));
                }
            }

            for name in ready {
                if let Some(declaration) = pending.remove(&name) {
                    self.build_and_register(&declaration)?;
                    defined += 1;
                }
            }
        }

        Ok(defined)
    }

    fn build_and_register(
        &mut self,
        declaration: &TypeDeclaration,
    ) -> RecordResult<Arc<RecordType>> {
        let parent = self
            .get(declaration.parent())
            .ok_or_else(|| RecordError::UnknownParent {
                name: declaration.name.clone(),
                parent: declaration.parent().to_string(),
            })?;

        let mut builder = RecordType::builder(&declaration.name)
            .extends(&parent)
            .required_attributes(declaration.required.clone());
        if let Some(enabled) = declaration.check_on_init {
            builder = builder.check_on_init(enabled);
        }
        if !declaration.inherit_equivalences {
            builder = builder.without_inherited_equivalences();
        }
        for (declared, alternates) in declaration.equivalences.iter() {
            for alternate in alternates {
                builder = builder.equivalent(declared.clone(), alternate.clone());
            }
        }

        let record_type = builder.build();
        self.register(Arc::clone(&record_type))?;
        Ok(record_type)
    }

    /// Every nominal name must be registered, in `batch`, or the type itself.
    fn check_type_names(
        &self,
        declaration: &TypeDeclaration,
        batch: &BTreeSet<&str>,
    ) -> RecordResult<()> {
        let unknown = declaration.nominal_names().find(|name| {
            *name != declaration.name && !self.exists(name) && !batch.contains(name)
        });

        match unknown {
            Some(name) => Err(RecordError::UnknownType(name.to_string())),
            None => Ok(()),
        }
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new(RegistryConfig::default())
    }
}

/// Explains why `start` can never be defined: a cycle or a missing ancestor.
fn unresolved_error(pending: &BTreeMap<String, TypeDeclaration>, start: &str) -> RecordError {
    let mut seen = BTreeSet::new();
    let mut current = start;

    while let Some(decl) = pending.get(current) {
        if !seen.insert(current) {
            return RecordError::CyclicInheritance(current.to_string());
        }
        if !pending.contains_key(decl.parent()) {
            return RecordError::UnknownParent {
                name: decl.name.clone(),
                parent: decl.parent().to_string(),
            };
        }
        current = decl.parent();
    }

    RecordError::UnknownType(current.to_string())
}
