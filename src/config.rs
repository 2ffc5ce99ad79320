//! Registry configuration
//!
//! Controls how strictly a `TypeRegistry` resolves nominal constraint names.

/// Configuration for a `TypeRegistry`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Reject nominal constraints that name no registered type or class.
    pub strict_type_names: bool,
}

impl RegistryConfig {
    /// Lenient config: unknown nominal names are accepted as declared.
    pub fn new() -> Self {
        Self::default()
    }

    /// Same config with nominal constraint names checked on definition.
    pub fn strict(mut self) -> Self {
        self.strict_type_names = true;
        self
    }
}
