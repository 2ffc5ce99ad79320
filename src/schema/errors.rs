//! Record and schema error types
//!
//! Error codes:
//! - RECORD_REQUIRED_ATTRIBUTE_MISSING (validation)
//! - RECORD_REQUIRED_ATTRIBUTE_INVALID (validation)
//! - RECORD_NOT_A_MAPPING
//! - RECORD_UNKNOWN_TYPE
//! - RECORD_DUPLICATE_TYPE
//! - RECORD_UNKNOWN_PARENT
//! - RECORD_CYCLIC_INHERITANCE

use thiserror::Error;

use super::types::TypeTag;

/// Result type for record and schema operations
pub type RecordResult<T> = Result<T, RecordError>;

/// Record errors
#[derive(Debug, Error)]
pub enum RecordError {
    /// A required attribute is absent at validation time
    #[error("{record_type} requires an attribute named `{field}`")]
    RequiredAttributeMissing { record_type: String, field: String },

    /// A required attribute is present with an unacceptable type
    #[error("attribute `{field}` of {record_type} must be an instance of {expected}, got {actual}")]
    RequiredAttributeInvalid {
        record_type: String,
        field: String,
        expected: TypeTag,
        actual: TypeTag,
    },

    /// Construction input was not a mapping
    #[error("{record_type} must be built from a mapping, got {actual}")]
    NotAMapping { record_type: String, actual: TypeTag },

    #[error("Record type '{0}' not found")]
    UnknownType(String),

    #[error("Record type '{0}' is already registered")]
    DuplicateType(String),

    #[error("Record type '{name}' extends unknown type '{parent}'")]
    UnknownParent { name: String, parent: String },

    #[error("Inheritance cycle through record type '{0}'")]
    CyclicInheritance(String),
}

impl RecordError {
    /// Missing required attribute
    pub fn missing(record_type: impl Into<String>, field: impl Into<String>) -> Self {
        RecordError::RequiredAttributeMissing {
            record_type: record_type.into(),
            field: field.into(),
        }
    }

    /// Required attribute of an unacceptable type
    pub fn invalid(
        record_type: impl Into<String>,
        field: impl Into<String>,
        expected: TypeTag,
        actual: TypeTag,
    ) -> Self {
        RecordError::RequiredAttributeInvalid {
            record_type: record_type.into(),
            field: field.into(),
            expected,
            actual,
        }
    }

    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            RecordError::RequiredAttributeMissing { .. } => "RECORD_REQUIRED_ATTRIBUTE_MISSING",
            RecordError::RequiredAttributeInvalid { .. } => "RECORD_REQUIRED_ATTRIBUTE_INVALID",
            RecordError::NotAMapping { .. } => "RECORD_NOT_A_MAPPING",
            RecordError::UnknownType(_) => "RECORD_UNKNOWN_TYPE",
            RecordError::DuplicateType(_) => "RECORD_DUPLICATE_TYPE",
            RecordError::UnknownParent { .. } => "RECORD_UNKNOWN_PARENT",
            RecordError::CyclicInheritance(_) => "RECORD_CYCLIC_INHERITANCE",
        }
    }

    /// True for the two schema-validation failures
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            RecordError::RequiredAttributeMissing { .. }
                | RecordError::RequiredAttributeInvalid { .. }
        )
    }

    /// Returns the offending field for validation failures
    pub fn field(&self) -> Option<&str> {
        match self {
            RecordError::RequiredAttributeMissing { field, .. }
            | RecordError::RequiredAttributeInvalid { field, .. } => Some(field),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            RecordError::missing("Point", "x").code(),
            "RECORD_REQUIRED_ATTRIBUTE_MISSING"
        );
        assert_eq!(
            RecordError::invalid("Point", "x", TypeTag::Int, TypeTag::Str).code(),
            "RECORD_REQUIRED_ATTRIBUTE_INVALID"
        );
        assert_eq!(RecordError::UnknownType("A".into()).code(), "RECORD_UNKNOWN_TYPE");
        assert_eq!(RecordError::DuplicateType("A".into()).code(), "RECORD_DUPLICATE_TYPE");
    }

    #[test]
    fn test_validation_classification() {
        assert!(RecordError::missing("Point", "x").is_validation());
        assert!(!RecordError::UnknownType("Point".into()).is_validation());
        assert!(!RecordError::CyclicInheritance("Point".into()).is_validation());
    }

    #[test]
    fn test_field_accessor() {
        assert_eq!(RecordError::missing("Point", "y").field(), Some("y"));
        assert_eq!(RecordError::CyclicInheritance("A".into()).field(), None);
    }

    #[test]
    fn test_invalid_display_names_everything() {
        let err = RecordError::invalid(
            "MapLocation",
            "longitude",
            TypeTag::Float,
            TypeTag::Int,
        );
        let display = err.to_string();
        assert!(display.contains("MapLocation"));
        assert!(display.contains("longitude"));
        assert!(display.contains("float"));
        assert!(display.contains("int"));
    }
}
