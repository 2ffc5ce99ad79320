//! Schema validator for record attributes
//!
//! Validation semantics:
//! - Every effective required attribute is present
//! - A constrained attribute's value is the declared type, a subtype of it,
//!   or one of the type's declared equivalents
//! - Attributes are checked in field-name order; the first violation wins
//! - Undeclared attributes are always allowed
//!
//! Validator does not mutate attributes.

use crate::observability::{log_event_with_fields, Event};
use crate::record::{Attributes, Value};

use super::errors::{RecordError, RecordResult};
use super::record_type::RecordType;
use super::types::{RequiredAttribute, TypeTag};

/// Checks attribute sets against a record type's effective schema.
pub struct SchemaValidator<'a> {
    record_type: &'a RecordType,
    /// Type name carried by errors and log lines
    reported_as: &'a str,
}

impl<'a> SchemaValidator<'a> {
    /// Validator for `record_type`'s effective schema
    pub fn new(record_type: &'a RecordType) -> Self {
        Self {
            record_type,
            reported_as: record_type.name(),
        }
    }

    /// Names `type_name` in errors instead of the schema's own type, for
    /// records checked against an ancestor's schema.
    pub fn reporting_as(mut self, type_name: &'a str) -> Self {
        self.reported_as = type_name;
        self
    }

    /// Validates attributes against the effective required attributes.
    ///
    /// # Errors
    ///
    /// - `RequiredAttributeMissing` if a required field is absent
    /// - `RequiredAttributeInvalid` if a constrained field has the wrong type
    pub fn validate(&self, attributes: &Attributes) -> RecordResult<()> {
        let result = self
            .record_type
            .required_attributes()
            .iter()
            .try_for_each(|(field, required)| self.check_attribute(attributes, field, required));

        match &result {
            Ok(()) => log_event_with_fields(
                Event::RecordValidated,
                &[
                    ("record_type", self.reported_as),
                    ("schema", self.record_type.name()),
                ],
            ),
            Err(err) => log_event_with_fields(
                Event::RecordValidationFailed,
                &[
                    ("code", err.code()),
                    ("field", err.field().unwrap_or("")),
                    ("record_type", self.reported_as),
                    ("schema", self.record_type.name()),
                ],
            ),
        }

        result
    }

    fn check_attribute(
        &self,
        attributes: &Attributes,
        field: &str,
        required: &RequiredAttribute,
    ) -> RecordResult<()> {
        let value = attributes
            .get(field)
            .ok_or_else(|| RecordError::missing(self.reported_as, field))?;

        if let Some(expected) = &required.constraint {
            if !self.accepts(expected, value) {
                return Err(RecordError::invalid(
                    self.reported_as,
                    field,
                    expected.clone(),
                    value.type_tag(),
                ));
            }
        }

        Ok(())
    }

    /// True if `value` satisfies `expected` directly or through an equivalent.
    pub fn accepts(&self, expected: &TypeTag, value: &Value) -> bool {
        value.is_instance_of(expected)
            || self
                .record_type
                .extra_allowed_types(expected)
                .any(|alternate| value.is_instance_of(alternate))
    }
}
