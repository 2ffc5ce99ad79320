//! Schema subsystem for records
//!
//! Record types declare required attributes, optionally typed. A type's
//! effective schema is its parent's overlaid with its own declarations.
//!
//! # Design Principles
//!
//! - One explicit schema value per record type, fixed when built
//! - Most-derived declaration wins
//! - Fail fast: the first violation is reported
//! - Equivalences widen a constraint per record type
//! - Deterministic validation order

mod errors;
mod record_type;
mod registry;
mod types;
mod validator;

pub use errors::{RecordError, RecordResult};
pub use record_type::{RecordType, RecordTypeBuilder, BASE_RECORD_TYPE};
pub use registry::{TypeDeclaration, TypeRegistry};
pub use types::{Equivalences, RequiredAttribute, RequiredAttributes, TypeTag};
pub use validator::SchemaValidator;
