//! dynrecord - duck-typed records with optional, inheritable schemas
//!
//! ```
//! use dynrecord::{Record, RecordType, RequiredAttribute};
//!
//! let point = RecordType::builder("CartesianCoordinate")
//!     .required("x", RequiredAttribute::any())
//!     .required("y", RequiredAttribute::any())
//!     .build();
//!
//! let p = Record::from_entries(&point, [("x", 5), ("y", 12)]).unwrap();
//! assert_eq!(p["x"].as_i64(), Some(5));
//!
//! assert!(Record::from_entries(&point, [("x", 3)]).is_err());
//! ```

pub mod config;
pub mod observability;
pub mod record;
pub mod schema;

pub use config::RegistryConfig;
pub use record::{Attributes, Class, Object, Record, Value};
pub use schema::{
    Equivalences, RecordError, RecordResult, RecordType, RecordTypeBuilder, RequiredAttribute,
    RequiredAttributes, SchemaValidator, TypeDeclaration, TypeRegistry, TypeTag,
};
