//! Records and attribute values
//!
//! A record merges an optional mapping and named arguments into one
//! attribute set, then exposes every key as a named field.
//!
//! # Design Principles
//!
//! - Named arguments win over mapping entries
//! - Validation follows the record type's toggle
//! - Fields stay mutable after construction
//! - Explicit accessors, no reflection

mod instance;
mod value;

pub use instance::{Attributes, Record};
pub use value::{Class, Object, Value};
