//! Core types for the fixture-forge framework.
//!
//! This crate provides the foundational types the factory builds on:
//!
//! - [`FieldType`] - Types a record field can declare
//! - [`FieldValue`] - Tagged field values and their zero values
//! - [`Record`] - The schema contract (enumerate, read, write and zero fields by name)
//! - [`DynamicRecord`] - A record whose shape is a runtime [`RecordSchema`]
//! - [`FixtureSchema`] - Fixture definitions loaded from YAML
//!
//! # Architecture
//!
//! ```text
//! fixture-core (this crate)
//!    │
//!    ├─── fixture-factory  (Factory/Builder merge engine, blueprint generators)
//!    │
//!    └─── fixture-jsonl    (insert hook writing records as JSON lines)
//! ```
//!
//! # Example
//!
//! ```rust
//! use fixture_core::{impl_record, FieldValue, Record};
//!
//! #[derive(Debug, Clone, Default)]
//! struct User {
//!     id: i64,
//!     email: String,
//! }
//!
//! impl_record!(User { id, email });
//!
//! let user = User { id: 1, email: String::new() };
//! assert_eq!(user.get_field("id").unwrap(), FieldValue::Int64(1));
//! assert!(user.is_field_zero("email").unwrap());
//! ```

pub mod json;
pub mod record;
pub mod schema;
pub mod types;
pub mod values;

#[doc(hidden)]
pub use paste;

// Re-exports for convenience
pub use record::{DynamicRecord, Record, RecordError};
pub use schema::{
    FieldDefinition, FixtureDefinition, FixtureSchema, GeneratorConfig, RecordSchema, SchemaError,
    TraitDefinition,
};
pub use types::FieldType;
pub use values::{FieldValue, FromFieldValue, ToFieldValue};
