//! The record contract the factory builds against.
//!
//! A record is anything whose fields can be enumerated, read and written by
//! name as [`FieldValue`]s. Plain structs get an implementation from
//! [`impl_record!`](crate::impl_record); [`DynamicRecord`] covers schemas that
//! are only known at runtime (YAML fixture files).

use crate::schema::RecordSchema;
use crate::values::FieldValue;
use std::sync::Arc;

/// Error type for field access on a record.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RecordError {
    /// Field not declared by the record
    #[error("Field '{field}' not found in record '{record}'")]
    UnknownField { record: String, field: String },

    /// Value cannot be stored in the field
    #[error("Field '{field}' of record '{record}' cannot hold this value (expected {expected})")]
    TypeMismatch {
        record: String,
        field: String,
        expected: String,
    },

    /// Two records of the same kind disagree on their schema
    #[error("Record shape mismatch: expected '{expected}', found '{found}'")]
    ShapeMismatch { expected: String, found: String },
}

impl RecordError {
    /// Shorthand for [`RecordError::UnknownField`].
    pub fn unknown_field(record: &str, field: &str) -> Self {
        Self::UnknownField {
            record: record.to_string(),
            field: field.to_string(),
        }
    }
}

/// Schema contract for anything the factory can build.
pub trait Record: Clone {
    /// Name of the record kind, used in errors and logs.
    fn record_name(&self) -> &str;

    /// A zero-valued record of the same shape.
    fn zeroed(&self) -> Self;

    /// Field names in declaration order.
    fn field_names(&self) -> Vec<&str>;

    /// Read a field by name.
    fn get_field(&self, name: &str) -> Result<FieldValue, RecordError>;

    /// Write a field by name.
    fn set_field(&mut self, name: &str, value: FieldValue) -> Result<(), RecordError>;

    /// Whether the record declares `name`.
    fn has_field(&self, name: &str) -> bool {
        self.field_names().contains(&name)
    }

    /// Whether the field currently equals its zero value.
    ///
    /// An optional field is zero only when unset: `Some(0)` and
    /// `Some(false)` are values.
    fn is_field_zero(&self, name: &str) -> Result<bool, RecordError> {
        Ok(self.get_field(name)? == self.zeroed().get_field(name)?)
    }

    /// Reset a field to its zero value.
    fn zero_field(&mut self, name: &str) -> Result<(), RecordError> {
        let zero = self.zeroed().get_field(name)?;
        self.set_field(name, zero)
    }

    /// Whether `other` has the same fields as `self`.
    fn same_shape(&self, other: &Self) -> bool {
        self.field_names() == other.field_names()
    }
}

#[doc(hidden)]
pub fn type_name_of<T>(_: &T) -> &'static str {
    std::any::type_name::<T>()
}

/// Implement [`Record`] for a struct with named fields.
///
/// The struct must implement `Default` (its zero value) and every listed
/// field must implement [`ToFieldValue`](crate::ToFieldValue) and
/// [`FromFieldValue`](crate::FromFieldValue).
///
/// ```rust
/// use fixture_core::{impl_record, FieldValue, Record};
///
/// #[derive(Debug, Clone, Default)]
/// struct Post {
///     id: i64,
///     status: String,
/// }
///
/// impl_record!(Post { id, status });
///
/// let mut post = Post::default();
/// post.set_field("status", FieldValue::String("draft".into())).unwrap();
/// assert_eq!(post.status, "draft");
/// assert!(post.is_field_zero("id").unwrap());
/// assert_eq!(Post::STATUS_FIELD, "status");
/// ```
///
/// Each listed field also gets a `<FIELD>_FIELD` name constant on the
/// struct, for zero lists that should not spell field names by hand.
#[macro_export]
macro_rules! impl_record {
    ($ty:ident { $($field:ident),+ $(,)? }) => {
        $crate::paste::paste! {
            #[allow(dead_code)]
            impl $ty {
                $(
                    pub const [<$field:upper _FIELD>]: &'static str = stringify!($field);
                )+
            }
        }

        impl $crate::Record for $ty {
            fn record_name(&self) -> &str {
                stringify!($ty)
            }

            fn zeroed(&self) -> Self {
                <$ty as ::core::default::Default>::default()
            }

            fn field_names(&self) -> ::std::vec::Vec<&str> {
                ::std::vec![$(stringify!($field)),+]
            }

            fn get_field(
                &self,
                name: &str,
            ) -> ::core::result::Result<$crate::FieldValue, $crate::RecordError> {
                match name {
                    $(stringify!($field) => {
                        ::core::result::Result::Ok($crate::ToFieldValue::to_field_value(&self.$field))
                    })+
                    _ => ::core::result::Result::Err($crate::RecordError::unknown_field(
                        stringify!($ty),
                        name,
                    )),
                }
            }

            fn set_field(
                &mut self,
                name: &str,
                value: $crate::FieldValue,
            ) -> ::core::result::Result<(), $crate::RecordError> {
                match name {
                    $(stringify!($field) => {
                        let expected = $crate::record::type_name_of(&self.$field);
                        self.$field = $crate::FromFieldValue::from_field_value(value).ok_or_else(
                            || $crate::RecordError::TypeMismatch {
                                record: stringify!($ty).to_string(),
                                field: name.to_string(),
                                expected: expected.to_string(),
                            },
                        )?;
                        ::core::result::Result::Ok(())
                    })+
                    _ => ::core::result::Result::Err($crate::RecordError::unknown_field(
                        stringify!($ty),
                        name,
                    )),
                }
            }
        }
    };
}

/// Record whose shape is a runtime [`RecordSchema`].
///
/// Values are stored in schema field order. Writes are checked against the
/// field type and coerced (e.g. a YAML integer into an `int` field).
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicRecord {
    schema: Arc<RecordSchema>,
    values: Vec<FieldValue>,
}

impl DynamicRecord {
    /// Create a zero-valued record for `schema`.
    pub fn new(schema: Arc<RecordSchema>) -> Self {
        let values = schema.fields.iter().map(|f| f.zero_value()).collect();
        Self { schema, values }
    }

    /// Builder-style field assignment.
    pub fn with(
        mut self,
        name: &str,
        value: impl crate::ToFieldValue,
    ) -> Result<Self, RecordError> {
        self.set_field(name, value.to_field_value())?;
        Ok(self)
    }

    /// The schema this record follows.
    pub fn schema(&self) -> &Arc<RecordSchema> {
        &self.schema
    }

    /// Borrow a field value by name.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.schema
            .field_index(name)
            .and_then(|idx| self.values.get(idx))
    }

    /// Iterate over `(name, value)` pairs in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.schema
            .fields
            .iter()
            .map(|f| f.name.as_str())
            .zip(self.values.iter())
    }

    fn index_of(&self, name: &str) -> Result<usize, RecordError> {
        self.schema
            .field_index(name)
            .ok_or_else(|| RecordError::unknown_field(&self.schema.name, name))
    }
}

impl Record for DynamicRecord {
    fn record_name(&self) -> &str {
        &self.schema.name
    }

    fn zeroed(&self) -> Self {
        Self::new(Arc::clone(&self.schema))
    }

    fn field_names(&self) -> Vec<&str> {
        self.schema.field_names()
    }

    fn get_field(&self, name: &str) -> Result<FieldValue, RecordError> {
        let idx = self.index_of(name)?;
        Ok(self.values[idx].clone())
    }

    fn set_field(&mut self, name: &str, value: FieldValue) -> Result<(), RecordError> {
        let idx = self.index_of(name)?;
        let definition = &self.schema.fields[idx];
        if value.is_null() && !definition.nullable {
            // Non-nullable fields hold their typed zero instead of Null.
            self.values[idx] = definition.zero_value();
            return Ok(());
        }
        let coerced = value
            .coerce(&definition.field_type)
            .ok_or_else(|| RecordError::TypeMismatch {
                record: self.schema.name.clone(),
                field: name.to_string(),
                expected: definition.field_type.to_string(),
            })?;
        self.values[idx] = coerced;
        Ok(())
    }

    fn has_field(&self, name: &str) -> bool {
        self.schema.field_index(name).is_some()
    }

    fn is_field_zero(&self, name: &str) -> Result<bool, RecordError> {
        let idx = self.index_of(name)?;
        Ok(self.values[idx] == self.schema.fields[idx].zero_value())
    }

    fn zero_field(&mut self, name: &str) -> Result<(), RecordError> {
        let idx = self.index_of(name)?;
        self.values[idx] = self.schema.fields[idx].zero_value();
        Ok(())
    }

    fn same_shape(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.schema, &other.schema) || self.schema == other.schema
    }
}
