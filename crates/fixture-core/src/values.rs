//! Value representations for fixture records.
//!
//! `FieldValue` is the tagged value every record field is read and written
//! through. The factory's overlay rules only ever ask two questions of a
//! value: "is it the zero value?" and "what is the zero value of this field?".

use crate::types::FieldType;
use chrono::{DateTime, Utc};
use serde_yaml::Value as YamlValue;
use std::collections::BTreeMap;
use uuid::Uuid;

/// Tagged value of one record field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Unset value
    Null,

    /// Boolean value
    Bool(bool),

    /// 32-bit signed integer
    Int32(i32),

    /// 64-bit signed integer
    Int64(i64),

    /// 64-bit floating point
    Float64(f64),

    /// String value
    String(String),

    /// Binary data
    Bytes(Vec<u8>),

    /// UUID value
    Uuid(Uuid),

    /// Date/time with timezone
    DateTime(DateTime<Utc>),

    /// Array of values
    Array(Vec<FieldValue>),

    /// Object/map of values
    Object(BTreeMap<String, FieldValue>),
}

impl FieldValue {
    /// Zero value of a field with the given type.
    ///
    /// Nullable fields, timestamps and JSON documents are unset (`Null`);
    /// everything else takes its type's empty value.
    pub fn zero_for(field_type: &FieldType, nullable: bool) -> Self {
        if nullable {
            return Self::Null;
        }
        match field_type {
            FieldType::Bool => Self::Bool(false),
            FieldType::Int32 => Self::Int32(0),
            FieldType::Int64 => Self::Int64(0),
            FieldType::Float64 => Self::Float64(0.0),
            FieldType::Text | FieldType::VarChar { .. } => Self::String(String::new()),
            FieldType::Bytes => Self::Bytes(Vec::new()),
            FieldType::Uuid => Self::Uuid(Uuid::nil()),
            FieldType::TimestampTz | FieldType::Json => Self::Null,
            FieldType::Array { .. } => Self::Array(Vec::new()),
        }
    }

    /// Check if this value is a zero value.
    ///
    /// A timestamp at the Unix epoch counts as zero, since that is what
    /// `DateTime::<Utc>::default()` produces for non-optional struct fields.
    pub fn is_zero(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Bool(b) => !*b,
            Self::Int32(i) => *i == 0,
            Self::Int64(i) => *i == 0,
            Self::Float64(f) => *f == 0.0,
            Self::String(s) => s.is_empty(),
            Self::Bytes(b) => b.is_empty(),
            Self::Uuid(u) => u.is_nil(),
            Self::DateTime(dt) => *dt == DateTime::<Utc>::default(),
            Self::Array(arr) => arr.is_empty(),
            Self::Object(obj) => obj.is_empty(),
        }
    }

    /// Check if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Convert this value into the representation `field_type` expects.
    ///
    /// Returns `None` when the value cannot be stored in a field of that
    /// type. `Null` is accepted by every type.
    pub fn coerce(self, field_type: &FieldType) -> Option<Self> {
        match (field_type, self) {
            (_, Self::Null) => Some(Self::Null),
            (FieldType::Bool, v @ Self::Bool(_)) => Some(v),
            (FieldType::Int32, v @ Self::Int32(_)) => Some(v),
            (FieldType::Int32, Self::Int64(i)) => i32::try_from(i).ok().map(Self::Int32),
            (FieldType::Int64, v @ Self::Int64(_)) => Some(v),
            (FieldType::Int64, Self::Int32(i)) => Some(Self::Int64(i as i64)),
            (FieldType::Float64, v @ Self::Float64(_)) => Some(v),
            (FieldType::Float64, Self::Int32(i)) => Some(Self::Float64(i as f64)),
            (FieldType::Float64, Self::Int64(i)) => Some(Self::Float64(i as f64)),
            (FieldType::Text, v @ Self::String(_)) => Some(v),
            (FieldType::VarChar { length }, Self::String(s)) => {
                (s.chars().count() <= *length as usize).then_some(Self::String(s))
            }
            (FieldType::Bytes, v @ Self::Bytes(_)) => Some(v),
            (FieldType::Uuid, v @ Self::Uuid(_)) => Some(v),
            (FieldType::Uuid, Self::String(s)) => Uuid::parse_str(&s).ok().map(Self::Uuid),
            (FieldType::TimestampTz, v @ Self::DateTime(_)) => Some(v),
            (FieldType::TimestampTz, Self::String(s)) => DateTime::parse_from_rfc3339(&s)
                .ok()
                .map(|dt| Self::DateTime(dt.with_timezone(&Utc))),
            (FieldType::Json, v) => Some(v),
            (FieldType::Array { element_type }, Self::Array(items)) => items
                .into_iter()
                .map(|item| item.coerce(element_type))
                .collect::<Option<Vec<_>>>()
                .map(Self::Array),
            _ => None,
        }
    }

    /// Convert a YAML literal into a value.
    pub fn from_yaml(yaml: &YamlValue) -> Self {
        match yaml {
            YamlValue::Null => Self::Null,
            YamlValue::Bool(b) => Self::Bool(*b),
            YamlValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Self::Int64(i)
                } else if let Some(f) = n.as_f64() {
                    Self::Float64(f)
                } else {
                    Self::String(n.to_string())
                }
            }
            YamlValue::String(s) => Self::String(s.clone()),
            YamlValue::Sequence(arr) => Self::Array(arr.iter().map(Self::from_yaml).collect()),
            YamlValue::Mapping(map) => Self::Object(
                map.iter()
                    .filter_map(|(k, v)| Some((k.as_str()?.to_string(), Self::from_yaml(v))))
                    .collect(),
            ),
            YamlValue::Tagged(tagged) => Self::from_yaml(&tagged.value),
        }
    }

    /// Try to get this value as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get this value as an i64.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int64(i) => Some(*i),
            Self::Int32(i) => Some(*i as i64),
            _ => None,
        }
    }

    /// Try to get this value as an f64.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float64(f) => Some(*f),
            _ => None,
        }
    }

    /// Try to get this value as a string reference.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get this value as a DateTime.
    pub fn as_datetime(&self) -> Option<&DateTime<Utc>> {
        match self {
            Self::DateTime(dt) => Some(dt),
            _ => None,
        }
    }
}

/// Conversion from a Rust field into a `FieldValue`.
pub trait ToFieldValue {
    /// Read the field as a tagged value.
    fn to_field_value(&self) -> FieldValue;
}

/// Conversion from a `FieldValue` back into a Rust field.
pub trait FromFieldValue: Sized {
    /// Returns `None` when the value has the wrong shape for this type.
    fn from_field_value(value: FieldValue) -> Option<Self>;
}

macro_rules! scalar_field_value {
    ($ty:ty, $variant:ident) => {
        impl ToFieldValue for $ty {
            fn to_field_value(&self) -> FieldValue {
                FieldValue::$variant(self.clone())
            }
        }

        impl FromFieldValue for $ty {
            fn from_field_value(value: FieldValue) -> Option<Self> {
                match value {
                    FieldValue::$variant(v) => Some(v),
                    _ => None,
                }
            }
        }
    };
}

scalar_field_value!(bool, Bool);
scalar_field_value!(f64, Float64);
scalar_field_value!(String, String);
scalar_field_value!(Vec<u8>, Bytes);
scalar_field_value!(Uuid, Uuid);
scalar_field_value!(DateTime<Utc>, DateTime);

impl ToFieldValue for i32 {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::Int32(*self)
    }
}

impl FromFieldValue for i32 {
    fn from_field_value(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Int32(i) => Some(i),
            FieldValue::Int64(i) => i32::try_from(i).ok(),
            _ => None,
        }
    }
}

impl ToFieldValue for i64 {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::Int64(*self)
    }
}

impl FromFieldValue for i64 {
    fn from_field_value(value: FieldValue) -> Option<Self> {
        value.as_i64()
    }
}

impl ToFieldValue for u32 {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::Int64(*self as i64)
    }
}

impl FromFieldValue for u32 {
    fn from_field_value(value: FieldValue) -> Option<Self> {
        value.as_i64().and_then(|i| u32::try_from(i).ok())
    }
}

impl ToFieldValue for serde_json::Value {
    fn to_field_value(&self) -> FieldValue {
        crate::json::json_to_field_value(self)
    }
}

impl FromFieldValue for serde_json::Value {
    fn from_field_value(value: FieldValue) -> Option<Self> {
        Some(crate::json::field_value_to_json(&value))
    }
}

impl<T: ToFieldValue> ToFieldValue for Option<T> {
    fn to_field_value(&self) -> FieldValue {
        match self {
            Some(v) => v.to_field_value(),
            None => FieldValue::Null,
        }
    }
}

impl<T: FromFieldValue> FromFieldValue for Option<T> {
    fn from_field_value(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Null => Some(None),
            v => T::from_field_value(v).map(Some),
        }
    }
}

impl<T: ToFieldValue> ToFieldValue for Vec<T> {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::Array(self.iter().map(ToFieldValue::to_field_value).collect())
    }
}

impl<T: FromFieldValue> FromFieldValue for Vec<T> {
    fn from_field_value(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Array(items) => items.into_iter().map(T::from_field_value).collect(),
            _ => None,
        }
    }
}
