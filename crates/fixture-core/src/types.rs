//! Field types for fixture records.
//!
//! This module defines `FieldType`, the set of column types a fixture record
//! schema can declare. Each type knows its zero value (see
//! [`FieldValue::zero_for`](crate::values::FieldValue::zero_for)), which is what
//! the overlay rules in the factory compare against.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;

/// Type of a single field in a record schema.
///
/// # YAML Format
///
/// Simple types can be specified as strings:
/// ```yaml
/// type: uuid
/// type: int
/// type: text
/// ```
///
/// Complex types use object format:
/// ```yaml
/// type:
///   type: var_char
///   length: 255
/// type:
///   type: array
///   element_type: int
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum FieldType {
    /// Boolean value
    Bool,

    /// 32-bit signed integer
    Int32,

    /// 64-bit signed integer
    Int64,

    /// 64-bit IEEE 754 floating point
    Float64,

    /// Unlimited text
    Text,

    /// Variable-length character string with max length
    VarChar {
        /// Maximum length
        length: u16,
    },

    /// Binary data
    Bytes,

    /// UUID (128-bit)
    Uuid,

    /// Timestamp with timezone
    TimestampTz,

    /// JSON document
    Json,

    /// Array of a specific type
    Array {
        /// Element type
        element_type: Box<FieldType>,
    },
}

impl FieldType {
    /// Name used in YAML and in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int32 => "int",
            Self::Int64 => "big_int",
            Self::Float64 => "double",
            Self::Text => "text",
            Self::VarChar { .. } => "var_char",
            Self::Bytes => "bytes",
            Self::Uuid => "uuid",
            Self::TimestampTz => "timestamp_tz",
            Self::Json => "json",
            Self::Array { .. } => "array",
        }
    }

    /// Whether values of this type are integers.
    pub fn is_integer(&self) -> bool {
        matches!(self, Self::Int32 | Self::Int64)
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::VarChar { length } => write!(f, "var_char({length})"),
            Self::Array { element_type } => write!(f, "array<{element_type}>"),
            other => f.write_str(other.name()),
        }
    }
}

// Supports both simple string format ("uuid", "int") and object format ({"type": "var_char", "length": 255})

impl Serialize for FieldType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeMap;

        match self {
            Self::VarChar { length } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("type", "var_char")?;
                map.serialize_entry("length", length)?;
                map.end()
            }
            Self::Array { element_type } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("type", "array")?;
                map.serialize_entry("element_type", element_type)?;
                map.end()
            }
            simple => serializer.serialize_str(simple.name()),
        }
    }
}

fn simple_type(name: &str) -> Option<FieldType> {
    match name {
        "bool" => Some(FieldType::Bool),
        "int" => Some(FieldType::Int32),
        "big_int" | "bigint" => Some(FieldType::Int64),
        "double" => Some(FieldType::Float64),
        "text" => Some(FieldType::Text),
        "bytes" => Some(FieldType::Bytes),
        "uuid" => Some(FieldType::Uuid),
        "timestamp_tz" | "timestamptz" => Some(FieldType::TimestampTz),
        "json" => Some(FieldType::Json),
        _ => None,
    }
}

impl<'de> Deserialize<'de> for FieldType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{Error, MapAccess, Visitor};

        struct FieldTypeVisitor;

        impl<'de> Visitor<'de> for FieldTypeVisitor {
            type Value = FieldType;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("a string or map representing a FieldType")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: Error,
            {
                simple_type(value).ok_or_else(|| E::custom(format!("unknown simple type: {value}")))
            }

            fn visit_map<M>(self, mut map: M) -> Result<Self::Value, M::Error>
            where
                M: MapAccess<'de>,
            {
                let mut type_name: Option<String> = None;
                let mut fields: HashMap<String, serde_yaml::Value> = HashMap::new();

                while let Some(key) = map.next_key::<String>()? {
                    if key == "type" {
                        type_name = Some(map.next_value()?);
                    } else {
                        fields.insert(key, map.next_value()?);
                    }
                }

                let type_name = type_name.ok_or_else(|| M::Error::missing_field("type"))?;

                if let Some(simple) = simple_type(&type_name) {
                    return Ok(simple);
                }

                match type_name.as_str() {
                    "var_char" | "varchar" => {
                        let length = get_field_required(&fields, "length")?;
                        Ok(FieldType::VarChar { length })
                    }
                    "array" => {
                        let element_type: FieldType = get_field_required(&fields, "element_type")?;
                        Ok(FieldType::Array {
                            element_type: Box::new(element_type),
                        })
                    }
                    _ => Err(M::Error::custom(format!("unknown type: {type_name}"))),
                }
            }
        }

        deserializer.deserialize_any(FieldTypeVisitor)
    }
}

fn get_field_required<T: for<'de> Deserialize<'de>, E: serde::de::Error>(
    fields: &HashMap<String, serde_yaml::Value>,
    key: &'static str,
) -> Result<T, E> {
    let value = fields.get(key).ok_or_else(|| E::missing_field(key))?;
    serde_yaml::from_value(value.clone())
        .map_err(|e| E::custom(format!("invalid field '{key}': {e}")))
}
