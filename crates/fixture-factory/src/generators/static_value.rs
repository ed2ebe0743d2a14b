//! Static value generator.

use fixture_core::{FieldType, FieldValue};
use serde_yaml::Value as YamlValue;

/// Convert a YAML literal into a value of the field's type.
///
/// Returns `None` if the literal cannot be stored in the field.
pub fn compile_static(yaml: &YamlValue, field_type: &FieldType) -> Option<FieldValue> {
    FieldValue::from_yaml(yaml).coerce(field_type)
}
