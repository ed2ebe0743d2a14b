//! Pattern-based string generator.
//!
//! Supports placeholders:
//! - `{index}` - sequence position
//! - `{next}` - sequence position + 1

use fixture_core::{FieldType, FieldValue};

/// Generate a string based on a pattern with placeholders.
///
/// Output longer than a `var_char` field's length is cut to fit.
pub fn generate_pattern(pattern: &str, sequence: u64, field_type: &FieldType) -> FieldValue {
    let mut result = pattern.replace("{index}", &sequence.to_string());
    result = result.replace("{next}", &sequence.saturating_add(1).to_string());

    if let FieldType::VarChar { length } = field_type {
        if let Some((cut, _)) = result.char_indices().nth(*length as usize) {
            result.truncate(cut);
        }
    }

    FieldValue::String(result)
}

/// Whether a pattern can target this field type.
pub fn accepts(field_type: &FieldType) -> bool {
    matches!(
        field_type,
        FieldType::Text | FieldType::VarChar { .. } | FieldType::Json
    )
}
