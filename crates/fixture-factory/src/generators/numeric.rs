//! Numeric value generators.

use fixture_core::{FieldType, FieldValue};

/// Clamp a sequence position into the signed range.
pub(crate) fn position(sequence: u64) -> i64 {
    i64::try_from(sequence).unwrap_or(i64::MAX)
}

/// Generate `start + sequence * step`.
pub fn generate_sequential(start: i64, step: i64, sequence: u64, field_type: &FieldType) -> FieldValue {
    let value = start.saturating_add(position(sequence).saturating_mul(step));
    fit_integer(value, field_type)
}

/// Generate the previous value plus `step`, or `start` if the previous value
/// is zero (a fresh or reset factory).
pub fn generate_increment_previous(
    start: i64,
    step: i64,
    previous: Option<&FieldValue>,
    field_type: &FieldType,
) -> FieldValue {
    let previous = previous.filter(|v| !v.is_zero());
    match (field_type, previous) {
        (FieldType::Float64, Some(FieldValue::Float64(f))) => FieldValue::Float64(f + step as f64),
        (_, Some(v)) => match v.as_i64() {
            Some(i) => fit_integer(i.saturating_add(step), field_type),
            None => fit_integer(start, field_type),
        },
        (_, None) => fit_integer(start, field_type),
    }
}

/// Represent an integer in the field's numeric type.
///
/// `int` fields saturate at the 32-bit bounds.
pub fn fit_integer(value: i64, field_type: &FieldType) -> FieldValue {
    match field_type {
        FieldType::Int32 => {
            FieldValue::Int32(value.clamp(i32::MIN as i64, i32::MAX as i64) as i32)
        }
        FieldType::Float64 => FieldValue::Float64(value as f64),
        _ => FieldValue::Int64(value),
    }
}

/// Whether numeric generators can target this field type.
pub fn accepts(field_type: &FieldType) -> bool {
    matches!(
        field_type,
        FieldType::Int32 | FieldType::Int64 | FieldType::Float64 | FieldType::Json
    )
}
