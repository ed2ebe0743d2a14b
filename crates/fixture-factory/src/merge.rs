//! Field-level merge primitives.

use fixture_core::{Record, RecordError};

/// Copy the non-zero fields of `src` onto `dst`.
///
/// Zero-valued fields in `src` never overwrite `dst`; only [`force_zero`]
/// can blank a field.
pub fn overlay<R: Record>(dst: &mut R, src: &R) -> Result<(), RecordError> {
    if !dst.same_shape(src) {
        return Err(RecordError::ShapeMismatch {
            expected: dst.record_name().to_string(),
            found: src.record_name().to_string(),
        });
    }
    for name in src.field_names() {
        if src.is_field_zero(name)? {
            continue;
        }
        dst.set_field(name, src.get_field(name)?)?;
    }
    Ok(())
}

/// Reset each named field of `record` to its zero value.
pub fn force_zero<R: Record>(record: &mut R, fields: &[String]) -> Result<(), RecordError> {
    for field in fields {
        record.zero_field(field)?;
    }
    Ok(())
}
