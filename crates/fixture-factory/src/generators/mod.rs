//! Declarative blueprints compiled from schema field generators.
//!
//! Each field of a [`RecordSchema`] may carry a [`GeneratorConfig`]. The
//! configs are checked against the field types once, up front, and then
//! combined into a [`Blueprint<DynamicRecord>`] that fills every generated
//! field for a given sequence position.

pub mod numeric;
pub mod pattern;
pub mod static_value;
pub mod timestamp;

use crate::error::FactoryError;
use crate::layers::Blueprint;
use chrono::{DateTime, Utc};
use fixture_core::{
    DynamicRecord, FieldDefinition, FieldType, FieldValue, GeneratorConfig, Record, RecordSchema,
};
use std::sync::Arc;

/// Generator for one field, validated against the field type.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldGenerator {
    field: String,
    field_type: FieldType,
    kind: GeneratorKind,
}

#[derive(Debug, Clone, PartialEq)]
enum GeneratorKind {
    Sequential { start: i64, step: i64 },
    Pattern(String),
    Static(FieldValue),
    TimestampSequence { start: DateTime<Utc>, interval_secs: i64 },
    IncrementPrevious { start: i64, step: i64 },
    Null,
}

impl FieldGenerator {
    /// Compile the generator of `field`, if it has one.
    pub fn compile(field: &FieldDefinition) -> Result<Option<Self>, FactoryError> {
        let Some(config) = &field.generator else {
            return Ok(None);
        };
        let invalid = |reason: String| FactoryError::Generator {
            field: field.name.clone(),
            reason,
        };
        let requires = |what: &str| invalid(format!("{what} cannot target a '{}' field", field.field_type));

        let kind = match config {
            GeneratorConfig::Sequential { start, step } => {
                if !numeric::accepts(&field.field_type) {
                    return Err(requires("sequential"));
                }
                GeneratorKind::Sequential {
                    start: *start,
                    step: *step,
                }
            }
            GeneratorConfig::Pattern { pattern } => {
                if !pattern::accepts(&field.field_type) {
                    return Err(requires("pattern"));
                }
                GeneratorKind::Pattern(pattern.clone())
            }
            GeneratorConfig::Static { value } => {
                let value = static_value::compile_static(value, &field.field_type)
                    .ok_or_else(|| invalid(format!("static value does not fit '{}'", field.field_type)))?;
                GeneratorKind::Static(value)
            }
            GeneratorConfig::TimestampSequence {
                start,
                interval_secs,
            } => {
                if !matches!(field.field_type, FieldType::TimestampTz | FieldType::Json) {
                    return Err(requires("timestamp_sequence"));
                }
                let start = timestamp::parse_timestamp(start)
                    .ok_or_else(|| invalid(format!("cannot parse start timestamp '{start}'")))?;
                GeneratorKind::TimestampSequence {
                    start,
                    interval_secs: *interval_secs,
                }
            }
            GeneratorConfig::IncrementPrevious { start, step } => {
                if !numeric::accepts(&field.field_type) {
                    return Err(requires("increment_previous"));
                }
                GeneratorKind::IncrementPrevious {
                    start: *start,
                    step: *step,
                }
            }
            GeneratorConfig::Null => GeneratorKind::Null,
        };

        Ok(Some(Self {
            field: field.name.clone(),
            field_type: field.field_type.clone(),
            kind,
        }))
    }

    /// Name of the generated field.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Value for `sequence`, given the previous record's value of this field.
    pub fn generate(&self, sequence: u64, previous: Option<&FieldValue>) -> FieldValue {
        match &self.kind {
            GeneratorKind::Sequential { start, step } => {
                numeric::generate_sequential(*start, *step, sequence, &self.field_type)
            }
            GeneratorKind::Pattern(p) => pattern::generate_pattern(p, sequence, &self.field_type),
            GeneratorKind::Static(value) => value.clone(),
            GeneratorKind::TimestampSequence {
                start,
                interval_secs,
            } => timestamp::generate_timestamp_sequence(*start, *interval_secs, sequence),
            GeneratorKind::IncrementPrevious { start, step } => {
                numeric::generate_increment_previous(*start, *step, previous, &self.field_type)
            }
            GeneratorKind::Null => FieldValue::Null,
        }
    }
}

/// Compile every field generator of `schema`.
pub fn compile_generators(schema: &RecordSchema) -> Result<Vec<FieldGenerator>, FactoryError> {
    let mut generators = Vec::new();
    for field in &schema.fields {
        if let Some(generator) = FieldGenerator::compile(field)? {
            generators.push(generator);
        }
    }
    Ok(generators)
}

impl Blueprint<DynamicRecord> {
    /// Blueprint filling each field that declares a generator.
    ///
    /// Fields without a generator stay zero. A generated value the field
    /// does not accept fails the construction.
    pub fn from_schema(schema: &Arc<RecordSchema>) -> Result<Self, FactoryError> {
        let generators = compile_generators(schema)?;
        let schema = Arc::clone(schema);
        Ok(Blueprint::try_new(move |sequence, previous: &DynamicRecord| {
            let mut record = DynamicRecord::new(Arc::clone(&schema));
            for generator in &generators {
                let value = generator.generate(sequence, previous.get(generator.field()));
                record.set_field(generator.field(), value)?;
            }
            Ok(record)
        }))
    }
}
