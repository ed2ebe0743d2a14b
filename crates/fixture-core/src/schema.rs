//! Schema definitions for fixture records.
//!
//! ## Type Hierarchy
//!
//! **Base types** (no generators needed to use them):
//! - `FieldDefinition` - Single field metadata (optionally with a generator)
//! - `RecordSchema` - Named, ordered list of fields
//!
//! **Fixture file types** (what the YAML schema file holds):
//! - `TraitDefinition` - Named override layer (`set` values + `zero` list)
//! - `FixtureDefinition` - Record fields plus its traits
//! - `FixtureSchema` - Collection of fixture definitions

use crate::record::{DynamicRecord, Record};
use crate::types::FieldType;
use crate::values::FieldValue;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::path::Path;
use std::sync::Arc;

// ============================================================================
// Error Types
// ============================================================================

/// Error type for schema operations.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// Error reading schema file
    #[error("Failed to read schema file: {0}")]
    IoError(#[from] std::io::Error),

    /// Error parsing YAML
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// Record not found in schema
    #[error("Record not found: {0}")]
    RecordNotFound(String),

    /// Trait not found for a record
    #[error("Trait '{trait_name}' not defined for record '{record}'")]
    TraitNotFound { record: String, trait_name: String },

    /// Same field declared twice
    #[error("Field '{field}' declared more than once in record '{record}'")]
    DuplicateField { record: String, field: String },

    /// Trait references a field the record does not have
    #[error("Trait '{trait_name}' of record '{record}' references unknown field '{field}'")]
    UnknownTraitField {
        record: String,
        trait_name: String,
        field: String,
    },

    /// Trait value does not fit the field type
    #[error("Trait '{trait_name}' of record '{record}' sets '{field}' to a value that is not a {expected}")]
    InvalidTraitValue {
        record: String,
        trait_name: String,
        field: String,
        expected: FieldType,
    },
}

// ============================================================================
// Base Types
// ============================================================================

/// Generator configuration for a field.
///
/// Generators are deterministic: a field's value depends only on the
/// sequence position and the previously built record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GeneratorConfig {
    /// `start + position * step`
    Sequential {
        /// Value at position 0
        #[serde(default)]
        start: i64,
        /// Increment per position
        #[serde(default = "default_step")]
        step: i64,
    },

    /// Pattern string with `{index}` (position) and `{next}` (position + 1)
    Pattern {
        /// Pattern string
        pattern: String,
    },

    /// The same value for every record
    Static {
        /// The static value to use
        value: serde_yaml::Value,
    },

    /// `start + position * interval_secs`
    TimestampSequence {
        /// First timestamp (RFC 3339 or `YYYY-MM-DD`)
        start: String,
        /// Seconds between consecutive records
        #[serde(default = "default_interval_secs")]
        interval_secs: i64,
    },

    /// Previous record's value plus `step`, or `start` when the previous
    /// record holds the zero value.
    IncrementPrevious {
        /// Value used when there is no previous value
        #[serde(default)]
        start: i64,
        /// Increment over the previous value
        #[serde(default = "default_step")]
        step: i64,
    },

    /// Always the zero value
    Null,
}

fn default_step() -> i64 {
    1
}

fn default_interval_secs() -> i64 {
    60
}

/// Field definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    /// Field name
    pub name: String,

    /// Field type
    #[serde(rename = "type")]
    pub field_type: FieldType,

    /// Whether this field is nullable
    #[serde(default)]
    pub nullable: bool,

    /// Blueprint generator for this field
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generator: Option<GeneratorConfig>,
}

impl FieldDefinition {
    /// Create a new field definition.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            nullable: false,
            generator: None,
        }
    }

    /// Create a new nullable field definition.
    pub fn nullable(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            nullable: true,
            ..Self::new(name, field_type)
        }
    }

    /// Attach a generator to this field.
    pub fn with_generator(mut self, generator: GeneratorConfig) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Zero value of this field.
    pub fn zero_value(&self) -> FieldValue {
        FieldValue::zero_for(&self.field_type, self.nullable)
    }
}

/// Record schema: a named, ordered set of typed fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordSchema {
    /// Record name
    pub name: String,

    /// Field definitions, in declaration order
    pub fields: Vec<FieldDefinition>,
}

impl RecordSchema {
    /// Create a new record schema.
    pub fn new(name: impl Into<String>, fields: Vec<FieldDefinition>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    /// Position of a field by name.
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Get a field definition by name.
    pub fn get_field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Get all field names.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    fn check_duplicates(&self) -> Result<(), SchemaError> {
        let mut seen = HashSet::new();
        for field in &self.fields {
            if !seen.insert(field.name.as_str()) {
                return Err(SchemaError::DuplicateField {
                    record: self.name.clone(),
                    field: field.name.clone(),
                });
            }
        }
        Ok(())
    }
}

// ============================================================================
// Fixture File Types
// ============================================================================

/// Named override layer as written in a schema file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TraitDefinition {
    /// Values overlaid onto the record
    #[serde(default)]
    pub set: BTreeMap<String, serde_yaml::Value>,

    /// Fields forced to their zero value after `set`
    #[serde(default)]
    pub zero: Vec<String>,
}

impl TraitDefinition {
    /// Build the override record for this trait.
    pub fn to_override(
        &self,
        trait_name: &str,
        schema: &Arc<RecordSchema>,
    ) -> Result<DynamicRecord, SchemaError> {
        let mut record = DynamicRecord::new(Arc::clone(schema));
        for (field, yaml) in &self.set {
            let definition =
                schema
                    .get_field(field)
                    .ok_or_else(|| SchemaError::UnknownTraitField {
                        record: schema.name.clone(),
                        trait_name: trait_name.to_string(),
                        field: field.clone(),
                    })?;
            record
                .set_field(field, FieldValue::from_yaml(yaml))
                .map_err(|_| SchemaError::InvalidTraitValue {
                    record: schema.name.clone(),
                    trait_name: trait_name.to_string(),
                    field: field.clone(),
                    expected: definition.field_type.clone(),
                })?;
        }
        Ok(record)
    }

    fn check_zero_fields(&self, trait_name: &str, schema: &RecordSchema) -> Result<(), SchemaError> {
        for field in &self.zero {
            if schema.get_field(field).is_none() {
                return Err(SchemaError::UnknownTraitField {
                    record: schema.name.clone(),
                    trait_name: trait_name.to_string(),
                    field: field.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Record fields plus the traits defined for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureDefinition {
    /// Record name
    pub name: String,

    /// Field definitions with optional generators
    pub fields: Vec<FieldDefinition>,

    /// Named traits
    #[serde(default)]
    pub traits: BTreeMap<String, TraitDefinition>,
}

impl FixtureDefinition {
    /// Convert to a base RecordSchema (generators are kept on the fields).
    pub fn to_record_schema(&self) -> RecordSchema {
        RecordSchema::new(self.name.clone(), self.fields.clone())
    }

    /// Get a trait by name.
    pub fn get_trait(&self, name: &str) -> Result<&TraitDefinition, SchemaError> {
        self.traits
            .get(name)
            .ok_or_else(|| SchemaError::TraitNotFound {
                record: self.name.clone(),
                trait_name: name.to_string(),
            })
    }

    /// Check field names and trait references.
    pub fn validate(&self) -> Result<(), SchemaError> {
        let schema = Arc::new(self.to_record_schema());
        schema.check_duplicates()?;
        for (trait_name, definition) in &self.traits {
            definition.to_override(trait_name, &schema)?;
            definition.check_zero_fields(trait_name, &schema)?;
        }
        Ok(())
    }
}

fn default_version() -> u32 {
    1
}

/// Full fixture schema loaded from a YAML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureSchema {
    /// Schema version
    #[serde(default = "default_version")]
    pub version: u32,

    /// Record definitions
    pub records: Vec<FixtureDefinition>,

    /// Cached record lookup (not serialized)
    #[serde(skip)]
    record_map: HashMap<String, usize>,
}

impl FixtureSchema {
    /// Load schema from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SchemaError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse schema from YAML string.
    ///
    /// Every record is validated, so a trait that names a missing field is
    /// rejected here rather than when the first fixture is built.
    pub fn from_yaml(yaml: &str) -> Result<Self, SchemaError> {
        let mut schema: FixtureSchema = serde_yaml::from_str(yaml)?;
        schema.build_record_map();
        for record in &schema.records {
            record.validate()?;
        }
        Ok(schema)
    }

    /// Build the internal record lookup map.
    fn build_record_map(&mut self) {
        self.record_map = self
            .records
            .iter()
            .enumerate()
            .map(|(idx, record)| (record.name.clone(), idx))
            .collect();
    }

    /// Get a record definition by name.
    pub fn get_record(&self, name: &str) -> Option<&FixtureDefinition> {
        self.record_map
            .get(name)
            .and_then(|&idx| self.records.get(idx))
    }

    /// Get a record definition by name, or fail.
    pub fn record(&self, name: &str) -> Result<&FixtureDefinition, SchemaError> {
        self.get_record(name)
            .ok_or_else(|| SchemaError::RecordNotFound(name.to_string()))
    }

    /// Get all record names in the schema.
    pub fn record_names(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.name.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_SCHEMA: &str = r#"
version: 1

records:
  - name: posts
    fields:
      - name: id
        type: big_int
        generator:
          type: sequential
          start: 1
      - name: title
        type:
          type: var_char
          length: 64
        generator:
          type: pattern
          pattern: "Post #{next}"
      - name: status
        type: text
      - name: author_id
        type: int
      - name: published_at
        type: timestamp_tz
        nullable: true
    traits:
      draft:
        set:
          status: draft
        zero: [published_at]
      published:
        set:
          status: published
          published_at: "2024-01-01T00:00:00Z"
"#;

    #[test]
    fn test_parse_fixture_schema() {
        let schema = FixtureSchema::from_yaml(SAMPLE_SCHEMA).unwrap();

        assert_eq!(schema.version, 1);
        assert_eq!(schema.record_names(), vec!["posts"]);

        let posts = schema.get_record("posts").unwrap();
        assert_eq!(posts.fields.len(), 5);
        assert_eq!(posts.traits.len(), 2);
        assert!(matches!(
            posts.fields[0].generator,
            Some(GeneratorConfig::Sequential { start: 1, step: 1 })
        ));
        assert_eq!(posts.fields[1].field_type, FieldType::VarChar { length: 64 });
    }

    #[test]
    fn test_record_not_found() {
        let schema = FixtureSchema::from_yaml(SAMPLE_SCHEMA).unwrap();
        assert!(matches!(
            schema.record("comments"),
            Err(SchemaError::RecordNotFound(_))
        ));
    }

    #[test]
    fn test_trait_not_found() {
        let schema = FixtureSchema::from_yaml(SAMPLE_SCHEMA).unwrap();
        let posts = schema.record("posts").unwrap();
        assert!(matches!(
            posts.get_trait("archived"),
            Err(SchemaError::TraitNotFound { .. })
        ));
    }

    #[test]
    fn test_trait_override_record() {
        let schema = FixtureSchema::from_yaml(SAMPLE_SCHEMA).unwrap();
        let posts = schema.record("posts").unwrap();
        let record_schema = Arc::new(posts.to_record_schema());

        let published = posts
            .get_trait("published")
            .unwrap()
            .to_override("published", &record_schema)
            .unwrap();
        assert_eq!(
            published.get_field("status").unwrap(),
            FieldValue::String("published".to_string())
        );
        assert!(matches!(
            published.get_field("published_at").unwrap(),
            FieldValue::DateTime(_)
        ));
        assert!(published.is_field_zero("id").unwrap());
    }

    #[test]
    fn test_trait_with_unknown_zero_field_rejected() {
        let yaml = r#"
records:
  - name: posts
    fields:
      - name: status
        type: text
    traits:
      draft:
        zero: [published_at]
"#;
        let result = FixtureSchema::from_yaml(yaml);
        assert!(matches!(
            result,
            Err(SchemaError::UnknownTraitField { ref field, .. }) if field == "published_at"
        ));
    }

    #[test]
    fn test_trait_with_unknown_set_field_rejected() {
        let yaml = r#"
records:
  - name: posts
    fields:
      - name: status
        type: text
    traits:
      draft:
        set:
          state: draft
"#;
        assert!(matches!(
            FixtureSchema::from_yaml(yaml),
            Err(SchemaError::UnknownTraitField { .. })
        ));
    }

    #[test]
    fn test_trait_with_wrong_value_type_rejected() {
        let yaml = r#"
records:
  - name: posts
    fields:
      - name: author_id
        type: int
    traits:
      bad:
        set:
          author_id: "seven"
"#;
        assert!(matches!(
            FixtureSchema::from_yaml(yaml),
            Err(SchemaError::InvalidTraitValue { .. })
        ));
    }

    #[test]
    fn test_duplicate_field_rejected() {
        let yaml = r#"
records:
  - name: posts
    fields:
      - name: status
        type: text
      - name: status
        type: int
"#;
        assert!(matches!(
            FixtureSchema::from_yaml(yaml),
            Err(SchemaError::DuplicateField { .. })
        ));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fixtures.yaml");
        std::fs::write(&path, SAMPLE_SCHEMA).unwrap();

        let schema = FixtureSchema::from_file(&path).unwrap();
        assert!(schema.get_record("posts").is_some());

        let missing = FixtureSchema::from_file(dir.path().join("missing.yaml"));
        assert!(matches!(missing, Err(SchemaError::IoError(_))));
    }

    #[test]
    fn test_field_definition_serde() {
        let field = FieldDefinition::nullable("published_at", FieldType::TimestampTz);

        let yaml = serde_yaml::to_string(&field).unwrap();
        let parsed: FieldDefinition = serde_yaml::from_str(&yaml).unwrap();

        assert_eq!(field, parsed);
        assert_eq!(parsed.zero_value(), FieldValue::Null);
    }
}
