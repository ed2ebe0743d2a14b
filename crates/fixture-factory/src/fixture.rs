//! Factories for records declared in a fixture schema file.

use crate::builder::Builder;
use crate::error::FactoryError;
use crate::factory::Factory;
use crate::layers::{Blueprint, Trait};
use fixture_core::{
    DynamicRecord, FieldValue, FixtureDefinition, FixtureSchema, Record, RecordSchema, SchemaError,
};
use serde_yaml::Value as YamlValue;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// A record definition compiled into layers the factory understands.
#[derive(Debug, Clone)]
pub struct Fixture {
    schema: Arc<RecordSchema>,
    blueprint: Blueprint<DynamicRecord>,
    traits: BTreeMap<String, Trait<DynamicRecord>>,
}

impl Fixture {
    /// Compile a record definition: its generators into a blueprint and its
    /// traits into override layers.
    pub fn from_definition(definition: &FixtureDefinition) -> Result<Self, FactoryError> {
        definition.validate()?;
        let schema = Arc::new(definition.to_record_schema());
        let blueprint = Blueprint::from_schema(&schema)?;

        let mut traits = BTreeMap::new();
        for (name, trait_def) in &definition.traits {
            let values = trait_def.to_override(name, &schema)?;
            traits.insert(
                name.clone(),
                Trait::new(values).with_zero(trait_def.zero.iter().cloned()),
            );
        }

        debug!(
            record = %schema.name,
            traits = traits.len(),
            "compiled fixture"
        );
        Ok(Self {
            schema,
            blueprint,
            traits,
        })
    }

    /// Compile the record named `name` from a loaded schema.
    pub fn load(schema: &FixtureSchema, name: &str) -> Result<Self, FactoryError> {
        Self::from_definition(schema.record(name)?)
    }

    /// The record schema.
    pub fn schema(&self) -> &Arc<RecordSchema> {
        &self.schema
    }

    /// The blueprint compiled from the field generators.
    pub fn blueprint(&self) -> &Blueprint<DynamicRecord> {
        &self.blueprint
    }

    /// A zero-valued record.
    pub fn record(&self) -> DynamicRecord {
        DynamicRecord::new(Arc::clone(&self.schema))
    }

    /// A fresh factory for this record.
    pub fn factory(&self) -> Factory<DynamicRecord> {
        Factory::new(self.record())
    }

    /// Look up a trait by name.
    pub fn get_trait(&self, name: &str) -> Result<&Trait<DynamicRecord>, FactoryError> {
        self.traits.get(name).ok_or_else(|| {
            SchemaError::TraitNotFound {
                record: self.schema.name.clone(),
                trait_name: name.to_string(),
            }
            .into()
        })
    }

    /// Names of the declared traits, sorted.
    pub fn trait_names(&self) -> Vec<&str> {
        self.traits.keys().map(String::as_str).collect()
    }

    /// Override record from YAML literals keyed by field name.
    pub fn overrides(
        &self,
        values: &BTreeMap<String, YamlValue>,
    ) -> Result<DynamicRecord, FactoryError> {
        let mut record = self.record();
        for (field, yaml) in values {
            record.set_field(field, FieldValue::from_yaml(yaml))?;
        }
        Ok(record)
    }

    /// Builder on `factory` using this fixture's blueprint and the named
    /// traits, in order.
    pub fn builder<'f, S: AsRef<str>>(
        &self,
        factory: &'f Factory<DynamicRecord>,
        traits: &[S],
    ) -> Result<Builder<'f, DynamicRecord>, FactoryError> {
        let layers = traits
            .iter()
            .map(|name| self.get_trait(name.as_ref()).cloned())
            .collect::<Result<Vec<_>, _>>()?;
        factory.new_builder(Some(self.blueprint.clone()), layers)
    }
}
