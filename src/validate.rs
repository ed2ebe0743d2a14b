//! Validate command handler.

use anyhow::Context;
use clap::Args;
use fixture_core::FixtureSchema;
use fixture_factory::Fixture;
use serde::Serialize;
use std::path::PathBuf;

/// Arguments for `fixture-forge validate`.
#[derive(Args, Clone, Debug)]
pub struct ValidateArgs {
    /// Path to fixture schema YAML file
    #[arg(long, short = 's', env = "FIXTURE_SCHEMA")]
    pub schema: PathBuf,
}

/// One validated record.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RecordReport {
    pub name: String,
    pub fields: usize,
    pub traits: Vec<String>,
}

/// Load the schema and compile every record: field generators against their
/// field types, traits against the record's fields.
pub fn run_validate(args: &ValidateArgs) -> anyhow::Result<Vec<RecordReport>> {
    let schema = FixtureSchema::from_file(&args.schema)
        .with_context(|| format!("Failed to load schema file: {:?}", args.schema))?;

    let mut reports = Vec::with_capacity(schema.records.len());
    for definition in &schema.records {
        let fixture = Fixture::from_definition(definition)
            .with_context(|| format!("Record '{}' is invalid", definition.name))?;
        let report = RecordReport {
            name: definition.name.clone(),
            fields: fixture.schema().fields.len(),
            traits: fixture
                .trait_names()
                .into_iter()
                .map(str::to_string)
                .collect(),
        };
        tracing::info!(
            "Record '{}': {} fields, traits {:?}",
            report.name,
            report.fields,
            report.traits
        );
        reports.push(report);
    }
    Ok(reports)
}
