//! Generate command handler.

use anyhow::Context;
use clap::Args;
use fixture_core::FixtureSchema;
use fixture_factory::Fixture;
use fixture_jsonl::JsonlSink;
use serde::Serialize;
use serde_yaml::Value as YamlValue;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::rc::Rc;

/// Arguments for `fixture-forge generate`.
#[derive(Args, Clone, Debug)]
pub struct GenerateArgs {
    /// Path to fixture schema YAML file
    #[arg(long, short = 's', env = "FIXTURE_SCHEMA")]
    pub schema: PathBuf,

    /// Record to generate
    #[arg(long, short = 'r')]
    pub record: String,

    /// Number of records to insert
    #[arg(long, short = 'n', default_value = "1")]
    pub count: usize,

    /// Traits to apply, in order (repeatable or comma-separated)
    #[arg(long = "trait", value_name = "TRAIT", value_delimiter = ',')]
    pub traits: Vec<String>,

    /// Override applied to every record (format: field=yaml-value)
    #[arg(long = "set", value_name = "FIELD=VALUE")]
    pub set: Vec<String>,

    /// Fields forced to their zero value (repeatable or comma-separated)
    #[arg(long, value_name = "FIELD", value_delimiter = ',')]
    pub zero: Vec<String>,

    /// Output JSONL file
    #[arg(long, short = 'o')]
    pub output: PathBuf,

    /// Append to the output file instead of truncating it
    #[arg(long)]
    pub append: bool,

    /// Reset the factory sequence after the batch completes
    #[arg(long)]
    pub reset_after: bool,
}

/// Result of a generate run, printed as one JSON line.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateSummary {
    pub record: String,
    pub output: PathBuf,
    pub rows_written: u64,
    pub bytes_written: u64,
    /// Factory sequence position after the run
    pub sequence_index: u64,
    pub duration_ms: u128,
}

/// Parse a `field=value` assignment. The value is read as YAML, so
/// `count=3` is an integer and `name="3"` a string.
pub fn parse_assignment(raw: &str) -> anyhow::Result<(String, YamlValue)> {
    let (field, value) = raw
        .split_once('=')
        .with_context(|| format!("Invalid assignment '{raw}': expected FIELD=VALUE"))?;
    let field = field.trim();
    if field.is_empty() {
        anyhow::bail!("Invalid assignment '{raw}': field name is empty");
    }
    let value: YamlValue = serde_yaml::from_str(value)
        .with_context(|| format!("Invalid value for field '{field}'"))?;
    Ok((field.to_string(), value))
}

/// Run the generate command.
pub fn run_generate(args: &GenerateArgs) -> anyhow::Result<GenerateSummary> {
    tracing::info!(
        "Generating {} '{}' records from {:?}",
        args.count,
        args.record,
        args.schema
    );

    let schema = FixtureSchema::from_file(&args.schema)
        .with_context(|| format!("Failed to load schema file: {:?}", args.schema))?;
    let fixture = Fixture::load(&schema, &args.record)?;

    let assignments = args
        .set
        .iter()
        .map(String::as_str)
        .map(parse_assignment)
        .collect::<anyhow::Result<BTreeMap<_, _>>>()?;
    let set_values = fixture
        .overrides(&assignments)
        .context("Invalid --set override")?;

    let sink = if args.append {
        JsonlSink::append(&args.output)
    } else {
        JsonlSink::create(&args.output)
    };
    let sink =
        Rc::new(sink.with_context(|| format!("Failed to open output file: {:?}", args.output))?);

    let mut factory = fixture.factory();
    factory.on_insert(sink.insert_hook());

    let mut builder = fixture
        .builder(&factory, args.traits.as_slice())?
        .set(set_values)
        .zero(args.zero.iter().cloned());
    if args.reset_after {
        builder = builder.reset_after();
    }

    let result = builder.insert_list(args.count);
    // Flush whatever was written, even when the batch stopped early.
    let metrics = sink.finish()?;
    result.with_context(|| format!("Failed to generate '{}' records", args.record))?;

    let summary = GenerateSummary {
        record: args.record.clone(),
        output: args.output.clone(),
        rows_written: metrics.rows_written,
        bytes_written: metrics.bytes_written,
        sequence_index: factory.sequence_index(),
        duration_ms: metrics.total_duration.as_millis(),
    };
    tracing::info!(
        "Wrote {} rows ({} bytes) to {}",
        summary.rows_written,
        summary.bytes_written,
        summary.output.display()
    );
    Ok(summary)
}
