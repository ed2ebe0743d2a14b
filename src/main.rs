//! Command-line interface for fixture-forge
//!
//! # Usage Examples
//!
//! ```bash
//! # Generate records through the JSONL insert sink
//! fixture-forge generate \
//!   --schema fixtures.yaml \
//!   --record posts \
//!   --count 100 \
//!   --trait published \
//!   --set author_id=7 \
//!   --zero scheduled_at \
//!   --output posts.jsonl
//!
//! # Validate a schema file
//! fixture-forge validate --schema fixtures.yaml
//! ```
//!
//! Logging is controlled with `RUST_LOG` (e.g. `RUST_LOG=debug` shows every
//! built record with its sequence and local positions).

use clap::{Parser, Subcommand};
use fixture_forge::{run_generate, run_validate, GenerateArgs, ValidateArgs};

#[derive(Parser)]
#[command(name = "fixture-forge")]
#[command(about = "Build layered, sequential test fixtures from YAML schemas")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build records and insert them into a JSONL file
    Generate {
        #[command(flatten)]
        args: GenerateArgs,
    },

    /// Check a fixture schema file
    Validate {
        #[command(flatten)]
        args: ValidateArgs,
    },
}

fn main() -> anyhow::Result<()> {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

fn run() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate { args } => {
            let summary = run_generate(&args)?;
            // Single JSON line for scripts
            println!("{}", serde_json::to_string(&summary)?);
        }
        Commands::Validate { args } => {
            let reports = run_validate(&args)?;
            println!("{}", serde_json::to_string(&reports)?);
        }
    }

    Ok(())
}
