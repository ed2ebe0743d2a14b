//! fixture-forge library
//!
//! Command handlers behind the `fixture-forge` binary. The engine itself lives
//! in the workspace crates:
//!
//! - `fixture_core` - records, field values and YAML fixture schemas
//! - `fixture_factory` - the Factory/Builder merge and sequencing engine
//! - `fixture_jsonl` - an insert hook writing records as JSON Lines
//!
//! # CLI Usage
//!
//! ```bash
//! # Insert 20 draft posts into posts.jsonl
//! fixture-forge generate --schema fixtures.yaml --record posts \
//!   --count 20 --trait draft --set author_id=7 --output posts.jsonl
//!
//! # Check every generator and trait in a schema file
//! fixture-forge validate --schema fixtures.yaml
//! ```

pub mod generate;
pub mod validate;

pub use generate::{parse_assignment, run_generate, GenerateArgs, GenerateSummary};
pub use validate::{run_validate, RecordReport, ValidateArgs};
