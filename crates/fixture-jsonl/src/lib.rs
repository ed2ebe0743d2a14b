//! JSON Lines sink for fixture-forge.
//!
//! [`JsonlSink`] writes each record it receives as one JSON object per line,
//! with fields in schema order. Registered as a factory's insert hook, it
//! turns `insert` / `insert_list` into file output.
//!
//! # Example
//!
//! ```ignore
//! use fixture_jsonl::JsonlSink;
//! use std::rc::Rc;
//!
//! let sink = Rc::new(JsonlSink::create("posts.jsonl")?);
//! let mut factory = fixture.factory();
//! factory.on_insert(sink.insert_hook());
//!
//! fixture.builder(&factory, &["draft"])?.insert_list(100)?;
//! let metrics = sink.finish()?;
//! println!("Wrote {} rows in {:?}", metrics.rows_written, metrics.total_duration);
//! ```

pub mod error;
pub mod sink;

pub use error::SinkError;
pub use sink::{JsonlSink, SinkMetrics, DEFAULT_BUFFER_SIZE};
