//! Error types for factory operations.

use fixture_core::{RecordError, SchemaError};
use std::fmt;

/// Which hook a failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookKind {
    /// Runs for every constructed record
    Build,
    /// Runs for records constructed by `insert` / `insert_list`
    Insert,
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Build => f.write_str("build"),
            Self::Insert => f.write_str("insert"),
        }
    }
}

/// Error type for factory operations.
#[derive(Debug, thiserror::Error)]
pub enum FactoryError {
    /// A layer names a field the record does not have, or does not match
    /// the factory's record shape.
    #[error("Invalid fixture configuration: {0}")]
    Record(#[from] RecordError),

    /// Schema error
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Generator config cannot produce values for its field
    #[error("Invalid generator for field '{field}': {reason}")]
    Generator { field: String, reason: String },

    /// A caller-supplied hook failed
    #[error("{hook} hook failed for '{record}' at position {position} (sequence {sequence}): {source}")]
    Hook {
        hook: HookKind,
        record: String,
        position: usize,
        sequence: u64,
        #[source]
        source: anyhow::Error,
    },
}

/// A batch construction call that stopped part way.
///
/// `completed` holds the records that were fully built (and had their hooks
/// run) before the failure; they remain valid.
#[derive(Debug)]
pub struct BatchError<R> {
    /// Records finished before the failure, in position order
    pub completed: Vec<R>,
    /// What stopped the batch
    pub error: FactoryError,
}

impl<R> BatchError<R> {
    /// Drop the completed records and keep the cause.
    pub fn into_error(self) -> FactoryError {
        self.error
    }
}

impl<R> fmt::Display for BatchError<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "batch aborted after {} records: {}",
            self.completed.len(),
            self.error
        )
    }
}

impl<R: fmt::Debug> std::error::Error for BatchError<R> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}
