//! Override layers a builder composes: blueprints, traits and hooks.

use crate::merge::{force_zero, overlay};
use fixture_core::{Record, RecordError};
use std::fmt;
use std::rc::Rc;

/// Produces the base record for a sequence position.
///
/// The function receives the factory's global sequence position and the
/// previously built record (zero-valued on a fresh or reset factory). It
/// should be deterministic for given inputs.
pub struct Blueprint<R> {
    func: Rc<dyn Fn(u64, &R) -> Result<R, RecordError>>,
}

impl<R: 'static> Blueprint<R> {
    /// Wrap a blueprint function.
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(u64, &R) -> R + 'static,
    {
        Self::try_new(move |sequence, previous| Ok(func(sequence, previous)))
    }

    /// Wrap a blueprint function that can fail to produce a record.
    ///
    /// A failure aborts the construction before the record is sequenced.
    pub fn try_new<F>(func: F) -> Self
    where
        F: Fn(u64, &R) -> Result<R, RecordError> + 'static,
    {
        Self {
            func: Rc::new(func),
        }
    }
}

impl<R> Blueprint<R> {
    /// Produce the base record for `sequence`.
    pub fn generate(&self, sequence: u64, previous: &R) -> Result<R, RecordError> {
        (self.func)(sequence, previous)
    }
}

impl<R> Clone for Blueprint<R> {
    fn clone(&self) -> Self {
        Self {
            func: Rc::clone(&self.func),
        }
    }
}

impl<R> fmt::Debug for Blueprint<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Blueprint(..)")
    }
}

/// Reusable override layer: values overlaid onto the record, then fields
/// forced back to zero.
#[derive(Debug, Clone, PartialEq)]
pub struct Trait<R> {
    /// Non-zero fields of this record are copied onto the target
    pub values: R,
    /// Fields zeroed after `values` is applied
    pub zero: Vec<String>,
}

impl<R: Record> Trait<R> {
    /// Trait that only overlays values.
    pub fn new(values: R) -> Self {
        Self {
            values,
            zero: Vec::new(),
        }
    }

    /// Add fields to force to zero after the overlay.
    pub fn with_zero<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.zero.extend(fields.into_iter().map(Into::into));
        self
    }

    /// Overlay, then zero.
    pub fn apply(&self, record: &mut R) -> Result<(), RecordError> {
        overlay(record, &self.values)?;
        force_zero(record, &self.zero)
    }

    /// Check this layer against the record shape it will be applied to.
    pub fn check(&self, prototype: &R) -> Result<(), RecordError> {
        if !prototype.same_shape(&self.values) {
            return Err(RecordError::ShapeMismatch {
                expected: prototype.record_name().to_string(),
                found: self.values.record_name().to_string(),
            });
        }
        match self.zero.iter().find(|f| !prototype.has_field(f)) {
            Some(field) => Err(RecordError::unknown_field(prototype.record_name(), field)),
            None => Ok(()),
        }
    }
}

/// Where a record sits in the sequence when a hook sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildContext {
    /// Global sequence position the blueprint received
    pub sequence: u64,
    /// Position within the current construction call
    pub position: usize,
    /// Whether the call is `insert` / `insert_list`
    pub insert: bool,
}

/// Callback run on every constructed record.
pub type Hook<R> = Box<dyn Fn(&BuildContext, &mut R) -> anyhow::Result<()>>;
