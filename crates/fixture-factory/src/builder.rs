//! Per-recipe configuration and the merge-and-construct algorithm.

use crate::error::{BatchError, FactoryError};
use crate::factory::Factory;
use crate::layers::{Blueprint, BuildContext, Trait};
use crate::merge::{force_zero, overlay};
use fixture_core::Record;
use tracing::debug;

/// A configured recipe for records of one factory.
///
/// Layers are applied in a fixed order for every record: blueprint, traits
/// (in list order), the per-position layer, the `set` overlay, then the
/// explicit zero list. Later layers win.
pub struct Builder<'f, R: Record> {
    factory: &'f Factory<R>,
    /// Position within the current construction call
    index: usize,
    blueprint: Option<Blueprint<R>>,
    traits: Vec<Trait<R>>,
    each_param: Vec<Trait<R>>,
    set_values: Option<R>,
    zero_fields: Vec<String>,
    reset_after: bool,
}

impl<'f, R: Record> Builder<'f, R> {
    pub(crate) fn new(
        factory: &'f Factory<R>,
        blueprint: Option<Blueprint<R>>,
        traits: Vec<Trait<R>>,
    ) -> Self {
        Self {
            factory,
            index: 0,
            blueprint,
            traits,
            each_param: Vec::new(),
            set_values: None,
            zero_fields: Vec::new(),
            reset_after: false,
        }
    }

    /// Per-position layers: the `i`-th layer applies only to the record at
    /// position `i` of each construction call. Positions past the end of the
    /// list skip this layer.
    pub fn each_param<I>(mut self, layers: I) -> Self
    where
        I: IntoIterator<Item = Trait<R>>,
    {
        self.each_param = layers.into_iter().collect();
        self
    }

    /// Ad-hoc override applied to every record after the per-position layer.
    pub fn set(mut self, values: R) -> Self {
        self.set_values = Some(values);
        self
    }

    /// Fields forced to zero on every record, after every other layer.
    ///
    /// Replaces any list given by an earlier call.
    pub fn zero<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.zero_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Reset the factory once the next construction call completes.
    pub fn reset_after(mut self) -> Self {
        self.reset_after = true;
        self
    }

    /// Position the next record will take within the current call.
    pub fn local_index(&self) -> usize {
        self.index
    }

    /// Build one record.
    pub fn build(&mut self) -> Result<R, FactoryError> {
        self.index = 0;
        let record = self.produce(false)?;
        self.finish();
        Ok(record)
    }

    /// Build `n` records in position order.
    ///
    /// On failure the records finished before the failing position are
    /// returned inside the error and the factory is not reset.
    pub fn build_list(&mut self, n: usize) -> Result<Vec<R>, BatchError<R>> {
        self.produce_list(n, false)
    }

    /// Build one record and run the insert hook on it.
    pub fn insert(&mut self) -> Result<R, FactoryError> {
        self.index = 0;
        let record = self.produce(true)?;
        self.finish();
        Ok(record)
    }

    /// Build `n` records, running the insert hook on each.
    pub fn insert_list(&mut self, n: usize) -> Result<Vec<R>, BatchError<R>> {
        self.produce_list(n, true)
    }

    /// Build exactly `N` records, for destructuring:
    /// `let [author, reviewer] = builder.build_array()?;`
    pub fn build_array<const N: usize>(&mut self) -> Result<[R; N], BatchError<R>> {
        self.produce_array(false)
    }

    /// Insert exactly `N` records.
    pub fn insert_array<const N: usize>(&mut self) -> Result<[R; N], BatchError<R>> {
        self.produce_array(true)
    }

    fn produce_array<const N: usize>(&mut self, insert: bool) -> Result<[R; N], BatchError<R>> {
        let records = self.produce_list(N, insert)?;
        match <[R; N]>::try_from(records) {
            Ok(array) => Ok(array),
            Err(records) => unreachable!("batch of {} produced {} records", N, records.len()),
        }
    }

    fn produce_list(&mut self, n: usize, insert: bool) -> Result<Vec<R>, BatchError<R>> {
        self.index = 0;
        let mut completed = Vec::with_capacity(n);
        for _ in 0..n {
            match self.produce(insert) {
                Ok(record) => completed.push(record),
                Err(error) => return Err(BatchError { completed, error }),
            }
        }
        self.finish();
        Ok(completed)
    }

    fn finish(&self) {
        if self.reset_after {
            self.factory.reset();
        }
    }

    /// Merge every layer for the current position, record the result on the
    /// factory, then run the hooks.
    fn produce(&mut self, insert: bool) -> Result<R, FactoryError> {
        let position = self.index;
        let (sequence, previous) = self.factory.snapshot();

        let mut record = self.factory.zero();
        if let Some(blueprint) = &self.blueprint {
            overlay(&mut record, &blueprint.generate(sequence, &previous)?)?;
        }
        for layer in &self.traits {
            layer.apply(&mut record)?;
        }
        if let Some(layer) = self.each_param.get(position) {
            layer.apply(&mut record)?;
        }
        if let Some(values) = &self.set_values {
            overlay(&mut record, values)?;
        }
        force_zero(&mut record, &self.zero_fields)?;

        self.factory.advance(&record);
        self.index += 1;
        debug!(
            record = record.record_name(),
            sequence, position, insert, "built record"
        );

        let ctx = BuildContext {
            sequence,
            position,
            insert,
        };
        self.factory.run_hooks(&ctx, &mut record)?;
        Ok(record)
    }
}
