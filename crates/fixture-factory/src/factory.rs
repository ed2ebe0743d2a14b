//! The factory: identity and sequencing state for one record kind.

use crate::builder::Builder;
use crate::error::{FactoryError, HookKind};
use crate::layers::{Blueprint, BuildContext, Hook, Trait};
use fixture_core::Record;
use std::cell::RefCell;
use tracing::{debug, warn};

/// Sequencing state shared by every builder of a factory.
#[derive(Debug)]
struct SequenceState<R> {
    /// Next global sequence position (equal to the number of records built
    /// since creation or the last reset)
    index: u64,
    /// Most recently built record
    last: R,
}

/// Owns the shape, the global sequence and the hooks for one record kind.
///
/// Builders borrow the factory, so every builder derived from it advances
/// the same sequence. The state lives in a `RefCell`: a factory is meant for
/// one test at a time and is neither `Send` nor `Sync`.
pub struct Factory<R: Record> {
    zero: R,
    state: RefCell<SequenceState<R>>,
    on_build: Option<Hook<R>>,
    on_insert: Option<Hook<R>>,
}

impl<R: Record> Factory<R> {
    /// Create a factory for records shaped like `prototype`.
    ///
    /// Only the shape of `prototype` is used; its values are discarded.
    pub fn new(prototype: R) -> Self {
        let zero = prototype.zeroed();
        Self {
            state: RefCell::new(SequenceState {
                index: 0,
                last: zero.clone(),
            }),
            zero,
            on_build: None,
            on_insert: None,
        }
    }

    /// Register the hook run after every record a builder constructs.
    pub fn on_build<F>(&mut self, hook: F) -> &mut Self
    where
        F: Fn(&BuildContext, &mut R) -> anyhow::Result<()> + 'static,
    {
        self.on_build = Some(Box::new(hook));
        self
    }

    /// Register the hook run after the build hook on `insert` / `insert_list`.
    pub fn on_insert<F>(&mut self, hook: F) -> &mut Self
    where
        F: Fn(&BuildContext, &mut R) -> anyhow::Result<()> + 'static,
    {
        self.on_insert = Some(Box::new(hook));
        self
    }

    /// Builder without a blueprint or traits.
    pub fn builder(&self) -> Builder<'_, R> {
        Builder::new(self, None, Vec::new())
    }

    /// Builder with a blueprint and an ordered list of traits.
    ///
    /// Every trait is checked against the factory's record shape here, so a
    /// trait that zeroes a field the record does not have fails before
    /// anything is built.
    pub fn new_builder(
        &self,
        blueprint: Option<Blueprint<R>>,
        traits: Vec<Trait<R>>,
    ) -> Result<Builder<'_, R>, FactoryError> {
        for layer in &traits {
            layer.check(&self.zero)?;
        }
        Ok(Builder::new(self, blueprint, traits))
    }

    /// Return the sequence to 0 and forget the last record.
    ///
    /// Records already handed out are unaffected.
    pub fn reset(&self) {
        let mut state = self.state.borrow_mut();
        state.index = 0;
        state.last = self.zero.clone();
        debug!(record = self.zero.record_name(), "factory reset");
    }

    /// Next global sequence position.
    pub fn sequence_index(&self) -> u64 {
        self.state.borrow().index
    }

    /// Copy of the most recently built record.
    pub fn last(&self) -> R {
        self.state.borrow().last.clone()
    }

    /// A zero-valued record of this factory's shape.
    pub fn zero(&self) -> R {
        self.zero.clone()
    }

    /// Sequence position and previous record for the next build.
    ///
    /// Returned by value so the blueprint runs without the state borrowed.
    pub(crate) fn snapshot(&self) -> (u64, R) {
        let state = self.state.borrow();
        (state.index, state.last.clone())
    }

    /// Remember `record` as the last one built and advance the sequence.
    pub(crate) fn advance(&self, record: &R) {
        let mut state = self.state.borrow_mut();
        state.last = record.clone();
        state.index += 1;
    }

    pub(crate) fn run_hooks(&self, ctx: &BuildContext, record: &mut R) -> Result<(), FactoryError> {
        if let Some(hook) = &self.on_build {
            self.call_hook(HookKind::Build, hook, ctx, record)?;
        }
        if ctx.insert {
            if let Some(hook) = &self.on_insert {
                self.call_hook(HookKind::Insert, hook, ctx, record)?;
            }
        }
        Ok(())
    }

    fn call_hook(
        &self,
        kind: HookKind,
        hook: &Hook<R>,
        ctx: &BuildContext,
        record: &mut R,
    ) -> Result<(), FactoryError> {
        hook(ctx, record).map_err(|source| {
            warn!(
                record = record.record_name(),
                sequence = ctx.sequence,
                position = ctx.position,
                "{kind} hook failed: {source:#}"
            );
            FactoryError::Hook {
                hook: kind,
                record: record.record_name().to_string(),
                position: ctx.position,
                sequence: ctx.sequence,
                source,
            }
        })
    }
}
