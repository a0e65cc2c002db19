use rtprox_core::Observer;

use crate::traits::{HasCriterion, HasGap, HasIteration};

/// Forwards solver checkpoints to the [`log`] facade.
///
/// Every checkpoint is logged at `debug` level. Every `every`-th checkpoint is
/// also logged at `info` level, so long runs stay readable with the default
/// filter. The observer never requests an action.
#[derive(Debug, Clone)]
pub struct LogObserver {
    label: String,
    every: usize,
    seen: usize,
}

impl LogObserver {
    /// Creates an observer that logs every checkpoint at `info` level.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            every: 1,
            seen: 0,
        }
    }

    /// Limits `info` output to one checkpoint out of `every`.
    ///
    /// A value of zero is treated as one.
    #[must_use]
    pub fn every(mut self, every: usize) -> Self {
        self.every = every.max(1);
        self
    }

    /// Returns the number of checkpoints observed so far.
    #[must_use]
    pub fn seen(&self) -> usize {
        self.seen
    }
}

impl<E, A> Observer<E, A> for LogObserver
where
    E: HasIteration + HasCriterion + HasGap,
{
    fn observe(&mut self, event: &E) -> Option<A> {
        self.seen += 1;
        let (iter, criterion, gap) = (event.iteration(), event.criterion(), event.gap());

        if self.seen % self.every == 0 {
            log::info!(
                "{}: iteration {iter}, criterion {criterion:.6e}, gap {gap:.3e}",
                self.label
            );
        } else {
            log::debug!(
                "{}: iteration {iter}, criterion {criterion:.6e}, gap {gap:.3e}",
                self.label
            );
        }
        None
    }
}
