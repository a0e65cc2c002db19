use rtprox_core::Observer;

use crate::traits::{HasCriterion, HasGap, HasIteration};

/// Records every checkpoint the solver reports.
///
/// Useful when a caller wants the iteration numbers alongside the traces the
/// solver returns, or wants to keep a record of a run that was stopped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct History {
    pub iters: Vec<usize>,
    pub criterion: Vec<f64>,
    pub gap: Vec<f64>,
}

impl History {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of recorded checkpoints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.iters.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.iters.is_empty()
    }
}

impl<E, A> Observer<E, A> for History
where
    E: HasIteration + HasCriterion + HasGap,
{
    fn observe(&mut self, event: &E) -> Option<A> {
        self.iters.push(event.iteration());
        self.criterion.push(event.criterion());
        self.gap.push(event.gap());
        None
    }
}

/// Allows `&mut History` to be passed to solvers that take an observer by
/// value, so the record can be read after the solve completes.
impl<E, A> Observer<E, A> for &mut History
where
    E: HasIteration + HasCriterion + HasGap,
{
    fn observe(&mut self, event: &E) -> Option<A> {
        (**self).observe(event)
    }
}
