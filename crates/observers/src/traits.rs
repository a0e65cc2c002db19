//! Capability traits for cross-solver observers.
//!
//! These traits abstract over solver-specific event and action types, enabling
//! observers to work generically across different solvers.
//!
//! # Event traits
//!
//! - [`HasIteration`] — events that carry an iteration count
//! - [`HasCriterion`] — events that carry an objective value
//! - [`HasGap`] — events that carry a convergence statistic
//!
//! # Action traits
//!
//! - [`CanStopEarly`] — actions that can signal early termination
//!
//! # Example
//!
//! ```rust
//! use rtprox_core::Observer;
//! use rtprox_observers::traits::{CanStopEarly, HasCriterion};
//!
//! struct GoodEnough {
//!     target: f64,
//! }
//!
//! impl<E: HasCriterion, A: CanStopEarly> Observer<E, A> for GoodEnough {
//!     fn observe(&mut self, event: &E) -> Option<A> {
//!         (event.criterion() < self.target).then(A::stop_early)
//!     }
//! }
//! ```

use rtprox_solvers::optimization::primal_dual;

/// An event that carries the number of completed iterations.
pub trait HasIteration {
    fn iteration(&self) -> usize;
}

/// An event that carries the current objective value.
pub trait HasCriterion {
    fn criterion(&self) -> f64;
}

/// An event that carries the statistic compared against the solver tolerance.
pub trait HasGap {
    fn gap(&self) -> f64;
}

/// An action type that can signal early termination.
pub trait CanStopEarly {
    /// Returns the action that stops the solver early.
    fn stop_early() -> Self;
}

impl HasIteration for primal_dual::Event<'_> {
    fn iteration(&self) -> usize {
        self.iter
    }
}

impl HasCriterion for primal_dual::Event<'_> {
    fn criterion(&self) -> f64 {
        self.criterion
    }
}

impl HasGap for primal_dual::Event<'_> {
    fn gap(&self) -> f64 {
        self.gap
    }
}

impl CanStopEarly for primal_dual::Action {
    fn stop_early() -> Self {
        Self::StopEarly
    }
}
