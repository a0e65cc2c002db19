use crate::{Signal, SignalView};

/// A proper convex function with a computable proximity operator.
///
/// `prox(x, step)` returns `argmin_u step * self(u) + ||u - x||² / 2`.
/// Terms are resolved once when a problem is assembled; the solver only ever
/// calls these two methods.
pub trait ProximalTerm {
    /// Evaluates the function at `x`.
    ///
    /// Returns `f64::INFINITY` outside the function's domain.
    fn value(&self, x: SignalView<'_>) -> f64;

    /// Evaluates the proximity operator of `step * self` at `x`.
    fn prox(&self, x: SignalView<'_>, step: f64) -> Signal;
}
