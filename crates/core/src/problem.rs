use crate::{LinearOperator, ProximalTerm, Signal, SignalView};

/// Defines a convex program `min_x f(x) + g(L x)` for a primal-dual solver.
///
/// `f` is the data-fidelity term and `g` the regularization applied to the
/// output of the linear operator `L`. Problem instantiations supply the three
/// pieces, a default starting point, and an upper bound on `||L||²`.
pub trait ConvexProblem {
    type Operator: LinearOperator;
    type Fidelity: ProximalTerm;
    type Regularization: ProximalTerm;

    /// The linear operator `L`.
    fn operator(&self) -> &Self::Operator;

    /// The data-fidelity term `f`.
    fn fidelity(&self) -> &Self::Fidelity;

    /// The regularization term `g`.
    fn regularization(&self) -> &Self::Regularization;

    /// An upper bound on the squared operator norm `||L||²`.
    ///
    /// Solvers derive their step sizes from this value and trust it: an
    /// underestimate can make the iteration diverge.
    fn norm_bound(&self) -> f64;

    /// The starting point used when the caller does not provide one.
    fn initial_point(&self) -> Signal;

    /// Evaluates the full criterion `f(x) + g(L x)`.
    fn criterion(&self, x: SignalView<'_>) -> f64 {
        let lx = self.operator().apply(x);
        self.fidelity().value(x) + self.regularization().value(lx.view())
    }
}
