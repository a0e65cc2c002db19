use ndarray::s;
use rtprox_core::{ConvexProblem, Signal};
use rtprox_operators::terms::{Fidelity, Penalty};

use crate::{EstimError, Observations, StackedOperator};

/// `min_x KL(fit(x), Z) + ||L x||₁` for a [`StackedOperator`] `L`.
///
/// The fit is `Φ*Z ⊙ R`, or `Φ*Z ⊙ R + O` when the operator carries an
/// outlier channel. Without a warm start the solver begins at the observed
/// counts, with zero outliers.
#[derive(Debug, Clone)]
pub struct Problem {
    operator: StackedOperator,
    fidelity: Fidelity,
    penalty: Penalty,
}

impl Problem {
    /// Pairs observations with an operator.
    ///
    /// # Errors
    ///
    /// Returns an error if the fidelity term rejects the observations.
    pub fn new(observations: &Observations, operator: StackedOperator) -> Result<Self, EstimError> {
        let data = observations.data().clone();
        let kernel = observations.kernel().clone();
        let fidelity = if operator.has_outlier() {
            Fidelity::kl_outlier(data, kernel)?
        } else {
            Fidelity::kl(data, kernel)?
        };
        let penalty = operator.penalty(observations.territories());
        Ok(Self {
            operator,
            fidelity,
            penalty,
        })
    }

    /// Number of territories, i.e. rows of `R`.
    #[must_use]
    pub fn territories(&self) -> usize {
        self.fidelity.data().nrows()
    }
}

impl ConvexProblem for Problem {
    type Operator = StackedOperator;
    type Fidelity = Fidelity;
    type Regularization = Penalty;

    fn operator(&self) -> &StackedOperator {
        &self.operator
    }

    fn fidelity(&self) -> &Fidelity {
        &self.fidelity
    }

    fn regularization(&self) -> &Penalty {
        &self.penalty
    }

    fn norm_bound(&self) -> f64 {
        self.operator.norm_bound()
    }

    fn initial_point(&self) -> Signal {
        let data = self.fidelity.data();
        let mut x0 = Signal::zeros(self.fidelity.unknown_shape());
        x0.slice_mut(s![..data.nrows(), ..]).assign(data);
        x0
    }
}
