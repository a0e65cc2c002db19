//! Graph estimator with an outlier channel:
//! `min_{R,O} KL(Φ*Z ⊙ R + O, Z) + λR ||D2 R||₁ + λS ||B R||₁ + λO ||O||₁`.

use rtprox_core::Observer;
use rtprox_operators::linear::{Incidence, Weight};
use rtprox_solvers::optimization::primal_dual::{Action, Config, Event, Prior};

use crate::{
    EstimError, Estimate, Observations, OutlierVariant, Problem, StackedOperator,
    error::check_hyperparameter,
    estimate::{run, temporal_operator},
    graph::check_territories,
};

/// Hyperparameters of the graph estimator with outliers.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GraphOutlierParams {
    /// Weight of the piecewise-linearity penalty on `R`.
    pub lambda_r: f64,

    /// Weight of the graph total-variation penalty.
    pub lambda_s: f64,

    /// Weight of the sparsity penalty on `O`.
    pub lambda_o: f64,

    /// Constraint on the outlier channel and `R`.
    pub variant: OutlierVariant,
}

impl Default for GraphOutlierParams {
    fn default() -> Self {
        Self {
            lambda_r: 50.0,
            lambda_s: 0.005,
            lambda_o: 0.02,
            variant: OutlierVariant::NonNegative,
        }
    }
}

impl GraphOutlierParams {
    /// Builds the convex problem over `[R; O]` for `observations` on `graph`.
    ///
    /// # Errors
    ///
    /// Returns an error if the graph does not cover every territory, for a
    /// negative or non-finite weight, or for an unimplemented prior.
    pub fn problem(
        &self,
        observations: &Observations,
        graph: &Incidence,
        prior: Prior,
    ) -> Result<Problem, EstimError> {
        check_hyperparameter("lambda_r", self.lambda_r)?;
        check_hyperparameter("lambda_s", self.lambda_s)?;
        check_hyperparameter("lambda_o", self.lambda_o)?;
        check_territories(observations, graph)?;

        let operator = StackedOperator::new(temporal_operator(prior, Weight::Uniform(self.lambda_r))?)
            .with_graph(graph.clone(), self.lambda_s)
            .with_outlier(self.lambda_o, self.variant);
        Problem::new(observations, operator)
    }
}

/// Estimates `R` and `O` jointly over the territories of `graph`.
///
/// # Errors
///
/// Returns an error if the config, graph or hyperparameters are invalid or
/// the solver fails.
pub fn estimate<Obs>(
    observations: &Observations,
    graph: &Incidence,
    params: &GraphOutlierParams,
    config: &Config,
    observer: Obs,
) -> Result<Estimate, EstimError>
where
    Obs: for<'a> Observer<Event<'a>, Action>,
{
    config.validate()?;
    let problem = params.problem(observations, graph, config.prior())?;
    run("graph+outlier", &problem, config, observer)
}

/// Estimates `R` and `O` jointly over the territories of `graph`, without
/// observer support.
///
/// # Errors
///
/// Same as [`estimate`].
pub fn estimate_unobserved(
    observations: &Observations,
    graph: &Incidence,
    params: &GraphOutlierParams,
    config: &Config,
) -> Result<Estimate, EstimError> {
    estimate(observations, graph, params, config, ())
}
