//! Temporal and spatial estimator:
//! `min_R KL(Φ*Z ⊙ R, Z) + μR ||D2 R||₁ + μS ||B R||₁`.
//!
//! `B` is the edge-by-territory incidence matrix of a contiguity graph, so
//! the second penalty is the graph total variation of `R` on each day.

use rtprox_core::Observer;
use rtprox_operators::linear::{Incidence, Weight};
use rtprox_solvers::optimization::primal_dual::{Action, Config, Event, Prior};

use crate::{
    EstimError, Estimate, Observations, Problem, StackedOperator,
    error::{check_hyperparameter, check_weight},
    estimate::{run, temporal_operator},
};

/// Hyperparameters of the graph estimator.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GraphParams {
    /// Weight of the piecewise-linearity penalty on `R`, shared or one per
    /// territory.
    pub mu_r: Weight,

    /// Weight of the graph total-variation penalty.
    pub mu_s: f64,
}

impl Default for GraphParams {
    fn default() -> Self {
        Self {
            mu_r: Weight::Uniform(50.0),
            mu_s: 0.005,
        }
    }
}

impl GraphParams {
    /// The same temporal weight on every territory.
    #[must_use]
    pub fn uniform(mu_r: f64, mu_s: f64) -> Self {
        Self {
            mu_r: Weight::Uniform(mu_r),
            mu_s,
        }
    }

    /// Builds the convex problem for `observations` on `graph`.
    ///
    /// # Errors
    ///
    /// Returns an error if the graph or the per-territory weights do not
    /// cover every territory, for a negative or non-finite weight, or for an
    /// unimplemented prior.
    pub fn problem(
        &self,
        observations: &Observations,
        graph: &Incidence,
        prior: Prior,
    ) -> Result<Problem, EstimError> {
        check_weight("mu_r", &self.mu_r, observations.territories())?;
        check_hyperparameter("mu_s", self.mu_s)?;
        check_territories(observations, graph)?;

        let operator = StackedOperator::new(temporal_operator(prior, self.mu_r.clone())?)
            .with_graph(graph.clone(), self.mu_s);
        Problem::new(observations, operator)
    }
}

pub(crate) fn check_territories(
    observations: &Observations,
    graph: &Incidence,
) -> Result<(), EstimError> {
    if graph.territories() == observations.territories() {
        Ok(())
    } else {
        Err(EstimError::TerritoryMismatch {
            expected: observations.territories(),
            found: graph.territories(),
        })
    }
}

/// Estimates `R` jointly over the territories of `graph`.
///
/// # Errors
///
/// Returns an error if the config, graph or hyperparameters are invalid or
/// the solver fails.
pub fn estimate<Obs>(
    observations: &Observations,
    graph: &Incidence,
    params: &GraphParams,
    config: &Config,
    observer: Obs,
) -> Result<Estimate, EstimError>
where
    Obs: for<'a> Observer<Event<'a>, Action>,
{
    config.validate()?;
    let problem = params.problem(observations, graph, config.prior())?;
    run("graph", &problem, config, observer)
}

/// Estimates `R` jointly over the territories of `graph`, without observer
/// support.
///
/// # Errors
///
/// Same as [`estimate`].
pub fn estimate_unobserved(
    observations: &Observations,
    graph: &Incidence,
    params: &GraphParams,
    config: &Config,
) -> Result<Estimate, EstimError> {
    estimate(observations, graph, params, config, ())
}
