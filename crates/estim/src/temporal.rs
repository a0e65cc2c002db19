//! Temporal-only estimator: `min_R KL(Φ*Z ⊙ R, Z) + μR ||D2 R||₁`.
//!
//! Each territory is independent; with several rows the problem is simply
//! solved jointly.

use rtprox_core::Observer;
use rtprox_operators::linear::Weight;
use rtprox_solvers::optimization::primal_dual::{Action, Config, Event, Prior};

use crate::{
    EstimError, Estimate, Observations, Problem, StackedOperator,
    error::check_weight,
    estimate::{run, temporal_operator},
};

/// Hyperparameters of the temporal-only estimator.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TemporalParams {
    /// Weight of the piecewise-linearity penalty on `R`, shared or one per
    /// territory.
    pub mu_r: Weight,
}

impl Default for TemporalParams {
    fn default() -> Self {
        Self {
            mu_r: Weight::Uniform(50.0),
        }
    }
}

impl TemporalParams {
    /// The same weight on every territory.
    #[must_use]
    pub fn uniform(mu_r: f64) -> Self {
        Self {
            mu_r: Weight::Uniform(mu_r),
        }
    }

    /// Builds the convex problem for `observations`.
    ///
    /// # Errors
    ///
    /// Returns an error for a negative or non-finite weight, per-territory
    /// weights that do not match the observations, or an unimplemented prior.
    pub fn problem(&self, observations: &Observations, prior: Prior) -> Result<Problem, EstimError> {
        check_weight("mu_r", &self.mu_r, observations.territories())?;
        let operator = StackedOperator::new(temporal_operator(prior, self.mu_r.clone())?);
        Problem::new(observations, operator)
    }
}

/// Estimates `R` with the temporal-only penalty.
///
/// # Errors
///
/// Returns an error if the config or hyperparameters are invalid or the
/// solver fails.
pub fn estimate<Obs>(
    observations: &Observations,
    params: &TemporalParams,
    config: &Config,
    observer: Obs,
) -> Result<Estimate, EstimError>
where
    Obs: for<'a> Observer<Event<'a>, Action>,
{
    config.validate()?;
    let problem = params.problem(observations, config.prior())?;
    run("temporal", &problem, config, observer)
}

/// Estimates `R` with the temporal-only penalty, without observer support.
///
/// # Errors
///
/// Same as [`estimate`].
pub fn estimate_unobserved(
    observations: &Observations,
    params: &TemporalParams,
    config: &Config,
) -> Result<Estimate, EstimError> {
    estimate(observations, params, config, ())
}
