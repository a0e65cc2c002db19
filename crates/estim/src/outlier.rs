//! Temporal estimator with an outlier channel:
//! `min_{R,O} KL(Φ*Z ⊙ R + O, Z) + λR ||D2 R||₁ + λO ||O||₁`.
//!
//! The outlier channel absorbs isolated reporting anomalies so that they do
//! not bend `R`. The [`OutlierVariant::NonNegative`] variant also keeps `R`
//! non-negative.
//!
//! Unlike the estimators without outliers, the criterion trace is not monotone
//! early in the run: it can rise by about a percent between checkpoints while
//! `R` and `O` trade mass, and only decreases once the iterates settle.

use rtprox_core::Observer;
use rtprox_operators::linear::Weight;
use rtprox_solvers::optimization::primal_dual::{Action, Config, Event, Prior};

use crate::{
    EstimError, Estimate, Observations, OutlierVariant, Problem, StackedOperator,
    error::check_hyperparameter,
    estimate::{run, temporal_operator},
};

/// Hyperparameters of the outlier estimator.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OutlierParams {
    /// Weight of the piecewise-linearity penalty on `R`.
    pub lambda_r: f64,

    /// Weight of the sparsity penalty on `O`.
    pub lambda_o: f64,

    /// Constraint on the outlier channel and `R`.
    pub variant: OutlierVariant,
}

impl Default for OutlierParams {
    fn default() -> Self {
        Self {
            lambda_r: 3.5,
            lambda_o: 0.03,
            variant: OutlierVariant::NonNegative,
        }
    }
}

impl OutlierParams {
    /// Builds the convex problem over `[R; O]` for `observations`.
    ///
    /// # Errors
    ///
    /// Returns an error for a negative or non-finite weight or an
    /// unimplemented prior.
    pub fn problem(&self, observations: &Observations, prior: Prior) -> Result<Problem, EstimError> {
        check_hyperparameter("lambda_r", self.lambda_r)?;
        check_hyperparameter("lambda_o", self.lambda_o)?;

        let operator = StackedOperator::new(temporal_operator(prior, Weight::Uniform(self.lambda_r))?)
            .with_outlier(self.lambda_o, self.variant);
        Problem::new(observations, operator)
    }
}

/// Estimates `R` and the outliers `O` jointly.
///
/// The returned outliers are in the units of `observations`; see
/// [`Prepared::rescale`] to map them back to counts.
///
/// # Errors
///
/// Returns an error if the config or hyperparameters are invalid or the
/// solver fails.
///
/// [`Prepared::rescale`]: crate::infectiousness::Prepared::rescale
pub fn estimate<Obs>(
    observations: &Observations,
    params: &OutlierParams,
    config: &Config,
    observer: Obs,
) -> Result<Estimate, EstimError>
where
    Obs: for<'a> Observer<Event<'a>, Action>,
{
    config.validate()?;
    let problem = params.problem(observations, config.prior())?;
    run("outlier", &problem, config, observer)
}

/// Estimates `R` and the outliers `O` jointly, without observer support.
///
/// # Errors
///
/// Same as [`estimate`].
pub fn estimate_unobserved(
    observations: &Observations,
    params: &OutlierParams,
    config: &Config,
) -> Result<Estimate, EstimError> {
    estimate(observations, params, config, ())
}
