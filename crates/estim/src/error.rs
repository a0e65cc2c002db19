use rtprox_operators::{OperatorError, linear::Weight};
use rtprox_solvers::optimization::primal_dual::{self, ConfigError};
use thiserror::Error;

/// Errors raised while preparing data or running an estimator.
#[derive(Debug, Error)]
pub enum EstimError {
    #[error("invalid solver config: {0}")]
    Config(#[from] ConfigError),

    #[error("operator error: {0}")]
    Operator(#[from] OperatorError),

    #[error("solver error: {0}")]
    Solver(#[from] primal_dual::Error),

    #[error("invalid infectiousness profile: {0}")]
    Profile(#[from] statrs::distribution::GammaError),

    #[error("data has shape {data:?} but kernel has shape {kernel:?}")]
    ShapeMismatch {
        data: (usize, usize),
        kernel: (usize, usize),
    },

    #[error("{what} at row {row}, day {day} must be finite and non-negative, got {value}")]
    InvalidValue {
        what: &'static str,
        row: usize,
        day: usize,
        value: f64,
    },

    #[error("graph covers {found} territories but observations have {expected}")]
    TerritoryMismatch { expected: usize, found: usize },

    #[error("territory {row} has zero variance and cannot be normalized")]
    ZeroVariance { row: usize },

    #[error("{name} must be finite and non-negative, got {value}")]
    Hyperparameter { name: &'static str, value: f64 },

    #[error("series has {days} days but at least {needed} are required")]
    TooShort { days: usize, needed: usize },

    #[error("series lengths differ: {left} and {right}")]
    LengthMismatch { left: usize, right: usize },

    #[error("poisson floor must be finite and positive, got {0}")]
    PoissonFloor(f64),

    #[error("poisson mean {0} is invalid")]
    PoissonMean(f64),
}

/// Checks that a hyperparameter is finite and non-negative.
pub(crate) fn check_hyperparameter(name: &'static str, value: f64) -> Result<(), EstimError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(EstimError::Hyperparameter { name, value })
    }
}

/// Checks a temporal weight: finite and non-negative, with one entry per
/// territory when given per row.
pub(crate) fn check_weight(
    name: &'static str,
    weight: &Weight,
    territories: usize,
) -> Result<(), EstimError> {
    match weight {
        Weight::Uniform(value) => check_hyperparameter(name, *value),
        Weight::PerRow(values) => {
            if values.len() != territories {
                return Err(EstimError::TerritoryMismatch {
                    expected: territories,
                    found: values.len(),
                });
            }
            values
                .iter()
                .try_for_each(|&value| check_hyperparameter(name, value))
        }
    }
}
