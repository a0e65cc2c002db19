use std::fmt;

use ndarray::{Array1, Axis};
use rtprox_core::Signal;

use crate::OperatorError;

use super::Laplacian;

/// Discretization used by the temporal regularization operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Kernel {
    /// Second difference, favoring piecewise-linear signals.
    #[default]
    Laplacian,

    /// First difference. Declared for configuration compatibility only.
    Gradient,
}

impl fmt::Display for Kernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Laplacian => f.write_str("laplacian"),
            Self::Gradient => f.write_str("gradient"),
        }
    }
}

/// Regularization strength applied to the rows of a filtered signal.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Weight {
    /// The same weight on every row.
    Uniform(f64),

    /// One weight per row (per territory).
    PerRow(Array1<f64>),
}

impl Weight {
    /// Returns an error unless every weight is finite and non-negative.
    ///
    /// # Errors
    ///
    /// Returns [`OperatorError::InvalidWeight`] for a negative or non-finite weight.
    pub fn validate(&self) -> Result<(), OperatorError> {
        let valid = |w: &f64| w.is_finite() && *w >= 0.0;
        let ok = match self {
            Self::Uniform(w) => valid(w),
            Self::PerRow(ws) => ws.iter().all(valid),
        };
        if ok { Ok(()) } else { Err(OperatorError::InvalidWeight) }
    }

    /// Returns the largest weight, or zero for an empty per-row weight.
    #[must_use]
    pub fn max(&self) -> f64 {
        match self {
            Self::Uniform(w) => *w,
            Self::PerRow(ws) => ws.iter().copied().fold(0.0, f64::max),
        }
    }

    /// Scales each row of `signal` by its weight, in place.
    ///
    /// # Panics
    ///
    /// Panics if a per-row weight does not have one entry per row of `signal`.
    pub fn scale_rows(&self, signal: &mut Signal) {
        match self {
            Self::Uniform(w) => *signal *= *w,
            Self::PerRow(ws) => *signal *= &ws.view().insert_axis(Axis(1)),
        }
    }
}

/// Builds the temporal regularization operator for `kernel`.
///
/// # Errors
///
/// Returns [`OperatorError::NotImplemented`] for [`Kernel::Gradient`] and
/// [`OperatorError::InvalidWeight`] for an invalid weight.
pub fn build_operator(kernel: Kernel, weight: Weight) -> Result<Laplacian, OperatorError> {
    match kernel {
        Kernel::Laplacian => Laplacian::new(weight),
        Kernel::Gradient => Err(OperatorError::NotImplemented(kernel)),
    }
}
