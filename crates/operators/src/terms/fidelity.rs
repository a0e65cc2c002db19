use ndarray::{Axis, concatenate, s};
use rtprox_core::{ProximalTerm, Signal, SignalView};

use crate::{
    OperatorError,
    prox::{kl_divergence, prox_kl, prox_kl_outlier},
};

/// Kullback-Leibler data fidelity between predicted and observed counts.
///
/// The prediction is `kernel ⊙ R`, optionally plus an outlier channel `O`
/// stacked below `R` in the unknown (`[R; O]`, twice as many rows as `data`).
#[derive(Debug, Clone, PartialEq)]
pub enum Fidelity {
    /// `KL(kernel ⊙ R, data)`.
    Kl { data: Signal, kernel: Signal },

    /// `KL(kernel ⊙ R + O, data)` over the stacked unknown `[R; O]`.
    KlOutlier { data: Signal, kernel: Signal },
}

impl Fidelity {
    /// Creates the fidelity without outlier channel.
    ///
    /// # Errors
    ///
    /// Returns [`OperatorError::ShapeMismatch`] if `kernel` and `data` differ in shape.
    pub fn kl(data: Signal, kernel: Signal) -> Result<Self, OperatorError> {
        check_shapes(&data, &kernel)?;
        Ok(Self::Kl { data, kernel })
    }

    /// Creates the fidelity with an outlier channel.
    ///
    /// # Errors
    ///
    /// Returns [`OperatorError::ShapeMismatch`] if `kernel` and `data` differ in shape.
    pub fn kl_outlier(data: Signal, kernel: Signal) -> Result<Self, OperatorError> {
        check_shapes(&data, &kernel)?;
        Ok(Self::KlOutlier { data, kernel })
    }

    /// Returns the observed counts.
    #[must_use]
    pub fn data(&self) -> &Signal {
        match self {
            Self::Kl { data, .. } | Self::KlOutlier { data, .. } => data,
        }
    }

    /// Returns the convolution kernel.
    #[must_use]
    pub fn kernel(&self) -> &Signal {
        match self {
            Self::Kl { kernel, .. } | Self::KlOutlier { kernel, .. } => kernel,
        }
    }

    /// Returns the shape of the unknown this term acts on.
    #[must_use]
    pub fn unknown_shape(&self) -> (usize, usize) {
        let (rows, days) = self.data().dim();
        match self {
            Self::Kl { .. } => (rows, days),
            Self::KlOutlier { .. } => (2 * rows, days),
        }
    }
}

fn check_shapes(data: &Signal, kernel: &Signal) -> Result<(), OperatorError> {
    if data.dim() == kernel.dim() {
        Ok(())
    } else {
        Err(OperatorError::ShapeMismatch {
            expected: data.dim(),
            found: kernel.dim(),
        })
    }
}

impl ProximalTerm for Fidelity {
    fn value(&self, x: SignalView<'_>) -> f64 {
        match self {
            Self::Kl { data, kernel } => kl_divergence((kernel * &x).view(), data.view()),
            Self::KlOutlier { data, kernel } => {
                let rows = data.nrows();
                let fitted = kernel * &x.slice(s![..rows, ..]) + x.slice(s![rows.., ..]);
                kl_divergence(fitted.view(), data.view())
            }
        }
    }

    fn prox(&self, x: SignalView<'_>, step: f64) -> Signal {
        match self {
            Self::Kl { data, kernel } => prox_kl(x, data.view(), kernel.view(), step),
            Self::KlOutlier { data, kernel } => {
                let rows = data.nrows();
                let (r, o) = prox_kl_outlier(
                    x.slice(s![..rows, ..]),
                    x.slice(s![rows.., ..]),
                    data.view(),
                    kernel.view(),
                    step,
                );
                // Shapes agree by construction.
                concatenate![Axis(0), r, o]
            }
        }
    }
}
