//! Closed-form estimators used as references for the penalized ones.

use ndarray::{Array2, Zip, s};

use crate::{EstimError, Observations, error::check_hyperparameter};

/// Maximum-likelihood estimate `R = Z / (Φ * Z)`, zero where `Φ * Z = 0`.
#[must_use]
pub fn mle(observations: &Observations) -> Array2<f64> {
    Zip::from(observations.data())
        .and(observations.kernel())
        .map_collect(|&z, &conv| if conv > 0.0 { z / conv } else { 0.0 })
}

/// Gamma prior and smoothing window of Cori's estimator.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CoriParams {
    /// Prior shape.
    pub a: f64,

    /// Prior scale.
    pub b: f64,

    /// Number of days over which `R` is assumed constant.
    pub window: usize,
}

impl Default for CoriParams {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 5.0,
            window: 7,
        }
    }
}

/// Posterior mean of Cori's Bayesian estimator.
///
/// For day `t`, with the window `W = [t - window + 1, t]` clipped at day zero,
/// `R_t = (a + Σ_W Z) / (1/b + Σ_W Φ*Z)`.
///
/// # Errors
///
/// Returns an error if `a` or `b` is negative or non-finite, or if the
/// window is empty.
pub fn cori(observations: &Observations, params: &CoriParams) -> Result<Array2<f64>, EstimError> {
    check_hyperparameter("a", params.a)?;
    check_hyperparameter("b", params.b)?;
    if params.window == 0 {
        return Err(EstimError::Hyperparameter {
            name: "window",
            value: 0.0,
        });
    }

    let data = observations.data();
    let kernel = observations.kernel();
    let mut r = Array2::zeros(data.dim());
    for ((row, t), value) in r.indexed_iter_mut() {
        let start = (t + 1).saturating_sub(params.window);
        let shape = params.a + data.slice(s![row, start..=t]).sum();
        let rate = params.b.recip() + kernel.slice(s![row, start..=t]).sum();
        *value = if rate > 0.0 { shape / rate } else { 0.0 };
    }
    Ok(r)
}
