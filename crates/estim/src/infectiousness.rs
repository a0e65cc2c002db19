//! Serial-interval profile and the convolved reference series `Φ * Z`.
//!
//! Estimators do not work on raw counts. Counts are clipped at zero,
//! convolved with the infectiousness profile `Φ`, cropped by one day (the
//! first day has no past to convolve), and optionally normalized per
//! territory by the standard deviation of the counts.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis, s};
use statrs::distribution::{Continuous, Gamma};

use crate::{EstimError, Observations};

/// Shape of the gamma serial-interval distribution.
pub const GAMMA_SHAPE: f64 = 1.87;

/// Rate of the gamma serial-interval distribution.
pub const GAMMA_RATE: f64 = 0.28;

/// Number of days covered by the discretized profile, day zero included.
pub const PROFILE_DAYS: usize = 26;

/// Discretizes a gamma density on days `0..days`, with no weight on day zero.
///
/// # Errors
///
/// Returns an error if `shape` or `rate` is not a valid gamma parameter.
pub fn gamma_profile(shape: f64, rate: f64, days: usize) -> Result<Array1<f64>, EstimError> {
    let gamma = Gamma::new(shape, rate)?;
    let mut phi = Array1::from_shape_fn(days, |k| gamma.pdf(k as f64));
    if let Some(first) = phi.first_mut() {
        *first = 0.0;
    }
    Ok(phi)
}

/// The profile used by every estimator unless told otherwise.
///
/// # Errors
///
/// Never fails in practice; the error path is shared with [`gamma_profile`].
pub fn default_profile() -> Result<Array1<f64>, EstimError> {
    gamma_profile(GAMMA_SHAPE, GAMMA_RATE, PROFILE_DAYS)
}

/// Convolves a count series with `phi`, dropping the first day.
///
/// Entry `k - 1` of the output is `Σ_j φ_j Z_{k-j} / Σ_j φ_j` over
/// `1 ≤ j ≤ min(k, len(φ) - 1)`. During the first `len(φ) - 1` days only the
/// available history is used and the weights are renormalized accordingly.
/// A day whose weights sum to zero convolves to zero.
#[must_use]
pub fn convolve(counts: ArrayView1<'_, f64>, phi: ArrayView1<'_, f64>) -> Array1<f64> {
    Array1::from_shape_fn(counts.len().saturating_sub(1), |i| {
        infectiousness_on(counts, phi, i + 1)
    })
}

/// Normalized-truncated convolution of `counts` with `phi` on day `k`, using
/// only the days before `k`.
pub(crate) fn infectiousness_on(counts: ArrayView1<'_, f64>, phi: ArrayView1<'_, f64>, k: usize) -> f64 {
    let taps = phi.len().saturating_sub(1);
    let (acc, weight) = (1..=k.min(taps)).fold((0.0, 0.0), |(acc, weight), j| {
        (acc + phi[j] * counts[k - j], weight + phi[j])
    });
    if weight > 0.0 { acc / weight } else { 0.0 }
}

/// Clips counts at zero and pairs each territory with its convolution.
///
/// `counts` has one row per territory. The result has one day less.
///
/// # Errors
///
/// Returns an error if there are fewer than two days, if a count is not
/// finite, or if the profile holds a negative or non-finite weight.
pub fn convolve_counts(
    counts: ArrayView2<'_, f64>,
    phi: ArrayView1<'_, f64>,
) -> Result<Observations, EstimError> {
    if counts.ncols() < 2 {
        return Err(EstimError::TooShort {
            days: counts.ncols(),
            needed: 2,
        });
    }
    if let Some(((row, day), &value)) = counts.indexed_iter().find(|(_, v)| !v.is_finite()) {
        return Err(EstimError::InvalidValue {
            what: "raw count",
            row,
            day,
            value,
        });
    }
    if let Some((day, &value)) = phi
        .indexed_iter()
        .find(|(_, v)| !v.is_finite() || **v < 0.0)
    {
        return Err(EstimError::InvalidValue {
            what: "profile weight",
            row: 0,
            day,
            value,
        });
    }

    let clipped = counts.mapv(|v| v.max(0.0));
    let mut kernel = Array2::zeros((counts.nrows(), counts.ncols() - 1));
    for (row, mut out) in clipped.outer_iter().zip(kernel.outer_iter_mut()) {
        out.assign(&convolve(row, phi));
    }
    let data = clipped.slice(s![.., 1..]).to_owned();

    Observations::new(data, kernel)
}

/// Divides each territory's counts and convolution by the standard deviation
/// of its counts.
///
/// Returns the normalized observations and the per-territory scale.
///
/// # Errors
///
/// Returns [`EstimError::ZeroVariance`] for a territory with constant counts.
pub fn normalize(observations: &Observations) -> Result<(Observations, Array1<f64>), EstimError> {
    let scale: Array1<f64> = observations
        .data()
        .outer_iter()
        .map(|row| row.std(0.0))
        .collect();
    if let Some(row) = scale.iter().position(|s| !s.is_normal()) {
        return Err(EstimError::ZeroVariance { row });
    }

    let divisor = scale.view().insert_axis(Axis(1));
    let data = observations.data() / &divisor;
    let kernel = observations.kernel() / &divisor;
    Ok((Observations::new(data, kernel)?, scale))
}

/// Counts prepared for the penalized estimators.
#[derive(Debug, Clone, PartialEq)]
pub struct Prepared {
    /// Normalized counts and convolution, ready for the solver.
    pub observations: Observations,

    /// Clipped and cropped counts with their convolution, before normalization.
    pub raw: Observations,

    /// Per-territory standard deviation used for normalization.
    pub scale: Array1<f64>,
}

impl Prepared {
    /// Maps an outlier estimate back to count units.
    ///
    /// # Panics
    ///
    /// Panics if `outliers` does not have one row per territory.
    #[must_use]
    pub fn rescale(&self, outliers: &Array2<f64>) -> Array2<f64> {
        outliers * &self.scale.view().insert_axis(Axis(1))
    }
}

/// Clips, convolves, crops and normalizes raw daily counts.
///
/// # Errors
///
/// Propagates the errors of [`convolve_counts`] and [`normalize`].
pub fn prepare(counts: ArrayView2<'_, f64>, phi: ArrayView1<'_, f64>) -> Result<Prepared, EstimError> {
    let raw = convolve_counts(counts, phi)?;
    let (observations, scale) = normalize(&raw)?;
    log::debug!(
        "prepared {} territories over {} days",
        observations.territories(),
        observations.days()
    );
    Ok(Prepared {
        observations,
        raw,
        scale,
    })
}
