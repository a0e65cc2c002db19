use ndarray::Axis;
use rtprox_core::{Signal, SignalView};

use crate::EstimError;

/// Observed counts paired with their convolution by the infectiousness profile.
///
/// Both signals have one row per territory and one column per day. Values are
/// finite and non-negative, which the Kullback-Leibler fidelity relies on.
#[derive(Debug, Clone, PartialEq)]
pub struct Observations {
    data: Signal,
    kernel: Signal,
}

impl Observations {
    /// Validates and pairs observed counts with their convolution.
    ///
    /// # Errors
    ///
    /// Returns an error if the shapes differ or if any value is negative or
    /// non-finite.
    pub fn new(data: Signal, kernel: Signal) -> Result<Self, EstimError> {
        if data.dim() != kernel.dim() {
            return Err(EstimError::ShapeMismatch {
                data: data.dim(),
                kernel: kernel.dim(),
            });
        }
        check_values("observed count", data.view())?;
        check_values("convolved count", kernel.view())?;
        Ok(Self { data, kernel })
    }

    /// Observations for a single territory.
    ///
    /// # Errors
    ///
    /// Same as [`Observations::new`].
    pub fn univariate(
        data: ndarray::Array1<f64>,
        kernel: ndarray::Array1<f64>,
    ) -> Result<Self, EstimError> {
        Self::new(data.insert_axis(Axis(0)), kernel.insert_axis(Axis(0)))
    }

    #[must_use]
    pub fn data(&self) -> &Signal {
        &self.data
    }

    #[must_use]
    pub fn kernel(&self) -> &Signal {
        &self.kernel
    }

    #[must_use]
    pub fn territories(&self) -> usize {
        self.data.nrows()
    }

    #[must_use]
    pub fn days(&self) -> usize {
        self.data.ncols()
    }

    /// Returns the observations of one territory.
    ///
    /// # Panics
    ///
    /// Panics if `row` is out of bounds.
    #[must_use]
    pub fn territory(&self, row: usize) -> Self {
        Self {
            data: self.data.select(Axis(0), &[row]),
            kernel: self.kernel.select(Axis(0), &[row]),
        }
    }
}

fn check_values(what: &'static str, signal: SignalView<'_>) -> Result<(), EstimError> {
    match signal
        .indexed_iter()
        .find(|(_, v)| !v.is_finite() || **v < 0.0)
    {
        Some(((row, day), &value)) => Err(EstimError::InvalidValue {
            what,
            row,
            day,
            value,
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use ndarray::array;

    #[test]
    fn accepts_matching_non_negative_signals() {
        let obs = Observations::new(array![[1.0, 0.0, 2.0]], array![[0.5, 1.0, 1.5]]).unwrap();

        assert_eq!(obs.territories(), 1);
        assert_eq!(obs.days(), 3);
    }

    #[test]
    fn rejects_shape_mismatch() {
        let err = Observations::new(array![[1.0, 2.0]], array![[1.0, 2.0, 3.0]]).unwrap_err();

        assert!(matches!(
            err,
            EstimError::ShapeMismatch {
                data: (1, 2),
                kernel: (1, 3)
            }
        ));
    }

    #[test]
    fn rejects_negative_and_non_finite_values() {
        let err = Observations::new(array![[1.0, -2.0]], array![[1.0, 1.0]]).unwrap_err();
        assert!(matches!(
            err,
            EstimError::InvalidValue { row: 0, day: 1, .. }
        ));

        let err = Observations::new(array![[1.0, 2.0]], array![[f64::NAN, 1.0]]).unwrap_err();
        assert!(matches!(
            err,
            EstimError::InvalidValue {
                what: "convolved count",
                day: 0,
                ..
            }
        ));
    }

    #[test]
    fn selects_one_territory() {
        let obs = Observations::new(
            array![[1.0, 2.0], [3.0, 4.0]],
            array![[1.0, 1.0], [2.0, 2.0]],
        )
        .unwrap();

        let second = obs.territory(1);

        assert_eq!(second.data(), &array![[3.0, 4.0]]);
        assert_eq!(second.kernel(), &array![[2.0, 2.0]]);
    }
}
