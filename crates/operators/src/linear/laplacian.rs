use ndarray::s;
use rtprox_core::{LinearOperator, Signal, SignalView};

use crate::OperatorError;

use super::Weight;

/// Truncated second difference along the time axis.
///
/// For a row `x` of length `T`, output column `t < T - 2` is
/// `w · (x[t] - 2·x[t+1] + x[t+2]) / 4` and the last two columns are zero.
/// The truncation is kept as is; the adjoint is the exact transpose of the
/// truncated stencil, so it ignores the last two columns of its input.
///
/// With the `1/4` normalization `||L||² <= w_max²`.
#[derive(Debug, Clone, PartialEq)]
pub struct Laplacian {
    weight: Weight,
}

impl Laplacian {
    /// Creates a weighted laplacian filter.
    ///
    /// # Errors
    ///
    /// Returns [`OperatorError::InvalidWeight`] if any weight is negative or non-finite.
    pub fn new(weight: Weight) -> Result<Self, OperatorError> {
        weight.validate()?;
        Ok(Self { weight })
    }

    /// Returns the unit-weight filter.
    #[must_use]
    pub fn unit() -> Self {
        Self {
            weight: Weight::Uniform(1.0),
        }
    }

    /// Returns the weight applied to the filtered rows.
    #[must_use]
    pub fn weight(&self) -> &Weight {
        &self.weight
    }
}

impl LinearOperator for Laplacian {
    fn range_shape(&self, domain: (usize, usize)) -> (usize, usize) {
        domain
    }

    fn apply(&self, x: SignalView<'_>) -> Signal {
        let mut out = Signal::zeros(x.dim());
        let days = x.ncols();
        if days < 3 {
            return out;
        }

        let inner = days - 2;
        out.slice_mut(s![.., ..inner])
            .scaled_add(0.25, &x.slice(s![.., ..inner]));
        out.slice_mut(s![.., ..inner])
            .scaled_add(-0.5, &x.slice(s![.., 1..=inner]));
        out.slice_mut(s![.., ..inner])
            .scaled_add(0.25, &x.slice(s![.., 2..]));

        self.weight.scale_rows(&mut out);
        out
    }

    fn apply_adjoint(&self, y: SignalView<'_>) -> Signal {
        let mut out = Signal::zeros(y.dim());
        let days = y.ncols();
        if days < 3 {
            return out;
        }

        // Each stencil output y[t] spreads back onto x[t], x[t+1], x[t+2].
        let inner = days - 2;
        let y_inner = y.slice(s![.., ..inner]);
        out.slice_mut(s![.., ..inner]).scaled_add(0.25, &y_inner);
        out.slice_mut(s![.., 1..=inner]).scaled_add(-0.5, &y_inner);
        out.slice_mut(s![.., 2..]).scaled_add(0.25, &y_inner);

        self.weight.scale_rows(&mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use ndarray::{Array1, Array2, array};
    use rand::{Rng, SeedableRng, rngs::StdRng};

    fn random_signal(rng: &mut StdRng, rows: usize, days: usize) -> Array2<f64> {
        Array2::from_shape_fn((rows, days), |_| rng.gen_range(-5.0..5.0))
    }

    #[test]
    fn linear_signal_has_zero_curvature() {
        let op = Laplacian::unit();
        let x = array![[1.0, 2.0, 3.0, 4.0, 5.0]];

        let out = op.apply(x.view());

        assert_eq!(out, Array2::<f64>::zeros((1, 5)));
    }

    #[test]
    fn stencil_is_quarter_second_difference() {
        let op = Laplacian::new(Weight::Uniform(2.0)).unwrap();
        let x = array![[0.0, 4.0, 0.0, 0.0, 8.0]];

        let out = op.apply(x.view());

        // (0 - 8 + 0) / 4 * 2, (4 - 0 + 0) / 4 * 2, (0 - 0 + 8) / 4 * 2, then two zeros.
        assert_eq!(out, array![[-4.0, 2.0, 4.0, 0.0, 0.0]]);
    }

    #[test]
    fn adjoint_boundaries_match_transpose() {
        let op = Laplacian::unit();
        let y = array![[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]];

        let out = op.apply_adjoint(y.view());

        let expected = array![[
            0.25 * 1.0,
            0.25 * 2.0 - 0.5 * 1.0,
            0.25 * 3.0 - 0.5 * 2.0 + 0.25 * 1.0,
            0.25 * 4.0 - 0.5 * 3.0 + 0.25 * 2.0,
            -0.5 * 4.0 + 0.25 * 3.0,
            0.25 * 4.0,
        ]];
        for (a, b) in out.iter().zip(expected.iter()) {
            assert_relative_eq!(a, b, epsilon = 1e-14);
        }
    }

    #[test]
    fn adjoint_identity_holds_for_uniform_and_per_row_weights() {
        let mut rng = StdRng::seed_from_u64(7);
        let operators = [
            Laplacian::unit(),
            Laplacian::new(Weight::Uniform(3.5)).unwrap(),
            Laplacian::new(Weight::PerRow(Array1::from(vec![1.0, 50.0, 0.2]))).unwrap(),
        ];

        for op in &operators {
            for days in [3, 4, 5, 17, 60] {
                let x = random_signal(&mut rng, 3, days);
                let y = random_signal(&mut rng, 3, days);
                assert!(op.adjoint_mismatch(x.view(), y.view()) < 1e-10);
            }
        }
    }

    #[test]
    fn norm_is_below_squared_weight() {
        let op = Laplacian::new(Weight::Uniform(3.0)).unwrap();

        let estimate = op.estimate_norm_squared((1, 200), 500);

        assert!(estimate <= 9.0 + 1e-9);
        assert!(estimate > 8.5);
    }

    #[test]
    fn short_signals_map_to_zero() {
        let op = Laplacian::unit();
        let x = array![[1.0, 7.0]];

        assert_eq!(op.apply(x.view()), Array2::<f64>::zeros((1, 2)));
        assert_eq!(op.apply_adjoint(x.view()), Array2::<f64>::zeros((1, 2)));
    }
}
