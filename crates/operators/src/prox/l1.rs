use rtprox_core::{Signal, SignalView};

/// Soft-thresholding: `sign(x) · max(|x| - threshold, 0)` elementwise.
///
/// A zero threshold returns `x` unchanged.
pub fn soft_threshold(x: SignalView<'_>, threshold: f64) -> Signal {
    x.mapv(|v| v.signum() * (v.abs() - threshold).max(0.0))
}

/// Returns `Σ |x|`.
pub fn l1_norm(x: SignalView<'_>) -> f64 {
    x.iter().map(|v| v.abs()).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    use ndarray::{Array2, array};
    use rand::{Rng, SeedableRng, rngs::StdRng};

    #[test]
    fn shrinks_toward_zero() {
        let x = array![[3.0, -3.0, 0.5, -0.5, 0.0]];

        let out = soft_threshold(x.view(), 1.0);

        assert_eq!(out, array![[2.0, -2.0, 0.0, 0.0, 0.0]]);
    }

    #[test]
    fn zero_threshold_is_identity() {
        let mut rng = StdRng::seed_from_u64(3);
        let x = Array2::from_shape_fn((2, 30), |_| rng.gen_range(-10.0..10.0));

        assert_eq!(soft_threshold(x.view(), 0.0), x);
    }

    #[test]
    fn thresholding_is_idempotent_at_zero() {
        let mut rng = StdRng::seed_from_u64(5);
        let x = Array2::from_shape_fn((3, 25), |_| rng.gen_range(-4.0..4.0));

        let once = soft_threshold(x.view(), 1.5);
        let again = soft_threshold(once.view(), 0.0);

        assert_eq!(again, once);
    }

    #[test]
    fn output_keeps_sign_or_vanishes() {
        let mut rng = StdRng::seed_from_u64(9);
        let x = Array2::from_shape_fn((1, 50), |_| rng.gen_range(-2.0..2.0));

        let out = soft_threshold(x.view(), 0.7);

        for (a, b) in x.iter().zip(out.iter()) {
            assert!(*b == 0.0 || a.signum() == b.signum());
            assert!(b.abs() <= a.abs());
        }
    }

    #[test]
    fn l1_norm_sums_magnitudes() {
        assert_eq!(l1_norm(array![[1.0, -2.0], [0.5, 0.0]].view()), 3.5);
    }
}
