use ndarray::Zip;
use rtprox_core::{Signal, SignalView};

/// Kullback-Leibler divergence `KL(u, z)` summed over all entries.
///
/// Each entry contributes `u - z·ln(u) + z·(ln(z) - 1)`, which vanishes at
/// `u = z`; entries with `z = 0` contribute `u`. The value is `+∞` when some
/// `u < 0`, or `u = 0` with `z > 0`.
pub fn kl_divergence(fitted: SignalView<'_>, data: SignalView<'_>) -> f64 {
    Zip::from(fitted).and(data).fold(0.0, |acc, &u, &z| {
        let term = if z > 0.0 {
            if u > 0.0 {
                u - z * u.ln() + z * (z.ln() - 1.0)
            } else {
                f64::INFINITY
            }
        } else if u >= 0.0 {
            u
        } else {
            f64::INFINITY
        };
        acc + term
    })
}

/// Proximity operator of `step · KL(kernel ⊙ x, data)` with respect to `x`.
///
/// Evaluated pointwise as the positive root of the optimality condition:
/// `0.5 · (x - step·α + sqrt((x - step·α)² + 4·step·z))`.
pub fn prox_kl(
    x: SignalView<'_>,
    data: SignalView<'_>,
    kernel: SignalView<'_>,
    step: f64,
) -> Signal {
    Zip::from(x)
        .and(data)
        .and(kernel)
        .map_collect(|&x, &z, &a| {
            let b = x - step * a;
            0.5 * (b + (b * b + 4.0 * step * z).max(0.0).sqrt())
        })
}

/// Proximity operator of `step · KL(kernel ⊙ r + o, data)` with respect to `(r, o)`.
///
/// The fitted quantity `u = α·r + o` obeys the same quadratic as in
/// [`prox_kl`] with the step scaled by `α² + 1`; both unknowns are then moved
/// along `(α, 1)`. When `z = 0` and the root is zero, the result is the
/// projection of `(r, o)` onto `α·r + o = 0`.
pub fn prox_kl_outlier(
    r: SignalView<'_>,
    o: SignalView<'_>,
    data: SignalView<'_>,
    kernel: SignalView<'_>,
    step: f64,
) -> (Signal, Signal) {
    let mut r_out = Signal::zeros(r.dim());
    let mut o_out = Signal::zeros(o.dim());

    Zip::from(&mut r_out)
        .and(&mut o_out)
        .and(r)
        .and(o)
        .and(data)
        .and(kernel)
        .for_each(|r_new, o_new, &r, &o, &z, &a| {
            let c = a * a + 1.0;
            let p = a * r + o;
            let b = p - step * c;
            let u = 0.5 * (b + (b * b + 4.0 * step * c * z).max(0.0).sqrt());
            if u > 0.0 {
                let g = 1.0 - z / u;
                *r_new = r - step * a * g;
                *o_new = o - step * g;
            } else {
                *r_new = r - a * p / c;
                *o_new = o - p / c;
            }
        });

    (r_out, o_out)
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use ndarray::{Array2, array};
    use rand::{Rng, SeedableRng, rngs::StdRng};

    #[test]
    fn divergence_vanishes_on_data() {
        let z = array![[3.0, 0.0, 12.5]];
        assert_relative_eq!(kl_divergence(z.view(), z.view()), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn divergence_is_infinite_outside_domain() {
        let z = array![[3.0, 1.0]];
        assert!(kl_divergence(array![[0.0, 1.0]].view(), z.view()).is_infinite());
        assert!(kl_divergence(array![[-1.0, 0.0]].view(), array![[0.0, 0.0]].view()).is_infinite());
    }

    #[test]
    fn prox_satisfies_optimality_condition() {
        let mut rng = StdRng::seed_from_u64(21);
        let x = Array2::from_shape_fn((2, 40), |_| rng.gen_range(-3.0..6.0));
        let z = Array2::from_shape_fn((2, 40), |_| rng.gen_range(0.1..20.0));
        let a = Array2::from_shape_fn((2, 40), |_| rng.gen_range(0.0..4.0));
        let step = 0.37;

        let p = prox_kl(x.view(), z.view(), a.view(), step);

        Zip::from(&p).and(&x).and(&z).and(&a).for_each(|&p, &x, &z, &a| {
            assert!(p > 0.0);
            assert_relative_eq!((p - x) / step + a - z / p, 0.0, epsilon = 1e-8);
        });
    }

    #[test]
    fn prox_with_zero_data_is_shifted_clip() {
        let x = array![[2.0, 0.1]];
        let z = array![[0.0, 0.0]];
        let a = array![[1.0, 1.0]];

        let p = prox_kl(x.view(), z.view(), a.view(), 0.5);

        assert_relative_eq!(p[[0, 0]], 1.5);
        assert_relative_eq!(p[[0, 1]], 0.0);
    }

    #[test]
    fn outlier_prox_satisfies_joint_optimality() {
        let mut rng = StdRng::seed_from_u64(4);
        let r = Array2::from_shape_fn((1, 30), |_| rng.gen_range(0.0..3.0));
        let o = Array2::from_shape_fn((1, 30), |_| rng.gen_range(-2.0..2.0));
        let z = Array2::from_shape_fn((1, 30), |_| rng.gen_range(0.5..10.0));
        let a = Array2::from_shape_fn((1, 30), |_| rng.gen_range(0.5..5.0));
        let step = 0.8;

        let (rp, op) = prox_kl_outlier(r.view(), o.view(), z.view(), a.view(), step);

        for t in 0..30 {
            let (a, z) = (a[[0, t]], z[[0, t]]);
            let u = a * rp[[0, t]] + op[[0, t]];
            assert!(u > 0.0);
            let grad = 1.0 - z / u;
            assert_relative_eq!((rp[[0, t]] - r[[0, t]]) / step + a * grad, 0.0, epsilon = 1e-8);
            assert_relative_eq!((op[[0, t]] - o[[0, t]]) / step + grad, 0.0, epsilon = 1e-8);
        }
    }

    #[test]
    fn outlier_prox_with_zero_kernel_acts_on_outliers_only() {
        let r = array![[1.2, 0.4]];
        let o = array![[3.0, -1.0]];
        let z = array![[4.0, 2.0]];
        let zero = Array2::zeros((1, 2));
        let ones = Array2::ones((1, 2));

        let (rp, op) = prox_kl_outlier(r.view(), o.view(), z.view(), zero.view(), 0.3);
        let expected = prox_kl(o.view(), z.view(), ones.view(), 0.3);

        assert_eq!(rp, r);
        for (a, b) in op.iter().zip(expected.iter()) {
            assert_relative_eq!(a, b, epsilon = 1e-12);
        }
    }

    #[test]
    fn outlier_prox_projects_when_data_is_zero() {
        let r = array![[0.1]];
        let o = array![[0.1]];
        let z = array![[0.0]];
        let a = array![[1.0]];

        let (rp, op) = prox_kl_outlier(r.view(), o.view(), z.view(), a.view(), 1.0);

        assert_relative_eq!(rp[[0, 0]] + op[[0, 0]], 0.0, epsilon = 1e-15);
        assert_relative_eq!(rp[[0, 0]], 0.0, epsilon = 1e-15);
    }
}
