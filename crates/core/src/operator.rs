use crate::{Signal, SignalView};

/// A linear operator bundled with its exact adjoint.
///
/// Implementations must satisfy the adjoint identity
/// `<apply(x), y> == <x, apply_adjoint(y)>` for every `x` in the domain and
/// every `y` in the range. [`LinearOperator::adjoint_mismatch`] measures how
/// far an implementation is from that identity for a given pair.
pub trait LinearOperator {
    /// Returns the shape of `apply(x)` for an `x` of shape `domain`.
    fn range_shape(&self, domain: (usize, usize)) -> (usize, usize);

    /// Applies the operator.
    fn apply(&self, x: SignalView<'_>) -> Signal;

    /// Applies the adjoint operator.
    ///
    /// The output has the domain shape associated with `y`'s range shape.
    fn apply_adjoint(&self, y: SignalView<'_>) -> Signal;

    /// Returns the relative mismatch of the adjoint identity for `x` and `y`.
    ///
    /// The result is `|<Lx, y> - <x, L*y>| / max(|<Lx, y>|, |<x, L*y>|, 1)`.
    fn adjoint_mismatch(&self, x: SignalView<'_>, y: SignalView<'_>) -> f64 {
        let lhs = (&self.apply(x) * &y).sum();
        let rhs = (&x * &self.apply_adjoint(y)).sum();
        let scale = lhs.abs().max(rhs.abs()).max(1.0);
        (lhs - rhs).abs() / scale
    }

    /// Estimates `||L||²` on signals of shape `domain` by power iteration on `L* L`.
    ///
    /// The start vector is deterministic and not constant along rows, so it
    /// is not orthogonal to the dominant eigenvector of a difference operator.
    /// The result approaches the true squared norm from below as `iterations`
    /// grows.
    fn estimate_norm_squared(&self, domain: (usize, usize), iterations: usize) -> f64 {
        let mut v = Signal::from_shape_fn(domain, |(i, j)| {
            let k = (i * domain.1 + j) as f64;
            (0.7 * k).sin() + 0.3 * (1.3 * k).cos()
        });
        let norm = v.mapv(|a| a * a).sum().sqrt();
        if norm == 0.0 {
            return 0.0;
        }
        v /= norm;

        let mut estimate = 0.0;
        for _ in 0..iterations {
            let lv = self.apply(v.view());
            estimate = lv.mapv(|a| a * a).sum();

            let w = self.apply_adjoint(lv.view());
            let w_norm = w.mapv(|a| a * a).sum().sqrt();
            if w_norm == 0.0 {
                break;
            }
            v = w / w_norm;
        }
        estimate
    }
}

impl<T: LinearOperator + ?Sized> LinearOperator for &T {
    fn range_shape(&self, domain: (usize, usize)) -> (usize, usize) {
        (**self).range_shape(domain)
    }

    fn apply(&self, x: SignalView<'_>) -> Signal {
        (**self).apply(x)
    }

    fn apply_adjoint(&self, y: SignalView<'_>) -> Signal {
        (**self).apply_adjoint(y)
    }
}
