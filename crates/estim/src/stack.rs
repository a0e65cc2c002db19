use ndarray::s;
use rtprox_core::{LinearOperator, Signal, SignalView};
use rtprox_operators::{
    linear::{Incidence, Laplacian},
    terms::{Penalty, PenaltyKind},
};

/// How the outlier channel is constrained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OutlierVariant {
    /// Sparsity penalty on the outliers only.
    Plain,

    /// Adds an identity block on `R` whose dual enforces `R ≥ 0`.
    #[default]
    NonNegative,
}

/// The regularization operator shared by all estimators.
///
/// The unknown is `R` (one row per territory), or `[R; O]` when an outlier
/// channel is present. Output row blocks, in order:
///
/// | block | rows | present when |
/// |---|---|---|
/// | `λR · D2 R` | `K` | always |
/// | `λS · B R` | edges | a graph is attached |
/// | `λO · O` | `K` | an outlier channel is attached |
/// | `R` | `K` | the outlier variant is [`OutlierVariant::NonNegative`] |
#[derive(Debug, Clone, PartialEq)]
pub struct StackedOperator {
    temporal: Laplacian,
    graph: Option<(Incidence, f64)>,
    outlier: Option<(f64, OutlierVariant)>,
}

impl StackedOperator {
    /// Temporal regularization only.
    #[must_use]
    pub fn new(temporal: Laplacian) -> Self {
        Self {
            temporal,
            graph: None,
            outlier: None,
        }
    }

    /// Adds a graph total-variation block weighted by `weight`.
    #[must_use]
    pub fn with_graph(mut self, incidence: Incidence, weight: f64) -> Self {
        self.graph = Some((incidence, weight));
        self
    }

    /// Adds an outlier channel weighted by `weight`.
    #[must_use]
    pub fn with_outlier(mut self, weight: f64, variant: OutlierVariant) -> Self {
        self.outlier = Some((weight, variant));
        self
    }

    /// Returns the same layout with every weight set to one.
    #[must_use]
    pub fn unit(&self) -> Self {
        Self {
            temporal: Laplacian::unit(),
            graph: self.graph.as_ref().map(|(b, _)| (b.clone(), 1.0)),
            outlier: self.outlier.map(|(_, variant)| (1.0, variant)),
        }
    }

    /// Returns whether the unknown carries an outlier channel.
    #[must_use]
    pub fn has_outlier(&self) -> bool {
        self.outlier.is_some()
    }

    /// Number of stacked channels in the unknown (1 for `R`, 2 for `[R; O]`).
    #[must_use]
    pub fn channels(&self) -> usize {
        if self.has_outlier() { 2 } else { 1 }
    }

    fn non_negative(&self) -> bool {
        matches!(self.outlier, Some((_, OutlierVariant::NonNegative)))
    }

    fn edges(&self) -> usize {
        self.graph.as_ref().map_or(0, |(b, _)| b.edges())
    }

    /// Recovers the number of territories from the number of output rows.
    fn territories_in_range(&self, range_rows: usize) -> usize {
        let blocks = 1 + usize::from(self.has_outlier()) + usize::from(self.non_negative());
        range_rows.saturating_sub(self.edges()) / blocks
    }

    /// Upper bound on `||L||²` from the block weights.
    ///
    /// The `R` column contributes `λR² + λS²·2·maxdeg (+1)`, the `O` column
    /// contributes `λO²`, and the bound is the larger of the two.
    #[must_use]
    pub fn norm_bound(&self) -> f64 {
        let mut r_column = self.temporal.weight().max().powi(2);
        if let Some((incidence, weight)) = &self.graph {
            r_column += weight * weight * incidence.norm_squared_bound();
        }
        if self.non_negative() {
            r_column += 1.0;
        }
        match self.outlier {
            Some((weight, _)) => r_column.max(weight * weight),
            None => r_column,
        }
    }

    /// The penalty matching the output row blocks for `territories` territories.
    #[must_use]
    pub fn penalty(&self, territories: usize) -> Penalty {
        let mut penalty = Penalty::l1(territories + self.edges());
        if self.has_outlier() {
            penalty = penalty.with(PenaltyKind::L1, territories);
        }
        if self.non_negative() {
            penalty = penalty.with(PenaltyKind::NonNegative, territories);
        }
        penalty
    }
}

impl LinearOperator for StackedOperator {
    fn range_shape(&self, domain: (usize, usize)) -> (usize, usize) {
        let (rows, days) = domain;
        let k = rows / self.channels();
        let mut out_rows = k + self.edges();
        if self.has_outlier() {
            out_rows += k;
        }
        if self.non_negative() {
            out_rows += k;
        }
        (out_rows, days)
    }

    fn apply(&self, x: SignalView<'_>) -> Signal {
        let k = x.nrows() / self.channels();
        let r = x.slice(s![..k, ..]);
        let mut out = Signal::zeros(self.range_shape(x.dim()));

        out.slice_mut(s![..k, ..]).assign(&self.temporal.apply(r));
        let mut row = k;

        if let Some((incidence, weight)) = &self.graph {
            let edges = incidence.edges();
            out.slice_mut(s![row..row + edges, ..])
                .scaled_add(*weight, &incidence.apply(r));
            row += edges;
        }

        if let Some((weight, variant)) = self.outlier {
            out.slice_mut(s![row..row + k, ..])
                .scaled_add(weight, &x.slice(s![k.., ..]));
            row += k;
            if variant == OutlierVariant::NonNegative {
                out.slice_mut(s![row..row + k, ..]).assign(&r);
            }
        }

        out
    }

    fn apply_adjoint(&self, y: SignalView<'_>) -> Signal {
        let k = self.territories_in_range(y.nrows());
        let days = y.ncols();
        let mut out = Signal::zeros((k * self.channels(), days));

        out.slice_mut(s![..k, ..])
            .assign(&self.temporal.apply_adjoint(y.slice(s![..k, ..])));
        let mut row = k;

        if let Some((incidence, weight)) = &self.graph {
            let edges = incidence.edges();
            let spatial = incidence.apply_adjoint(y.slice(s![row..row + edges, ..]));
            out.slice_mut(s![..k, ..]).scaled_add(*weight, &spatial);
            row += edges;
        }

        if let Some((weight, variant)) = self.outlier {
            out.slice_mut(s![k.., ..])
                .scaled_add(weight, &y.slice(s![row..row + k, ..]));
            row += k;
            if variant == OutlierVariant::NonNegative {
                out.slice_mut(s![..k, ..]).scaled_add(1.0, &y.slice(s![row..row + k, ..]));
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use ndarray::{Array2, array};
    use rand::{Rng, SeedableRng, rngs::StdRng};
    use rtprox_operators::linear::Weight;

    fn path_graph() -> Incidence {
        Incidence::from_edges(3, &[(0, 1), (1, 2)]).unwrap()
    }

    fn layouts() -> Vec<StackedOperator> {
        let temporal = Laplacian::new(Weight::Uniform(2.5)).unwrap();
        let base = StackedOperator::new(temporal);
        vec![
            base.clone(),
            base.clone().with_graph(path_graph(), 0.7),
            base.clone().with_outlier(1.5, OutlierVariant::Plain),
            base.clone().with_outlier(0.4, OutlierVariant::NonNegative),
            base.with_graph(path_graph(), 0.7)
                .with_outlier(3.0, OutlierVariant::NonNegative),
        ]
    }

    fn random_signal(rng: &mut StdRng, shape: (usize, usize)) -> Array2<f64> {
        Array2::from_shape_fn(shape, |_| rng.gen_range(-3.0..3.0))
    }

    #[test]
    fn adjoint_identity_holds_for_every_layout() {
        let mut rng = StdRng::seed_from_u64(3);
        for op in layouts() {
            let domain = (3 * op.channels(), 17);
            for _ in 0..5 {
                let x = random_signal(&mut rng, domain);
                let y = random_signal(&mut rng, op.range_shape(domain));
                assert!(op.adjoint_mismatch(x.view(), y.view()) < 1e-10, "{op:?}");
            }
        }
    }

    #[test]
    fn adjoint_returns_domain_shape() {
        for op in layouts() {
            let domain = (3 * op.channels(), 9);
            let y = Array2::ones(op.range_shape(domain));
            assert_eq!(op.apply_adjoint(y.view()).dim(), domain);
        }
    }

    #[test]
    fn norm_bound_dominates_estimate() {
        for op in layouts() {
            let domain = (3 * op.channels(), 40);
            let estimate = op.estimate_norm_squared(domain, 300);
            assert!(estimate <= op.norm_bound() + 1e-9, "{op:?}: {estimate}");
        }
    }

    #[test]
    fn norm_bound_takes_larger_column() {
        let temporal = Laplacian::new(Weight::Uniform(2.0)).unwrap();
        let op = StackedOperator::new(temporal.clone()).with_outlier(3.0, OutlierVariant::NonNegative);
        assert_relative_eq!(op.norm_bound(), 9.0);

        let op = StackedOperator::new(temporal).with_outlier(1.0, OutlierVariant::NonNegative);
        assert_relative_eq!(op.norm_bound(), 5.0);
    }

    #[test]
    fn penalty_covers_every_output_row() {
        for op in layouts() {
            let domain = (3 * op.channels(), 5);
            assert_eq!(op.penalty(3).rows(), op.range_shape(domain).0);
        }
    }

    #[test]
    fn blocks_are_stacked_in_order() {
        let op = StackedOperator::new(Laplacian::unit())
            .with_graph(Incidence::from_edges(2, &[(0, 1)]).unwrap(), 2.0)
            .with_outlier(3.0, OutlierVariant::NonNegative);
        // Rows 0..2 are R, rows 2..4 are O.
        let x = array![
            [1.0, 1.0, 1.0],
            [4.0, 4.0, 4.0],
            [0.5, 0.0, 0.0],
            [0.0, 0.0, 0.0],
        ];

        let out = op.apply(x.view());

        assert_eq!(out.dim(), (2 + 1 + 2 + 2, 3));
        // Constant rows have zero curvature.
        assert_eq!(out.row(0), array![0.0, 0.0, 0.0]);
        assert_eq!(out.row(1), array![0.0, 0.0, 0.0]);
        // Graph block is weight times the difference across the edge.
        assert_eq!(out.row(2).mapv(f64::abs), array![6.0, 6.0, 6.0]);
        assert_eq!(out.row(3), array![1.5, 0.0, 0.0]);
        assert_eq!(out.row(4), array![0.0, 0.0, 0.0]);
        assert_eq!(out.row(5), x.row(0));
        assert_eq!(out.row(6), x.row(1));
    }

    #[test]
    fn unit_keeps_layout() {
        let op = StackedOperator::new(Laplacian::new(Weight::Uniform(50.0)).unwrap())
            .with_graph(path_graph(), 0.005)
            .with_outlier(0.02, OutlierVariant::Plain);

        let unit = op.unit();

        assert_eq!(
            unit,
            StackedOperator::new(Laplacian::unit())
                .with_graph(path_graph(), 1.0)
                .with_outlier(1.0, OutlierVariant::Plain)
        );
        assert_eq!(unit.range_shape((6, 4)), op.range_shape((6, 4)));
    }
}
