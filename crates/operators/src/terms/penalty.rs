use ndarray::s;
use rtprox_core::{ProximalTerm, Signal, SignalView};

use crate::prox::{l1_norm, project_non_negative, soft_threshold};

/// Function applied to one row-block of the regularization operator's output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PenaltyKind {
    /// `||y||₁`; weights live in the operator.
    L1,

    /// Indicator of `y >= 0`.
    ///
    /// Contributes nothing to [`ProximalTerm::value`]: the constraint is
    /// enforced through the dual variable, and primal iterates only reach it
    /// in the limit.
    NonNegative,
}

/// Separable penalty over consecutive row-blocks of a stacked signal.
///
/// Blocks are listed top to bottom, matching the row-blocks produced by the
/// stacked operator they are paired with.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Penalty {
    blocks: Vec<(usize, PenaltyKind)>,
}

impl Penalty {
    /// Creates an empty penalty.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a block of `rows` rows penalized by `kind`.
    #[must_use]
    pub fn with(mut self, kind: PenaltyKind, rows: usize) -> Self {
        self.blocks.push((rows, kind));
        self
    }

    /// Shorthand for a single L1 block.
    #[must_use]
    pub fn l1(rows: usize) -> Self {
        Self::new().with(PenaltyKind::L1, rows)
    }

    /// Returns the total number of rows covered by the blocks.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.blocks.iter().map(|(rows, _)| rows).sum()
    }

    /// Returns the blocks as `(rows, kind)` pairs.
    #[must_use]
    pub fn blocks(&self) -> &[(usize, PenaltyKind)] {
        &self.blocks
    }
}

impl ProximalTerm for Penalty {
    fn value(&self, y: SignalView<'_>) -> f64 {
        let mut start = 0;
        let mut total = 0.0;
        for &(rows, kind) in &self.blocks {
            let block = y.slice(s![start..start + rows, ..]);
            if kind == PenaltyKind::L1 {
                total += l1_norm(block);
            }
            start += rows;
        }
        total
    }

    fn prox(&self, y: SignalView<'_>, step: f64) -> Signal {
        let mut out = Signal::zeros(y.dim());
        let mut start = 0;
        for &(rows, kind) in &self.blocks {
            let block = y.slice(s![start..start + rows, ..]);
            let proxed = match kind {
                PenaltyKind::L1 => soft_threshold(block, step),
                PenaltyKind::NonNegative => project_non_negative(block),
            };
            out.slice_mut(s![start..start + rows, ..]).assign(&proxed);
            start += rows;
        }
        out
    }
}
