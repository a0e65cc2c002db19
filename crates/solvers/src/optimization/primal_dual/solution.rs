use rtprox_core::Signal;

/// Indicates whether the solver converged or hit the iteration limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Status {
    /// The gap statistic dropped below the tolerance.
    Converged,

    /// Reached the iteration limit without converging.
    MaxIters,

    /// Stopped early due to an observer decision.
    StoppedByObserver,
}

/// The result of a primal-dual solve.
#[derive(Debug, Clone)]
pub struct Solution {
    /// Final solver status.
    pub status: Status,

    /// Final primal iterate.
    pub x: Signal,

    /// Criterion recorded at each checkpoint.
    pub criterion: Vec<f64>,

    /// Gap statistic recorded at each checkpoint.
    pub gap: Vec<f64>,

    /// Iteration count when the solver finished.
    pub iters: usize,
}

impl Solution {
    /// Returns the last recorded gap statistic, if any checkpoint was reached.
    #[must_use]
    pub fn final_gap(&self) -> Option<f64> {
        self.gap.last().copied()
    }
}
