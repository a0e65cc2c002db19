use rtprox_core::SignalView;

/// Event emitted by the primal-dual solver at every checkpoint.
///
/// A checkpoint happens once every [`Config::checkpoint_interval`]
/// iterations, after the criterion and gap statistic have been recorded.
///
/// [`Config::checkpoint_interval`]: super::Config::checkpoint_interval
#[derive(Debug, Clone, Copy)]
pub struct Event<'a> {
    /// Iterations completed so far.
    pub iter: usize,

    /// Objective value `f(x) + g(Lx)` at the current primal iterate.
    pub criterion: f64,

    /// Gap statistic compared against the tolerance.
    pub gap: f64,

    /// Current primal iterate.
    pub x: SignalView<'a>,
}
