/// Actions an observer can take during a primal-dual solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Stop the solver and return the current primal iterate.
    StopEarly,
}
