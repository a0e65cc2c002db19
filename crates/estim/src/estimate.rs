use ndarray::s;
use rtprox_core::{ConvexProblem, LinearOperator, Observer, Signal};
use rtprox_operators::linear::{Kernel, Laplacian, Weight, build_operator};
use rtprox_solvers::optimization::primal_dual::{self, Action, Config, Event, Prior, Status};

use crate::{EstimError, Problem, StackedOperator};

/// The outcome of a penalized estimation.
#[derive(Debug, Clone)]
pub struct Estimate {
    /// Reproduction number, one row per territory.
    pub r: Signal,

    /// Outlier channel in normalized units, when the estimator has one.
    pub o: Option<Signal>,

    /// Criterion recorded at each solver checkpoint.
    pub criterion: Vec<f64>,

    /// Gap statistic recorded at each solver checkpoint.
    pub gap: Vec<f64>,

    /// How the solver stopped.
    pub status: Status,

    /// Iterations performed.
    pub iters: usize,

    /// The estimator's operator with unit weights, for checking the adjoint
    /// identity from outside.
    pub debug_operator: StackedOperator,
}

/// Selects the temporal filter named by the solver configuration.
pub(crate) fn temporal_operator(prior: Prior, weight: Weight) -> Result<Laplacian, EstimError> {
    let kernel = match prior {
        Prior::Laplacian => Kernel::Laplacian,
        Prior::Gradient => Kernel::Gradient,
    };
    Ok(build_operator(kernel, weight)?)
}

/// Solves `problem` and splits the iterate into `R` and `O`.
pub(crate) fn run<Obs>(
    label: &str,
    problem: &Problem,
    config: &Config,
    observer: Obs,
) -> Result<Estimate, EstimError>
where
    Obs: for<'a> Observer<Event<'a>, Action>,
{
    let operator = problem.operator();
    log::debug!(
        "{label}: {} territories, dual shape {:?}, norm bound {:.4e}",
        problem.territories(),
        operator.range_shape(problem.fidelity().unknown_shape()),
        operator.norm_bound(),
    );

    let solution = primal_dual::solve(problem, config, observer)?;
    log::info!(
        "{label}: {:?} after {} iterations, final gap {:?}",
        solution.status,
        solution.iters,
        solution.final_gap(),
    );

    let k = problem.territories();
    let (r, o) = if operator.has_outlier() {
        let r = solution.x.slice(s![..k, ..]).to_owned();
        let o = solution.x.slice(s![k.., ..]).to_owned();
        (r, Some(o))
    } else {
        (solution.x, None)
    };

    Ok(Estimate {
        r,
        o,
        criterion: solution.criterion,
        gap: solution.gap,
        status: solution.status,
        iters: solution.iters,
        debug_operator: operator.unit(),
    })
}
