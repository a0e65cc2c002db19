//! First-order primal-dual (Chambolle-Pock) solver.
//!
//! # Algorithm
//!
//! The solver minimizes `f(x) + g(Lx)` where `L` is a linear operator with a
//! known adjoint and both `f` and `g` have closed-form proximity operators.
//! With dual step `σ` and primal step `τ = 0.99 / (σ ||L||²)`, each iteration
//! performs
//!
//! ```text
//! ỹ  = y + σ L x̄
//! y  = ỹ − σ prox_{g/σ}(ỹ / σ)
//! x⁺ = prox_{τ f}(x − τ L* y)
//! x̄  = 2 x⁺ − x
//! ```
//!
//! The iteration starts from the configured initial point (or the problem's
//! default) with `y = L x0`, and is guaranteed to converge for proper convex
//! lower semicontinuous `f` and `g` as long as `||L||²` does not exceed the
//! problem's [`norm_bound`].
//!
//! # Stopping
//!
//! Every [`Config::checkpoint_interval`] iterations the solver evaluates the
//! criterion and a gap statistic (see [`StopRule`]). The first checkpoint has
//! no predecessor and reports an infinite gap. The solver reports
//! [`Status::Converged`] once the gap drops below [`Config::tolerance`] and
//! [`Status::MaxIters`] after `min(max_iters, iter_ceiling)` iterations.
//! Non-convergence is not an error: inspect [`Solution::gap`].
//!
//! # Observer Events
//!
//! The solver emits one [`Event`] per checkpoint. Observers can return
//! [`Action::StopEarly`] to halt with [`Status::StoppedByObserver`].
//!
//! [`norm_bound`]: rtprox_core::ConvexProblem::norm_bound

mod action;
mod config;
mod error;
mod event;
mod run;
mod solution;
mod state;
mod stopping;


pub use action::Action;
pub use config::{
    Config, ConfigBuilder, ConfigError, DataTerm, Prior, Regularization, StopRule, Tracked,
};
pub use error::Error;
pub use event::Event;
pub use solution::{Solution, Status};

use rtprox_core::{ConvexProblem, Observer};

/// Minimizes `f(x) + g(Lx)` with the primal-dual iteration.
///
/// The observer receives an [`Event`] at each checkpoint.
/// See the [module docs](self) for details on stopping and observer actions.
///
/// # Errors
///
/// Returns an error if the config is invalid, the problem's norm bound is not
/// positive, the initial point has the wrong shape, or the criterion becomes
/// non-finite at a checkpoint.
pub fn solve<P, Obs>(problem: &P, config: &Config, observer: Obs) -> Result<Solution, Error>
where
    P: ConvexProblem,
    Obs: for<'a> Observer<Event<'a>, Action>,
{
    run::run(problem, config, observer)
}

/// Minimizes `f(x) + g(Lx)` without observer support.
///
/// This is a convenience wrapper around [`solve`] that uses a no-op observer.
///
/// # Errors
///
/// Same as [`solve`].
pub fn solve_unobserved<P>(problem: &P, config: &Config) -> Result<Solution, Error>
where
    P: ConvexProblem,
{
    solve(problem, config, ())
}
