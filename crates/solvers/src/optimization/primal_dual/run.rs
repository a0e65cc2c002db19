use rtprox_core::{ConvexProblem, LinearOperator, Observer};

use super::{
    Action, Config, Error, Event, Solution, solution::Status, state::State, stopping::Stopping,
};

/// Fraction of the largest admissible primal step `1 / (σ ||L||²)`.
const STEP_SAFETY: f64 = 0.99;

/// Power iterations used when checking the caller's norm bound.
const NORM_CHECK_ITERS: usize = 200;

/// Core primal-dual iteration.
pub(super) fn run<P, Obs>(problem: &P, config: &Config, mut observer: Obs) -> Result<Solution, Error>
where
    P: ConvexProblem,
    Obs: for<'a> Observer<Event<'a>, Action>,
{
    config.validate()?;

    let norm_bound = problem.norm_bound();
    if !norm_bound.is_finite() || norm_bound <= 0.0 {
        return Err(Error::NormBound(norm_bound));
    }

    let default_x0 = problem.initial_point();
    let x0 = match config.initial_point() {
        Some(x0) if x0.dim() != default_x0.dim() => {
            return Err(Error::InitialPointShape {
                expected: default_x0.dim(),
                found: x0.dim(),
            });
        }
        Some(x0) => x0.clone(),
        None => default_x0,
    };

    let operator = problem.operator();
    let y0 = operator.apply(x0.view());
    let dual_shape = operator.range_shape(x0.dim());
    if y0.dim() != dual_shape {
        return Err(Error::OperatorShape {
            expected: dual_shape,
            found: y0.dim(),
        });
    }

    if config.check_norm_bound() {
        let estimate = operator.estimate_norm_squared(x0.dim(), NORM_CHECK_ITERS);
        if estimate > norm_bound * (1.0 + 1e-9) {
            log::warn!(
                "operator norm bound {norm_bound} is below the power-iteration estimate {estimate}; \
                 step sizes may be too large for convergence"
            );
        }
    }

    let sigma = config.sigma();
    let tau = STEP_SAFETY / (sigma * norm_bound);
    let limit = config.iteration_limit();
    log::debug!(
        "primal-dual start: shape {:?}, dual shape {dual_shape:?}, sigma {sigma}, tau {tau:e}, \
         iteration limit {limit}",
        x0.dim()
    );

    let mut stopping = Stopping::new(config);
    let mut state = State::new(x0, y0, sigma, tau);
    let mut criterion = Vec::new();
    let mut gap = Vec::new();

    for iter in 1..=limit {
        state.step(problem);

        if iter % config.checkpoint_interval() != 0 {
            continue;
        }

        let value = problem.criterion(state.x().view());
        if !value.is_finite() {
            return Err(Error::NonFiniteCriterion { iter });
        }
        let statistic = stopping.update(value, state.x().view());
        criterion.push(value);
        gap.push(statistic);

        let event = Event {
            iter,
            criterion: value,
            gap: statistic,
            x: state.x().view(),
        };
        if let Some(Action::StopEarly) = observer.observe(&event) {
            log::debug!("primal-dual stopped by observer at iteration {iter}");
            return Ok(state.into_solution(Status::StoppedByObserver, criterion, gap, iter));
        }

        if statistic < config.tolerance() {
            log::debug!("primal-dual converged at iteration {iter}, gap {statistic:e}");
            return Ok(state.into_solution(Status::Converged, criterion, gap, iter));
        }
    }

    log::debug!("primal-dual reached iteration limit {limit}");
    Ok(state.into_solution(Status::MaxIters, criterion, gap, limit))
}
