use rtprox_core::{ConvexProblem, LinearOperator, ProximalTerm, Signal};

use super::{Solution, Status};

/// Primal, dual and extrapolated iterates with their step sizes.
pub(super) struct State {
    x: Signal,
    x_bar: Signal,
    y: Signal,
    sigma: f64,
    tau: f64,
}

impl State {
    /// Starts from `x0` with the dual iterate at `L x0`.
    pub(super) fn new(x0: Signal, y0: Signal, sigma: f64, tau: f64) -> Self {
        Self {
            x_bar: x0.clone(),
            x: x0,
            y: y0,
            sigma,
            tau,
        }
    }

    pub(super) fn x(&self) -> &Signal {
        &self.x
    }

    /// Performs one Chambolle-Pock iteration.
    pub(super) fn step<P: ConvexProblem>(&mut self, problem: &P) {
        let sigma = self.sigma;
        let tau = self.tau;

        // Dual ascent through Moreau's identity:
        // prox_{σg*}(ỹ) = ỹ - σ prox_{g/σ}(ỹ/σ).
        let mut y_tilde = problem.operator().apply(self.x_bar.view());
        y_tilde *= sigma;
        y_tilde += &self.y;
        let scaled = &y_tilde / sigma;
        let mut prox = problem.regularization().prox(scaled.view(), 1.0 / sigma);
        prox *= sigma;
        self.y = y_tilde - prox;

        // Primal descent.
        let mut v = problem.operator().apply_adjoint(self.y.view());
        v *= -tau;
        v += &self.x;
        let x_next = problem.fidelity().prox(v.view(), tau);

        // Over-relaxation.
        let mut x_bar = &x_next * 2.0;
        x_bar -= &self.x;
        self.x_bar = x_bar;
        self.x = x_next;
    }

    pub(super) fn into_solution(
        self,
        status: Status,
        criterion: Vec<f64>,
        gap: Vec<f64>,
        iters: usize,
    ) -> Solution {
        Solution {
            status,
            x: self.x,
            criterion,
            gap,
            iters,
        }
    }
}
