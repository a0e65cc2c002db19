use std::fmt;

use rtprox_core::Signal;
use thiserror::Error;

/// Data-fidelity term of the estimation problem.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DataTerm {
    /// Kullback-Leibler divergence (Poisson log-likelihood).
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "DKL"))]
    Kl,
}

/// Temporal prior applied to the reproduction number.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Prior {
    /// Truncated second-order difference.
    #[default]
    Laplacian,

    /// First-order difference. Not implemented.
    Gradient,
}

impl fmt::Display for Prior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Laplacian => f.write_str("laplacian"),
            Self::Gradient => f.write_str("gradient"),
        }
    }
}

/// Penalty applied to the filtered signal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Regularization {
    /// Entrywise `l1` norm.
    #[default]
    L1,
}

/// How the gap statistic is computed at each checkpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StopRule {
    /// Largest relative change of the tracked quantity over the last
    /// `window` checkpoints.
    #[default]
    LimSup,

    /// Relative change of the criterion since the previous checkpoint.
    Relative,
}

/// Quantity whose relative change feeds the [`StopRule::LimSup`] rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Tracked {
    /// The objective `f(x) + g(Lx)`.
    Criterion,

    /// The primal iterate, compared in Frobenius norm.
    #[default]
    Primal,
}

/// Configuration for the primal-dual solver.
///
/// Build one with [`Config::builder`] or start from [`Config::default`].
/// Deserialized configs are validated again when passed to the solver.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    #[cfg_attr(feature = "serde", serde(alias = "dataterm"))]
    data_term: DataTerm,
    prior: Prior,
    #[cfg_attr(feature = "serde", serde(alias = "regularization"))]
    regularization: Regularization,
    #[cfg_attr(feature = "serde", serde(alias = "prec"))]
    tolerance: f64,
    #[cfg_attr(feature = "serde", serde(alias = "iter"))]
    max_iters: usize,
    #[cfg_attr(feature = "serde", serde(alias = "nbiterprint"))]
    checkpoint_interval: usize,
    #[cfg_attr(feature = "serde", serde(alias = "nbInf"))]
    iter_ceiling: usize,
    #[cfg_attr(feature = "serde", serde(alias = "stop"))]
    stop_rule: StopRule,
    #[cfg_attr(feature = "serde", serde(alias = "incr"))]
    tracked: Tracked,
    window: usize,
    sigma: f64,
    check_norm_bound: bool,
    #[cfg_attr(feature = "serde", serde(skip))]
    initial_point: Option<Signal>,
}

/// Errors that can occur when validating a primal-dual solver config.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("tolerance must be finite and non-negative")]
    Tolerance,

    #[error("checkpoint interval must be at least 1")]
    CheckpointInterval,

    #[error("stopping window must be at least 1")]
    Window,

    #[error("sigma must be finite and positive")]
    Sigma,

    #[error("initial point must be finite")]
    InitialPoint,

    #[error("{0} prior is not implemented")]
    NotImplemented(Prior),
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_term: DataTerm::Kl,
            prior: Prior::Laplacian,
            regularization: Regularization::L1,
            tolerance: 1e-7,
            max_iters: 700_000,
            checkpoint_interval: 100_000,
            iter_ceiling: 10_000_000,
            stop_rule: StopRule::LimSup,
            tracked: Tracked::Primal,
            window: 3,
            sigma: 1.0,
            check_norm_bound: false,
            initial_point: None,
        }
    }
}

impl Config {
    /// Returns a builder seeded with the default configuration.
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder {
            config: Self::default(),
        }
    }

    /// Checks every option against its admissible range.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(ConfigError::Tolerance);
        }
        if self.checkpoint_interval == 0 {
            return Err(ConfigError::CheckpointInterval);
        }
        if self.window == 0 {
            return Err(ConfigError::Window);
        }
        if !self.sigma.is_finite() || self.sigma <= 0.0 {
            return Err(ConfigError::Sigma);
        }
        if let Some(x0) = &self.initial_point
            && x0.iter().any(|v| !v.is_finite())
        {
            return Err(ConfigError::InitialPoint);
        }
        if self.prior != Prior::Laplacian {
            return Err(ConfigError::NotImplemented(self.prior));
        }
        Ok(())
    }

    #[must_use]
    pub fn data_term(&self) -> DataTerm {
        self.data_term
    }

    #[must_use]
    pub fn prior(&self) -> Prior {
        self.prior
    }

    #[must_use]
    pub fn regularization(&self) -> Regularization {
        self.regularization
    }

    /// Returns the gap threshold below which the solver reports convergence.
    #[must_use]
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Returns the requested number of iterations.
    #[must_use]
    pub fn max_iters(&self) -> usize {
        self.max_iters
    }

    /// Returns the number of iterations between two checkpoints.
    #[must_use]
    pub fn checkpoint_interval(&self) -> usize {
        self.checkpoint_interval
    }

    /// Returns the hard iteration ceiling, which caps [`Config::max_iters`].
    #[must_use]
    pub fn iter_ceiling(&self) -> usize {
        self.iter_ceiling
    }

    /// Returns the number of iterations the solver will actually run at most.
    #[must_use]
    pub fn iteration_limit(&self) -> usize {
        self.max_iters.min(self.iter_ceiling)
    }

    #[must_use]
    pub fn stop_rule(&self) -> StopRule {
        self.stop_rule
    }

    #[must_use]
    pub fn tracked(&self) -> Tracked {
        self.tracked
    }

    /// Returns the number of checkpoints the [`StopRule::LimSup`] rule looks back over.
    #[must_use]
    pub fn window(&self) -> usize {
        self.window
    }

    /// Returns the dual step size.
    #[must_use]
    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    /// Returns whether the solver compares the problem's norm bound against a
    /// power-iteration estimate before iterating.
    #[must_use]
    pub fn check_norm_bound(&self) -> bool {
        self.check_norm_bound
    }

    /// Returns the caller-supplied starting point, if any.
    #[must_use]
    pub fn initial_point(&self) -> Option<&Signal> {
        self.initial_point.as_ref()
    }
}

/// Builder for [`Config`].
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    #[must_use]
    pub fn data_term(mut self, data_term: DataTerm) -> Self {
        self.config.data_term = data_term;
        self
    }

    #[must_use]
    pub fn prior(mut self, prior: Prior) -> Self {
        self.config.prior = prior;
        self
    }

    #[must_use]
    pub fn regularization(mut self, regularization: Regularization) -> Self {
        self.config.regularization = regularization;
        self
    }

    #[must_use]
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.config.tolerance = tolerance;
        self
    }

    #[must_use]
    pub fn max_iters(mut self, max_iters: usize) -> Self {
        self.config.max_iters = max_iters;
        self
    }

    #[must_use]
    pub fn checkpoint_interval(mut self, checkpoint_interval: usize) -> Self {
        self.config.checkpoint_interval = checkpoint_interval;
        self
    }

    #[must_use]
    pub fn iter_ceiling(mut self, iter_ceiling: usize) -> Self {
        self.config.iter_ceiling = iter_ceiling;
        self
    }

    #[must_use]
    pub fn stop_rule(mut self, stop_rule: StopRule) -> Self {
        self.config.stop_rule = stop_rule;
        self
    }

    #[must_use]
    pub fn tracked(mut self, tracked: Tracked) -> Self {
        self.config.tracked = tracked;
        self
    }

    #[must_use]
    pub fn window(mut self, window: usize) -> Self {
        self.config.window = window;
        self
    }

    #[must_use]
    pub fn sigma(mut self, sigma: f64) -> Self {
        self.config.sigma = sigma;
        self
    }

    #[must_use]
    pub fn check_norm_bound(mut self, check: bool) -> Self {
        self.config.check_norm_bound = check;
        self
    }

    /// Starts the iteration from `x0` instead of the problem's default point.
    #[must_use]
    pub fn initial_point(mut self, x0: Signal) -> Self {
        self.config.initial_point = Some(x0);
        self
    }

    /// Validates and returns the config.
    ///
    /// # Errors
    ///
    /// Returns an error if any option is out of range or names an
    /// unimplemented prior.
    pub fn build(self) -> Result<Config, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
