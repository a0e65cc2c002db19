use super::ConfigError;

/// Errors that can occur during a primal-dual solve.
#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum Error {
    #[error("invalid config: {0}")]
    Config(#[from] ConfigError),

    #[error("operator norm bound must be finite and positive, got {0}")]
    NormBound(f64),

    #[error("initial point has shape {found:?}, expected {expected:?}")]
    InitialPointShape {
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("operator produced shape {found:?}, expected {expected:?}")]
    OperatorShape {
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("criterion is not finite at iteration {iter}")]
    NonFiniteCriterion { iter: usize },
}
