use thiserror::Error;

use crate::linear::Kernel;

/// Errors raised while building operators and proximal terms.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum OperatorError {
    #[error("the {0} kernel is not implemented")]
    NotImplemented(Kernel),

    #[error("weights must be finite and non-negative")]
    InvalidWeight,

    #[error("shape mismatch: expected {expected:?}, found {found:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("incidence row {row} must hold exactly one +1, one -1 and zeros elsewhere")]
    InvalidIncidenceRow { row: usize },

    #[error("edge ({from}, {to}) is invalid for {territories} territories")]
    InvalidEdge {
        from: usize,
        to: usize,
        territories: usize,
    },

    #[error("adjacency matrix must be square, found {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },
}
