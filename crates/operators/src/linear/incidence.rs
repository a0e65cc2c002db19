use ndarray::{Array2, ArrayView2};
use rtprox_core::{LinearOperator, Signal, SignalView};

use crate::OperatorError;

/// Incidence operator of a graph over territories.
///
/// The matrix has one row per edge and one column per territory; each row
/// holds exactly one `+1` (the edge origin) and one `-1` (the edge target).
/// Applied to a signal with one row per territory it returns one row per edge
/// holding the difference between the two endpoints.
#[derive(Debug, Clone, PartialEq)]
pub struct Incidence {
    matrix: Array2<f64>,
}

impl Incidence {
    /// Creates an incidence operator with no edges.
    #[must_use]
    pub fn empty(territories: usize) -> Self {
        Self {
            matrix: Array2::zeros((0, territories)),
        }
    }

    /// Creates an incidence operator from `(origin, target)` edges.
    ///
    /// # Errors
    ///
    /// Returns [`OperatorError::InvalidEdge`] for a self loop or an endpoint
    /// outside `0..territories`.
    pub fn from_edges(territories: usize, edges: &[(usize, usize)]) -> Result<Self, OperatorError> {
        let mut matrix = Array2::zeros((edges.len(), territories));
        for (row, &(from, to)) in edges.iter().enumerate() {
            if from == to || from >= territories || to >= territories {
                return Err(OperatorError::InvalidEdge {
                    from,
                    to,
                    territories,
                });
            }
            matrix[[row, from]] = 1.0;
            matrix[[row, to]] = -1.0;
        }
        Ok(Self { matrix })
    }

    /// Creates an incidence operator from an explicit edge × territory matrix.
    ///
    /// # Errors
    ///
    /// Returns [`OperatorError::InvalidIncidenceRow`] for the first row that
    /// does not hold exactly one `+1`, one `-1`, and zeros elsewhere.
    pub fn from_matrix(matrix: Array2<f64>) -> Result<Self, OperatorError> {
        for (row, values) in matrix.rows().into_iter().enumerate() {
            let plus = values.iter().filter(|&&v| v == 1.0).count();
            let minus = values.iter().filter(|&&v| v == -1.0).count();
            let zeros = values.iter().filter(|&&v| v == 0.0).count();
            if plus != 1 || minus != 1 || zeros + 2 != values.len() {
                return Err(OperatorError::InvalidIncidenceRow { row });
            }
        }
        Ok(Self { matrix })
    }

    /// Creates an incidence operator from a signed contiguity matrix.
    ///
    /// `adjacency[i][j] == -1` marks `j` as a neighbor of `i` and produces the
    /// edge `(i, j)`; a symmetric matrix therefore yields both orientations of
    /// every link. Diagonal entries are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`OperatorError::NotSquare`] if the matrix is not square.
    pub fn from_signed_adjacency(adjacency: ArrayView2<'_, f64>) -> Result<Self, OperatorError> {
        let (rows, cols) = adjacency.dim();
        if rows != cols {
            return Err(OperatorError::NotSquare { rows, cols });
        }
        let edges: Vec<(usize, usize)> = adjacency
            .indexed_iter()
            .filter(|&((i, j), &v)| i != j && v == -1.0)
            .map(|((i, j), _)| (i, j))
            .collect();
        Self::from_edges(rows, &edges)
    }

    /// Returns the number of edges.
    #[must_use]
    pub fn edges(&self) -> usize {
        self.matrix.nrows()
    }

    /// Returns the number of territories.
    #[must_use]
    pub fn territories(&self) -> usize {
        self.matrix.ncols()
    }

    /// Returns the underlying edge × territory matrix.
    #[must_use]
    pub fn matrix(&self) -> ArrayView2<'_, f64> {
        self.matrix.view()
    }

    /// Returns the largest number of edges incident to a single territory.
    #[must_use]
    pub fn max_degree(&self) -> usize {
        self.matrix
            .columns()
            .into_iter()
            .map(|col| col.iter().filter(|&&v| v != 0.0).count())
            .max()
            .unwrap_or(0)
    }

    /// Returns an upper bound on `||B||²`, namely `2 · max_degree`.
    #[must_use]
    pub fn norm_squared_bound(&self) -> f64 {
        2.0 * self.max_degree() as f64
    }
}

impl LinearOperator for Incidence {
    fn range_shape(&self, domain: (usize, usize)) -> (usize, usize) {
        (self.edges(), domain.1)
    }

    fn apply(&self, x: SignalView<'_>) -> Signal {
        if self.edges() == 0 {
            return Signal::zeros((0, x.ncols()));
        }
        self.matrix.dot(&x)
    }

    fn apply_adjoint(&self, y: SignalView<'_>) -> Signal {
        if self.edges() == 0 {
            return Signal::zeros((self.territories(), y.ncols()));
        }
        self.matrix.t().dot(&y)
    }
}
