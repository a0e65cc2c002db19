//! Core traits and types for the rtprox workspace.
//!
//! This crate defines the abstractions the primal-dual solver is written
//! against, so that operators, proximal terms, and problem instantiations can
//! be substituted without touching the solver:
//!
//! - [`LinearOperator`] — a linear map bundled with its exact adjoint
//! - [`ProximalTerm`] — a convex function together with its proximity operator
//! - [`ConvexProblem`] — `min_x f(x) + g(Lx)` assembled from the two above
//! - [`Observer`] — receives solver events and optionally returns control actions
//!
//! Signals are [`Signal`]s: one row per territory (or per stacked channel) and
//! one column per day.

mod observer;
mod operator;
mod problem;
mod term;

pub use observer::Observer;
pub use operator::LinearOperator;
pub use problem::ConvexProblem;
pub use term::ProximalTerm;

/// A two-dimensional signal: rows are territories or channels, columns are days.
pub type Signal = ndarray::Array2<f64>;

/// A borrowed view of a [`Signal`].
pub type SignalView<'a> = ndarray::ArrayView2<'a, f64>;
