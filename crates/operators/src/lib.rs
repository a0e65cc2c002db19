//! Operator library for the primal-dual estimators.
//!
//! - [`linear`] — finite-difference filters along the time axis, graph
//!   incidence operators
//! - [`prox`] — elementwise proximity operators (soft-thresholding,
//!   Kullback-Leibler, non-negative projection)
//! - [`terms`] — [`Fidelity`] and [`Penalty`], the tagged variants that
//!   bundle a function with its proximity operator for the solver
//!
//! [`Fidelity`]: terms::Fidelity
//! [`Penalty`]: terms::Penalty

mod error;

pub mod linear;
pub mod prox;
pub mod terms;

pub use error::OperatorError;
