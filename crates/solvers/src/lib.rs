//! Solvers for the rtprox workspace.
//!
//! Solvers are written against the traits in [`rtprox_core`] and never see
//! concrete operators or proximal terms.

pub mod optimization;
