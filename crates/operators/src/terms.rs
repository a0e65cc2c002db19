//! Convex terms resolved once per problem.
//!
//! [`Fidelity`] and [`Penalty`] are small tagged variants implementing
//! [`ProximalTerm`]; the solver dispatches on them without re-checking any
//! configuration per call.
//!
//! [`ProximalTerm`]: rtprox_core::ProximalTerm

mod fidelity;
mod penalty;

pub use fidelity::Fidelity;
pub use penalty::{Penalty, PenaltyKind};
