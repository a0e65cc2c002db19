//! Solvers for convex optimization problems.
//!
//! A [`ConvexProblem`] describes `min_x f(x) + g(Lx)` through a linear
//! operator `L` with its adjoint and two proximable terms `f` and `g`.
//! Solvers in this module search for the minimizing `x`.
//!
//! # Solvers
//!
//! - [`primal_dual`] — Chambolle-Pock first-order primal-dual iteration with
//!   periodic checkpoints and a windowed stopping rule
//!
//! [`ConvexProblem`]: rtprox_core::ConvexProblem

pub mod primal_dual;
