//! Linear operators and their exact adjoints.
//!
//! - [`Laplacian`] — truncated second difference along the time axis,
//!   weighted uniformly or per row
//! - [`Incidence`] — graph incidence matrix over territories (`B·R`)
//! - [`build_operator`] — selects a temporal filter by [`Kernel`]
//!
//! Every operator implements [`LinearOperator`], so the adjoint identity can
//! be checked generically with [`LinearOperator::adjoint_mismatch`] and
//! hand-set norm bounds compared against [`LinearOperator::estimate_norm_squared`].
//!
//! [`LinearOperator`]: rtprox_core::LinearOperator
//! [`LinearOperator::adjoint_mismatch`]: rtprox_core::LinearOperator::adjoint_mismatch
//! [`LinearOperator::estimate_norm_squared`]: rtprox_core::LinearOperator::estimate_norm_squared

mod incidence;
mod kernel;
mod laplacian;

pub use incidence::Incidence;
pub use kernel::{Kernel, Weight, build_operator};
pub use laplacian::Laplacian;
