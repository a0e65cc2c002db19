//! Penalized estimators of the time-varying reproduction number `R`.
//!
//! Daily counts `Z` are tied to `R` through a renewal model: the expected
//! count on day `t` is `R_t` times the infectiousness-weighted sum of past
//! counts `(Φ*Z)_t`. Every estimator here minimizes a Kullback-Leibler
//! fidelity to the counts plus `ℓ1` penalties, solved by the primal-dual
//! solver in [`rtprox_solvers`]:
//!
//! - [`temporal`] — piecewise-linear `R` per territory
//! - [`graph`] — adds graph total variation across neighbouring territories
//! - [`outlier`] — adds a sparse outlier channel `O` absorbing reporting errors
//! - [`graph_outlier`] — both of the above
//!
//! [`infectiousness`] turns raw counts into [`Observations`], [`synth`]
//! generates synthetic counts for a known `R`, and [`baseline`] holds the
//! closed-form estimators used as references.

mod error;
mod estimate;
mod observations;
mod problem;
mod stack;

pub mod baseline;
pub mod graph;
pub mod graph_outlier;
pub mod infectiousness;
pub mod outlier;
pub mod synth;
pub mod temporal;

pub use error::EstimError;
pub use estimate::Estimate;
pub use observations::Observations;
pub use problem::Problem;
pub use stack::{OutlierVariant, StackedOperator};
