//! Elementwise proximity operators.
//!
//! For a convex function `h` and a step `γ > 0`, the proximity operator is
//! `prox_{γh}(x) = argmin_u γ·h(u) + ||u - x||² / 2`.
//!
//! - [`soft_threshold`] — `h = ||·||₁`
//! - [`project_non_negative`] — `h` is the indicator of the non-negative orthant
//! - [`prox_kl`] — `h(x) = KL(α ⊙ x, z)`
//! - [`prox_kl_outlier`] — `h(R, O) = KL(α ⊙ R + O, z)`
//!
//! Observed counts `z` are assumed finite and non-negative.

mod kl;
mod l1;
mod nonneg;

pub use kl::{kl_divergence, prox_kl, prox_kl_outlier};
pub use l1::{l1_norm, soft_threshold};
pub use nonneg::project_non_negative;
