//! Reusable observers for the rtprox solvers.
//!
//! This crate provides [`Observer`] implementations and capability traits that
//! work with any solver whose events expose the relevant quantities.
//!
//! # Modules
//!
//! - [`traits`] — Capability traits for cross-solver observers
//!   ([`HasIteration`], [`HasCriterion`], [`HasGap`], [`CanStopEarly`])
//!
//! # Observers
//!
//! - [`LogObserver`] — forwards checkpoints to the [`log`] facade
//! - [`History`] — records checkpoints for later inspection
//!
//! [`Observer`]: rtprox_core::Observer
//! [`HasIteration`]: traits::HasIteration
//! [`HasCriterion`]: traits::HasCriterion
//! [`HasGap`]: traits::HasGap
//! [`CanStopEarly`]: traits::CanStopEarly

pub mod traits;

mod history;
mod logging;

pub use history::History;
pub use logging::LogObserver;
