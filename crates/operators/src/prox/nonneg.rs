use rtprox_core::{Signal, SignalView};

/// Projects onto the non-negative orthant: `max(x, 0)` elementwise.
pub fn project_non_negative(x: SignalView<'_>) -> Signal {
    x.mapv(|v| v.max(0.0))
}
