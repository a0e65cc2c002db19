use std::collections::VecDeque;

use rtprox_core::{Signal, SignalView};

use super::{Config, StopRule, Tracked};

/// Computes the gap statistic from successive checkpoints.
///
/// The first checkpoint has nothing to compare against: it reports an
/// infinite gap and leaves the LimSup window empty.
pub(super) struct Stopping {
    rule: StopRule,
    tracked: Tracked,
    window: usize,
    changes: VecDeque<f64>,
    previous: Option<(f64, Signal)>,
}

impl Stopping {
    pub(super) fn new(config: &Config) -> Self {
        Self {
            rule: config.stop_rule(),
            tracked: config.tracked(),
            window: config.window(),
            changes: VecDeque::with_capacity(config.window()),
            previous: None,
        }
    }

    /// Records a checkpoint and returns its gap statistic.
    pub(super) fn update(&mut self, criterion: f64, x: SignalView<'_>) -> f64 {
        let Some((previous_criterion, previous_x)) = &mut self.previous else {
            self.previous = Some((criterion, x.to_owned()));
            return f64::INFINITY;
        };

        let criterion_change = relative_change(criterion - *previous_criterion, *previous_criterion);
        let primal_change = {
            let diff = (&x - &*previous_x).mapv(|v| v * v).sum().sqrt();
            let scale = previous_x.mapv(|v| v * v).sum().sqrt();
            relative_change(diff, scale)
        };
        *previous_criterion = criterion;
        previous_x.assign(&x);

        match self.rule {
            StopRule::Relative => criterion_change,
            StopRule::LimSup => {
                let change = match self.tracked {
                    Tracked::Criterion => criterion_change,
                    Tracked::Primal => primal_change,
                };
                if self.changes.len() == self.window {
                    self.changes.pop_front();
                }
                self.changes.push_back(change);
                self.changes.iter().copied().fold(0.0, f64::max)
            }
        }
    }
}

/// Returns `|delta| / |reference|`, with a zero reference giving 0 for no
/// change and infinity otherwise.
fn relative_change(delta: f64, reference: f64) -> f64 {
    if reference == 0.0 {
        if delta == 0.0 { 0.0 } else { f64::INFINITY }
    } else {
        (delta / reference).abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use ndarray::array;

    fn config(rule: StopRule, tracked: Tracked, window: usize) -> Config {
        Config::builder()
            .stop_rule(rule)
            .tracked(tracked)
            .window(window)
            .build()
            .unwrap()
    }

    #[test]
    fn relative_rule_uses_criterion_change() {
        let x = array![[1.0, 1.0]];
        let mut stopping = Stopping::new(&config(StopRule::Relative, Tracked::Primal, 3));

        assert_eq!(stopping.update(10.0, x.view()), f64::INFINITY);
        assert_relative_eq!(stopping.update(9.0, x.view()), 0.1);
        assert_relative_eq!(stopping.update(9.0, x.view()), 0.0);
    }

    #[test]
    fn limsup_keeps_largest_change_in_window() {
        let mut stopping = Stopping::new(&config(StopRule::LimSup, Tracked::Primal, 2));

        let x1 = array![[2.0, 0.0]];
        assert_eq!(stopping.update(0.0, x1.view()), f64::INFINITY);

        // ||x2 - x1|| / ||x1|| = 0.5
        let x2 = array![[3.0, 0.0]];
        assert_relative_eq!(stopping.update(0.0, x2.view()), 0.5);

        // 0.3 / 3 = 0.1, but 0.5 is still in the window.
        let x3 = array![[3.3, 0.0]];
        assert_relative_eq!(stopping.update(0.0, x3.view()), 0.5);

        // Window of two: the first change has dropped out.
        assert_relative_eq!(stopping.update(0.0, x3.view()), 0.1, epsilon = 1e-12);
        assert_relative_eq!(stopping.update(0.0, x3.view()), 0.0);
    }

    #[test]
    fn first_checkpoint_stays_out_of_window() {
        // A window longer than the run: only real changes may enter it.
        let mut stopping = Stopping::new(&config(StopRule::LimSup, Tracked::Primal, 10));

        let far = array![[100.0, -50.0]];
        assert_eq!(stopping.update(5.0, far.view()), f64::INFINITY);

        let x = array![[100.0, -50.0]];
        assert_eq!(stopping.update(5.0, x.view()), 0.0);
        assert_eq!(stopping.update(5.0, x.view()), 0.0);
    }

    #[test]
    fn limsup_on_criterion() {
        let x = array![[1.0]];
        let mut stopping = Stopping::new(&config(StopRule::LimSup, Tracked::Criterion, 3));

        assert_eq!(stopping.update(4.0, x.view()), f64::INFINITY);
        assert_relative_eq!(stopping.update(3.0, x.view()), 0.25);
        assert_relative_eq!(stopping.update(3.0, x.view()), 0.25);
    }

    #[test]
    fn zero_reference() {
        assert_eq!(relative_change(0.0, 0.0), 0.0);
        assert_eq!(relative_change(1e-3, 0.0), f64::INFINITY);
        assert_relative_eq!(relative_change(-2.0, 4.0), 0.5);
    }
}
