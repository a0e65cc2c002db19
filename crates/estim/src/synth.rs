//! Synthetic daily counts drawn from the renewal model.
//!
//! Day `k` is Poisson with mean `max(R_k · (Φ * Z)_k + O_k, floor)`, where the
//! convolution uses the counts already drawn. An initial count seeds day zero
//! and is dropped from the returned series.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use rand::Rng;
use rand_distr::{Distribution, Poisson};

use crate::{EstimError, infectiousness::infectiousness_on};

/// Smallest Poisson mean used when the model mean drops below it.
pub const DEFAULT_FLOOR: f64 = 1e-2;

/// Draws synthetic counts for given reproduction-number and outlier series.
#[derive(Debug, Clone, PartialEq)]
pub struct Synthesizer {
    phi: Array1<f64>,
    first_cases: f64,
    floor: f64,
}

impl Synthesizer {
    /// Creates a synthesizer seeded with `first_cases` on day zero.
    ///
    /// # Errors
    ///
    /// Returns an error if the profile has fewer than two days or holds a
    /// negative or non-finite weight, or if `first_cases` is negative or
    /// non-finite.
    pub fn new(phi: Array1<f64>, first_cases: f64) -> Result<Self, EstimError> {
        if phi.len() < 2 {
            return Err(EstimError::TooShort {
                days: phi.len(),
                needed: 2,
            });
        }
        if let Some((day, &value)) = phi
            .indexed_iter()
            .find(|(_, v)| !v.is_finite() || **v < 0.0)
        {
            return Err(EstimError::InvalidValue {
                what: "profile weight",
                row: 0,
                day,
                value,
            });
        }
        crate::error::check_hyperparameter("first_cases", first_cases)?;

        Ok(Self {
            phi,
            first_cases,
            floor: DEFAULT_FLOOR,
        })
    }

    /// Sets the smallest Poisson mean.
    ///
    /// # Errors
    ///
    /// Returns an error unless `floor` is finite and positive.
    pub fn with_floor(mut self, floor: f64) -> Result<Self, EstimError> {
        if !floor.is_finite() || floor <= 0.0 {
            return Err(EstimError::PoissonFloor(floor));
        }
        self.floor = floor;
        Ok(self)
    }

    /// Draws one count series, one value per entry of `r`.
    ///
    /// # Errors
    ///
    /// Returns an error if `r` and `outliers` differ in length, if `r` is not
    /// longer than the profile, or if a Poisson mean is not finite.
    pub fn generate<G: Rng + ?Sized>(
        &self,
        r: ArrayView1<'_, f64>,
        outliers: ArrayView1<'_, f64>,
        rng: &mut G,
    ) -> Result<Array1<f64>, EstimError> {
        let days = r.len();
        if outliers.len() != days {
            return Err(EstimError::LengthMismatch {
                left: days,
                right: outliers.len(),
            });
        }
        if days < self.phi.len() {
            return Err(EstimError::TooShort {
                days,
                needed: self.phi.len(),
            });
        }

        let mut z = Array1::zeros(days + 1);
        z[0] = self.first_cases;
        for k in 1..=days {
            let conv = infectiousness_on(z.view(), self.phi.view(), k);
            let mean = (r[k - 1] * conv + outliers[k - 1]).max(self.floor);
            let poisson = Poisson::new(mean).map_err(|_| EstimError::PoissonMean(mean))?;
            z[k] = poisson.sample(rng);
        }

        Ok(z.slice_move(ndarray::s![1..]))
    }

    /// Draws one count series per row of `r`, territories independent.
    ///
    /// # Errors
    ///
    /// Same as [`Synthesizer::generate`], plus a shape mismatch between `r`
    /// and `outliers`.
    pub fn generate_territories<G: Rng + ?Sized>(
        &self,
        r: ArrayView2<'_, f64>,
        outliers: ArrayView2<'_, f64>,
        rng: &mut G,
    ) -> Result<Array2<f64>, EstimError> {
        if r.dim() != outliers.dim() {
            return Err(EstimError::ShapeMismatch {
                data: r.dim(),
                kernel: outliers.dim(),
            });
        }
        let mut counts = Array2::zeros(r.dim());
        for ((r_row, o_row), mut out) in r
            .outer_iter()
            .zip(outliers.outer_iter())
            .zip(counts.outer_iter_mut())
        {
            out.assign(&self.generate(r_row, o_row, rng)?);
        }
        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use ndarray::Array;
    use rand::{SeedableRng, rngs::StdRng};

    use crate::infectiousness::default_profile;

    #[test]
    fn same_seed_gives_same_counts() {
        let synth = Synthesizer::new(default_profile().unwrap(), 100.0).unwrap();
        let r = Array::from_elem(40, 1.2);
        let o = Array1::<f64>::zeros(40);

        let a = synth
            .generate(r.view(), o.view(), &mut StdRng::seed_from_u64(7))
            .unwrap();
        let b = synth
            .generate(r.view(), o.view(), &mut StdRng::seed_from_u64(7))
            .unwrap();

        assert_eq!(a, b);
        assert_eq!(a.len(), 40);
        assert!(a.iter().all(|&c| c >= 0.0 && c.fract() == 0.0));
    }

    #[test]
    fn growth_follows_reproduction_number() {
        let synth = Synthesizer::new(default_profile().unwrap(), 1000.0).unwrap();
        let mut rng = StdRng::seed_from_u64(11);

        let growing = synth
            .generate(Array::from_elem(60, 1.5).view(), Array1::<f64>::zeros(60).view(), &mut rng)
            .unwrap();
        let shrinking = synth
            .generate(Array::from_elem(60, 0.6).view(), Array1::<f64>::zeros(60).view(), &mut rng)
            .unwrap();

        assert!(growing[59] > 2.0 * growing[0]);
        assert!(shrinking[59] < 0.5 * shrinking[0]);
    }

    #[test]
    fn outliers_add_to_the_mean() {
        let synth = Synthesizer::new(default_profile().unwrap(), 50.0).unwrap();
        let r = Array1::<f64>::zeros(30);
        let mut o = Array1::<f64>::zeros(30);
        o[20] = 10_000.0;

        let counts = synth
            .generate(r.view(), o.view(), &mut StdRng::seed_from_u64(3))
            .unwrap();

        assert!(counts[20] > 9_000.0);
        assert!(counts[10] < 10.0);
    }

    #[test]
    fn rejects_bad_inputs() {
        let phi = default_profile().unwrap();
        let synth = Synthesizer::new(phi.clone(), 10.0).unwrap();
        let mut rng = StdRng::seed_from_u64(0);

        assert!(matches!(
            synth.generate(Array1::<f64>::ones(10).view(), Array1::<f64>::zeros(10).view(), &mut rng),
            Err(EstimError::TooShort { days: 10, .. })
        ));
        assert!(matches!(
            synth.generate(Array1::<f64>::ones(30).view(), Array1::<f64>::zeros(29).view(), &mut rng),
            Err(EstimError::LengthMismatch { .. })
        ));
        assert!(matches!(
            Synthesizer::new(phi, 10.0).unwrap().with_floor(0.0),
            Err(EstimError::PoissonFloor(_))
        ));
    }

    #[test]
    fn territories_are_drawn_row_by_row() {
        let synth = Synthesizer::new(default_profile().unwrap(), 200.0).unwrap();
        let r = Array2::from_elem((3, 30), 1.0);
        let o = Array2::zeros((3, 30));

        let counts = synth
            .generate_territories(r.view(), o.view(), &mut StdRng::seed_from_u64(5))
            .unwrap();

        assert_eq!(counts.dim(), (3, 30));
        assert!(counts.iter().all(|&c| c > 0.0));
    }

    #[test]
    fn means_follow_observed_convolution() {
        let phi = default_profile().unwrap();
        let first_cases = 1e6;
        let synth = Synthesizer::new(phi.clone(), first_cases).unwrap();
        let r = Array1::from_shape_fn(40, |t| if t < 20 { 1.1 } else { 0.9 });

        let counts = synth
            .generate(r.view(), Array1::<f64>::zeros(40).view(), &mut StdRng::seed_from_u64(9))
            .unwrap();

        // Recompute each day's mean from the drawn series, seed day included.
        let mut series = Array1::zeros(41);
        series[0] = first_cases;
        series.slice_mut(ndarray::s![1..]).assign(&counts);
        let conv = crate::infectiousness::convolve(series.view(), phi.view());
        for (t, (&count, &c)) in counts.iter().zip(conv.iter()).enumerate() {
            let mean = r[t] * c;
            assert!((count - mean).abs() < 6.0 * mean.sqrt(), "day {t}: {count} vs {mean}");
        }
    }
}
