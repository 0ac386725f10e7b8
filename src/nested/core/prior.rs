//! Ready-made priors.
//!
//! [`UniformPrior`] draws independently and uniformly from an axis-aligned
//! box `[lower_j, upper_j)`. It is the prior used by the crate's own tests
//! and a convenient default for drivers with bounded parameters.
use crate::nested::{
    core::options::SamplerRng,
    errors::{NestedError, NestedResult},
    traits::PriorSampler,
};
use ndarray::{Array1, Array2};
use rand::Rng;

/// Independent uniform prior on a box.
#[derive(Debug, Clone, PartialEq)]
pub struct UniformPrior {
    lower: Array1<f64>,
    upper: Array1<f64>,
}

impl UniformPrior {
    /// Build a box prior.
    ///
    /// # Errors
    /// - `DimensionMismatch` if `lower` and `upper` differ in length.
    /// - `InvalidPriorBounds` unless every bound is finite and
    ///   `lower_j < upper_j`.
    pub fn new(lower: Array1<f64>, upper: Array1<f64>) -> NestedResult<Self> {
        if lower.len() != upper.len() {
            return Err(NestedError::DimensionMismatch {
                expected: lower.len(),
                found: upper.len(),
            });
        }
        for (index, (&lo, &hi)) in lower.iter().zip(upper.iter()).enumerate() {
            if !lo.is_finite() || !hi.is_finite() || lo >= hi {
                return Err(NestedError::InvalidPriorBounds { index, lower: lo, upper: hi });
            }
        }
        Ok(Self { lower, upper })
    }

    pub fn lower(&self) -> &Array1<f64> {
        &self.lower
    }

    pub fn upper(&self) -> &Array1<f64> {
        &self.upper
    }
}

impl PriorSampler for UniformPrior {
    fn n_parameters(&self) -> usize {
        self.lower.len()
    }

    fn sample(&self, n: usize, rng: &mut SamplerRng) -> NestedResult<Array2<f64>> {
        let d = self.lower.len();
        Ok(Array2::from_shape_fn((n, d), |(_, j)| rng.random_range(self.lower[j]..self.upper[j])))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nested::core::options::build_rng;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // Verify draws stay inside the box and have the requested shape.
    //
    // Given
    // -----
    // - Box [0, 1) × [-5, -2), 1000 draws.
    //
    // Expect
    // ------
    // - Shape 1000 × 2; each column within its bounds; column means near
    //   the box midpoints.
    fn uniform_prior_draws_inside_box() {
        // Arrange
        let prior = UniformPrior::new(array![0.0, -5.0], array![1.0, -2.0]).unwrap();
        let mut rng = build_rng(Some(11));

        // Act
        let draws = prior.sample(1000, &mut rng).unwrap();

        // Assert
        assert_eq!(draws.dim(), (1000, 2));
        assert!(draws.column(0).iter().all(|v| (0.0..1.0).contains(v)));
        assert!(draws.column(1).iter().all(|v| (-5.0..-2.0).contains(v)));
        let means = draws.mean_axis(ndarray::Axis(0)).unwrap();
        assert!((means[0] - 0.5).abs() < 0.05);
        assert!((means[1] + 3.5).abs() < 0.15);
    }

    #[test]
    // Purpose
    // -------
    // Ensure invalid bounds are rejected.
    //
    // Given
    // -----
    // - Mismatched lengths, an inverted interval, an infinite bound.
    //
    // Expect
    // ------
    // - `DimensionMismatch` then `InvalidPriorBounds` with the offending
    //   index.
    fn uniform_prior_rejects_bad_bounds() {
        // Act / Assert
        assert_eq!(
            UniformPrior::new(array![0.0], array![1.0, 2.0]).unwrap_err(),
            NestedError::DimensionMismatch { expected: 1, found: 2 }
        );
        assert!(matches!(
            UniformPrior::new(array![0.0, 3.0], array![1.0, 2.0]),
            Err(NestedError::InvalidPriorBounds { index: 1, .. })
        ));
        assert!(matches!(
            UniformPrior::new(array![f64::NEG_INFINITY], array![1.0]),
            Err(NestedError::InvalidPriorBounds { index: 0, .. })
        ));
    }
}
