//! Active set — the live population of a nested sampler.
//!
//! Purpose
//! -------
//! Hold the fixed-size population of "active" points (parameter vector plus
//! log-likelihood) that a nested sampler evolves. Each accepted proposal
//! replaces the current lowest-likelihood member, so the set always holds
//! the `n` best points surviving so far.
//!
//! Key behaviors
//! -------------
//! - Store parameters as one `n × d` matrix so the ellipsoid refit can read
//!   them without copying ([`ActiveSet::parameters`]).
//! - Locate the worst member ([`ActiveSet::min_index`]) and replace it only
//!   when a candidate is strictly better ([`ActiveSet::try_replace`]).
//! - Seed an initial population from a prior and a likelihood
//!   ([`ActiveSet::from_prior`]).
//!
//! Invariants & assumptions
//! ------------------------
//! - `n ≥ 1` and `n` never changes after construction.
//! - All parameter coordinates are finite; log-likelihoods are never NaN or
//!   `+∞`. `−∞` (zero likelihood) is allowed and always loses.
//! - Ties for the minimum resolve to the lowest row index.
//!
//! Conventions
//! -----------
//! - Rows are points; columns are parameters.
//! - Mutation happens only through `try_replace`, which the samplers own.
//!   Callers outside the sampler receive `&ActiveSet`.
//!
//! Testing notes
//! -------------
//! - Unit tests cover construction validation, strict-improvement
//!   acceptance, tie handling, and seeding from a uniform prior.
use crate::nested::{
    core::{
        options::SamplerRng,
        validation::{validate_dimension, validate_log_likelihood, validate_parameters},
    },
    errors::{NestedError, NestedResult},
    traits::{LogLikelihood, PriorSampler},
};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

/// ActivePoint — one parameter vector with its log-likelihood.
///
/// Produced when a member leaves the active set; immutable afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivePoint {
    theta: Array1<f64>,
    log_likelihood: f64,
}

impl ActivePoint {
    /// Build a validated point.
    ///
    /// # Errors
    /// - `NonFiniteParameter` if a coordinate is NaN/±∞.
    /// - `InvalidLogLikelihood` if `log_likelihood` is NaN or `+∞`.
    pub fn new(theta: Array1<f64>, log_likelihood: f64) -> NestedResult<Self> {
        if let Some((col, &value)) = theta.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(NestedError::NonFiniteParameter { row: 0, col, value });
        }
        let log_likelihood = validate_log_likelihood(0, log_likelihood)?;
        Ok(Self { theta, log_likelihood })
    }

    pub fn theta(&self) -> &Array1<f64> {
        &self.theta
    }

    pub fn log_likelihood(&self) -> f64 {
        self.log_likelihood
    }

    pub fn into_parts(self) -> (Array1<f64>, f64) {
        (self.theta, self.log_likelihood)
    }
}

/// ActiveSet — fixed-size population ordered implicitly by likelihood.
///
/// Fields
/// ------
/// - `points`: `Array2<f64>` of shape `n × d`.
/// - `log_likelihoods`: `Array1<f64>` of length `n`, aligned with `points`.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveSet {
    points: Array2<f64>,
    log_likelihoods: Array1<f64>,
}

impl ActiveSet {
    /// new — validate and wrap an initial population.
    ///
    /// Parameters
    /// ----------
    /// - `points`: `Array2<f64>`
    ///   `n × d` parameter matrix, `n ≥ 1`, all entries finite.
    /// - `log_likelihoods`: `Array1<f64>`
    ///   Length-`n` log-likelihoods; NaN and `+∞` are rejected.
    ///
    /// Returns
    /// -------
    /// `NestedResult<ActiveSet>`
    ///
    /// Errors
    /// ------
    /// - `EmptyActiveSet` when `n == 0`.
    /// - `ActiveSetLengthMismatch` when the lengths disagree.
    /// - `NonFiniteParameter` / `InvalidLogLikelihood` for bad values.
    pub fn new(points: Array2<f64>, log_likelihoods: Array1<f64>) -> NestedResult<Self> {
        if points.nrows() != log_likelihoods.len() {
            return Err(NestedError::ActiveSetLengthMismatch {
                points: points.nrows(),
                log_likelihoods: log_likelihoods.len(),
            });
        }
        validate_parameters(points.view())?;
        for (index, &value) in log_likelihoods.iter().enumerate() {
            validate_log_likelihood(index, value)?;
        }
        Ok(Self { points, log_likelihoods })
    }

    /// from_prior — seed `n` active points from a prior and a likelihood.
    ///
    /// Parameters
    /// ----------
    /// - `prior`: `&P`
    ///   Source of `n` independent draws.
    /// - `likelihood`: `&L`
    ///   Evaluated once per draw.
    /// - `n`: `usize`
    ///   Population size; must be positive.
    /// - `rng`: `&mut SamplerRng`
    ///   Passed through to the prior.
    ///
    /// Returns
    /// -------
    /// `NestedResult<ActiveSet>`
    ///
    /// Errors
    /// ------
    /// - `InvalidActivePoints` when `n == 0`.
    /// - `DimensionMismatch` when prior, likelihood, or draws disagree on `d`.
    /// - `PriorSampleCount` when the prior returns the wrong number of rows.
    /// - Any error from the prior, the likelihood, or [`ActiveSet::new`].
    pub fn from_prior<P, L>(
        prior: &P, likelihood: &L, n: usize, rng: &mut SamplerRng,
    ) -> NestedResult<Self>
    where
        P: PriorSampler + ?Sized,
        L: LogLikelihood + ?Sized,
    {
        if n == 0 {
            return Err(NestedError::InvalidActivePoints {
                n,
                reason: "Need at least one active point.",
            });
        }
        let d = prior.n_parameters();
        validate_dimension(d, likelihood.n_parameters())?;
        let points = prior.sample(n, rng)?;
        if points.nrows() != n {
            return Err(NestedError::PriorSampleCount { expected: n, found: points.nrows() });
        }
        validate_dimension(d, points.ncols())?;
        let log_likelihoods = points
            .rows()
            .into_iter()
            .map(|theta| likelihood.evaluate(theta))
            .collect::<NestedResult<Array1<f64>>>()?;
        Self::new(points, log_likelihoods)
    }

    /// Number of active points `n`.
    pub fn len(&self) -> usize {
        self.log_likelihoods.len()
    }

    /// Always `false` for a constructed set.
    pub fn is_empty(&self) -> bool {
        self.log_likelihoods.is_empty()
    }

    /// Parameter dimension `d`.
    pub fn dim(&self) -> usize {
        self.points.ncols()
    }

    /// Parameter matrix, one active point per row.
    pub fn parameters(&self) -> ArrayView2<'_, f64> {
        self.points.view()
    }

    pub fn log_likelihoods(&self) -> ArrayView1<'_, f64> {
        self.log_likelihoods.view()
    }

    /// Row index of the lowest log-likelihood (first on ties).
    pub fn min_index(&self) -> usize {
        let mut best = 0;
        for (idx, &ll) in self.log_likelihoods.iter().enumerate().skip(1) {
            if ll < self.log_likelihoods[best] {
                best = idx;
            }
        }
        best
    }

    /// Lowest log-likelihood, the current likelihood threshold.
    pub fn min_log_likelihood(&self) -> f64 {
        self.log_likelihoods[self.min_index()]
    }

    pub fn max_log_likelihood(&self) -> f64 {
        self.log_likelihoods.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Copy of the `index`-th member, or `None` when out of range.
    pub fn point(&self, index: usize) -> Option<ActivePoint> {
        if index >= self.len() {
            return None;
        }
        Some(ActivePoint {
            theta: self.points.row(index).to_owned(),
            log_likelihood: self.log_likelihoods[index],
        })
    }

    /// Iterate `(theta, log_likelihood)` pairs in row order.
    pub fn iter(&self) -> impl Iterator<Item = (ArrayView1<'_, f64>, f64)> + '_ {
        self.points.rows().into_iter().zip(self.log_likelihoods.iter().copied())
    }

    /// try_replace — replace the worst member if the candidate beats it.
    ///
    /// Parameters
    /// ----------
    /// - `theta`: `ArrayView1<f64>`
    ///   Candidate parameters of length `d`.
    /// - `log_likelihood`: `f64`
    ///   Candidate log-likelihood.
    ///
    /// Returns
    /// -------
    /// `NestedResult<Option<ActivePoint>>`
    ///   `Some(removed)` when the candidate was strictly better than the
    ///   current minimum and took its row; `None` when it was discarded. A
    ///   candidate equal to the minimum is discarded.
    ///
    /// Errors
    /// ------
    /// - `DimensionMismatch`, `NonFiniteParameter`, `InvalidLogLikelihood`
    ///   for malformed candidates. The set is unchanged on error.
    pub fn try_replace(
        &mut self, theta: ArrayView1<f64>, log_likelihood: f64,
    ) -> NestedResult<Option<ActivePoint>> {
        validate_dimension(self.dim(), theta.len())?;
        if let Some((col, &value)) = theta.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(NestedError::NonFiniteParameter { row: 0, col, value });
        }
        let log_likelihood = validate_log_likelihood(0, log_likelihood)?;

        let worst = self.min_index();
        if log_likelihood <= self.log_likelihoods[worst] {
            return Ok(None);
        }
        let removed = ActivePoint {
            theta: self.points.row(worst).to_owned(),
            log_likelihood: self.log_likelihoods[worst],
        };
        self.points.row_mut(worst).assign(&theta);
        self.log_likelihoods[worst] = log_likelihood;
        Ok(Some(removed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nested::core::{options::build_rng, prior::UniformPrior};
    use approx::assert_relative_eq;
    use ndarray::{Array, array};

    struct SumOfSquares {
        d: usize,
    }

    impl LogLikelihood for SumOfSquares {
        fn n_parameters(&self) -> usize {
            self.d
        }

        fn evaluate(&self, theta: ArrayView1<f64>) -> NestedResult<f64> {
            Ok(-theta.dot(&theta))
        }
    }

    fn ten_point_set() -> ActiveSet {
        let points = Array::from_shape_fn((10, 2), |(i, j)| (i + j) as f64);
        let lls = Array1::from_iter((1..=10).map(|k| k as f64 / 10.0));
        ActiveSet::new(points, lls).unwrap()
    }

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Construction validation (lengths, emptiness, bad values).
    // - Strict-improvement replacement of the worst member.
    // - Seeding from a prior.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Exercise the accept/reject rule on a ten-point population.
    //
    // Given
    // -----
    // - Log-likelihoods 0.1, 0.2, ..., 1.0.
    //
    // Expect
    // ------
    // - A candidate at 0.05 is discarded and the set is unchanged.
    // - A candidate at 1.5 replaces the member at 0.1, which is returned.
    // - The new minimum is 0.2.
    fn try_replace_rejects_worse_and_replaces_minimum() {
        // Arrange
        let mut set = ten_point_set();
        let before = set.clone();

        // Act
        let rejected = set.try_replace(array![9.0, 9.0].view(), 0.05).unwrap();
        let unchanged = set.clone();
        let removed = set.try_replace(array![9.0, 9.0].view(), 1.5).unwrap();

        // Assert
        assert!(rejected.is_none());
        assert_eq!(unchanged, before);
        let removed = removed.expect("1.5 must be accepted");
        assert_relative_eq!(removed.log_likelihood(), 0.1);
        assert_eq!(removed.theta(), &array![0.0, 1.0]);
        assert_eq!(set.len(), 10);
        assert_relative_eq!(set.min_log_likelihood(), 0.2);
        assert_relative_eq!(set.max_log_likelihood(), 1.5);
        assert_eq!(set.parameters().row(0), array![9.0, 9.0]);
    }

    #[test]
    // Purpose
    // -------
    // Check tie handling at the threshold.
    //
    // Given
    // -----
    // - Two members tied at the minimum and a candidate equal to it.
    //
    // Expect
    // ------
    // - The equal candidate is discarded; `min_index` picks the first tie.
    fn try_replace_discards_candidate_equal_to_minimum() {
        // Arrange
        let mut set =
            ActiveSet::new(array![[0.0], [1.0], [2.0]], array![1.0, 0.5, 0.5]).unwrap();

        // Act
        let out = set.try_replace(array![3.0].view(), 0.5).unwrap();

        // Assert
        assert!(out.is_none());
        assert_eq!(set.min_index(), 1);
    }

    #[test]
    // Purpose
    // -------
    // Verify that −∞ members are allowed and always lose.
    //
    // Given
    // -----
    // - A set with one −∞ log-likelihood.
    //
    // Expect
    // ------
    // - Construction succeeds and any finite candidate replaces that member.
    fn negative_infinity_log_likelihood_is_replaced_first() {
        // Arrange
        let mut set =
            ActiveSet::new(array![[0.0], [1.0]], array![-3.0, f64::NEG_INFINITY]).unwrap();

        // Act
        let removed = set.try_replace(array![5.0].view(), -100.0).unwrap();

        // Assert
        assert_eq!(removed.unwrap().log_likelihood(), f64::NEG_INFINITY);
        assert_relative_eq!(set.min_log_likelihood(), -100.0);
    }

    #[test]
    // Purpose
    // -------
    // Ensure malformed inputs are rejected.
    //
    // Given
    // -----
    // - Mismatched lengths, an empty set, a NaN log-likelihood, and a
    //   wrong-dimension candidate.
    //
    // Expect
    // ------
    // - The matching structured error for each case.
    fn new_and_try_replace_validate_inputs() {
        // Act / Assert
        assert_eq!(
            ActiveSet::new(array![[0.0], [1.0]], array![0.0]).unwrap_err(),
            NestedError::ActiveSetLengthMismatch { points: 2, log_likelihoods: 1 }
        );
        assert_eq!(
            ActiveSet::new(Array2::zeros((0, 2)), Array1::zeros(0)).unwrap_err(),
            NestedError::EmptyActiveSet
        );
        assert!(matches!(
            ActiveSet::new(array![[0.0], [1.0]], array![0.0, f64::NAN]),
            Err(NestedError::InvalidLogLikelihood { index: 1, .. })
        ));
        let mut set = ten_point_set();
        assert_eq!(
            set.try_replace(array![1.0].view(), 2.0).unwrap_err(),
            NestedError::DimensionMismatch { expected: 2, found: 1 }
        );
        assert_eq!(set, ten_point_set());
    }

    #[test]
    // Purpose
    // -------
    // Seed a population from a uniform prior.
    //
    // Given
    // -----
    // - A 2-D box prior on [-1, 1]² and a sum-of-squares log-likelihood.
    //
    // Expect
    // ------
    // - 50 points inside the box, log-likelihoods equal to −‖θ‖².
    // - `n = 0` and mismatched likelihood dimension are rejected.
    fn from_prior_seeds_consistent_population() {
        // Arrange
        let prior = UniformPrior::new(array![-1.0, -1.0], array![1.0, 1.0]).unwrap();
        let mut rng = build_rng(Some(7));

        // Act
        let set = ActiveSet::from_prior(&prior, &SumOfSquares { d: 2 }, 50, &mut rng).unwrap();

        // Assert
        assert_eq!(set.len(), 50);
        assert_eq!(set.dim(), 2);
        for (theta, ll) in set.iter() {
            assert!(theta.iter().all(|v| (-1.0..=1.0).contains(v)));
            assert_relative_eq!(ll, -theta.dot(&theta), epsilon = 1e-12);
        }
        assert!(matches!(
            ActiveSet::from_prior(&prior, &SumOfSquares { d: 2 }, 0, &mut rng),
            Err(NestedError::InvalidActivePoints { n: 0, .. })
        ));
        assert_eq!(
            ActiveSet::from_prior(&prior, &SumOfSquares { d: 3 }, 5, &mut rng).unwrap_err(),
            NestedError::DimensionMismatch { expected: 2, found: 3 }
        );
    }
}
