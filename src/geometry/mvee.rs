//! geometry::mvee — minimum-volume enclosing ellipsoid (Khachiyan iteration).
//!
//! Purpose
//! -------
//! Fit the minimum-volume ellipsoid enclosing (up to tolerance) an N×d point
//! cloud, returned in center form `(x − c)ᵀ A (x − c) ≤ 1`. This is the
//! bounding region the nested sampler refits from its active set.
//!
//! Key behaviors
//! -------------
//! - Standardize the cloud per axis, `z = (p − m) / s` with `m` the column
//!   mean and `s` the largest absolute deviation, so the fit sees the same
//!   `O(1)` cloud wherever the points sit and whatever their scale.
//! - Lift each standardized point to homogeneous coordinates `(z, 1)`,
//!   stacked as the columns of `Q ∈ ℝ^{(d+1)×N}`.
//! - Start from uniform weights `u` and repeat the multiplicative update:
//!   - `X = Q diag(u) Qᵀ`,
//!   - `M_j = Q_jᵀ X⁻¹ Q_j` for every point,
//!   - `j* = argmax M_j`, step `s = (M_{j*} − d − 1) / ((d + 1)(M_{j*} − 1))`,
//!   - `u ← (1 − s) u`, `u[j*] += s`,
//!   until `‖Δu‖₂ < tol`.
//! - Recover `c_z = Σ u_j z_j` and `A_z = [Σ u_j z_j z_jᵀ − c_z c_zᵀ]⁻¹ / d`,
//!   then map back: `c = m + S c_z`, `A = S⁻¹ A_z S⁻¹` with `S = diag(s)`.
//!
//! Invariants & assumptions
//! ------------------------
//! - `Σ u_j = 1` is preserved by every update.
//! - Both `X` and the final covariance go through
//!   `linalg::checked_symmetric_eigen`; a singular or ill-conditioned matrix
//!   surfaces as [`GeometryError::DegenerateGeometry`]. Collinear or
//!   coincident clouds therefore fail loudly.
//! - At least `d + 1` points are required.
//! - The iteration is affine invariant, so standardizing changes neither the
//!   weights nor the fitted ellipsoid, only the conditioning of `X`.
//! - An axis with zero spread is reported as `DegenerateGeometry` at the
//!   "point spread" stage.
//!
//! Conventions
//! -----------
//! - `points` rows are observations, columns are coordinates.
//! - Convergence is measured on the weight vector, not on the ellipsoid.
//!
//! Downstream usage
//! ----------------
//! - `NestedEllipsoidSampler` calls [`minimum_volume_ellipsoid`] on the
//!   active set's parameter matrix at scheduled iterations and caches the
//!   resulting [`Ellipsoid`].
//!
//! Testing notes
//! -------------
//! - Unit tests cover the simplex case (immediate convergence, all
//!   vertices on the boundary), containment for a random cloud, affine
//!   degeneracy, insufficient points, option validation, the iteration
//!   cap, and invariance of the fit under translation and rescaling.
use crate::geometry::{
    ellipsoid::Ellipsoid,
    errors::{GeometryError, GeometryResult},
    linalg::{spd_inverse, to_array2, validate_points},
};
use nalgebra::{DMatrix, DVector};
use ndarray::{Array1, ArrayView2, Axis};

/// MveeOptions — convergence controls for the MVEE iteration.
///
/// Fields
/// ------
/// - `tol`: `f64`
///   Stop once `‖u_new − u‖₂ < tol`. Finite and strictly positive.
/// - `max_iter`: `usize`
///   Hard cap on updates; exceeding it returns `NotConverged`. Positive.
///
/// Default
/// -------
/// - `tol = 1e-3`, `max_iter = 10_000`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MveeOptions {
    pub tol: f64,
    pub max_iter: usize,
}

impl MveeOptions {
    /// Construct validated MVEE options.
    ///
    /// # Errors
    /// - [`GeometryError::InvalidTolerance`] if `tol` is non-finite or ≤ 0.
    /// - [`GeometryError::InvalidMaxIter`] if `max_iter == 0`.
    pub fn new(tol: f64, max_iter: usize) -> GeometryResult<Self> {
        if !tol.is_finite() || tol <= 0.0 {
            return Err(GeometryError::InvalidTolerance {
                tol,
                reason: "Tolerance must be finite and strictly positive.",
            });
        }
        if max_iter == 0 {
            return Err(GeometryError::InvalidMaxIter {
                max_iter,
                reason: "Maximum iterations must be greater than zero.",
            });
        }
        Ok(Self { tol, max_iter })
    }
}

impl Default for MveeOptions {
    fn default() -> Self {
        Self { tol: 1e-3, max_iter: 10_000 }
    }
}

/// MveeOutcome — fitted ellipsoid plus iteration diagnostics.
///
/// - `ellipsoid`: the center-form fit.
/// - `iterations`: number of weight updates performed.
/// - `final_err`: last `‖Δu‖₂`, below `tol` on success.
/// - `weights`: final weight vector `u` (length N, sums to one).
#[derive(Debug, Clone, PartialEq)]
pub struct MveeOutcome {
    pub ellipsoid: Ellipsoid,
    pub iterations: usize,
    pub final_err: f64,
    pub weights: Array1<f64>,
}

/// minimum_volume_ellipsoid — fit the MVEE of a point cloud.
///
/// Parameters
/// ----------
/// - `points`: `ArrayView2<f64>`
///   `N × d` cloud; rows are points. Must be finite with `N ≥ d + 1`.
/// - `opts`: `&MveeOptions`
///   Tolerance and iteration cap.
///
/// Returns
/// -------
/// `GeometryResult<MveeOutcome>`
///   The fitted [`Ellipsoid`] in center form with diagnostics.
///
/// Errors
/// ------
/// - `EmptyPointCloud` / `NonFinitePoint` from input validation.
/// - `InsufficientPoints` when `N < d + 1`.
/// - `DegenerateGeometry` when the weighted scatter `X` or the final
///   covariance is singular/ill-conditioned, or when a score `M_j` is not
///   finite.
/// - `NotConverged` when `opts.max_iter` updates do not reach `opts.tol`.
///
/// Panics
/// ------
/// - Never panics.
///
/// Notes
/// -----
/// - For the `d + 1` vertices of a simplex the uniform start is already
///   optimal (`M_j = d + 1` for all `j`), so the loop exits after one
///   zero-length step with every vertex on the boundary.
///
/// Examples
/// --------
/// ```rust
/// # use ndarray::array;
/// # use rust_nested::geometry::mvee::{minimum_volume_ellipsoid, MveeOptions};
/// let pts = array![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 1.0]];
/// let fit = minimum_volume_ellipsoid(pts.view(), &MveeOptions::default()).unwrap();
/// for row in pts.rows() {
///     assert!(fit.ellipsoid.mahalanobis(row).unwrap() <= 1.0 + 1e-2);
/// }
/// ```
pub fn minimum_volume_ellipsoid(
    points: ArrayView2<f64>, opts: &MveeOptions,
) -> GeometryResult<MveeOutcome> {
    validate_points(points)?;
    let (n, d) = points.dim();
    if n < d + 1 {
        return Err(GeometryError::InsufficientPoints { n_points: n, dim: d });
    }
    let d1 = (d + 1) as f64;

    let (shift, scale) = standardization(points)?;
    let q = DMatrix::<f64>::from_fn(d + 1, n, |r, c| {
        if r < d { (points[[c, r]] - shift[r]) / scale[r] } else { 1.0 }
    });
    let mut u = DVector::<f64>::from_element(n, 1.0 / n as f64);
    let mut err = opts.tol + 1.0;
    let mut iterations = 0;

    while err > opts.tol {
        if iterations >= opts.max_iter {
            return Err(GeometryError::NotConverged { iterations, err });
        }
        let x = weighted_scatter(&q, &u);
        let x_inv = spd_inverse(x, "weighted scatter")?;
        let (jdx, m_max) = max_score(&q, &x_inv)?;
        let step = (m_max - d1) / (d1 * (m_max - 1.0));
        let mut new_u = &u * (1.0 - step);
        new_u[jdx] += step;
        err = (&new_u - &u).norm();
        u = new_u;
        iterations += 1;
    }

    let z = q.rows(0, d);
    let centroid_z = &z * &u;
    let second_moment = weighted_scatter(&z.into_owned(), &u);
    let cov = second_moment - &centroid_z * centroid_z.transpose();
    let a_z = spd_inverse(cov, "ellipsoid covariance")? / d as f64;

    let a = DMatrix::<f64>::from_fn(d, d, |i, j| a_z[(i, j)] / (scale[i] * scale[j]));
    let centroid = Array1::from_shape_fn(d, |i| shift[i] + scale[i] * centroid_z[i]);
    let ellipsoid = Ellipsoid::new(to_array2(&a), centroid)?;
    Ok(MveeOutcome {
        ellipsoid,
        iterations,
        final_err: err,
        weights: Array1::from_iter(u.iter().copied()),
    })
}

// ---- Helper methods ----

/// Per-axis mean and largest absolute deviation from it.
fn standardization(points: ArrayView2<f64>) -> GeometryResult<(Array1<f64>, Array1<f64>)> {
    let shift = points.mean_axis(Axis(0)).ok_or(GeometryError::EmptyPointCloud)?;
    let mut scale = Array1::<f64>::zeros(points.ncols());
    for row in points.rows() {
        for (spread, (&x, &m)) in scale.iter_mut().zip(row.iter().zip(shift.iter())) {
            *spread = spread.max((x - m).abs());
        }
    }
    if scale.iter().any(|&s| !(s.is_finite() && s > 0.0)) {
        return Err(GeometryError::DegenerateGeometry {
            stage: "point spread",
            min_eigenvalue: 0.0,
            rcond: 0.0,
        });
    }
    Ok((shift, scale))
}

/// `M diag(u) Mᵀ` without materializing `diag(u)`.
fn weighted_scatter(m: &DMatrix<f64>, u: &DVector<f64>) -> DMatrix<f64> {
    let mut mu = m.clone();
    for (j, mut col) in mu.column_iter_mut().enumerate() {
        col *= u[j];
    }
    mu * m.transpose()
}

/// Index and value of `max_j Q_jᵀ X⁻¹ Q_j`.
fn max_score(q: &DMatrix<f64>, x_inv: &DMatrix<f64>) -> GeometryResult<(usize, f64)> {
    let xq = x_inv * q;
    let mut best = (0, f64::NEG_INFINITY);
    for j in 0..q.ncols() {
        let m_j = q.column(j).dot(&xq.column(j));
        if !m_j.is_finite() {
            return Err(GeometryError::DegenerateGeometry {
                stage: "weighted scatter",
                min_eigenvalue: f64::NAN,
                rcond: f64::NAN,
            });
        }
        if m_j > best.1 {
            best = (j, m_j);
        }
    }
    Ok(best)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::{Array2, array};
    use rand::{Rng, SeedableRng};
    use rand_xoshiro::Xoshiro256PlusPlus;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Simplex vertices: containment and boundary tightness.
    // - Containment and weight normalization for a random cloud.
    // - Degenerate (collinear) input and too few points.
    // - `MveeOptions` validation and the iteration cap.
    // - Translation and scale invariance of the fit.
    //
    // They intentionally DO NOT cover:
    // - Sampling from the fitted ellipsoid (see `ellipsoid`).
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify that the MVEE of a non-degenerate simplex encloses all
    // vertices with each vertex on the boundary.
    //
    // Given
    // -----
    // - The 4 vertices of an irregular tetrahedron in ℝ³.
    //
    // Expect
    // ------
    // - (v − c)ᵀ A (v − c) ≈ 1 for every vertex.
    // - The centroid equals the vertex mean.
    fn mvee_of_simplex_puts_vertices_on_boundary() {
        // Arrange
        let pts = array![[0.0, 0.0, 0.0], [2.0, 0.0, 0.0], [0.3, 1.5, 0.0], [0.4, 0.2, 0.9]];

        // Act
        let fit = minimum_volume_ellipsoid(pts.view(), &MveeOptions::default()).unwrap();

        // Assert
        for row in pts.rows() {
            let q = fit.ellipsoid.mahalanobis(row).unwrap();
            assert!(q <= 1.0 + 1e-6, "vertex outside: {q}");
            assert_relative_eq!(q, 1.0, epsilon = 1e-6);
        }
        let mean = pts.mean_axis(ndarray::Axis(0)).unwrap();
        for j in 0..3 {
            assert_relative_eq!(fit.ellipsoid.centroid()[j], mean[j], epsilon = 1e-9);
        }
    }

    #[test]
    // Purpose
    // -------
    // Check that a random cloud is enclosed up to a tolerance-bounded
    // violation and that the weights stay normalized.
    //
    // Given
    // -----
    // - 200 seeded points in an anisotropic 2-D box.
    // - tol = 1e-4.
    //
    // Expect
    // ------
    // - max_j (p_j − c)ᵀ A (p_j − c) ≤ 1.01.
    // - Σ u = 1 and all u ≥ 0.
    fn mvee_encloses_random_cloud() {
        // Arrange
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
        let pts = Array2::from_shape_fn((200, 2), |(_, j)| {
            let scale = if j == 0 { 3.0 } else { 0.5 };
            scale * (rng.random::<f64>() - 0.5)
        });
        let opts = MveeOptions::new(1e-4, 1_000_000).unwrap();

        // Act
        let fit = minimum_volume_ellipsoid(pts.view(), &opts).unwrap();

        // Assert
        let worst = pts
            .rows()
            .into_iter()
            .map(|row| fit.ellipsoid.mahalanobis(row).unwrap())
            .fold(f64::NEG_INFINITY, f64::max);
        assert!(worst <= 1.01, "boundary violation too large: {worst}");
        assert_relative_eq!(fit.weights.sum(), 1.0, epsilon = 1e-9);
        assert!(fit.weights.iter().all(|&w| w >= -1e-12));
        assert!(fit.final_err < opts.tol);
    }

    #[test]
    // Purpose
    // -------
    // Ensure collinear input is rejected as degenerate geometry instead of
    // returning a NaN ellipsoid.
    //
    // Given
    // -----
    // - 5 points on the line y = 2x.
    //
    // Expect
    // ------
    // - `Err(DegenerateGeometry { .. })`.
    fn mvee_rejects_collinear_points() {
        // Arrange
        let pts = array![[0.0, 0.0], [1.0, 2.0], [2.0, 4.0], [3.0, 6.0], [4.0, 8.0]];

        // Act
        let res = minimum_volume_ellipsoid(pts.view(), &MveeOptions::default());

        // Assert
        assert!(matches!(res, Err(GeometryError::DegenerateGeometry { .. })), "got {res:?}");
    }

    #[test]
    // Purpose
    // -------
    // Ensure too few points and invalid options are reported up front.
    //
    // Given
    // -----
    // - 2 points in ℝ², and options with tol = 0 / max_iter = 0.
    //
    // Expect
    // ------
    // - `InsufficientPoints`, `InvalidTolerance`, `InvalidMaxIter`.
    fn mvee_validates_point_count_and_options() {
        // Arrange
        let pts = array![[0.0, 0.0], [1.0, 1.0]];

        // Act
        let res = minimum_volume_ellipsoid(pts.view(), &MveeOptions::default());
        let bad_tol = MveeOptions::new(0.0, 10);
        let bad_iter = MveeOptions::new(1e-3, 0);

        // Assert
        assert_eq!(res.unwrap_err(), GeometryError::InsufficientPoints { n_points: 2, dim: 2 });
        assert!(matches!(bad_tol, Err(GeometryError::InvalidTolerance { .. })));
        assert!(matches!(bad_iter, Err(GeometryError::InvalidMaxIter { .. })));
    }

    #[test]
    // Purpose
    // -------
    // Verify the iteration cap turns a slow fit into `NotConverged`.
    //
    // Given
    // -----
    // - A square with an interior point (not a simplex, so the first step
    //   is non-zero) and max_iter = 1 with a tiny tolerance.
    //
    // Expect
    // ------
    // - `Err(NotConverged { iterations: 1, .. })`.
    fn mvee_reports_not_converged_at_iteration_cap() {
        // Arrange
        let pts = array![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 1.0], [0.5, 0.5]];
        let opts = MveeOptions::new(1e-12, 1).unwrap();

        // Act
        let res = minimum_volume_ellipsoid(pts.view(), &opts);

        // Assert
        assert!(matches!(res, Err(GeometryError::NotConverged { iterations: 1, .. })), "{res:?}");
    }

    /// Eight non-simplex points in ℝ² with integer coordinates, so that
    /// power-of-two scalings and integer offsets are exact in `f64`.
    fn octagon_cloud() -> Array2<f64> {
        array![
            [0.0, 0.0],
            [3.0, 1.0],
            [1.0, 4.0],
            [-2.0, 3.0],
            [-3.0, -1.0],
            [2.0, -3.0],
            [4.0, 2.0],
            [-1.0, -2.0]
        ]
    }

    fn uniform_cloud(n: usize, center: f64, spread: f64, seed: u64) -> Array2<f64> {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        Array2::from_shape_fn((n, 2), |_| center + spread * (rng.random::<f64>() - 0.5))
    }

    fn worst_mahalanobis(fit: &MveeOutcome, pts: &Array2<f64>) -> f64 {
        pts.rows()
            .into_iter()
            .map(|row| fit.ellipsoid.mahalanobis(row).unwrap())
            .fold(f64::NEG_INFINITY, f64::max)
    }

    #[test]
    // Purpose
    // -------
    // A tight cluster far from the origin fits exactly like the same
    // cluster at the origin.
    //
    // Given
    // -----
    // - The octagon cloud scaled by 2⁻⁷ (spread ≈ 0.03), once at the origin
    //   and once shifted by (1024, 1024).
    // - 40 seeded uniform points of width 0.01 around (1000, 1000).
    //
    // Expect
    // ------
    // - Identical `A` and a centroid shifted by exactly 1024.
    // - The far-away random cluster fits and is enclosed.
    fn mvee_is_translation_invariant_for_offset_clusters() {
        // Arrange
        let near = octagon_cloud() / 128.0;
        let far = &near + 1024.0;
        let random_far = uniform_cloud(40, 1000.0, 0.01, 7);
        let opts = MveeOptions::new(1e-4, 1_000_000).unwrap();

        // Act
        let fit_near = minimum_volume_ellipsoid(near.view(), &opts).unwrap();
        let fit_far = minimum_volume_ellipsoid(far.view(), &opts).unwrap();
        let fit_random = minimum_volume_ellipsoid(random_far.view(), &opts).unwrap();

        // Assert
        assert_eq!(fit_near.iterations, fit_far.iterations);
        for (x, y) in fit_near.ellipsoid.a().iter().zip(fit_far.ellipsoid.a().iter()) {
            assert_relative_eq!(*x, *y, max_relative = 1e-9);
        }
        for j in 0..2 {
            let shifted = fit_near.ellipsoid.centroid()[j] + 1024.0;
            assert_relative_eq!(fit_far.ellipsoid.centroid()[j], shifted, epsilon = 1e-9);
        }
        assert!(worst_mahalanobis(&fit_far, &far) <= 1.0 + 1e-2);
        assert!(worst_mahalanobis(&fit_random, &random_far) <= 1.01);
    }

    #[test]
    // Purpose
    // -------
    // Very small and very large clouds converge to rescaled copies of one
    // reference ellipsoid.
    //
    // Given
    // -----
    // - The octagon cloud at unit scale, scaled by 2⁻¹⁷ (≈ 7.6e-6) and by
    //   2¹⁷ (≈ 1.3e5).
    // - 40 seeded uniform points of width 1e-5 around the origin.
    //
    // Expect
    // ------
    // - `A_k = A_ref / k²` and `c_k = k c_ref` for both scalings.
    // - The tiny random cloud converges and is enclosed.
    fn mvee_is_scale_invariant_for_tiny_and_huge_clouds() {
        // Arrange
        let reference = octagon_cloud();
        let opts = MveeOptions::new(1e-4, 1_000_000).unwrap();
        let fit_ref = minimum_volume_ellipsoid(reference.view(), &opts).unwrap();
        let tiny_random = uniform_cloud(40, 0.0, 1e-5, 11);

        // Act / Assert
        for k in [2.0_f64.powi(-17), 2.0_f64.powi(17)] {
            let scaled = &reference * k;
            let fit = minimum_volume_ellipsoid(scaled.view(), &opts).unwrap();
            assert_eq!(fit.iterations, fit_ref.iterations);
            for (x, y) in fit.ellipsoid.a().iter().zip(fit_ref.ellipsoid.a().iter()) {
                assert_relative_eq!(*x * k * k, *y, max_relative = 1e-9, epsilon = 1e-12);
            }
            for j in 0..2 {
                let expected = fit_ref.ellipsoid.centroid()[j] * k;
                assert_relative_eq!(
                    fit.ellipsoid.centroid()[j],
                    expected,
                    max_relative = 1e-9,
                    epsilon = 1e-12 * k
                );
            }
        }
        let fit_tiny = minimum_volume_ellipsoid(tiny_random.view(), &opts).unwrap();
        assert!(fit_tiny.final_err < opts.tol);
        assert!(worst_mahalanobis(&fit_tiny, &tiny_random) <= 1.01);
    }

    #[test]
    // Purpose
    // -------
    // Coincident points have no spread to standardize by.
    //
    // Given
    // -----
    // - Four copies of (2, 2).
    //
    // Expect
    // ------
    // - `DegenerateGeometry` at the "point spread" stage.
    fn mvee_rejects_coincident_points() {
        // Arrange
        let pts = array![[2.0, 2.0], [2.0, 2.0], [2.0, 2.0], [2.0, 2.0]];

        // Act
        let res = minimum_volume_ellipsoid(pts.view(), &MveeOptions::default());

        // Assert
        match res {
            Err(GeometryError::DegenerateGeometry { stage, .. }) => assert_eq!(stage, "point spread"),
            other => panic!("expected DegenerateGeometry, got {other:?}"),
        }
    }
}
