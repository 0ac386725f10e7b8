//! geometry::ellipsoid — center-form ellipsoids and uniform sampling inside them.
//!
//! Purpose
//! -------
//! Represent an ellipsoid in center form `(x − c)ᵀ A (x − c) ≤ 1` and draw
//! points uniformly distributed within its volume, optionally after
//! inflating it by an enlargement factor.
//!
//! Key behaviors
//! -------------
//! - [`Ellipsoid`] validates shape, finiteness and positive definiteness of
//!   `A` at construction; it is never mutated afterwards.
//! - [`draw_from_ellipsoid`] maps standard-normal directions onto the unit
//!   sphere, scales them by `r^(1/d)` with `r ~ U[0, 1)` for uniform density
//!   inside the unit ball, then applies `diag(√λ)`, the eigenvector rotation
//!   `V`, and the centroid shift.
//! - [`Ellipsoid::enlarged_covariance`] turns the center-form matrix into the
//!   covariance-like matrix `(A / f)⁻¹`, which inflates every principal
//!   semi-axis by `√f`.
//!
//! Invariants & assumptions
//! ------------------------
//! - The covariance-like matrix passed to [`draw_from_ellipsoid`] is the
//!   *inverse* of the center-form matrix: points satisfy
//!   `(x − c)ᵀ covmat⁻¹ (x − c) ≤ 1`.
//! - One-dimensional ellipsoids are intervals and take a scalar branch with
//!   no eigendecomposition.
//!
//! Conventions
//! -----------
//! - Sampled points are returned as rows of an `npts × d` `Array2<f64>`.
//! - All randomness comes from the caller's `Rng`; nothing here touches
//!   global entropy.
//!
//! Testing notes
//! -------------
//! - Unit tests check containment of enlarged draws, the d = 1 branch, the
//!   inner-shell mass `0.5^d` expected under uniformity, and construction
//!   failures.
use crate::geometry::{
    errors::{GeometryError, GeometryResult},
    linalg::{checked_symmetric_eigen, spd_inverse, to_array2, to_dmatrix},
};
use nalgebra::DVector;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use rand::Rng;
use rand_distr::StandardNormal;

/// Ellipsoid — center-form region `(x − c)ᵀ A (x − c) ≤ 1`.
///
/// Fields
/// ------
/// - `a`: `Array2<f64>`
///   Symmetric positive-definite `d × d` shape matrix.
/// - `centroid`: `Array1<f64>`
///   Center `c` of length `d`.
///
/// Invariants
/// ----------
/// - `a` is square, finite, and passes the SPD/conditioning check in
///   [`checked_symmetric_eigen`].
/// - `centroid.len() == a.nrows()` and all centroid entries are finite.
#[derive(Debug, Clone, PartialEq)]
pub struct Ellipsoid {
    a: Array2<f64>,
    centroid: Array1<f64>,
}

impl Ellipsoid {
    /// Build a validated ellipsoid from its center-form matrix and centroid.
    ///
    /// # Errors
    /// - `NotSquare` if `a` is not square.
    /// - `DimensionMismatch` if `centroid.len() != a.nrows()`.
    /// - `NonFinitePoint` if a centroid coordinate is NaN/±∞.
    /// - `DegenerateGeometry` if `a` is not (well-conditioned) SPD.
    pub fn new(a: Array2<f64>, centroid: Array1<f64>) -> GeometryResult<Self> {
        if a.nrows() != a.ncols() {
            return Err(GeometryError::NotSquare { rows: a.nrows(), cols: a.ncols() });
        }
        if centroid.len() != a.nrows() {
            return Err(GeometryError::DimensionMismatch {
                expected: a.nrows(),
                found: centroid.len(),
            });
        }
        if let Some((col, &value)) = centroid.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(GeometryError::NonFinitePoint { row: 0, col, value });
        }
        checked_symmetric_eigen(to_dmatrix(a.view()), "ellipsoid shape")?;
        Ok(Self { a, centroid })
    }

    /// Center-form matrix `A`.
    pub fn a(&self) -> &Array2<f64> {
        &self.a
    }

    /// Centroid `c`.
    pub fn centroid(&self) -> &Array1<f64> {
        &self.centroid
    }

    /// Dimension `d`.
    pub fn dim(&self) -> usize {
        self.centroid.len()
    }

    /// Quadratic form `(x − c)ᵀ A (x − c)`.
    ///
    /// # Errors
    /// - `DimensionMismatch` if `x.len() != d`.
    pub fn mahalanobis(&self, x: ArrayView1<f64>) -> GeometryResult<f64> {
        if x.len() != self.dim() {
            return Err(GeometryError::DimensionMismatch { expected: self.dim(), found: x.len() });
        }
        let diff = &x - &self.centroid;
        Ok(diff.dot(&self.a.dot(&diff)))
    }

    /// Whether `x` lies inside or on the boundary of the ellipsoid.
    pub fn contains(&self, x: ArrayView1<f64>) -> GeometryResult<bool> {
        Ok(self.mahalanobis(x)? <= 1.0)
    }

    /// enlarged_covariance — covariance-like matrix of the inflated ellipsoid.
    ///
    /// Parameters
    /// ----------
    /// - `factor`: `f64`
    ///   Enlargement factor `f`; must be finite and strictly positive. The
    ///   nested sampler additionally requires `f > 1`.
    ///
    /// Returns
    /// -------
    /// `GeometryResult<Array2<f64>>`
    ///   `(A / f)⁻¹`, suitable as the `covmat` argument of
    ///   [`draw_from_ellipsoid`].
    ///
    /// Errors
    /// ------
    /// - `InvalidEnlargementFactor` for non-finite or non-positive `factor`.
    /// - `DegenerateGeometry` if the scaled matrix fails the SPD check.
    pub fn enlarged_covariance(&self, factor: f64) -> GeometryResult<Array2<f64>> {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(GeometryError::InvalidEnlargementFactor {
                value: factor,
                reason: "Enlargement factor must be finite and strictly positive.",
            });
        }
        let scaled = &self.a * (1.0 / factor);
        let inv = spd_inverse(to_dmatrix(scaled.view()), "enlarged ellipsoid")?;
        Ok(to_array2(&inv))
    }

    /// Draw `npts` points uniformly from the ellipsoid enlarged by `factor`.
    pub fn sample_enlarged<R: Rng>(
        &self, factor: f64, npts: usize, rng: &mut R,
    ) -> GeometryResult<Array2<f64>> {
        let covmat = self.enlarged_covariance(factor)?;
        draw_from_ellipsoid(covmat.view(), self.centroid.view(), npts, rng)
    }
}

/// draw_from_ellipsoid — uniform draws inside `(x − c)ᵀ covmat⁻¹ (x − c) ≤ 1`.
///
/// Parameters
/// ----------
/// - `covmat`: `ArrayView2<f64>`
///   Symmetric positive-definite `d × d` covariance-like matrix whose
///   eigenvalues are the squared semi-axis lengths.
/// - `centroid`: `ArrayView1<f64>`
///   Center of length `d`.
/// - `npts`: `usize`
///   Number of points to draw; `0` yields an empty `0 × d` array.
/// - `rng`: `&mut R`
///   Caller-owned random source.
///
/// Returns
/// -------
/// `GeometryResult<Array2<f64>>`
///   `npts × d` matrix of points, one per row.
///
/// Errors
/// ------
/// - `NotSquare` / `DimensionMismatch` for malformed inputs.
/// - `DegenerateGeometry` if `covmat` is not SPD (or, for `d = 1`, its
///   single entry is not finite and positive).
///
/// Notes
/// -----
/// - A direction whose normal draw has zero norm is redrawn; this has
///   probability zero but would otherwise divide by zero.
pub fn draw_from_ellipsoid<R: Rng>(
    covmat: ArrayView2<f64>, centroid: ArrayView1<f64>, npts: usize, rng: &mut R,
) -> GeometryResult<Array2<f64>> {
    if covmat.nrows() != covmat.ncols() {
        return Err(GeometryError::NotSquare { rows: covmat.nrows(), cols: covmat.ncols() });
    }
    let d = covmat.nrows();
    if centroid.len() != d {
        return Err(GeometryError::DimensionMismatch { expected: d, found: centroid.len() });
    }
    if d == 0 {
        return Err(GeometryError::EmptyPointCloud);
    }
    let mut out = Array2::<f64>::zeros((npts, d));

    if d == 1 {
        let var = covmat[[0, 0]];
        if !var.is_finite() || var <= 0.0 {
            return Err(GeometryError::DegenerateGeometry {
                stage: "ellipsoid covariance",
                min_eigenvalue: var,
                rcond: 1.0,
            });
        }
        let half_width = var.sqrt();
        for i in 0..npts {
            let direction = nonzero_normal(rng).signum();
            let r: f64 = rng.random();
            out[[i, 0]] = centroid[0] + half_width * r * direction;
        }
        return Ok(out);
    }

    let eigen = checked_symmetric_eigen(to_dmatrix(covmat), "ellipsoid covariance")?;
    let semi_axes = eigen.eigenvalues.map(f64::sqrt);
    let inv_d = 1.0 / d as f64;
    for i in 0..npts {
        let z = unit_direction(d, rng);
        let r: f64 = rng.random();
        let scaled = z.component_mul(&semi_axes) * r.powf(inv_d);
        let rotated = &eigen.eigenvectors * scaled;
        for j in 0..d {
            out[[i, j]] = rotated[j] + centroid[j];
        }
    }
    Ok(out)
}

// ---- Helper methods ----

/// Standard-normal direction projected onto the unit sphere.
fn unit_direction<R: Rng>(d: usize, rng: &mut R) -> DVector<f64> {
    loop {
        let z = DVector::<f64>::from_fn(d, |_, _| rng.sample(StandardNormal));
        let norm = z.norm();
        if norm > 0.0 {
            return z / norm;
        }
    }
}

fn nonzero_normal<R: Rng>(rng: &mut R) -> f64 {
    loop {
        let z: f64 = rng.sample(StandardNormal);
        if z != 0.0 {
            return z;
        }
    }
}
