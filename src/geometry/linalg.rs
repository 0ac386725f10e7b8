//! geometry::linalg — ndarray/nalgebra bridge and checked SPD decompositions.
//!
//! Purpose
//! -------
//! Keep the public geometry surface on `ndarray` while delegating dense
//! decompositions to `nalgebra`. Every decomposition used by the ellipsoid
//! code goes through [`checked_symmetric_eigen`], which rejects singular,
//! indefinite, or ill-conditioned matrices with
//! [`GeometryError::DegenerateGeometry`] instead of letting NaNs escape.
//!
//! Conventions
//! -----------
//! - Inputs that should be symmetric are symmetrized as `(M + Mᵀ) / 2`
//!   before decomposition to absorb round-off asymmetry.
//! - The conditioning test uses the eigenvalue ratio `λ_min / λ_max`
//!   against [`RCOND_TOL`].
use crate::geometry::errors::{GeometryError, GeometryResult};
use nalgebra::{DMatrix, Dyn, SymmetricEigen};
use ndarray::{Array2, ArrayView2};

/// Smallest admissible reciprocal condition number `λ_min / λ_max` for a
/// matrix treated as symmetric positive definite.
pub const RCOND_TOL: f64 = 1e-12;

/// Copy an `ndarray` matrix into a column-major `DMatrix`.
pub fn to_dmatrix(m: ArrayView2<f64>) -> DMatrix<f64> {
    DMatrix::from_fn(m.nrows(), m.ncols(), |i, j| m[[i, j]])
}

/// Copy a `DMatrix` back into a row-major `Array2`.
pub fn to_array2(m: &DMatrix<f64>) -> Array2<f64> {
    Array2::from_shape_fn((m.nrows(), m.ncols()), |(i, j)| m[(i, j)])
}

/// Replace `m` by `(m + mᵀ) / 2` in place. `m` must be square.
pub fn symmetrize(m: &mut DMatrix<f64>) {
    let n = m.nrows();
    for j in 0..n {
        for i in (j + 1)..n {
            let avg = 0.5 * (m[(i, j)] + m[(j, i)]);
            m[(i, j)] = avg;
            m[(j, i)] = avg;
        }
    }
}

/// checked_symmetric_eigen — eigendecomposition of a matrix that must be SPD.
///
/// Parameters
/// ----------
/// - `m`: `DMatrix<f64>`
///   Square matrix; consumed. Symmetrized before decomposition.
/// - `stage`: `&'static str`
///   Name of the matrix for error messages (e.g. "weighted scatter").
///
/// Returns
/// -------
/// `GeometryResult<SymmetricEigen<f64, Dyn>>`
///   The decomposition, with all eigenvalues finite and strictly positive
///   and `λ_min / λ_max ≥ RCOND_TOL`.
///
/// Errors
/// ------
/// - `NotSquare` if `m` is not square.
/// - `DegenerateGeometry` if any eigenvalue is non-finite or non-positive,
///   or if the reciprocal condition number is below [`RCOND_TOL`].
pub fn checked_symmetric_eigen(
    mut m: DMatrix<f64>, stage: &'static str,
) -> GeometryResult<SymmetricEigen<f64, Dyn>> {
    if m.nrows() != m.ncols() {
        return Err(GeometryError::NotSquare { rows: m.nrows(), cols: m.ncols() });
    }
    if m.iter().any(|v| !v.is_finite()) {
        return Err(GeometryError::DegenerateGeometry {
            stage,
            min_eigenvalue: f64::NAN,
            rcond: f64::NAN,
        });
    }
    symmetrize(&mut m);
    let eigen = m.symmetric_eigen();
    if eigen.eigenvalues.iter().any(|l| !l.is_finite()) {
        return Err(GeometryError::DegenerateGeometry {
            stage,
            min_eigenvalue: f64::NAN,
            rcond: f64::NAN,
        });
    }
    let min_eigenvalue = eigen.eigenvalues.min();
    let max_eigenvalue = eigen.eigenvalues.max();
    let rcond = if max_eigenvalue > 0.0 { min_eigenvalue / max_eigenvalue } else { 0.0 };
    if min_eigenvalue <= 0.0 || rcond < RCOND_TOL {
        return Err(GeometryError::DegenerateGeometry { stage, min_eigenvalue, rcond });
    }
    Ok(eigen)
}

/// Inverse of an SPD matrix through [`checked_symmetric_eigen`]:
/// `M⁻¹ = V diag(1/λ) Vᵀ`.
pub fn spd_inverse(m: DMatrix<f64>, stage: &'static str) -> GeometryResult<DMatrix<f64>> {
    let eigen = checked_symmetric_eigen(m, stage)?;
    let inv_lambda = DMatrix::from_diagonal(&eigen.eigenvalues.map(|l| 1.0 / l));
    Ok(&eigen.eigenvectors * inv_lambda * eigen.eigenvectors.transpose())
}

/// Reject empty clouds and non-finite coordinates.
pub fn validate_points(points: ArrayView2<f64>) -> GeometryResult<()> {
    if points.nrows() == 0 || points.ncols() == 0 {
        return Err(GeometryError::EmptyPointCloud);
    }
    for ((row, col), &value) in points.indexed_iter() {
        if !value.is_finite() {
            return Err(GeometryError::NonFinitePoint { row, col, value });
        }
    }
    Ok(())
}
