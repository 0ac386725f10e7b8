//! geometry::errors — error types for ellipsoid fitting and sampling.
//!
//! Purpose
//! -------
//! Provide the error enum and result alias shared by the minimum-volume
//! enclosing ellipsoid (MVEE) estimator, the [`Ellipsoid`] container, and
//! the uniform ellipsoid sampler. Geometry failures are kept separate from
//! sampler-protocol failures so callers can tell a bad point cloud apart
//! from a misuse of the propose/report loop.
//!
//! Key behaviors
//! -------------
//! - Define [`GeometryError`] and [`GeometryResult`] as the canonical error
//!   and result types for everything under `geometry`.
//! - Attach human-readable `Display` messages that embed the offending
//!   value (row/column, eigenvalue ratio, tolerance) for diagnostics.
//! - Map geometry errors to Python `ValueError`s behind the
//!   `python-bindings` feature.
//!
//! Invariants & assumptions
//! ------------------------
//! - [`GeometryError::DegenerateGeometry`] is the single variant used for
//!   singular or ill-conditioned matrices. It is never downgraded to a
//!   warning or replaced by a NaN-filled result.
//! - Errors are small and `Clone`, so they can be stored in test fixtures
//!   and compared with `PartialEq`.
//!
//! Conventions
//! -----------
//! - Row/column indices are 0-based and refer to the N×d point layout
//!   (rows = points, columns = coordinates).
//! - `stage` payloads name the matrix that failed (e.g. "weighted scatter",
//!   "ellipsoid covariance") rather than the code path.
//!
//! Downstream usage
//! ----------------
//! - `nested::errors::NestedError` wraps these values via
//!   `From<GeometryError>` so `?` works across the module boundary.
//!
//! Testing notes
//! -------------
//! - Unit tests check that `Display` output embeds payloads; behavior that
//!   produces each variant is tested in `mvee` and `ellipsoid`.
#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

/// Result alias for geometry routines.
pub type GeometryResult<T> = Result<T, GeometryError>;

/// GeometryError — failures raised while fitting or sampling ellipsoids.
///
/// Variants
/// --------
/// - `EmptyPointCloud`
///   The point cloud has no rows or no columns.
/// - `InsufficientPoints { n_points, dim }`
///   Fewer than `dim + 1` points were supplied, so no full-dimensional
///   ellipsoid can enclose them.
/// - `NonFinitePoint { row, col, value }`
///   A coordinate is NaN or ±∞.
/// - `DimensionMismatch { expected, found }`
///   Matrix/vector sizes disagree (e.g. centroid length vs matrix order).
/// - `NotSquare { rows, cols }`
///   A matrix expected to be square is not.
/// - `DegenerateGeometry { stage, min_eigenvalue, rcond }`
///   A matrix that must be symmetric positive definite is singular,
///   indefinite, or has reciprocal condition number below tolerance.
/// - `NotConverged { iterations, err }`
///   The MVEE iteration hit its iteration cap before the weight change
///   fell below tolerance.
/// - `InvalidTolerance { tol, reason }` / `InvalidMaxIter { max_iter, reason }`
///   MVEE options are out of range.
/// - `InvalidEnlargementFactor { value, reason }`
///   An enlargement factor is not finite or not strictly positive.
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryError {
    // ---- Input validation ----
    EmptyPointCloud,
    InsufficientPoints { n_points: usize, dim: usize },
    NonFinitePoint { row: usize, col: usize, value: f64 },
    DimensionMismatch { expected: usize, found: usize },
    NotSquare { rows: usize, cols: usize },

    // ---- Numerical ----
    DegenerateGeometry { stage: &'static str, min_eigenvalue: f64, rcond: f64 },
    NotConverged { iterations: usize, err: f64 },

    // ---- Options ----
    InvalidTolerance { tol: f64, reason: &'static str },
    InvalidMaxIter { max_iter: usize, reason: &'static str },
    InvalidEnlargementFactor { value: f64, reason: &'static str },
}

impl std::error::Error for GeometryError {}

impl std::fmt::Display for GeometryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Input validation ----
            GeometryError::EmptyPointCloud => {
                write!(f, "Geometry Error: point cloud must have at least one row and column.")
            }
            GeometryError::InsufficientPoints { n_points, dim } => write!(
                f,
                "Geometry Error: {n_points} points cannot span a {dim}-dimensional ellipsoid \
                 (need at least {}).",
                dim + 1
            ),
            GeometryError::NonFinitePoint { row, col, value } => {
                write!(f, "Geometry Error: non-finite coordinate {value} at ({row}, {col}).")
            }
            GeometryError::DimensionMismatch { expected, found } => {
                write!(f, "Geometry Error: dimension mismatch (expected {expected}, found {found}).")
            }
            GeometryError::NotSquare { rows, cols } => {
                write!(f, "Geometry Error: matrix must be square, got {rows}×{cols}.")
            }

            // ---- Numerical ----
            GeometryError::DegenerateGeometry { stage, min_eigenvalue, rcond } => write!(
                f,
                "Geometry Error: degenerate {stage} matrix (min eigenvalue = {min_eigenvalue:e}, \
                 rcond = {rcond:e}); points may be collinear or coincident."
            ),
            GeometryError::NotConverged { iterations, err } => write!(
                f,
                "Geometry Error: MVEE did not converge after {iterations} iterations \
                 (last weight change = {err:e})."
            ),

            // ---- Options ----
            GeometryError::InvalidTolerance { tol, reason } => {
                write!(f, "Geometry Error: invalid tolerance {tol}: {reason}")
            }
            GeometryError::InvalidMaxIter { max_iter, reason } => {
                write!(f, "Geometry Error: invalid max_iter {max_iter}: {reason}")
            }
            GeometryError::InvalidEnlargementFactor { value, reason } => {
                write!(f, "Geometry Error: invalid enlargement factor {value}: {reason}")
            }
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<GeometryError> for PyErr {
    fn from(err: GeometryError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - `Display` messages embedding their payloads.
    //
    // They intentionally DO NOT cover:
    // - The PyErr conversion, which needs the Python C API.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify that the degenerate-geometry message names the failing stage.
    //
    // Given
    // -----
    // - A `DegenerateGeometry` error for the "weighted scatter" stage.
    //
    // Expect
    // ------
    // - The rendered message contains "weighted scatter" and "degenerate".
    fn degenerate_geometry_display_names_stage() {
        // Arrange
        let err = GeometryError::DegenerateGeometry {
            stage: "weighted scatter",
            min_eigenvalue: 0.0,
            rcond: 0.0,
        };

        // Act
        let msg = err.to_string();

        // Assert
        assert!(msg.contains("weighted scatter"));
        assert!(msg.contains("degenerate"));
    }

    #[test]
    // Purpose
    // -------
    // Verify that `InsufficientPoints` reports the required point count.
    //
    // Given
    // -----
    // - 2 points in 3 dimensions.
    //
    // Expect
    // ------
    // - The message mentions that at least 4 points are needed.
    fn insufficient_points_display_reports_required_count() {
        // Arrange
        let err = GeometryError::InsufficientPoints { n_points: 2, dim: 3 };

        // Act
        let msg = err.to_string();

        // Assert
        assert!(msg.contains("at least 4"), "unexpected message: {msg}");
    }
}
