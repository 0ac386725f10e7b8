//! nested validation helpers — reusable checks for hyperparameters and data.
//!
//! Purpose
//! -------
//! Centralize the small validation routines used by the hyperparameter
//! setters, the active set, and the prior interface, so that every entry
//! point fails fast with the same structured [`NestedError`] before any
//! state is touched.
//!
//! Key behaviors
//! -------------
//! - Validate the three sampler hyperparameters (rejection samples,
//!   ellipsoid update gap, enlargement factor) from their `f64` vector form,
//!   truncating the integer-valued ones toward zero.
//! - Validate parameter matrices (finite coordinates) and log-likelihoods
//!   (no NaN, no +∞).
//! - Check dimension agreement between prior draws and the active set.
//!
//! Conventions
//! -----------
//! - Validators return the normalized value on success so callers can
//!   validate everything first and assign afterwards.
//! - No I/O and no logging.
//!
//! Testing notes
//! -------------
//! - Unit tests cover boundary values (0, 1, exactly-one enlargement,
//!   NaN/∞) for each helper.
use crate::nested::errors::{NestedError, NestedResult};
use ndarray::ArrayView2;

/// Validate the number of pure-prior iterations.
///
/// Parameters
/// ----------
/// - `value`: `f64`
///   Candidate count. Must be finite and `≥ 0`; fractional values are
///   truncated toward zero.
///
/// Returns
/// -------
/// `NestedResult<usize>`
///   The truncated count.
///
/// Errors
/// ------
/// - `NestedError::InvalidRejectionSamples` for negative or non-finite input.
pub fn validate_rejection_samples(value: f64) -> NestedResult<usize> {
    if !value.is_finite() {
        return Err(NestedError::InvalidRejectionSamples {
            value,
            reason: "Rejection samples must be finite.",
        });
    }
    if value < 0.0 {
        return Err(NestedError::InvalidRejectionSamples {
            value,
            reason: "Must have non-negative rejection samples.",
        });
    }
    Ok(value.trunc() as usize)
}

/// Validate the gap (in iterations) between ellipsoid refits.
///
/// Parameters
/// ----------
/// - `value`: `f64`
///   Candidate gap, truncated toward zero. The truncated value must exceed 1.
///
/// Returns
/// -------
/// `NestedResult<usize>`
///   The truncated gap.
///
/// Errors
/// ------
/// - `NestedError::InvalidEllipsoidUpdateGap` for non-finite input or a
///   truncated gap `≤ 1`.
pub fn validate_ellipsoid_update_gap(value: f64) -> NestedResult<usize> {
    if !value.is_finite() {
        return Err(NestedError::InvalidEllipsoidUpdateGap {
            value,
            reason: "Ellipsoid update gap must be finite.",
        });
    }
    let gap = value.trunc();
    if gap <= 1.0 {
        return Err(NestedError::InvalidEllipsoidUpdateGap {
            value,
            reason: "Ellipsoid update gap must exceed 1.",
        });
    }
    Ok(gap as usize)
}

/// Validate the ellipsoid enlargement factor.
///
/// # Errors
/// - `NestedError::InvalidEnlargementFactor` unless `value` is finite and
///   strictly greater than 1.
pub fn validate_enlargement_factor(value: f64) -> NestedResult<f64> {
    if !value.is_finite() || value <= 1.0 {
        return Err(NestedError::InvalidEnlargementFactor {
            value,
            reason: "Enlargement factor must be finite and exceed 1.",
        });
    }
    Ok(value)
}

/// Reject NaN and +∞ log-likelihoods; −∞ (zero likelihood) is allowed.
pub fn validate_log_likelihood(index: usize, value: f64) -> NestedResult<f64> {
    if value.is_nan() || value == f64::INFINITY {
        return Err(NestedError::InvalidLogLikelihood { index, value });
    }
    Ok(value)
}

/// Reject empty parameter matrices and non-finite coordinates.
pub fn validate_parameters(points: ArrayView2<f64>) -> NestedResult<()> {
    if points.nrows() == 0 {
        return Err(NestedError::EmptyActiveSet);
    }
    for ((row, col), &value) in points.indexed_iter() {
        if !value.is_finite() {
            return Err(NestedError::NonFiniteParameter { row, col, value });
        }
    }
    Ok(())
}

/// Require `found == expected` for parameter dimensions.
pub fn validate_dimension(expected: usize, found: usize) -> NestedResult<()> {
    if expected != found {
        return Err(NestedError::DimensionMismatch { expected, found });
    }
    Ok(())
}
