//! nested::errors — error types for nested samplers and their configuration.
//!
//! Purpose
//! -------
//! Provide [`NestedError`] and [`NestedResult`], the error surface of the
//! propose/report samplers, the active set, and hyperparameter handling.
//! Geometry failures raised while refitting the bounding ellipsoid are
//! wrapped, not flattened, so callers can still match on
//! [`GeometryError::DegenerateGeometry`].
//!
//! Key behaviors
//! -------------
//! - Group failures into configuration errors (bad hyperparameters or
//!   options), data errors (malformed active sets or prior draws), protocol
//!   misuse (report without an outstanding proposal), and wrapped geometry
//!   errors.
//! - Implement `Display`/`Error`, `From<GeometryError>`, and a conversion
//!   to Python `ValueError` behind `python-bindings`.
//!
//! Invariants & assumptions
//! ------------------------
//! - Configuration errors are raised *before* any state is mutated; a
//!   caller that receives one can keep using the sampler unchanged.
//! - `ProtocolViolation` marks a programming-contract breach rather than a
//!   recoverable condition.
//!
//! Testing notes
//! -------------
//! - Unit tests check payload embedding in `Display` and the geometry
//!   wrapping; the variants themselves are produced by tests in the
//!   sampler and active-set modules.
use crate::geometry::errors::GeometryError;
#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

/// Result alias for nested-sampling operations.
pub type NestedResult<T> = Result<T, NestedError>;

/// Unified error type for nested samplers.
///
/// Covers hyperparameter and option validation, active-set construction,
/// prior/likelihood interface violations, propose/report misuse, and
/// ellipsoid geometry failures.
#[derive(Debug, Clone, PartialEq)]
pub enum NestedError {
    // ---- Hyperparameters ----
    /// Rejection-sample count must be a finite, non-negative number.
    InvalidRejectionSamples { value: f64, reason: &'static str },

    /// Ellipsoid update gap must be an integer greater than one.
    InvalidEllipsoidUpdateGap { value: f64, reason: &'static str },

    /// Enlargement factor must be finite and greater than one.
    InvalidEnlargementFactor { value: f64, reason: &'static str },

    /// Hyperparameter vector has the wrong length.
    HyperParameterCount { expected: usize, found: usize },

    // ---- Active set ----
    /// Active set must hold at least one point.
    EmptyActiveSet,

    /// Number of parameter rows and log-likelihoods differ.
    ActiveSetLengthMismatch { points: usize, log_likelihoods: usize },

    /// A parameter coordinate is NaN/±inf.
    NonFiniteParameter { row: usize, col: usize, value: f64 },

    /// A log-likelihood is NaN or +inf (−inf is allowed).
    InvalidLogLikelihood { index: usize, value: f64 },

    /// Requested number of active points is zero.
    InvalidActivePoints { n: usize, reason: &'static str },

    // ---- Prior / likelihood interface ----
    /// Parameter dimension disagrees between components.
    DimensionMismatch { expected: usize, found: usize },

    /// Prior returned a different number of draws than requested.
    PriorSampleCount { expected: usize, found: usize },

    /// Invalid bounds for a uniform prior.
    InvalidPriorBounds { index: usize, lower: f64, upper: f64 },

    /// External prior or likelihood failed (e.g. raised in Python).
    ExternalFailure { text: String },

    // ---- Protocol ----
    /// report() without a matching outstanding propose().
    ProtocolViolation { reason: &'static str },

    // ---- Geometry ----
    /// Ellipsoid fit or draw failed.
    Geometry(GeometryError),
}

impl std::error::Error for NestedError {}

impl From<GeometryError> for NestedError {
    fn from(err: GeometryError) -> Self {
        NestedError::Geometry(err)
    }
}

impl std::fmt::Display for NestedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Hyperparameters ----
            NestedError::InvalidRejectionSamples { value, reason } => {
                write!(f, "Nested Error: invalid rejection samples {value}: {reason}")
            }
            NestedError::InvalidEllipsoidUpdateGap { value, reason } => {
                write!(f, "Nested Error: invalid ellipsoid update gap {value}: {reason}")
            }
            NestedError::InvalidEnlargementFactor { value, reason } => {
                write!(f, "Nested Error: invalid enlargement factor {value}: {reason}")
            }
            NestedError::HyperParameterCount { expected, found } => write!(
                f,
                "Nested Error: expected {expected} hyper-parameters, found {found}."
            ),

            // ---- Active set ----
            NestedError::EmptyActiveSet => {
                write!(f, "Nested Error: active set must contain at least one point.")
            }
            NestedError::ActiveSetLengthMismatch { points, log_likelihoods } => write!(
                f,
                "Nested Error: {points} active points but {log_likelihoods} log-likelihoods."
            ),
            NestedError::NonFiniteParameter { row, col, value } => {
                write!(f, "Nested Error: non-finite parameter {value} at ({row}, {col}).")
            }
            NestedError::InvalidLogLikelihood { index, value } => {
                write!(f, "Nested Error: invalid log-likelihood {value} at index {index}.")
            }
            NestedError::InvalidActivePoints { n, reason } => {
                write!(f, "Nested Error: invalid number of active points {n}: {reason}")
            }

            // ---- Prior / likelihood interface ----
            NestedError::DimensionMismatch { expected, found } => write!(
                f,
                "Nested Error: parameter dimension mismatch (expected {expected}, found {found})."
            ),
            NestedError::PriorSampleCount { expected, found } => write!(
                f,
                "Nested Error: prior returned {found} samples, expected {expected}."
            ),
            NestedError::InvalidPriorBounds { index, lower, upper } => write!(
                f,
                "Nested Error: invalid prior bounds [{lower}, {upper}] for parameter {index}."
            ),
            NestedError::ExternalFailure { text } => {
                write!(f, "Nested Error: external evaluation failed: {text}")
            }

            // ---- Protocol ----
            NestedError::ProtocolViolation { reason } => {
                write!(f, "Nested Error: protocol violation: {reason}")
            }

            // ---- Geometry ----
            NestedError::Geometry(err) => write!(f, "Nested Error: {err}"),
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<NestedError> for PyErr {
    fn from(err: NestedError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
