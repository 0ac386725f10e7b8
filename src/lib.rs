//! rust_nested — ellipsoidal nested sampling with Python bindings.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that
//! exposes the nested samplers to Python via the `_rust_nested` extension
//! module. When the `python-bindings` feature is enabled, this module
//! defines the Python-facing classes and the `nested` submodule used by the
//! `rust_nested` package.
//!
//! Key behaviors
//! -------------
//! - Re-export the core Rust modules (`geometry` and `nested`) as the public
//!   crate surface.
//! - Define the `NestedEllipsoid` `#[pyclass]` wrapper and the `#[pymodule]`
//!   initializer for the `_rust_nested` Python extension.
//! - Register the `nested` submodule under `rust_nested` so that
//!   dot-notation imports work as expected.
//!
//! Invariants & assumptions
//! ------------------------
//! - All numerical work is implemented in the inner Rust modules; this file
//!   performs only FFI glue, input conversion, and error mapping.
//! - Likelihood evaluation stays on the Python side: Python calls
//!   `propose()`, evaluates the model, and hands the value to `report()`.
//!
//! Conventions
//! -----------
//! - Python-exposed classes live under `_rust_nested.<submodule>` and are
//!   typically wrapped by thin pure-Python facades in the top-level
//!   `rust_nested` package.
//! - Errors from core Rust code are propagated as rich error types
//!   internally and converted to `ValueError` at the PyO3 boundary.
//!
//! Downstream usage
//! ----------------
//! - Native Rust code should depend directly on [`nested`] and [`geometry`]
//!   and can ignore the PyO3 items guarded by the `python-bindings` feature.
//!
//! Testing notes
//! -------------
//! - Core behavior is covered by unit tests in the inner modules and by the
//!   integration test in `tests/`.

pub mod geometry;
pub mod nested;
pub mod utils;

#[cfg(feature = "python-bindings")]
use numpy::{IntoPyArray, PyArray1, PyArray2};

#[cfg(feature = "python-bindings")]
use pyo3::{prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    nested::{
        core::active_set::ActiveSet, samplers::ellipsoid::NestedEllipsoidSampler,
        traits::NestedSampler,
    },
    utils::{PyPrior, build_sampler_options, extract_f64_array, extract_f64_matrix},
};

/// NestedEllipsoid — Python-facing wrapper for the ellipsoidal nested sampler.
///
/// Purpose
/// -------
/// Expose [`NestedEllipsoidSampler`] to Python with a Python-side prior while
/// preserving the Rust validation and error handling.
///
/// Parameters
/// ----------
/// Constructed from Python via
/// `NestedEllipsoid(prior, points, log_likelihoods, rejection_samples=1000,
/// ellipsoid_update_gap=20, enlargement_factor=1.5, tol=None, max_iter=None,
/// seed=None, verbose=False)`:
/// - `prior`: object with `sample(n) -> (n, d) array`.
/// - `points`: `(n, d)` array-like of initial active points.
/// - `log_likelihoods`: length-`n` array-like.
/// - `rejection_samples`, `ellipsoid_update_gap`, `enlargement_factor`:
///   hyperparameters, validated as in `set_hyper_parameters`.
/// - `tol`, `max_iter`: MVEE controls; defaults `1e-3` and `10_000`.
/// - `seed`: RNG seed for ellipsoid draws.
/// - `verbose`: terminal logging (requires the `obs_slog` feature).
///
/// Notes
/// -----
/// - `report` returns `True` when the proposal entered the active set.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "rust_nested.nested", unsendable)]
pub struct NestedEllipsoid {
    inner: NestedEllipsoidSampler<PyPrior>,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl NestedEllipsoid {
    #[new]
    #[pyo3(
        text_signature = "(prior, points, log_likelihoods, /, rejection_samples=1000, \
                          ellipsoid_update_gap=20, enlargement_factor=1.5, tol=None, \
                          max_iter=None, seed=None, verbose=False)",
        signature = (
            prior, points, log_likelihoods, rejection_samples = 1000.0,
            ellipsoid_update_gap = 20.0, enlargement_factor = 1.5, tol = None,
            max_iter = None, seed = None, verbose = false
        )
    )]
    #[allow(clippy::too_many_arguments)]
    pub fn new<'py>(
        py: Python<'py>, prior: &Bound<'py, PyAny>, points: &Bound<'py, PyAny>,
        log_likelihoods: &Bound<'py, PyAny>, rejection_samples: f64, ellipsoid_update_gap: f64,
        enlargement_factor: f64, tol: Option<f64>, max_iter: Option<usize>, seed: Option<u64>,
        verbose: bool,
    ) -> PyResult<NestedEllipsoid> {
        let points = extract_f64_matrix(points)?;
        let log_likelihoods = extract_f64_array(py, log_likelihoods)?.as_array().to_owned();
        let active = ActiveSet::new(points, log_likelihoods)?;
        let opts = build_sampler_options(
            rejection_samples,
            ellipsoid_update_gap,
            enlargement_factor,
            tol,
            max_iter,
            seed,
            verbose,
        )?;
        let prior = PyPrior::new(prior.clone().unbind(), active.dim());
        let inner = NestedEllipsoidSampler::new(prior, active, opts)?;
        Ok(NestedEllipsoid { inner })
    }

    /// Draw the next candidate parameter vector.
    pub fn propose<'py>(&mut self, py: Python<'py>) -> PyResult<Bound<'py, PyArray1<f64>>> {
        Ok(self.inner.propose()?.into_pyarray(py))
    }

    /// Report the log-likelihood of the oldest outstanding proposal.
    pub fn report(&mut self, log_likelihood: f64) -> PyResult<bool> {
        Ok(self.inner.report(log_likelihood)?.is_some())
    }

    pub fn n_hyper_parameters(&self) -> usize {
        self.inner.n_hyper_parameters()
    }

    /// Set `[rejection_samples, ellipsoid_update_gap, enlargement_factor]`.
    pub fn set_hyper_parameters(&mut self, x: Vec<f64>) -> PyResult<()> {
        Ok(self.inner.set_hyper_parameters(&x)?)
    }

    #[getter]
    pub fn rejection_samples(&self) -> usize {
        self.inner.rejection_samples()
    }

    #[getter]
    pub fn ellipsoid_update_gap(&self) -> usize {
        self.inner.ellipsoid_update_gap()
    }

    #[getter]
    pub fn enlargement_factor(&self) -> f64 {
        self.inner.enlargement_factor()
    }

    #[getter]
    pub fn iteration(&self) -> usize {
        self.inner.iteration()
    }

    #[getter]
    pub fn name(&self) -> &'static str {
        self.inner.name()
    }

    #[getter]
    pub fn phase(&self) -> String {
        self.inner.phase().to_string()
    }

    #[getter]
    pub fn n_refits(&self) -> usize {
        self.inner.n_refits()
    }

    #[getter]
    pub fn active_points<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray2<f64>> {
        self.inner.active_set().parameters().to_owned().into_pyarray(py)
    }

    #[getter]
    pub fn active_log_likelihoods<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f64>> {
        self.inner.active_set().log_likelihoods().to_owned().into_pyarray(py)
    }

    /// `(theta, log_likelihood)` of the point removed by the last accepted
    /// report, or `None`.
    #[getter]
    pub fn last_discarded(&self) -> Option<(Vec<f64>, f64)> {
        self.inner.last_discarded().map(|p| (p.theta().to_vec(), p.log_likelihood()))
    }
}

/// _rust_nested — PyO3 module initializer for the Python extension.
///
/// Purpose
/// -------
/// Define the `_rust_nested` Python module and register the `nested`
/// submodule used by the public `rust_nested` package.
///
/// Key behaviors
/// -------------
/// - Create the `nested` submodule and attach it to `_rust_nested`.
/// - Register the submodule in `sys.modules` so it is importable via a
///   dotted path from Python.
///
/// Errors
/// ------
/// - `PyErr`
///   If creating the submodule or manipulating `sys.modules` fails.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _rust_nested<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    let nested_mod = PyModule::new(_py, "nested")?;
    nested_samplers(_py, m, &nested_mod)?;

    // Manually add the submodule into sys.modules to allow for dot notation.
    _py.import("sys")?.getattr("modules")?.set_item("rust_nested.nested", nested_mod)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn nested_samplers<'py>(
    _py: Python, rust_nested: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>,
) -> PyResult<()> {
    m.add_class::<NestedEllipsoid>()?;
    rust_nested.add_submodule(m)?;
    Ok(())
}
