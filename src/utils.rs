//! Python conversion helpers used by the bindings in the crate root.
//!
//! Everything here is compiled only with the `python-bindings` feature:
//! array extraction from NumPy / pandas / sequences, option assembly from
//! keyword arguments, and [`PyPrior`], which adapts a Python object with a
//! `sample(n)` method to [`PriorSampler`].

#[cfg(feature = "python-bindings")]
use ndarray::Array2;

#[cfg(feature = "python-bindings")]
use pyo3::{
    exceptions::{PyTypeError, PyValueError},
    prelude::*,
    types::PyAny,
};

#[cfg(feature = "python-bindings")]
use crate::{
    geometry::mvee::MveeOptions,
    nested::{
        core::options::{HyperParams, SamplerOptions, SamplerRng},
        errors::{NestedError, NestedResult},
        traits::PriorSampler,
    },
};

#[cfg(feature = "python-bindings")]
use numpy::{
    IntoPyArray,    // Vec → PyArray
    PyArrayMethods, // .readonly()
    PyReadonlyArray1,
    PyReadonlyArray2,
};

#[cfg(feature = "python-bindings")]
#[inline]
pub fn extract_f64_array<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>,
) -> PyResult<PyReadonlyArray1<'py, f64>> {
    if let Ok(arr_ro) = raw_data.extract::<PyReadonlyArray1<f64>>() {
        if arr_ro.as_slice().is_ok() {
            return Ok(arr_ro);
        }
    }

    if let Ok(obj) = raw_data.call_method0("to_numpy") {
        if let Ok(series_ro) = obj.extract::<PyReadonlyArray1<f64>>() {
            if series_ro.as_slice().is_ok() {
                return Ok(series_ro);
            }
        }
    }

    let vec: Vec<f64> = raw_data.extract().map_err(|_| {
        PyTypeError::new_err("expected a 1-D numpy.ndarray, pandas.Series, or sequence of float64")
    })?;
    Ok(vec.into_pyarray(py).readonly())
}

/// Copy a 2-D array-like (ndarray, DataFrame, or sequence of rows) into an
/// owned `n × d` matrix.
#[cfg(feature = "python-bindings")]
pub fn extract_f64_matrix<'py>(raw_data: &Bound<'py, PyAny>) -> PyResult<Array2<f64>> {
    if let Ok(arr_ro) = raw_data.extract::<PyReadonlyArray2<f64>>() {
        return Ok(arr_ro.as_array().to_owned());
    }

    if let Ok(obj) = raw_data.call_method0("to_numpy") {
        if let Ok(frame_ro) = obj.extract::<PyReadonlyArray2<f64>>() {
            return Ok(frame_ro.as_array().to_owned());
        }
    }

    let rows: Vec<Vec<f64>> = raw_data.extract().map_err(|_| {
        PyTypeError::new_err(
            "expected a 2-D numpy.ndarray, pandas.DataFrame, or sequence of float64 rows",
        )
    })?;
    let n = rows.len();
    let d = rows.first().map_or(0, Vec::len);
    if rows.iter().any(|row| row.len() != d) {
        return Err(PyValueError::new_err("all rows must have the same length"));
    }
    Array2::from_shape_vec((n, d), rows.into_iter().flatten().collect())
        .map_err(|e| PyValueError::new_err(e.to_string()))
}

/// Assemble [`SamplerOptions`] from Python keyword arguments.
///
/// `rejection_samples` and `ellipsoid_update_gap` arrive as floats and are
/// truncated, matching `set_hyper_parameters`.
#[cfg(feature = "python-bindings")]
pub fn build_sampler_options(
    rejection_samples: f64, ellipsoid_update_gap: f64, enlargement_factor: f64,
    tol: Option<f64>, max_iter: Option<usize>, seed: Option<u64>, verbose: bool,
) -> PyResult<SamplerOptions> {
    let hyper =
        HyperParams::from_slice(&[rejection_samples, ellipsoid_update_gap, enlargement_factor])?;
    let defaults = MveeOptions::default();
    let mvee = MveeOptions::new(tol.unwrap_or(defaults.tol), max_iter.unwrap_or(defaults.max_iter))?;
    Ok(SamplerOptions::new(hyper, mvee, seed, verbose))
}

/// PyPrior — a Python object exposing `sample(n) -> (n, d) array`.
///
/// Draws come from the Python side, so the sampler's RNG is not used and
/// reproducibility depends on the Python prior's own seeding.
#[cfg(feature = "python-bindings")]
#[derive(Debug)]
pub struct PyPrior {
    obj: Py<PyAny>,
    dim: usize,
}

#[cfg(feature = "python-bindings")]
impl PyPrior {
    pub fn new(obj: Py<PyAny>, dim: usize) -> Self {
        Self { obj, dim }
    }
}

#[cfg(feature = "python-bindings")]
impl PriorSampler for PyPrior {
    fn n_parameters(&self) -> usize {
        self.dim
    }

    fn sample(&self, n: usize, _rng: &mut SamplerRng) -> NestedResult<Array2<f64>> {
        Python::with_gil(|py| {
            let external = |err: PyErr| NestedError::ExternalFailure { text: err.to_string() };
            let draws = self.obj.bind(py).call_method1("sample", (n,)).map_err(external)?;
            extract_f64_matrix(&draws).map_err(external)
        })
    }
}
