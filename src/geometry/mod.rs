//! geometry — bounding ellipsoids for nested sampling.
//!
//! Purpose
//! -------
//! Provide the numerical building blocks that the ellipsoidal nested
//! sampler needs: fitting a minimum-volume enclosing ellipsoid to a point
//! cloud and drawing points uniformly from an (enlarged) ellipsoid.
//!
//! Key behaviors
//! -------------
//! - [`minimum_volume_ellipsoid`] runs the Khachiyan multiplicative-weight
//!   iteration and returns an [`Ellipsoid`] in center form
//!   `(x − c)ᵀ A (x − c) ≤ 1` together with iteration diagnostics.
//! - [`draw_from_ellipsoid`] and [`Ellipsoid::sample_enlarged`] draw
//!   uniform points inside an ellipsoid, with enlargement applied as
//!   `(A / f)⁻¹` before eigendecomposition.
//! - [`GeometryError`] reports malformed inputs, non-convergence, and
//!   degenerate (singular / ill-conditioned) matrices.
//!
//! Invariants & assumptions
//! ------------------------
//! - Point clouds are `N × d` with rows as points.
//! - Every matrix inversion or eigendecomposition is conditioning-checked;
//!   a degenerate cloud is an error, never a silently NaN ellipsoid.
//!
//! Conventions
//! -----------
//! - Public inputs and outputs are `ndarray` containers; `nalgebra` is used
//!   internally for dense decompositions (see [`linalg`]).
//! - This module is pure with respect to I/O: no logging, no global state.
//!   Randomness is supplied by the caller's `Rng`.
//!
//! Downstream usage
//! ----------------
//! - `nested::samplers::ellipsoid` refits via [`minimum_volume_ellipsoid`]
//!   and proposes via [`Ellipsoid::sample_enlarged`].
//!
//! Testing notes
//! -------------
//! - Each submodule carries unit tests for its numerical contract; the
//!   integration test in `tests/` drives the full sampler on top of them.

pub mod ellipsoid;
pub mod errors;
pub mod linalg;
pub mod mvee;

// ---- Re-exports (primary surface) -----------------------------------------

pub use self::ellipsoid::{Ellipsoid, draw_from_ellipsoid};
pub use self::errors::{GeometryError, GeometryResult};
pub use self::mvee::{MveeOptions, MveeOutcome, minimum_volume_ellipsoid};

// ---- Optional convenience prelude for downstream crates ------------------

pub mod prelude {
    pub use super::ellipsoid::{Ellipsoid, draw_from_ellipsoid};
    pub use super::errors::{GeometryError, GeometryResult};
    pub use super::mvee::{MveeOptions, MveeOutcome, minimum_volume_ellipsoid};
}
