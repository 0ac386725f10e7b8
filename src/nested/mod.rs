//! nested — propose/report nested samplers over an active population.
//!
//! Purpose
//! -------
//! Implement the sampling core of nested sampling: keep a fixed-size set of
//! active points, propose replacements for the worst one, and accept a
//! proposal when the driver reports a strictly higher log-likelihood. The
//! driver owns likelihood evaluation and evidence accumulation.
//!
//! Key behaviors
//! -------------
//! - [`NestedEllipsoidSampler`] draws from the prior for a warm-up phase and
//!   then from an enlarged minimum-volume ellipsoid around the active
//!   points, refitted on a fixed iteration schedule.
//! - [`NestedRejectionSampler`] draws from the prior only.
//! - [`ActiveSet`] stores the population and applies the replacement rule.
//! - [`PriorSampler`] and [`LogLikelihood`] are the caller-facing seams;
//!   [`UniformPrior`] is a ready-made box prior.
//!
//! Invariants & assumptions
//! ------------------------
//! - Population size and dimension are fixed for the lifetime of a sampler.
//! - Reports settle proposals in the order they were issued.
//! - Hyperparameter updates are validated and atomic.
//!
//! Conventions
//! -----------
//! - Parameter vectors are `Array1<f64>`; batches are `n × d` `Array2<f64>`.
//! - Errors are [`NestedError`]; geometry failures are wrapped as
//!   `NestedError::Geometry`.
//! - Logging is opt-in through the `obs_slog` feature and `verbose` option.
//!
//! Downstream usage
//! ----------------
//! - Typical loop: `let theta = s.propose()?; let ll = f(&theta);
//!   if let Some(active) = s.report(ll)? { .. }`.
//! - The Python bindings in the crate root wrap [`NestedEllipsoidSampler`]
//!   with a Python-side prior.
//!
//! Testing notes
//! -------------
//! - Unit tests live beside each submodule; `tests/integration_nested_pipeline.rs`
//!   drives a full run on a Gaussian likelihood.

pub mod core;
pub mod errors;
pub mod observer;
pub mod samplers;
pub mod traits;

// ---- Re-exports (primary surface) -----------------------------------------

pub use self::core::{
    active_set::{ActivePoint, ActiveSet},
    options::{HyperParams, SamplerOptions, SamplerRng, build_rng},
    prior::UniformPrior,
};
pub use self::errors::{NestedError, NestedResult};
pub use self::samplers::{
    ellipsoid::{NestedEllipsoidSampler, Phase},
    rejection::NestedRejectionSampler,
};
pub use self::traits::{LogLikelihood, NestedSampler, PriorSampler};

// ---- Optional convenience prelude for downstream crates ------------------

pub mod prelude {
    pub use super::core::{
        active_set::{ActivePoint, ActiveSet},
        options::{HyperParams, SamplerOptions},
        prior::UniformPrior,
    };
    pub use super::errors::{NestedError, NestedResult};
    pub use super::samplers::{
        ellipsoid::{NestedEllipsoidSampler, Phase},
        rejection::NestedRejectionSampler,
    };
    pub use super::traits::{LogLikelihood, NestedSampler, PriorSampler};
}
