//! Public interfaces of the nested-sampling layer.
//!
//! - [`PriorSampler`]: caller-supplied source of independent prior draws.
//! - [`LogLikelihood`]: caller-supplied log-likelihood; evaluated by the
//!   driver, never by the samplers themselves.
//! - [`NestedSampler`]: the propose/report capability shared by the
//!   ellipsoidal and rejection-only samplers.
//!
//! Convention: parameter vectors are `Array1<f64>` of a fixed dimension `d`;
//! batches of parameters are `n × d` `Array2<f64>` with one draw per row.
use crate::nested::{
    core::{active_set::ActiveSet, options::SamplerRng},
    errors::NestedResult,
};
use ndarray::{Array1, Array2, ArrayView1};

/// Source of independent prior draws.
///
/// Required:
/// - `n_parameters()`: dimension `d` of every draw.
/// - `sample(n, rng)`: `n × d` matrix of independent draws. Implementations
///   should use `rng` for all randomness so that seeded runs replay exactly;
///   priors backed by an external RNG (e.g. Python) may ignore it.
pub trait PriorSampler {
    fn n_parameters(&self) -> usize;
    fn sample(&self, n: usize, rng: &mut SamplerRng) -> NestedResult<Array2<f64>>;
}

/// Log-likelihood evaluator `θ ↦ ℓ(θ)`.
///
/// The samplers only ever see the resulting scalar through
/// [`NestedSampler::report`]; this trait exists for drivers and for seeding
/// an initial [`ActiveSet`].
pub trait LogLikelihood {
    fn n_parameters(&self) -> usize;
    fn evaluate(&self, theta: ArrayView1<f64>) -> NestedResult<f64>;
}

/// Propose/report capability of a nested sampler.
///
/// Protocol:
/// 1. `propose()` returns a candidate θ (and records it as outstanding).
/// 2. The driver evaluates ℓ(θ) and calls `report(ℓ)`.
/// 3. `report` returns `Some(&ActiveSet)` when the candidate replaced the
///    worst active point and `None` when it was discarded; in the latter
///    case the driver simply proposes again.
///
/// Several proposals may be outstanding at once as long as reports arrive
/// in proposal order. Every propose/report pair advances the iteration
/// counter regardless of acceptance.
pub trait NestedSampler {
    /// Human-readable algorithm name.
    fn name(&self) -> &'static str;

    /// Draw the next candidate parameter vector.
    fn propose(&mut self) -> NestedResult<Array1<f64>>;

    /// Report the log-likelihood of the oldest outstanding proposal.
    fn report(&mut self, log_likelihood: f64) -> NestedResult<Option<&ActiveSet>>;

    /// Number of tunable hyperparameters.
    fn n_hyper_parameters(&self) -> usize;

    /// Set all hyperparameters from an ordered vector; atomic on failure.
    fn set_hyper_parameters(&mut self, x: &[f64]) -> NestedResult<()>;

    /// Current active set (read-only).
    fn active_set(&self) -> &ActiveSet;

    /// Number of completed propose/report pairs.
    fn iteration(&self) -> usize;
}
