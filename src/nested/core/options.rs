//! Nested-sampler options and RNG construction.
//!
//! Purpose
//! -------
//! Collect the configuration of an ellipsoidal nested sampler in one place:
//! the three tunable hyperparameters, the MVEE convergence controls used at
//! each refit, the RNG seed, and whether the observer should log.
//!
//! Key behaviors
//! -------------
//! - [`HyperParams`] holds `rejection_samples`, `ellipsoid_update_gap` and
//!   `enlargement_factor`, validated on construction and on every setter.
//!   The vector form `[rejection_samples, ellipsoid_update_gap,
//!   enlargement_factor]` is parsed atomically by [`HyperParams::from_slice`].
//! - [`SamplerOptions`] bundles hyperparameters, [`MveeOptions`], an optional
//!   seed and a `verbose` flag.
//! - [`build_rng`] turns an optional seed into the crate's RNG type.
//!
//! Invariants & assumptions
//! ------------------------
//! - `ellipsoid_update_gap > 1` and `enlargement_factor > 1` (finite) hold
//!   for every constructed [`HyperParams`]; `rejection_samples` is any
//!   non-negative integer.
//! - A failing setter leaves the previous values in place.
//!
//! Conventions
//! -----------
//! - Defaults follow the reference algorithm: 1000 rejection samples, a
//!   refit every 20 iterations, and an enlargement factor of 1.5.
//! - `seed = None` draws a fresh seed from the thread-local RNG; pass
//!   `Some(seed)` for reproducible runs.
//!
//! Testing notes
//! -------------
//! - Unit tests verify defaults, atomic vector parsing, setter rollback,
//!   and seed reproducibility.
use crate::{
    geometry::mvee::MveeOptions,
    nested::{
        core::validation::{
            validate_ellipsoid_update_gap, validate_enlargement_factor, validate_rejection_samples,
        },
        errors::{NestedError, NestedResult},
    },
};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

/// Random source owned by every sampler.
pub type SamplerRng = Xoshiro256PlusPlus;

/// Length of the hyperparameter vector of the ellipsoidal sampler.
pub const N_HYPER_PARAMETERS: usize = 3;

/// HyperParams — tunable controls of the ellipsoidal nested sampler.
///
/// Fields
/// ------
/// - `rejection_samples`: `usize`
///   Number of initial iterations that draw from the prior before
///   ellipsoidal sampling starts.
/// - `ellipsoid_update_gap`: `usize`
///   Iterations between ellipsoid refits once ellipsoidal sampling has
///   started. Always `> 1`.
/// - `enlargement_factor`: `f64`
///   Inflation applied to the fitted ellipsoid before drawing. Always `> 1`.
///
/// Notes
/// -----
/// - Fields are private so that the invariants above can only be changed
///   through the validated setters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HyperParams {
    rejection_samples: usize,
    ellipsoid_update_gap: usize,
    enlargement_factor: f64,
}

impl HyperParams {
    /// Construct validated hyperparameters.
    ///
    /// # Errors
    /// - `InvalidEllipsoidUpdateGap` if `ellipsoid_update_gap ≤ 1`.
    /// - `InvalidEnlargementFactor` if `enlargement_factor` is not finite
    ///   and `> 1`.
    pub fn new(
        rejection_samples: usize, ellipsoid_update_gap: usize, enlargement_factor: f64,
    ) -> NestedResult<Self> {
        let ellipsoid_update_gap = validate_ellipsoid_update_gap(ellipsoid_update_gap as f64)?;
        let enlargement_factor = validate_enlargement_factor(enlargement_factor)?;
        Ok(Self { rejection_samples, ellipsoid_update_gap, enlargement_factor })
    }

    /// from_slice — parse the ordered hyperparameter vector.
    ///
    /// Parameters
    /// ----------
    /// - `x`: `&[f64]`
    ///   `[rejection_samples, ellipsoid_update_gap, enlargement_factor]`.
    ///   The first two are truncated toward zero.
    ///
    /// Returns
    /// -------
    /// `NestedResult<HyperParams>`
    ///   Fully validated hyperparameters; nothing is returned unless every
    ///   component is valid.
    ///
    /// Errors
    /// ------
    /// - `HyperParameterCount` if `x.len() != 3`.
    /// - The first failing component's validation error otherwise.
    pub fn from_slice(x: &[f64]) -> NestedResult<Self> {
        if x.len() != N_HYPER_PARAMETERS {
            return Err(NestedError::HyperParameterCount {
                expected: N_HYPER_PARAMETERS,
                found: x.len(),
            });
        }
        let rejection_samples = validate_rejection_samples(x[0])?;
        let ellipsoid_update_gap = validate_ellipsoid_update_gap(x[1])?;
        let enlargement_factor = validate_enlargement_factor(x[2])?;
        Ok(Self { rejection_samples, ellipsoid_update_gap, enlargement_factor })
    }

    /// Ordered vector form, the inverse of [`HyperParams::from_slice`].
    pub fn to_vec(&self) -> Vec<f64> {
        vec![
            self.rejection_samples as f64,
            self.ellipsoid_update_gap as f64,
            self.enlargement_factor,
        ]
    }

    pub fn rejection_samples(&self) -> usize {
        self.rejection_samples
    }

    pub fn ellipsoid_update_gap(&self) -> usize {
        self.ellipsoid_update_gap
    }

    pub fn enlargement_factor(&self) -> f64 {
        self.enlargement_factor
    }

    /// Any non-negative count is valid.
    pub fn set_rejection_samples(&mut self, rejection_samples: usize) {
        self.rejection_samples = rejection_samples;
    }

    /// Set the refit gap; leaves the old value on error.
    pub fn set_ellipsoid_update_gap(&mut self, ellipsoid_update_gap: usize) -> NestedResult<()> {
        self.ellipsoid_update_gap = validate_ellipsoid_update_gap(ellipsoid_update_gap as f64)?;
        Ok(())
    }

    /// Set the enlargement factor; leaves the old value on error.
    pub fn set_enlargement_factor(&mut self, enlargement_factor: f64) -> NestedResult<()> {
        self.enlargement_factor = validate_enlargement_factor(enlargement_factor)?;
        Ok(())
    }
}

impl Default for HyperParams {
    fn default() -> Self {
        Self { rejection_samples: 1000, ellipsoid_update_gap: 20, enlargement_factor: 1.5 }
    }
}

/// SamplerOptions — full configuration of an ellipsoidal nested sampler.
///
/// Fields
/// ------
/// - `hyper`: [`HyperParams`] — initial hyperparameters.
/// - `mvee`: [`MveeOptions`] — tolerance and iteration cap for each refit.
/// - `seed`: `Option<u64>` — RNG seed; `None` seeds from the thread RNG.
/// - `verbose`: `bool` — if `true`, attaches a terminal logger (behind the
///   `obs_slog` feature) that reports phase switches and refits.
///
/// Default
/// -------
/// - `HyperParams::default()`, `MveeOptions::default()`, `seed = None`,
///   `verbose = false`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SamplerOptions {
    pub hyper: HyperParams,
    pub mvee: MveeOptions,
    pub seed: Option<u64>,
    pub verbose: bool,
}

impl SamplerOptions {
    /// Bundle already-validated components; performs no extra checks.
    pub fn new(hyper: HyperParams, mvee: MveeOptions, seed: Option<u64>, verbose: bool) -> Self {
        Self { hyper, mvee, seed, verbose }
    }
}

/// Build the sampler RNG from an optional seed.
pub fn build_rng(seed: Option<u64>) -> SamplerRng {
    match seed {
        Some(seed) => SamplerRng::seed_from_u64(seed),
        None => SamplerRng::from_rng(&mut rand::rng()),
    }
}
