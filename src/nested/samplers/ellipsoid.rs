//! Ellipsoidal nested sampler — prior warm-up, then enlarged-MVEE proposals.
//!
//! Purpose
//! -------
//! Drive the active population of a nested-sampling run through the
//! propose/report protocol. For the first `rejection_samples` iterations
//! candidates come from the prior; afterwards they are drawn uniformly from
//! the minimum-volume enclosing ellipsoid of the active points, inflated by
//! `enlargement_factor` and refitted every `ellipsoid_update_gap`
//! iterations.
//!
//! Key behaviors
//! -------------
//! - [`Phase`] is derived from the iteration index on demand and never
//!   stored: `Rejection` for `i < rejection_samples`, `Ellipsoid` otherwise.
//! - Refit schedule for proposal index `i` with `r = rejection_samples`:
//!   * `r > 0` and `i + 1 == r`: first fit, on the last prior iteration, so
//!     that iteration `r` already has an ellipsoid to draw from;
//!   * `i ≥ r` and `(i + 1 − r) % ellipsoid_update_gap == 0`: periodic refit;
//!   * `i ≥ r` with no ellipsoid cached yet: lazy fit (covers `r == 0` and
//!     hyperparameter changes that move the run into the ellipsoid phase).
//! - `report(ℓ)` replaces the worst active point when `ℓ` is strictly above
//!   the current minimum and discards the candidate otherwise.
//!
//! Invariants & assumptions
//! ------------------------
//! - The active set has constant size and dimension for the whole run; prior
//!   draws are checked against that dimension.
//! - A failed `propose()` (degenerate geometry, prior failure) issues no
//!   proposal and does not advance the iteration index.
//! - Hyperparameters only change through validated setters; a failing
//!   setter changes nothing.
//!
//! Conventions
//! -----------
//! - `iteration()` counts completed propose/report pairs. Proposals carry
//!   their own index at issue time (see [`ProposalQueue`]), so a window of
//!   several outstanding proposals sees the same phase and refit timing as
//!   strict alternation.
//! - Randomness comes from the sampler's owned [`SamplerRng`]; a seeded run
//!   with a deterministic prior replays exactly.
//!
//! Downstream usage
//! ----------------
//! - Drivers call `propose()`, evaluate the likelihood, and call
//!   `report(ℓ)`. On acceptance `last_discarded()` holds the point that left
//!   the active set, which evidence accumulation consumes.
//!
//! Testing notes
//! -------------
//! - Unit tests pin the refit schedule for `r = 5, gap = 2`, the lazy fit
//!   for `r = 0`, containment of ellipsoid draws, atomic hyperparameter
//!   updates, protocol misuse, and degenerate-geometry propagation.
use crate::{
    geometry::{
        ellipsoid::Ellipsoid,
        mvee::{MveeOptions, minimum_volume_ellipsoid},
    },
    nested::{
        core::{
            active_set::{ActivePoint, ActiveSet},
            options::{HyperParams, N_HYPER_PARAMETERS, SamplerOptions, SamplerRng, build_rng},
            protocol::ProposalQueue,
            validation::{validate_dimension, validate_rejection_samples},
        },
        errors::{NestedError, NestedResult},
        observer::SamplerObserver,
        samplers::{draw_prior_point, settle_report},
        traits::{NestedSampler, PriorSampler},
    },
};
use ndarray::Array1;

/// Proposal phase at a given iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Candidates are independent prior draws.
    Rejection,
    /// Candidates are drawn from the enlarged bounding ellipsoid.
    Ellipsoid,
}

impl Phase {
    /// Phase of iteration `iteration` given `rejection_samples`.
    pub fn at(iteration: usize, rejection_samples: usize) -> Phase {
        if iteration < rejection_samples { Phase::Rejection } else { Phase::Ellipsoid }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Rejection => write!(f, "rejection"),
            Phase::Ellipsoid => write!(f, "ellipsoid"),
        }
    }
}

/// NestedEllipsoidSampler — propose/report controller with ellipsoidal
/// proposals.
///
/// Fields
/// ------
/// - `prior`: caller-supplied [`PriorSampler`].
/// - `active`: the live [`ActiveSet`], mutated only by accepted reports.
/// - `hyper`: validated [`HyperParams`].
/// - `mvee`: [`MveeOptions`] used at every refit.
/// - `rng`: owned [`SamplerRng`].
/// - `queue`: outstanding proposals and iteration counters.
/// - `ellipsoid`: most recent fit, replaced wholesale at each refit.
/// - `n_refits` / `last_refit_iteration`: refit bookkeeping.
/// - `last_discarded`: point removed by the latest accepted report.
/// - `observer`: optional logging sink.
#[derive(Debug, Clone)]
pub struct NestedEllipsoidSampler<P: PriorSampler> {
    prior: P,
    active: ActiveSet,
    hyper: HyperParams,
    mvee: MveeOptions,
    rng: SamplerRng,
    queue: ProposalQueue,
    ellipsoid: Option<Ellipsoid>,
    n_refits: usize,
    last_refit_iteration: Option<usize>,
    last_discarded: Option<ActivePoint>,
    observer: SamplerObserver,
}

impl<P: PriorSampler> NestedEllipsoidSampler<P> {
    /// Name reported through [`NestedSampler::name`].
    pub const NAME: &'static str = "Nested Ellipsoidal Rejection Sampler";

    /// new — build a sampler around an initial active set.
    ///
    /// Parameters
    /// ----------
    /// - `prior`: `P`
    ///   Prior whose dimension must equal `active.dim()`.
    /// - `active`: [`ActiveSet`]
    ///   Initial population, typically from [`ActiveSet::from_prior`].
    /// - `opts`: [`SamplerOptions`]
    ///   Hyperparameters, MVEE controls, seed and verbosity.
    ///
    /// Returns
    /// -------
    /// `NestedResult<NestedEllipsoidSampler<P>>`
    ///   A sampler at iteration 0 with no ellipsoid fitted.
    ///
    /// Errors
    /// ------
    /// - `DimensionMismatch` when the prior and the active set disagree on `d`.
    pub fn new(prior: P, active: ActiveSet, opts: SamplerOptions) -> NestedResult<Self> {
        validate_dimension(active.dim(), prior.n_parameters())?;
        Ok(Self {
            prior,
            active,
            hyper: opts.hyper,
            mvee: opts.mvee,
            rng: build_rng(opts.seed),
            queue: ProposalQueue::new(),
            ellipsoid: None,
            n_refits: 0,
            last_refit_iteration: None,
            last_discarded: None,
            observer: SamplerObserver::new(opts.verbose),
        })
    }

    // ---- Hyperparameters ----

    pub fn hyper_parameters(&self) -> &HyperParams {
        &self.hyper
    }

    pub fn rejection_samples(&self) -> usize {
        self.hyper.rejection_samples()
    }

    pub fn ellipsoid_update_gap(&self) -> usize {
        self.hyper.ellipsoid_update_gap()
    }

    pub fn enlargement_factor(&self) -> f64 {
        self.hyper.enlargement_factor()
    }

    /// Set the number of warm-up prior iterations.
    ///
    /// Takes the vector form so that negative or non-finite input can be
    /// reported; fractional values are truncated.
    pub fn set_rejection_samples(&mut self, rejection_samples: f64) -> NestedResult<()> {
        let value = validate_rejection_samples(rejection_samples)?;
        self.hyper.set_rejection_samples(value);
        Ok(())
    }

    pub fn set_ellipsoid_update_gap(&mut self, ellipsoid_update_gap: usize) -> NestedResult<()> {
        self.hyper.set_ellipsoid_update_gap(ellipsoid_update_gap)
    }

    pub fn set_enlargement_factor(&mut self, enlargement_factor: f64) -> NestedResult<()> {
        self.hyper.set_enlargement_factor(enlargement_factor)
    }

    // ---- Introspection ----

    /// Phase the next proposal will be drawn in.
    pub fn phase(&self) -> Phase {
        Phase::at(self.queue.next_iteration(), self.hyper.rejection_samples())
    }

    /// Most recently fitted ellipsoid (unenlarged), if any.
    pub fn ellipsoid(&self) -> Option<&Ellipsoid> {
        self.ellipsoid.as_ref()
    }

    pub fn n_refits(&self) -> usize {
        self.n_refits
    }

    /// Proposal index at which the latest refit happened.
    pub fn last_refit_iteration(&self) -> Option<usize> {
        self.last_refit_iteration
    }

    /// Point removed from the active set by the latest accepted report.
    pub fn last_discarded(&self) -> Option<&ActivePoint> {
        self.last_discarded.as_ref()
    }

    /// Proposals issued but not yet reported.
    pub fn n_pending(&self) -> usize {
        self.queue.n_pending()
    }

    pub fn prior(&self) -> &P {
        &self.prior
    }

    pub fn mvee_options(&self) -> &MveeOptions {
        &self.mvee
    }

    // ---- Helper Methods ----

    /// Scheduled refit at proposal index `i` (excluding the lazy fit).
    fn refit_due(&self, i: usize) -> bool {
        let r = self.hyper.rejection_samples();
        // Only the warm-up boundary; `(i + 1) % r == 0` would also refit at 2r − 1, 3r − 1, ...
        if r > 0 && i + 1 == r {
            return true;
        }
        i >= r && (i + 1 - r) % self.hyper.ellipsoid_update_gap() == 0
    }

    /// Fit the MVEE of the current active points and cache it.
    ///
    /// On error the previous ellipsoid and counters are kept.
    fn refit(&mut self, i: usize) -> NestedResult<()> {
        let outcome = minimum_volume_ellipsoid(self.active.parameters(), &self.mvee)?;
        self.observer.refit(i, self.active.len(), outcome.iterations, outcome.final_err);
        self.ellipsoid = Some(outcome.ellipsoid);
        self.n_refits += 1;
        self.last_refit_iteration = Some(i);
        Ok(())
    }

    fn draw_from_ellipsoid(&mut self) -> NestedResult<Array1<f64>> {
        let ellipsoid = self.ellipsoid.as_ref().ok_or(NestedError::ProtocolViolation {
            reason: "ellipsoid proposal requested before any ellipsoid was fitted.",
        })?;
        let draws = ellipsoid.sample_enlarged(self.hyper.enlargement_factor(), 1, &mut self.rng)?;
        Ok(draws.row(0).to_owned())
    }
}

impl<P: PriorSampler> NestedSampler for NestedEllipsoidSampler<P> {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    /// Draw the next candidate.
    ///
    /// # Errors
    /// - `Geometry(DegenerateGeometry | NotConverged | ..)` when a scheduled
    ///   refit fails; nothing is issued in that case.
    /// - Prior failures and shape errors from prior draws.
    fn propose(&mut self) -> NestedResult<Array1<f64>> {
        let i = self.queue.next_iteration();
        let r = self.hyper.rejection_samples();
        let phase = Phase::at(i, r);
        if i > 0 {
            let previous = Phase::at(i - 1, r);
            if previous != phase {
                self.observer.phase_switch(i, previous, phase);
            }
        }

        let theta = match phase {
            Phase::Rejection => {
                if self.refit_due(i) {
                    self.refit(i)?;
                }
                draw_prior_point(&self.prior, self.active.dim(), &mut self.rng)?
            }
            Phase::Ellipsoid => {
                if self.ellipsoid.is_none() || self.refit_due(i) {
                    self.refit(i)?;
                }
                self.draw_from_ellipsoid()?
            }
        };
        self.queue.issue(theta.clone());
        Ok(theta)
    }

    /// Settle the oldest outstanding proposal.
    ///
    /// # Errors
    /// - `ProtocolViolation` with nothing outstanding.
    /// - `InvalidLogLikelihood` for NaN or `+∞`; the proposal stays pending.
    fn report(&mut self, log_likelihood: f64) -> NestedResult<Option<&ActiveSet>> {
        let settled = settle_report(&mut self.queue, &mut self.active, log_likelihood)?;
        let accepted = settled.removed.is_some();
        self.observer.decision(settled.iteration, log_likelihood, settled.threshold, accepted);
        if let Some(removed) = settled.removed {
            self.last_discarded = Some(removed);
            Ok(Some(&self.active))
        } else {
            Ok(None)
        }
    }

    fn n_hyper_parameters(&self) -> usize {
        N_HYPER_PARAMETERS
    }

    /// Set `[rejection_samples, ellipsoid_update_gap, enlargement_factor]`.
    ///
    /// All three are validated before any is assigned.
    fn set_hyper_parameters(&mut self, x: &[f64]) -> NestedResult<()> {
        self.hyper = HyperParams::from_slice(x)?;
        Ok(())
    }

    fn active_set(&self) -> &ActiveSet {
        &self.active
    }

    fn iteration(&self) -> usize {
        self.queue.completed()
    }
}
