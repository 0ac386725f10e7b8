//! Rejection-only nested sampler.
//!
//! Every candidate is an independent prior draw; acceptance follows the
//! same strict-improvement rule as the ellipsoidal sampler. It has no
//! hyperparameters and serves as a baseline for the ellipsoidal variant.
use crate::nested::{
    core::{
        active_set::{ActivePoint, ActiveSet},
        options::{SamplerRng, build_rng},
        protocol::ProposalQueue,
        validation::validate_dimension,
    },
    errors::{NestedError, NestedResult},
    observer::SamplerObserver,
    samplers::{draw_prior_point, settle_report},
    traits::{NestedSampler, PriorSampler},
};
use ndarray::Array1;

/// Prior-only propose/report sampler.
#[derive(Debug, Clone)]
pub struct NestedRejectionSampler<P: PriorSampler> {
    prior: P,
    active: ActiveSet,
    rng: SamplerRng,
    queue: ProposalQueue,
    last_discarded: Option<ActivePoint>,
    observer: SamplerObserver,
}

impl<P: PriorSampler> NestedRejectionSampler<P> {
    pub const NAME: &'static str = "Nested Rejection Sampler";

    /// Build a sampler around an initial active set.
    ///
    /// # Errors
    /// - `DimensionMismatch` when the prior and the active set disagree on `d`.
    pub fn new(
        prior: P, active: ActiveSet, seed: Option<u64>, verbose: bool,
    ) -> NestedResult<Self> {
        validate_dimension(active.dim(), prior.n_parameters())?;
        Ok(Self {
            prior,
            active,
            rng: build_rng(seed),
            queue: ProposalQueue::new(),
            last_discarded: None,
            observer: SamplerObserver::new(verbose),
        })
    }

    pub fn last_discarded(&self) -> Option<&ActivePoint> {
        self.last_discarded.as_ref()
    }

    pub fn n_pending(&self) -> usize {
        self.queue.n_pending()
    }

    pub fn prior(&self) -> &P {
        &self.prior
    }
}

impl<P: PriorSampler> NestedSampler for NestedRejectionSampler<P> {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn propose(&mut self) -> NestedResult<Array1<f64>> {
        let theta = draw_prior_point(&self.prior, self.active.dim(), &mut self.rng)?;
        self.queue.issue(theta.clone());
        Ok(theta)
    }

    fn report(&mut self, log_likelihood: f64) -> NestedResult<Option<&ActiveSet>> {
        let settled = settle_report(&mut self.queue, &mut self.active, log_likelihood)?;
        let accepted = settled.removed.is_some();
        self.observer.decision(settled.iteration, log_likelihood, settled.threshold, accepted);
        match settled.removed {
            Some(removed) => {
                self.last_discarded = Some(removed);
                Ok(Some(&self.active))
            }
            None => Ok(None),
        }
    }

    fn n_hyper_parameters(&self) -> usize {
        0
    }

    /// Accepts only the empty vector.
    fn set_hyper_parameters(&mut self, x: &[f64]) -> NestedResult<()> {
        if !x.is_empty() {
            return Err(NestedError::HyperParameterCount { expected: 0, found: x.len() });
        }
        Ok(())
    }

    fn active_set(&self) -> &ActiveSet {
        &self.active
    }

    fn iteration(&self) -> usize {
        self.queue.completed()
    }
}
