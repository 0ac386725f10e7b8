//! Propose/report samplers.
//!
//! - [`ellipsoid::NestedEllipsoidSampler`]: prior draws for a warm-up phase,
//!   then draws from an enlarged minimum-volume ellipsoid refitted on a
//!   fixed schedule.
//! - [`rejection::NestedRejectionSampler`]: prior draws only.
//!
//! Both share the helpers below for prior draws and for settling a report
//! against the active set.
pub mod ellipsoid;
pub mod rejection;

use crate::nested::{
    core::{
        active_set::{ActivePoint, ActiveSet},
        options::SamplerRng,
        protocol::ProposalQueue,
        validation::{validate_dimension, validate_log_likelihood},
    },
    errors::{NestedError, NestedResult},
    traits::PriorSampler,
};
use ndarray::Array1;

/// Draw a single prior point and check its shape against `dim`.
pub(crate) fn draw_prior_point<P>(
    prior: &P, dim: usize, rng: &mut SamplerRng,
) -> NestedResult<Array1<f64>>
where
    P: PriorSampler + ?Sized,
{
    let draws = prior.sample(1, rng)?;
    if draws.nrows() != 1 {
        return Err(NestedError::PriorSampleCount { expected: 1, found: draws.nrows() });
    }
    validate_dimension(dim, draws.ncols())?;
    if let Some((col, &value)) = draws.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(NestedError::NonFiniteParameter { row: 0, col, value });
    }
    Ok(draws.row(0).to_owned())
}

/// Outcome of settling one report.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Settled {
    pub iteration: usize,
    pub threshold: f64,
    pub removed: Option<ActivePoint>,
}

/// Resolve the oldest outstanding proposal with `log_likelihood`.
///
/// The log-likelihood is validated before the proposal is popped, so an
/// invalid report leaves the queue and the active set untouched.
pub(crate) fn settle_report(
    queue: &mut ProposalQueue, active: &mut ActiveSet, log_likelihood: f64,
) -> NestedResult<Settled> {
    let iteration = queue.front().map(|p| p.iteration).ok_or(NestedError::ProtocolViolation {
        reason: "report() called without an outstanding propose().",
    })?;
    validate_log_likelihood(iteration, log_likelihood)?;
    let threshold = active.min_log_likelihood();
    let proposal = queue.resolve()?;
    let removed = active.try_replace(proposal.theta.view(), log_likelihood)?;
    Ok(Settled { iteration, threshold, removed })
}
