//! Optional terminal logging for the nested samplers.
//!
//! With the `obs_slog` feature enabled and `verbose = true`, a non-blocking
//! terminal `slog` logger reports phase switches and ellipsoid refits at
//! info level and accept/reject decisions at debug level. Without the
//! feature, or with `verbose = false`, every hook is a no-op.
use crate::nested::samplers::ellipsoid::Phase;
#[cfg(feature = "obs_slog")]
use slog::{Drain, Logger, debug, info, o};

/// Event sink owned by a sampler.
#[derive(Clone, Default)]
pub struct SamplerObserver {
    #[cfg(feature = "obs_slog")]
    logger: Option<Logger>,
}

impl std::fmt::Debug for SamplerObserver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SamplerObserver").field("active", &self.is_active()).finish()
    }
}

impl SamplerObserver {
    /// Attach a terminal logger when `verbose` is set and logging is compiled in.
    #[cfg_attr(not(feature = "obs_slog"), allow(unused_variables))]
    pub fn new(verbose: bool) -> Self {
        #[cfg(feature = "obs_slog")]
        {
            let logger = verbose.then(term_noblock);
            Self { logger }
        }
        #[cfg(not(feature = "obs_slog"))]
        {
            Self {}
        }
    }

    /// Whether events are actually emitted.
    pub fn is_active(&self) -> bool {
        #[cfg(feature = "obs_slog")]
        {
            self.logger.is_some()
        }
        #[cfg(not(feature = "obs_slog"))]
        {
            false
        }
    }

    #[cfg_attr(not(feature = "obs_slog"), allow(unused_variables))]
    pub fn phase_switch(&self, iteration: usize, from: Phase, to: Phase) {
        #[cfg(feature = "obs_slog")]
        if let Some(logger) = &self.logger {
            info!(logger, "phase switch";
                "iteration" => iteration,
                "from" => from.to_string(),
                "to" => to.to_string());
        }
    }

    #[cfg_attr(not(feature = "obs_slog"), allow(unused_variables))]
    pub fn refit(&self, iteration: usize, n_points: usize, mvee_iterations: usize, err: f64) {
        #[cfg(feature = "obs_slog")]
        if let Some(logger) = &self.logger {
            info!(logger, "ellipsoid refit";
                "iteration" => iteration,
                "n_points" => n_points,
                "mvee_iterations" => mvee_iterations,
                "err" => err);
        }
    }

    #[cfg_attr(not(feature = "obs_slog"), allow(unused_variables))]
    pub fn decision(&self, iteration: usize, log_likelihood: f64, threshold: f64, accepted: bool) {
        #[cfg(feature = "obs_slog")]
        if let Some(logger) = &self.logger {
            debug!(logger, "report";
                "iteration" => iteration,
                "log_likelihood" => log_likelihood,
                "threshold" => threshold,
                "accepted" => accepted);
        }
    }
}

#[cfg(feature = "obs_slog")]
fn term_noblock() -> Logger {
    let decorator = slog_term::TermDecorator::new().build();
    let drain = slog_term::FullFormat::new(decorator).build().fuse();
    let drain = slog_async::Async::new(drain)
        .overflow_strategy(slog_async::OverflowStrategy::Drop)
        .build()
        .fuse();
    Logger::root(drain, o!())
}
