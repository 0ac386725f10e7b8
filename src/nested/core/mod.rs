//! Shared building blocks of the nested samplers: the active population,
//! configuration, ready-made priors, propose/report bookkeeping, and input
//! validation.
pub mod active_set;
pub mod options;
pub mod prior;
pub mod protocol;
pub mod validation;
