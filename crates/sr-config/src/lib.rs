//! Run-time configuration for saferate.
//!
//! Every run-time tunable (fault weights, credible mass, per-operator
//! slider values) lives in an explicit immutable [`AnalysisConfig`]
//! value threaded into reconciliation and estimation calls; nothing is
//! ambient process state. Semantic validation is fail-fast and happens
//! before any estimation pass.

pub mod analysis;
pub mod bounds;
pub mod exposure;
pub mod weights;

pub use analysis::AnalysisConfig;
pub use bounds::Bounded;
pub use exposure::{ExposureConfig, ExposureModel};
pub use weights::FaultWeights;

/// Allowed credible-mass range, in percent.
pub const CREDIBLE_MASS_PCT_MIN: f64 = 50.0;
pub const CREDIBLE_MASS_PCT_MAX: f64 = 99.9;
