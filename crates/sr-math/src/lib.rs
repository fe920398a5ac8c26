//! saferate numerical engine.
//!
//! Everything needed to turn a small incident count and an exposure-mile
//! figure into a calibrated Bayesian credible interval: a log-gamma
//! function, the regularized incomplete gamma function, a gamma quantile
//! solver, and the Jeffreys-prior Poisson rate estimator on top.

pub mod math;

pub use math::gamma::*;
pub use math::poisson::*;
pub use math::quantile::*;
pub use math::stable::*;
pub use math::MathError;
