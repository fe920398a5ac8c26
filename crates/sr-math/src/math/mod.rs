//! Core math modules.

pub mod gamma;
pub mod poisson;
pub mod quantile;
pub mod stable;

use thiserror::Error;

/// Invalid-parameter conditions raised by the numerical engine.
///
/// Every variant is a caller defect, never a transient condition; there
/// is no retry path. The offending value is carried so callers can
/// report it verbatim.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum MathError {
    #[error("invalid shape parameter {0}: must be finite and > 0")]
    InvalidShape(f64),

    #[error("invalid rate parameter {0}: must be finite and > 0")]
    InvalidRate(f64),

    #[error("invalid probability {0}: must lie strictly inside (0, 1)")]
    InvalidProbability(f64),

    #[error("invalid count {0}: must be finite and >= 0")]
    InvalidCount(f64),

    #[error("invalid exposure {0}: must be finite and > 0")]
    InvalidExposure(f64),

    #[error("invalid credible mass {0}: must lie strictly inside (0, 1)")]
    InvalidCredibleMass(f64),

    #[error("invalid scale factor {0}: must be finite and > 0")]
    InvalidScale(f64),
}
