//! Shared vocabulary for saferate: operators, months, the injury
//! severity taxonomy, and the unified error type every crate reports
//! through.

pub mod error;
pub mod month;
pub mod operator;
pub mod severity;

pub use error::{Error, ErrorCategory, Result, StructuredError};
pub use month::Month;
pub use operator::Operator;
pub use severity::Severity;
