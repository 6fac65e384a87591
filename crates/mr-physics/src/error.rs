//! Error types for reactor physics.

use thiserror::Error;

/// Errors raised while configuring the reactor model.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PhysicsError {
    /// No feedback coefficients exist for this drum count.
    #[error("Unsupported number of control drums: {num_drums} (expected 1, 2, 4 or 8)")]
    UnsupportedDrumCount { num_drums: u32 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("State vector must have {expected} elements, got {actual}")]
    StateLength { expected: usize, actual: usize },

    #[error("Non-finite value for {what}")]
    NonFinite { what: &'static str },
}

pub type PhysicsResult<T> = Result<T, PhysicsError>;

impl From<mr_core::CoreError> for PhysicsError {
    fn from(e: mr_core::CoreError) -> Self {
        match e {
            mr_core::CoreError::NonFinite { what, .. } => PhysicsError::NonFinite { what },
            mr_core::CoreError::InvalidArg { what } => PhysicsError::InvalidArg { what },
        }
    }
}
