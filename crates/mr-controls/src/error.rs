//! Error types for control system operations.

use thiserror::Error;

/// Result type for control system operations.
pub type ControlResult<T> = Result<T, ControlError>;

/// Errors that can occur when configuring a controller.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ControlError {
    /// Invalid argument provided to a control function.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// Unknown controller name.
    #[error("Unknown controller kind: {name}")]
    UnknownKind { name: String },
}

impl From<mr_core::CoreError> for ControlError {
    fn from(e: mr_core::CoreError) -> Self {
        match e {
            mr_core::CoreError::NonFinite { what, .. } => ControlError::InvalidArg { what },
            mr_core::CoreError::InvalidArg { what } => ControlError::InvalidArg { what },
        }
    }
}
