//! Error types for simulation operations.

use thiserror::Error;

/// Errors encountered while setting up or running a simulation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Length mismatch for {what}: expected {expected}, got {actual}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Reactor configuration error: {0}")]
    Physics(#[from] mr_physics::PhysicsError),

    #[error("Controller configuration error: {0}")]
    Control(#[from] mr_controls::ControlError),
}

pub type SimResult<T> = Result<T, SimError>;
