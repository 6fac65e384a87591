//! Feedback controllers for drum-angle regulation.
//!
//! Two interchangeable single-loop laws drive the drum actuator:
//! - **Supertwisting**: second-order sliding mode with an integral switching term
//! - **PID**: back-calculation anti-windup and a filtered derivative
//!
//! Both share the same filtered-derivative primitive and the same actuator
//! constraint stack (saturation, then rate limiting). Controllers are
//! sampled: each `update` receives the current time and uses the elapsed time
//! since the previous call.
//!
//! Laws are immutable configuration; their running history lives in a
//! separate state struct. [`Controller`] pairs one law with one private state
//! for a single control loop.

pub mod actuator;
pub mod controller;
pub mod derivative;
pub mod error;
pub mod pid;
pub mod supertwisting;

pub use actuator::ActuatorLimits;
pub use controller::{Controller, ControllerConfig, ControllerKind};
pub use derivative::FilteredDerivative;
pub use error::{ControlError, ControlResult};
pub use pid::{PIDController, PIDControllerState};
pub use supertwisting::{LoopHistory, SupertwistingController, SupertwistingState};
