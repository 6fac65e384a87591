//! Lumped-parameter microreactor physics.
//!
//! Provides:
//! - Fixed physical constants shared by every configuration
//! - Control drum lookup table (feedback/actuator constants per drum count)
//! - Reactor configuration with derived xenon/iodine equilibrium
//! - 12-element reactor state vector
//! - Reactor DAE: point kinetics (six delayed groups), xenon/iodine
//!   poisoning and a three-node thermal network
//! - Documented initial states per drum count

pub mod config;
pub mod constants;
pub mod drums;
pub mod error;
pub mod initial;
pub mod model;
pub mod state;

pub use config::{Equilibrium, ReactorConfig};
pub use constants::{PHYSICS, PhysicsConstants};
pub use drums::{DrumParameters, SUPPORTED_DRUM_COUNTS, lookup_drum_parameters};
pub use error::{PhysicsError, PhysicsResult};
pub use initial::{initial_state, initial_temperatures};
pub use model::{Derivatives, FeedbackAnchors, ReactorModel};
pub use state::{ReactorState, STATE_LEN};
