//! Closed-loop transient simulation of the drum-controlled reactor.
//!
//! Provides:
//! - Uniform time grid
//! - Fixed-step explicit Euler integrator
//! - Simulation driver coupling the reactor model and one controller
//! - Parallel batch execution of independent runs

pub mod batch;
pub mod driver;
pub mod error;
pub mod grid;
pub mod integrator;

pub use batch::{SimCase, run_batch, run_case, run_case_with_progress};
pub use driver::{SimProgress, SimRecord, SimulationDriver};
pub use error::{SimError, SimResult};
pub use grid::TimeGrid;
pub use integrator::ForwardEuler;
