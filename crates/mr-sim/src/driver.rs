//! Closed-loop simulation driver and result recording.
//!
//! Each step evaluates the reactor at the current command, advances the
//! state with explicit Euler, then asks the controller for the next command
//! from the advanced state. The controller therefore always reacts to a state
//! produced by the previous command (one-step actuation delay).

use mr_controls::Controller;
use mr_physics::{ReactorModel, ReactorState};
use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};
use crate::grid::TimeGrid;
use crate::integrator::ForwardEuler;

/// Progress snapshot emitted while a run is in flight.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimProgress {
    pub step: usize,
    pub n_steps: usize,
    pub sim_time_s: f64,
    pub power: f64,
    pub command: f64,
}

impl SimProgress {
    pub fn fraction_complete(&self) -> f64 {
        if self.n_steps == 0 {
            1.0
        } else {
            self.step as f64 / self.n_steps as f64
        }
    }
}

/// Output series of one run, all of length `N + 1`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimRecord {
    /// Time points (seconds)
    pub time: Vec<f64>,
    /// Full reactor state at each time point
    pub state: Vec<ReactorState>,
    /// Drum angle command (degrees)
    pub command: Vec<f64>,
    /// Total reactivity (dk/k)
    pub reactivity: Vec<f64>,
    /// Power reference
    pub reference: Vec<f64>,
}

impl SimRecord {
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Relative power series.
    pub fn power(&self) -> Vec<f64> {
        self.state.iter().map(ReactorState::power).collect()
    }

    pub fn final_state(&self) -> Option<&ReactorState> {
        self.state.last()
    }

    /// Grid spacing, if the record has at least two points.
    pub fn dt(&self) -> Option<f64> {
        match self.time.as_slice() {
            [t0, t1, ..] => Some(t1 - t0),
            _ => None,
        }
    }
}

/// Owns one reactor model, one controller and the time grid of a run.
pub struct SimulationDriver {
    model: ReactorModel,
    controller: Controller,
    grid: TimeGrid,
    integrator: ForwardEuler,
    /// Emit progress every N steps (0 disables).
    progress_every: usize,
}

impl SimulationDriver {
    pub fn new(model: ReactorModel, controller: Controller, grid: TimeGrid) -> Self {
        Self {
            model,
            controller,
            grid,
            integrator: ForwardEuler,
            progress_every: 0,
        }
    }

    pub fn with_progress_every(mut self, steps: usize) -> Self {
        self.progress_every = steps;
        self
    }

    pub fn grid(&self) -> &TimeGrid {
        &self.grid
    }

    /// Run the closed loop from `initial` against `reference` (one value per
    /// grid point).
    pub fn run(self, initial: ReactorState, reference: &[f64]) -> SimResult<SimRecord> {
        self.run_with_progress(initial, reference, None)
    }

    pub fn run_with_progress(
        mut self,
        initial: ReactorState,
        reference: &[f64],
        mut progress: Option<&mut dyn FnMut(SimProgress)>,
    ) -> SimResult<SimRecord> {
        let len = self.grid.len();
        if reference.len() != len {
            return Err(SimError::LengthMismatch {
                what: "reference",
                expected: len,
                actual: reference.len(),
            });
        }

        let n = self.grid.n_steps();
        let dt = self.grid.dt();
        let time = self.grid.times();

        let mut state = Vec::with_capacity(len);
        let mut command = vec![0.0; len];
        let mut reactivity = vec![0.0; len];

        state.push(initial);
        command[0] = self.controller.last_command();

        tracing::info!(
            controller = %self.controller.kind(),
            num_drums = self.model.config().num_drums,
            n_steps = n,
            dt,
            "closed-loop run started"
        );

        for i in 0..n {
            let d = self.model.derivatives(time[i], &state[i], command[i]);
            reactivity[i] = d.rho;

            let next = self.integrator.step(&state[i], &d.d_state, dt);
            command[i + 1] = self
                .controller
                .update(time[i], next.power(), reference[i + 1]);
            state.push(next);

            if self.progress_every > 0
                && (i + 1) % self.progress_every == 0
                && let Some(cb) = progress.as_mut()
            {
                cb(SimProgress {
                    step: i + 1,
                    n_steps: n,
                    sim_time_s: time[i + 1],
                    power: state[i + 1].power(),
                    command: command[i + 1],
                });
            }
        }

        // Final reactivity at the last grid point; neither the state nor the
        // controller advances.
        reactivity[n] = self.model.derivatives(time[n], &state[n], command[n]).rho;

        let last = &state[n];
        if !last.is_finite() {
            tracing::warn!(dt, "state diverged; reduce the time step");
        }
        tracing::info!(
            final_power = last.power(),
            final_command = command[n],
            "closed-loop run finished"
        );

        Ok(SimRecord {
            time,
            state,
            command,
            reactivity,
            reference: reference.to_vec(),
        })
    }
}
