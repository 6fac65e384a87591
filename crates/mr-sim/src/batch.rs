//! Independent runs executed in parallel.
//!
//! A single run is strictly sequential. Separate cases share nothing: each
//! builds its own model, controller and output buffers, so they can be fanned
//! out over a rayon pool.

use mr_controls::{Controller, ControllerConfig};
use mr_physics::{ReactorConfig, ReactorModel, ReactorState};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::driver::{SimProgress, SimRecord, SimulationDriver};
use crate::error::SimResult;
use crate::grid::TimeGrid;

/// Everything needed to reproduce one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimCase {
    pub label: String,
    pub reactor: ReactorConfig,
    pub controller: ControllerConfig,
    pub grid: TimeGrid,
    pub initial_state: ReactorState,
    pub reference: Vec<f64>,
}

/// Build fresh model and controller instances for `case` and run it.
pub fn run_case(case: &SimCase) -> SimResult<SimRecord> {
    run_case_with_progress(case, 0, None)
}

/// Like [`run_case`], reporting progress every `every` steps.
pub fn run_case_with_progress(
    case: &SimCase,
    every: usize,
    progress: Option<&mut dyn FnMut(SimProgress)>,
) -> SimResult<SimRecord> {
    let model = ReactorModel::new(case.reactor.clone())?;
    let controller = Controller::from_config(&case.controller)?;
    SimulationDriver::new(model, controller, case.grid)
        .with_progress_every(every)
        .run_with_progress(case.initial_state, &case.reference, progress)
}

/// Run every case concurrently. Results keep the order of `cases`.
pub fn run_batch(cases: &[SimCase]) -> Vec<SimResult<SimRecord>> {
    tracing::info!(cases = cases.len(), "batch started");
    let results: Vec<_> = cases
        .par_iter()
        .map(|case| {
            let result = run_case(case);
            if let Err(e) = &result {
                tracing::warn!(label = %case.label, error = %e, "case failed");
            }
            result
        })
        .collect();
    tracing::info!(cases = cases.len(), "batch finished");
    results
}
