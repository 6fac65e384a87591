//! Scenario loading and validation.

use std::path::Path;

use mr_controls::ControllerKind;
use mr_physics::SUPPORTED_DRUM_COUNTS;
use mr_scenario::Scenario;

use crate::error::AppResult;

/// Summary of a scenario for listing.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioSummary {
    pub name: String,
    pub num_drums: u32,
    pub controller: ControllerKind,
    pub dt_s: f64,
    pub t_end_s: f64,
    pub steps: usize,
    pub uses_preset_reference: bool,
}

/// Load and validate a scenario file (YAML or JSON).
pub fn load_scenario(path: &Path) -> AppResult<Scenario> {
    Ok(mr_scenario::load(path)?)
}

/// Check that a scenario resolves into a runnable case.
pub fn validate_scenario(scenario: &Scenario) -> AppResult<ScenarioSummary> {
    let case = scenario.resolve()?;
    Ok(ScenarioSummary {
        name: scenario.name.clone(),
        num_drums: scenario.num_drums,
        controller: scenario.controller.kind(),
        dt_s: case.grid.dt(),
        t_end_s: case.grid.t_end(),
        steps: case.grid.n_steps(),
        uses_preset_reference: scenario.reference.is_none(),
    })
}

/// Every built-in drum layout paired with both controllers.
pub fn preset_matrix(dt_s: f64, t_end_s: f64) -> Vec<Scenario> {
    SUPPORTED_DRUM_COUNTS
        .iter()
        .rev()
        .flat_map(|&n| {
            ControllerKind::ALL
                .into_iter()
                .map(move |kind| Scenario::preset(n, kind).with_time(dt_s, t_end_s))
        })
        .collect()
}
