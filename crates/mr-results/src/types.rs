//! Result data types.

use mr_controls::ControllerKind;
use mr_physics::STATE_LEN;
use mr_sim::SimRecord;
use serde::{Deserialize, Serialize};

pub type RunId = String;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunManifest {
    pub run_id: RunId,
    pub scenario_name: String,
    pub timestamp: String,
    pub controller: ControllerKind,
    pub num_drums: u32,
    pub dt_s: f64,
    pub t_end_s: f64,
    pub steps: usize,
    pub solver_version: String,
}

/// One row of `timeseries.jsonl`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimeseriesRecord {
    pub time_s: f64,
    pub state: [f64; STATE_LEN],
    pub command: f64,
    pub reactivity: f64,
    pub reference: f64,
}

/// Flatten a simulation record into per-step rows.
pub fn records_from_sim(record: &SimRecord) -> Vec<TimeseriesRecord> {
    (0..record.len())
        .map(|i| TimeseriesRecord {
            time_s: record.time[i],
            state: *record.state[i].as_array(),
            command: record.command[i],
            reactivity: record.reactivity[i],
            reference: record.reference[i],
        })
        .collect()
}
