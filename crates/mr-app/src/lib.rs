//! Shared application service layer for the microreactor simulator.
//!
//! Centralizes scenario handling, cached run execution, performance
//! analysis and result querying for the command-line frontend.

pub mod error;
pub mod metrics;
pub mod progress;
pub mod query;
pub mod run_service;
pub mod scenario_service;

// Re-export key types for convenience
pub use error::{AppError, AppResult};
pub use metrics::{
    PerformanceIndices, RunAnalysis, analyze_records, compute_performance_indices,
    control_effort, drum_speed,
};
pub use progress::{RunProgressEvent, RunStage};
pub use query::{RunSummary, SeriesVariable, extract_series, get_run_summary, series_to_csv};
pub use run_service::{
    RunOptions, RunRequest, RunResponse, RunTimingSummary, SOLVER_VERSION, ensure_run,
    ensure_run_with_progress, list_runs, load_run, run_sweep,
};
pub use scenario_service::{ScenarioSummary, load_scenario, preset_matrix, validate_scenario};
