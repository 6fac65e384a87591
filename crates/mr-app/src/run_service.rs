//! Run execution and caching service.

use std::time::Instant;

use mr_core::timing::Timer;
use mr_results::{RunFilter, RunManifest, RunStore, TimeseriesRecord, records_from_sim};
use mr_scenario::Scenario;
use mr_sim::{SimCase, SimRecord};
use rayon::prelude::*;

use crate::error::{AppError, AppResult};
use crate::metrics::{RunAnalysis, analyze_records};
use crate::progress::{RunProgressEvent, RunStage};

/// Version string mixed into run IDs; bumping it invalidates cached runs.
pub const SOLVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Options for running simulations.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub use_cache: bool,
    pub solver_version: String,
    /// Report simulation progress every N steps (0 disables).
    pub progress_every: usize,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            use_cache: true,
            solver_version: SOLVER_VERSION.to_string(),
            progress_every: 1000,
        }
    }
}

/// Request to execute a run.
pub struct RunRequest<'a> {
    pub scenario: &'a Scenario,
    /// Where to cache results; runs are not persisted when `None`.
    pub store: Option<&'a RunStore>,
    pub options: RunOptions,
}

/// Concise timing summary for a run.
#[derive(Debug, Clone, Default)]
pub struct RunTimingSummary {
    pub resolve_time_s: f64,
    pub simulate_time_s: f64,
    pub save_time_s: f64,
    pub load_cache_time_s: f64,
    pub total_time_s: f64,
}

/// Response from a run execution.
#[derive(Debug, Clone)]
pub struct RunResponse {
    pub run_id: String,
    pub manifest: RunManifest,
    pub records: Vec<TimeseriesRecord>,
    pub analysis: RunAnalysis,
    pub loaded_from_cache: bool,
    pub timing: RunTimingSummary,
}

fn emit_progress(
    progress_cb: &mut Option<&mut dyn FnMut(RunProgressEvent)>,
    stage: RunStage,
    started: Instant,
    message: &str,
) {
    if let Some(cb) = progress_cb.as_deref_mut() {
        cb(RunProgressEvent::stage(
            stage,
            started.elapsed().as_secs_f64(),
            Some(message.to_string()),
        ));
    }
}

/// Execute or load a run based on request.
pub fn ensure_run(request: &RunRequest) -> AppResult<RunResponse> {
    ensure_run_with_progress(request, None)
}

/// Execute or load a run and stream progress events.
pub fn ensure_run_with_progress(
    request: &RunRequest,
    mut progress_cb: Option<&mut dyn FnMut(RunProgressEvent)>,
) -> AppResult<RunResponse> {
    let started = Instant::now();
    let mut timing = RunTimingSummary::default();
    let scenario = request.scenario;

    emit_progress(
        &mut progress_cb,
        RunStage::ResolvingScenario,
        started,
        "Resolving scenario",
    );
    let resolve_started = Instant::now();
    let case = scenario.resolve()?;
    timing.resolve_time_s = resolve_started.elapsed().as_secs_f64();

    let run_id = mr_results::compute_run_id(scenario, &request.options.solver_version);

    if let Some(store) = request.store {
        emit_progress(
            &mut progress_cb,
            RunStage::CheckingCache,
            started,
            "Checking run cache",
        );
        if request.options.use_cache && store.has_run(&run_id) {
            emit_progress(
                &mut progress_cb,
                RunStage::LoadingCachedResult,
                started,
                "Loading cached run",
            );
            let load_started = Instant::now();
            let (manifest, records) = load_run(store, &run_id)?;
            timing.load_cache_time_s = load_started.elapsed().as_secs_f64();
            let analysis = analyze_records(&records)?;
            timing.total_time_s = started.elapsed().as_secs_f64();
            tracing::info!(run_id = %run_id, "loaded cached run");
            emit_progress(
                &mut progress_cb,
                RunStage::Completed,
                started,
                "Loaded cached run",
            );
            return Ok(RunResponse {
                run_id,
                manifest,
                records,
                analysis,
                loaded_from_cache: true,
                timing,
            });
        }
    }

    emit_progress(
        &mut progress_cb,
        RunStage::Simulating,
        started,
        "Running closed-loop simulation",
    );
    let sim_started = Instant::now();
    let sim = {
        let mut forward = |p: mr_sim::SimProgress| {
            if let Some(cb) = progress_cb.as_deref_mut() {
                cb(RunProgressEvent {
                    stage: RunStage::Simulating,
                    elapsed_wall_s: started.elapsed().as_secs_f64(),
                    message: None,
                    simulation: Some(p),
                });
            }
        };
        mr_sim::run_case_with_progress(&case, request.options.progress_every, Some(&mut forward))?
    };
    timing.simulate_time_s = sim_started.elapsed().as_secs_f64();

    let response = finish_run(
        scenario,
        &case,
        &sim,
        run_id,
        &request.options,
        request.store,
        &mut timing,
    )?;

    if request.store.is_some() {
        emit_progress(
            &mut progress_cb,
            RunStage::SavingResults,
            started,
            "Saved run output",
        );
    }
    timing.total_time_s = started.elapsed().as_secs_f64();
    emit_progress(&mut progress_cb, RunStage::Completed, started, "Run completed");

    Ok(RunResponse { timing, ..response })
}

fn build_manifest(
    scenario: &Scenario,
    case: &SimCase,
    run_id: &str,
    solver_version: &str,
) -> RunManifest {
    RunManifest {
        run_id: run_id.to_string(),
        scenario_name: scenario.name.clone(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        controller: scenario.controller.kind(),
        num_drums: scenario.num_drums,
        dt_s: case.grid.dt(),
        t_end_s: case.grid.t_end(),
        steps: case.grid.n_steps(),
        solver_version: solver_version.to_string(),
    }
}

fn finish_run(
    scenario: &Scenario,
    case: &SimCase,
    sim: &SimRecord,
    run_id: String,
    options: &RunOptions,
    store: Option<&RunStore>,
    timing: &mut RunTimingSummary,
) -> AppResult<RunResponse> {
    let manifest = build_manifest(scenario, case, &run_id, &options.solver_version);
    let records = records_from_sim(sim);
    let analysis = analyze_records(&records)?;

    if let Some(store) = store {
        let save_started = Instant::now();
        store.save_run(&manifest, &records)?;
        timing.save_time_s = save_started.elapsed().as_secs_f64();
        tracing::info!(run_id = %run_id, dir = %store.root_dir().display(), "run saved");
    }

    Ok(RunResponse {
        run_id,
        manifest,
        records,
        analysis,
        loaded_from_cache: false,
        timing: timing.clone(),
    })
}

/// Run several scenarios concurrently, ignoring the cache.
///
/// Results keep the order of `scenarios`; a scenario that fails to resolve
/// or simulate yields an error in its slot without affecting the others.
pub fn run_sweep(
    scenarios: &[Scenario],
    store: Option<&RunStore>,
    options: &RunOptions,
) -> Vec<AppResult<RunResponse>> {
    let timer = Timer::start("sweep");
    let resolved: Vec<AppResult<SimCase>> = scenarios
        .par_iter()
        .map(|s| s.resolve().map_err(Into::into))
        .collect();

    let cases: Vec<SimCase> = resolved
        .iter()
        .filter_map(|r| r.as_ref().ok().cloned())
        .collect();
    let mut sims = mr_sim::run_batch(&cases).into_iter();

    let responses = scenarios
        .iter()
        .zip(resolved)
        .map(|(scenario, case)| {
            let case = case?;
            let started = Instant::now();
            let sim = sims.next().ok_or_else(|| {
                AppError::Simulation("batch returned too few results".to_string())
            })??;
            let mut timing = RunTimingSummary::default();
            let run_id = mr_results::compute_run_id(scenario, &options.solver_version);
            let response = finish_run(scenario, &case, &sim, run_id, options, store, &mut timing)?;
            timing.total_time_s = started.elapsed().as_secs_f64();
            Ok(RunResponse { timing, ..response })
        })
        .collect();
    timer.stop_and_log();
    responses
}

/// List stored runs passing `filter`, most recent first.
pub fn list_runs(store: &RunStore, filter: &RunFilter) -> AppResult<Vec<RunManifest>> {
    let mut runs = store.list_runs_matching(filter)?;
    runs.reverse();
    Ok(runs)
}

/// Load a specific run.
pub fn load_run(
    store: &RunStore,
    run_id: &str,
) -> AppResult<(RunManifest, Vec<TimeseriesRecord>)> {
    let manifest = store.load_manifest(run_id)?;
    let records = store.load_timeseries(run_id)?;
    Ok((manifest, records))
}
