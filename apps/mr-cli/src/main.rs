use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use mr_app::{
    AppError, AppResult, RunOptions, RunProgressEvent, RunRequest, RunResponse, RunStage,
    SeriesVariable, query, run_service, scenario_service,
};
use mr_controls::ControllerKind;
use mr_results::{RunFilter, RunStore};
use mr_scenario::Scenario;

const DEFAULT_STORE: &str = ".microreactor/runs";

#[derive(Parser)]
#[command(name = "mr-cli")]
#[command(about = "Microreactor drum control simulator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a scenario file
    Validate {
        /// Path to the scenario YAML or JSON file
        scenario_path: PathBuf,
    },
    /// Run a scenario file
    Run {
        /// Path to the scenario YAML or JSON file
        scenario_path: PathBuf,
        /// Skip cache and force re-run
        #[arg(long)]
        no_cache: bool,
        /// Run store directory (defaults to .microreactor/runs next to the scenario)
        #[arg(long)]
        store: Option<PathBuf>,
    },
    /// Run a built-in load-following preset
    Preset {
        /// Number of control drums (1, 2, 4 or 8)
        #[arg(long)]
        drums: u32,
        /// Controller: stc or pid
        #[arg(long)]
        controller: ControllerKind,
        /// Time step in seconds
        #[arg(long, default_value_t = 0.1)]
        dt: f64,
        /// End time in seconds
        #[arg(long, default_value_t = 6000.0)]
        t_end: f64,
        /// Persist the run in this store
        #[arg(long)]
        store: Option<PathBuf>,
    },
    /// Run every preset drum layout with both controllers in parallel
    Sweep {
        /// Time step in seconds
        #[arg(long, default_value_t = 0.1)]
        dt: f64,
        /// End time in seconds
        #[arg(long, default_value_t = 6000.0)]
        t_end: f64,
        /// Persist the runs in this store
        #[arg(long)]
        store: Option<PathBuf>,
    },
    /// List cached runs
    Runs {
        #[arg(long, default_value = DEFAULT_STORE)]
        store: PathBuf,
        /// Only runs of this scenario name
        #[arg(long)]
        scenario: Option<String>,
        /// Only runs of this controller (stc or pid)
        #[arg(long)]
        controller: Option<ControllerKind>,
        /// Only runs with this many drums
        #[arg(long)]
        drums: Option<u32>,
    },
    /// Show details of a cached run
    ShowRun {
        /// Run ID to display
        run_id: String,
        #[arg(long, default_value = DEFAULT_STORE)]
        store: PathBuf,
    },
    /// Export time series data from a run
    ExportSeries {
        /// Run ID
        run_id: String,
        /// Variable name (e.g., power, command, fuel_temp, precursor3)
        variable: String,
        #[arg(long, default_value = DEFAULT_STORE)]
        store: PathBuf,
        /// Output CSV file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { scenario_path } => cmd_validate(&scenario_path),
        Commands::Run {
            scenario_path,
            no_cache,
            store,
        } => cmd_run(&scenario_path, !no_cache, store),
        Commands::Preset {
            drums,
            controller,
            dt,
            t_end,
            store,
        } => cmd_preset(drums, controller, dt, t_end, store),
        Commands::Sweep { dt, t_end, store } => cmd_sweep(dt, t_end, store),
        Commands::Runs {
            store,
            scenario,
            controller,
            drums,
        } => cmd_runs(
            &store,
            &RunFilter {
                scenario_name: scenario,
                controller,
                num_drums: drums,
            },
        ),
        Commands::ShowRun { run_id, store } => cmd_show_run(&store, &run_id),
        Commands::ExportSeries {
            run_id,
            variable,
            store,
            output,
        } => cmd_export_series(&store, &run_id, &variable, output.as_deref()),
    }
}

fn cmd_validate(scenario_path: &Path) -> AppResult<()> {
    println!("Validating scenario: {}", scenario_path.display());
    let scenario = scenario_service::load_scenario(scenario_path)?;
    let summary = scenario_service::validate_scenario(&scenario)?;
    println!("✓ Scenario is valid");
    println!(
        "  {} - {} drums, {} controller",
        summary.name, summary.num_drums, summary.controller
    );
    println!(
        "  dt = {:.3} s, t_end = {:.1} s ({} steps)",
        summary.dt_s, summary.t_end_s, summary.steps
    );
    if summary.uses_preset_reference {
        println!("  Reference: built-in load-following profile");
    }
    Ok(())
}

fn cmd_run(scenario_path: &Path, use_cache: bool, store: Option<PathBuf>) -> AppResult<()> {
    let scenario = scenario_service::load_scenario(scenario_path)?;
    let store = match store {
        Some(dir) => RunStore::new(dir)?,
        None => RunStore::for_scenario(scenario_path)?,
    };
    run_one(&scenario, Some(&store), use_cache)
}

fn cmd_preset(
    drums: u32,
    controller: ControllerKind,
    dt: f64,
    t_end: f64,
    store: Option<PathBuf>,
) -> AppResult<()> {
    let scenario = Scenario::preset(drums, controller).with_time(dt, t_end);
    let store = store.map(RunStore::new).transpose()?;
    run_one(&scenario, store.as_ref(), true)
}

fn run_one(scenario: &Scenario, store: Option<&RunStore>, use_cache: bool) -> AppResult<()> {
    println!("Running scenario: {}", scenario.name);
    println!(
        "  dt = {:.3} s, t_end = {:.1} s",
        scenario.time.dt_s, scenario.time.t_end_s
    );

    let request = RunRequest {
        scenario,
        store,
        options: RunOptions {
            use_cache,
            ..RunOptions::default()
        },
    };

    let mut last_emit = Instant::now();
    let mut last_fraction = -1.0f64;
    let response = run_service::ensure_run_with_progress(
        &request,
        Some(&mut |event: RunProgressEvent| {
            let fraction = event
                .simulation
                .as_ref()
                .map(|p| p.fraction_complete())
                .unwrap_or(-1.0);
            let emit_now = (fraction >= 0.0 && (fraction - last_fraction).abs() >= 0.005)
                || last_emit.elapsed().as_millis() >= 100;
            if emit_now {
                render_cli_progress(&event);
                if fraction >= 0.0 {
                    last_fraction = fraction;
                }
                last_emit = Instant::now();
            }
        }),
    )?;
    clear_progress_line();

    if response.loaded_from_cache {
        println!("✓ Loaded from cache: {}", response.run_id);
    } else {
        println!("✓ Simulation completed: {}", response.run_id);
    }
    print_analysis(&response);
    print_timing_summary(&response.timing);
    Ok(())
}

fn cmd_sweep(dt: f64, t_end: f64, store: Option<PathBuf>) -> AppResult<()> {
    let scenarios = scenario_service::preset_matrix(dt, t_end);
    let store = store.map(RunStore::new).transpose()?;
    println!("Running {} preset scenarios in parallel", scenarios.len());

    let started = Instant::now();
    let results = run_service::run_sweep(&scenarios, store.as_ref(), &RunOptions::default());

    println!(
        "\n{:<20} {:>8} {:>10} {:>10} {:>12} {:>10} {:>12} {:>10}",
        "scenario", "MAE", "IAE", "ITAE", "ISE", "ITSE", "effort", "final P"
    );
    let mut failures = 0;
    for (scenario, result) in scenarios.iter().zip(results) {
        match result {
            Ok(response) => {
                let a = response.analysis;
                println!(
                    "{:<20} {:>8.4} {:>10.4} {:>10.1} {:>12.4} {:>10.1} {:>12.3} {:>10.4}",
                    scenario.name,
                    a.indices.mae,
                    a.indices.iae,
                    a.indices.itae,
                    a.indices.ise,
                    a.indices.itse,
                    a.control_effort,
                    a.final_power
                );
            }
            Err(e) => {
                failures += 1;
                println!("{:<20} failed: {}", scenario.name, e);
            }
        }
    }
    println!("\nSweep finished in {:.2}s", started.elapsed().as_secs_f64());

    if failures > 0 {
        return Err(AppError::Simulation(format!(
            "{failures} sweep scenario(s) failed"
        )));
    }
    Ok(())
}

fn clear_progress_line() {
    print!("\r{}\r", " ".repeat(120));
    let _ = io::stdout().flush();
}

fn render_cli_progress(event: &RunProgressEvent) {
    match (event.stage, &event.simulation) {
        (RunStage::Simulating, Some(p)) => {
            let width = 28usize;
            let fraction = p.fraction_complete();
            let filled = ((fraction * width as f64).round() as usize).min(width);
            let bar = format!(
                "{}{}",
                "#".repeat(filled),
                "-".repeat(width.saturating_sub(filled))
            );
            print!(
                "\r[{}] {:>6.2}%  t={:.1}s  step={}/{}  P={:.4}  u={:.2}  elapsed={:.1}s",
                bar,
                fraction * 100.0,
                p.sim_time_s,
                p.step,
                p.n_steps,
                p.power,
                p.command,
                event.elapsed_wall_s
            );
            let _ = io::stdout().flush();
        }
        _ => {
            let spinner = ['|', '/', '-', '\\'];
            let spin_idx = ((event.elapsed_wall_s * 10.0) as usize) % spinner.len();
            let mut line = format!(
                "\r{} {}  elapsed={:.2}s",
                spinner[spin_idx],
                event.stage.label(),
                event.elapsed_wall_s
            );
            if let Some(msg) = &event.message {
                line.push_str(&format!("  {}", msg));
            }
            print!("{}", line);
            let _ = io::stdout().flush();
        }
    }
}

fn print_analysis(response: &RunResponse) {
    let idx = &response.analysis.indices;
    println!("\nPerformance indices:");
    println!("  Mean Absolute Error (MAE): {:.4}", idx.mae);
    println!("  Integral Absolute Error (IAE): {:.4}", idx.iae);
    println!("  Integral Time Absolute Error (ITAE): {:.4}", idx.itae);
    println!("  Integral Square Error (ISE): {:.4}", idx.ise);
    println!("  Integral Time Square Error (ITSE): {:.4}", idx.itse);
    println!("  Control Effort: {}", response.analysis.control_effort);
    println!("  Final power: {:.4}", response.analysis.final_power);
}

fn print_timing_summary(timing: &mr_app::RunTimingSummary) {
    let total = timing.total_time_s.max(1.0e-12);
    println!("\nTiming summary:");
    println!("  Resolve:  {:.3}s", timing.resolve_time_s);
    println!(
        "  Simulate: {:.3}s ({:.1}%)",
        timing.simulate_time_s,
        100.0 * timing.simulate_time_s / total
    );
    println!(
        "  Save:     {:.3}s ({:.1}%)",
        timing.save_time_s,
        100.0 * timing.save_time_s / total
    );
    if timing.load_cache_time_s > 0.0 {
        println!("  Cache load: {:.3}s", timing.load_cache_time_s);
    }
    println!("  Total:    {:.3}s", timing.total_time_s);
}

fn cmd_runs(store_dir: &Path, filter: &RunFilter) -> AppResult<()> {
    let store = RunStore::new(store_dir.to_path_buf())?;
    let runs = run_service::list_runs(&store, filter)?;

    if runs.is_empty() {
        println!("No cached runs in {}", store_dir.display());
    } else {
        println!("Cached runs in {}:", store_dir.display());
        for manifest in runs {
            println!(
                "  {} ({}) {} - {} drums, {}",
                manifest.run_id,
                manifest.timestamp,
                manifest.scenario_name,
                manifest.num_drums,
                manifest.controller
            );
        }
    }
    Ok(())
}

fn cmd_show_run(store_dir: &Path, run_id: &str) -> AppResult<()> {
    println!("Loading run: {}", run_id);

    let store = RunStore::new(store_dir.to_path_buf())?;
    let (manifest, records) = run_service::load_run(&store, run_id)?;
    let summary = query::get_run_summary(&records)?;
    let analysis = mr_app::analyze_records(&records)?;

    println!("\nRun Summary:");
    println!("  Scenario: {}", manifest.scenario_name);
    println!(
        "  Layout: {} drums, {} controller",
        manifest.num_drums, manifest.controller
    );
    println!("  Created: {}", manifest.timestamp);
    println!("  Time points: {}", summary.record_count);
    println!(
        "  Time range: {:.3} - {:.3} s",
        summary.time_range.0, summary.time_range.1
    );
    println!(
        "  Drum angle range: {:.3} - {:.3} deg",
        summary.command_range.0, summary.command_range.1
    );
    println!("  MAE: {:.4}  IAE: {:.4}", analysis.indices.mae, analysis.indices.iae);
    println!("  Control Effort: {}", analysis.control_effort);

    println!("\nVariables:");
    for v in SeriesVariable::all() {
        println!("  {}", v);
    }

    Ok(())
}

fn cmd_export_series(
    store_dir: &Path,
    run_id: &str,
    variable: &str,
    output: Option<&Path>,
) -> AppResult<()> {
    let store = RunStore::new(store_dir.to_path_buf())?;
    let (_manifest, records) = run_service::load_run(&store, run_id)?;

    let variable: SeriesVariable = variable.parse()?;
    let series = query::extract_series(&records, variable)?;
    let csv = query::series_to_csv(&series);

    if let Some(path) = output {
        std::fs::write(path, csv)?;
        println!(
            "✓ Exported {} data points to {}",
            series.len(),
            path.display()
        );
    } else {
        print!("{}", csv);
    }

    Ok(())
}
