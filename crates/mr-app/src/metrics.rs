//! Tracking performance indices and actuator effort.
//!
//! Error indices are computed on series downsampled by
//! [`DOWNSAMPLE_FACTOR`], with integrals evaluated by the trapezoidal rule
//! over the retained time points. The error is `e = reference - power`.

use serde::{Deserialize, Serialize};

use mr_results::TimeseriesRecord;

use crate::error::{AppError, AppResult};

/// Keep every N-th sample when computing error indices.
pub const DOWNSAMPLE_FACTOR: usize = 10;

/// Half-width of the moving average used for smoothed drum speed.
pub const DRUM_SPEED_SMOOTHING_HALF_WINDOW: usize = 30;

/// Standard integral error indices for a tracking run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct PerformanceIndices {
    /// Mean absolute error
    pub mae: f64,
    /// Integral of |e|
    pub iae: f64,
    /// Integral of t*|e|
    pub itae: f64,
    /// Integral of e^2
    pub ise: f64,
    /// Integral of t*e^2
    pub itse: f64,
}

/// Indices plus actuator effort for one run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct RunAnalysis {
    pub indices: PerformanceIndices,
    /// Euclidean norm of the drum speed series
    pub control_effort: f64,
    pub final_power: f64,
    pub max_abs_error: f64,
}

fn trapezoid(t: &[f64], y: &[f64]) -> f64 {
    t.windows(2)
        .zip(y.windows(2))
        .map(|(tw, yw)| 0.5 * (tw[1] - tw[0]) * (yw[0] + yw[1]))
        .sum()
}

/// Compute the error indices from equal-length time, reference and output
/// series.
pub fn compute_performance_indices(
    time: &[f64],
    reference: &[f64],
    output: &[f64],
) -> AppResult<PerformanceIndices> {
    if time.len() != reference.len() || time.len() != output.len() {
        return Err(AppError::InvalidInput(format!(
            "series lengths differ: time {}, reference {}, output {}",
            time.len(),
            reference.len(),
            output.len()
        )));
    }
    if time.is_empty() {
        return Err(AppError::InvalidInput("empty series".to_string()));
    }

    let t: Vec<f64> = time.iter().step_by(DOWNSAMPLE_FACTOR).copied().collect();
    let e: Vec<f64> = reference
        .iter()
        .zip(output)
        .step_by(DOWNSAMPLE_FACTOR)
        .map(|(r, y)| r - y)
        .collect();

    let abs_e: Vec<f64> = e.iter().map(|v| v.abs()).collect();
    let sq_e: Vec<f64> = e.iter().map(|v| v * v).collect();
    let t_abs_e: Vec<f64> = t.iter().zip(&abs_e).map(|(t, v)| t * v).collect();
    let t_sq_e: Vec<f64> = t.iter().zip(&sq_e).map(|(t, v)| t * v).collect();

    Ok(PerformanceIndices {
        mae: abs_e.iter().sum::<f64>() / abs_e.len() as f64,
        iae: trapezoid(&t, &abs_e),
        itae: trapezoid(&t, &t_abs_e),
        ise: trapezoid(&t, &sq_e),
        itse: trapezoid(&t, &t_sq_e),
    })
}

/// Drum speed `du/dt` by backward difference, with the first sample zero.
pub fn drum_speed(command: &[f64], dt: f64) -> Vec<f64> {
    let mut du = Vec::with_capacity(command.len());
    if !command.is_empty() {
        du.push(0.0);
    }
    du.extend(command.windows(2).map(|w| (w[1] - w[0]) / dt));
    du
}

/// Euclidean norm of the drum speed series.
pub fn control_effort(command: &[f64], dt: f64) -> f64 {
    drum_speed(command, dt)
        .iter()
        .map(|v| v * v)
        .sum::<f64>()
        .sqrt()
}

/// Centered moving average of width `2 * half_window + 1`.
///
/// Samples closer than `half_window` to either end are left unchanged.
pub fn smooth(values: &[f64], half_window: usize) -> Vec<f64> {
    let mut out = values.to_vec();
    let width = (2 * half_window + 1) as f64;
    if values.len() > 2 * half_window {
        for (i, slot) in out
            .iter_mut()
            .enumerate()
            .take(values.len() - half_window)
            .skip(half_window)
        {
            *slot = values[i - half_window..=i + half_window].iter().sum::<f64>() / width;
        }
    }
    out
}

/// Analyze a stored run.
pub fn analyze_records(records: &[TimeseriesRecord]) -> AppResult<RunAnalysis> {
    let [first, second, ..] = records else {
        return Err(AppError::InvalidInput(
            "at least two records are needed for analysis".to_string(),
        ));
    };
    let dt = second.time_s - first.time_s;

    let time: Vec<f64> = records.iter().map(|r| r.time_s).collect();
    let reference: Vec<f64> = records.iter().map(|r| r.reference).collect();
    let power: Vec<f64> = records.iter().map(|r| r.state[0]).collect();
    let command: Vec<f64> = records.iter().map(|r| r.command).collect();

    let indices = compute_performance_indices(&time, &reference, &power)?;
    let max_abs_error = reference
        .iter()
        .zip(&power)
        .map(|(r, y)| (r - y).abs())
        .fold(0.0, f64::max);

    Ok(RunAnalysis {
        indices,
        control_effort: control_effort(&command, dt),
        final_power: power.last().copied().unwrap_or_default(),
        max_abs_error,
    })
}
