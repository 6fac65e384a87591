//! Query helpers for extracting data from loaded runs.

use std::fmt;
use std::str::FromStr;

use mr_core::{pcm_of, unitless};
use mr_physics::state::{COOLANT_TEMP, CR1, FUEL_TEMP, IODINE, MODERATOR_TEMP, N_R, XENON};
use mr_results::TimeseriesRecord;

use crate::error::{AppError, AppResult};
use crate::metrics::{DRUM_SPEED_SMOOTHING_HALF_WINDOW, drum_speed, smooth};

/// Summary of a run's time range and data.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub time_range: (f64, f64),
    pub record_count: usize,
    pub dt_s: Option<f64>,
    pub command_range: (f64, f64),
}

/// Get run summary from timeseries records.
pub fn get_run_summary(records: &[TimeseriesRecord]) -> AppResult<RunSummary> {
    let (Some(first), Some(last)) = (records.first(), records.last()) else {
        return Err(AppError::InvalidInput("No records in run".to_string()));
    };

    let dt_s = records.get(1).map(|r| r.time_s - first.time_s);
    let command_range = records.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |acc, r| {
        (acc.0.min(r.command), acc.1.max(r.command))
    });

    Ok(RunSummary {
        time_range: (first.time_s, last.time_s),
        record_count: records.len(),
        dt_s,
        command_range,
    })
}

/// Exportable per-step quantities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesVariable {
    Power,
    Reference,
    Command,
    ReactivityPcm,
    FuelTemp,
    ModeratorTemp,
    CoolantTemp,
    Xenon,
    Iodine,
    DrumSpeed,
    /// Drum speed after a centered moving average
    DrumSpeedSmoothed,
    /// Delayed-neutron precursor group, 1-based
    Precursor(u8),
}

impl SeriesVariable {
    pub fn all() -> Vec<SeriesVariable> {
        let mut vars = vec![
            SeriesVariable::Power,
            SeriesVariable::Reference,
            SeriesVariable::Command,
            SeriesVariable::ReactivityPcm,
            SeriesVariable::FuelTemp,
            SeriesVariable::ModeratorTemp,
            SeriesVariable::CoolantTemp,
            SeriesVariable::Xenon,
            SeriesVariable::Iodine,
            SeriesVariable::DrumSpeed,
            SeriesVariable::DrumSpeedSmoothed,
        ];
        vars.extend((1..=6).map(SeriesVariable::Precursor));
        vars
    }
}

impl fmt::Display for SeriesVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeriesVariable::Power => f.write_str("power"),
            SeriesVariable::Reference => f.write_str("reference"),
            SeriesVariable::Command => f.write_str("command"),
            SeriesVariable::ReactivityPcm => f.write_str("reactivity_pcm"),
            SeriesVariable::FuelTemp => f.write_str("fuel_temp"),
            SeriesVariable::ModeratorTemp => f.write_str("moderator_temp"),
            SeriesVariable::CoolantTemp => f.write_str("coolant_temp"),
            SeriesVariable::Xenon => f.write_str("xenon"),
            SeriesVariable::Iodine => f.write_str("iodine"),
            SeriesVariable::DrumSpeed => f.write_str("drum_speed"),
            SeriesVariable::DrumSpeedSmoothed => f.write_str("drum_speed_smoothed"),
            SeriesVariable::Precursor(g) => write!(f, "precursor{g}"),
        }
    }
}

impl FromStr for SeriesVariable {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SeriesVariable::all()
            .into_iter()
            .find(|v| v.to_string() == s)
            .ok_or_else(|| AppError::UnknownVariable(s.to_string()))
    }
}

fn state_column(records: &[TimeseriesRecord], index: usize) -> Vec<(f64, f64)> {
    records.iter().map(|r| (r.time_s, r.state[index])).collect()
}

fn drum_speed_series(
    records: &[TimeseriesRecord],
    half_window: usize,
) -> AppResult<Vec<(f64, f64)>> {
    let dt = get_run_summary(records)?.dt_s.ok_or_else(|| {
        AppError::InvalidInput("drum speed needs at least two records".to_string())
    })?;
    let command: Vec<f64> = records.iter().map(|r| r.command).collect();
    let du = smooth(&drum_speed(&command, dt), half_window);
    Ok(records.iter().map(|r| r.time_s).zip(du).collect())
}

/// Extract `(time_s, value)` pairs for one variable.
pub fn extract_series(
    records: &[TimeseriesRecord],
    variable: SeriesVariable,
) -> AppResult<Vec<(f64, f64)>> {
    let series = match variable {
        SeriesVariable::Power => state_column(records, N_R),
        SeriesVariable::Reference => records.iter().map(|r| (r.time_s, r.reference)).collect(),
        SeriesVariable::Command => records.iter().map(|r| (r.time_s, r.command)).collect(),
        SeriesVariable::ReactivityPcm => records
            .iter()
            .map(|r| (r.time_s, pcm_of(unitless(r.reactivity))))
            .collect(),
        SeriesVariable::FuelTemp => state_column(records, FUEL_TEMP),
        SeriesVariable::ModeratorTemp => state_column(records, MODERATOR_TEMP),
        SeriesVariable::CoolantTemp => state_column(records, COOLANT_TEMP),
        SeriesVariable::Xenon => state_column(records, XENON),
        SeriesVariable::Iodine => state_column(records, IODINE),
        SeriesVariable::DrumSpeed => drum_speed_series(records, 0)?,
        SeriesVariable::DrumSpeedSmoothed => {
            drum_speed_series(records, DRUM_SPEED_SMOOTHING_HALF_WINDOW)?
        }
        SeriesVariable::Precursor(g @ 1..=6) => state_column(records, CR1 + usize::from(g) - 1),
        SeriesVariable::Precursor(g) => {
            return Err(AppError::UnknownVariable(format!("precursor{g}")));
        }
    };
    Ok(series)
}

/// Render a series as `time_s,value` CSV.
pub fn series_to_csv(series: &[(f64, f64)]) -> String {
    let mut csv = String::from("time_s,value\n");
    for (t, val) in series {
        csv.push_str(&format!("{},{}\n", t, val));
    }
    csv
}
