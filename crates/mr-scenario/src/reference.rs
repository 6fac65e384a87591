//! Piecewise-linear power reference.

use serde::{Deserialize, Serialize};

use crate::validate::ValidationError;

/// One `(time, power)` breakpoint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Breakpoint {
    pub time_s: f64,
    pub power: f64,
}

/// Linear interpolation between breakpoints, held flat outside their range.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceProfile {
    breakpoints: Vec<Breakpoint>,
}

impl ReferenceProfile {
    /// Breakpoint times must be finite and non-decreasing.
    pub fn new(breakpoints: Vec<Breakpoint>) -> Result<Self, ValidationError> {
        if breakpoints.is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "reference.breakpoints".to_string(),
                value: "[]".to_string(),
                reason: "at least one breakpoint is required".to_string(),
            });
        }
        for bp in &breakpoints {
            if !bp.time_s.is_finite() || !bp.power.is_finite() {
                return Err(ValidationError::InvalidValue {
                    field: "reference.breakpoints".to_string(),
                    value: format!("({}, {})", bp.time_s, bp.power),
                    reason: "breakpoints must be finite".to_string(),
                });
            }
        }
        if breakpoints.windows(2).any(|w| w[1].time_s < w[0].time_s) {
            return Err(ValidationError::InvalidValue {
                field: "reference.breakpoints".to_string(),
                value: "unsorted".to_string(),
                reason: "breakpoint times must be non-decreasing".to_string(),
            });
        }
        Ok(Self { breakpoints })
    }

    pub fn breakpoints(&self) -> &[Breakpoint] {
        &self.breakpoints
    }

    pub fn value_at(&self, t: f64) -> f64 {
        let bps = &self.breakpoints;
        // First breakpoint strictly after t
        let j = bps.partition_point(|bp| bp.time_s <= t);
        if j == 0 {
            return bps[0].power;
        }
        if j == bps.len() {
            return bps[bps.len() - 1].power;
        }
        let (a, b) = (bps[j - 1], bps[j]);
        a.power + (b.power - a.power) * (t - a.time_s) / (b.time_s - a.time_s)
    }

    /// One reference value per time point.
    pub fn sample(&self, times: &[f64]) -> Vec<f64> {
        times.iter().map(|&t| self.value_at(t)).collect()
    }
}
