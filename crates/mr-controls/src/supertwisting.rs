//! Supertwisting (second-order sliding mode) controller.

use mr_core::sign;
use serde::{Deserialize, Serialize};

use crate::actuator::ActuatorLimits;
use crate::derivative::FilteredDerivative;
use crate::error::{ControlError, ControlResult};

/// Sample history shared by every controller variant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoopHistory {
    /// Error at the previous sample.
    pub err_prev: f64,
    /// Time of the previous sample.
    pub t_prev: f64,
    /// Filtered derivative at the previous sample.
    pub deriv_prev: f64,
    /// Last command after saturation and rate limiting.
    pub command_sat_prev: f64,
    /// Last raw (unconstrained) command.
    pub command_prev: f64,
}

impl LoopHistory {
    /// History before the first sample: zero error and derivative at `t = 0`,
    /// both commands at the baseline drum angle.
    pub fn new(u0: f64) -> Self {
        Self {
            err_prev: 0.0,
            t_prev: 0.0,
            deriv_prev: 0.0,
            command_sat_prev: u0,
            command_prev: u0,
        }
    }

    pub(crate) fn advance(&self, t: f64, err: f64, deriv: f64, raw: f64, applied: f64) -> Self {
        Self {
            err_prev: err,
            t_prev: t,
            deriv_prev: deriv,
            command_sat_prev: applied,
            command_prev: raw,
        }
    }
}

/// Supertwisting controller configuration.
///
/// Sliding variable `s = err + deriv_filt`. Each sample accumulates
/// `u_acc += w * sign(s) * T` and commands `lambda * sqrt(|s|) * sign(s) + u_acc`
/// before the actuator limits are applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupertwistingController {
    /// Gain on the continuous corrective term.
    pub lambda: f64,
    /// Switching (integral) gain.
    pub w: f64,
    pub derivative: FilteredDerivative,
    pub limits: ActuatorLimits,
}

impl SupertwistingController {
    pub fn new(
        lambda: f64,
        w: f64,
        derivative: FilteredDerivative,
        limits: ActuatorLimits,
    ) -> ControlResult<Self> {
        if !lambda.is_finite() || !w.is_finite() {
            return Err(ControlError::InvalidArg {
                what: "supertwisting gains must be finite",
            });
        }
        Ok(Self {
            lambda,
            w,
            derivative,
            limits,
        })
    }

    /// State for a loop starting at drum angle `u0`.
    pub fn initial_state(&self, u0: f64) -> ControlResult<SupertwistingState> {
        if !self.limits.contains(u0) {
            return Err(ControlError::InvalidArg {
                what: "u0 must lie within [min_val, max_val]",
            });
        }
        Ok(SupertwistingState {
            history: LoopHistory::new(u0),
            u_acc: u0,
        })
    }

    /// Compute the next drum command at time `t`.
    ///
    /// Returns the updated state and the applied command.
    pub fn update(
        &self,
        state: &SupertwistingState,
        t: f64,
        measurement: f64,
        setpoint: f64,
    ) -> (SupertwistingState, f64) {
        let h = &state.history;
        let err = setpoint - measurement;
        let elapsed = t - h.t_prev;
        let deriv = self
            .derivative
            .filter(err, h.err_prev, h.deriv_prev, elapsed);

        let s = err + deriv;
        let u_acc = state.u_acc + self.w * sign(s) * elapsed;
        let raw = self.lambda * s.abs().sqrt() * sign(s) + u_acc;
        let applied = self.limits.apply(raw, h.command_sat_prev, elapsed);

        let next = SupertwistingState {
            history: h.advance(t, err, deriv, raw, applied),
            u_acc,
        };
        (next, applied)
    }
}

/// Supertwisting controller state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupertwistingState {
    pub history: LoopHistory,
    /// Accumulated switching term, seeded with the baseline drum angle.
    pub u_acc: f64,
}
