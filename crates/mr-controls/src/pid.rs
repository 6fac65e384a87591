//! PID controller with back-calculation anti-windup.

use serde::{Deserialize, Serialize};

use crate::actuator::ActuatorLimits;
use crate::derivative::FilteredDerivative;
use crate::error::{ControlError, ControlResult};
use crate::supertwisting::LoopHistory;

/// PID controller configuration.
///
/// The integral absorbs `kaw * (applied_prev - raw_prev) * T` each sample,
/// which bleeds off windup while the actuator is saturated or rate limited
/// and vanishes once the applied and raw commands agree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PIDController {
    /// Proportional gain.
    pub kp: f64,
    /// Integral gain (per second).
    pub ki: f64,
    /// Derivative gain (seconds).
    pub kd: f64,
    /// Anti-windup back-calculation gain.
    pub kaw: f64,
    pub derivative: FilteredDerivative,
    pub limits: ActuatorLimits,
}

impl PIDController {
    /// Create a new PID controller.
    ///
    /// # Arguments
    ///
    /// * `kp` - Proportional gain
    /// * `ki` - Integral gain
    /// * `kd` - Derivative gain
    /// * `kaw` - Anti-windup gain
    /// * `derivative` - Derivative filter
    /// * `limits` - Actuator limits
    pub fn new(
        kp: f64,
        ki: f64,
        kd: f64,
        kaw: f64,
        derivative: FilteredDerivative,
        limits: ActuatorLimits,
    ) -> ControlResult<Self> {
        if [kp, ki, kd, kaw].iter().any(|g| !g.is_finite()) {
            return Err(ControlError::InvalidArg {
                what: "PID gains must be finite",
            });
        }
        Ok(Self {
            kp,
            ki,
            kd,
            kaw,
            derivative,
            limits,
        })
    }

    /// State for a loop starting at drum angle `u0`. The integral is seeded
    /// with `u0` so a zero error holds the baseline.
    pub fn initial_state(&self, u0: f64) -> ControlResult<PIDControllerState> {
        if !self.limits.contains(u0) {
            return Err(ControlError::InvalidArg {
                what: "u0 must lie within [min_val, max_val]",
            });
        }
        Ok(PIDControllerState {
            history: LoopHistory::new(u0),
            integral: u0,
        })
    }

    /// Compute controller output at time `t`.
    ///
    /// Returns the updated state and the applied command.
    pub fn update(
        &self,
        state: &PIDControllerState,
        t: f64,
        measurement: f64,
        setpoint: f64,
    ) -> (PIDControllerState, f64) {
        let h = &state.history;
        let err = setpoint - measurement;
        let elapsed = t - h.t_prev;

        let integral = state.integral
            + self.ki * err * elapsed
            + self.kaw * (h.command_sat_prev - h.command_prev) * elapsed;

        let deriv = self
            .derivative
            .filter(err, h.err_prev, h.deriv_prev, elapsed);

        let raw = self.kp * err + integral + self.kd * deriv;
        let applied = self.limits.apply(raw, h.command_sat_prev, elapsed);

        let next = PIDControllerState {
            history: h.advance(t, err, deriv, raw, applied),
            integral,
        };
        (next, applied)
    }
}

/// PID controller state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PIDControllerState {
    pub history: LoopHistory,
    /// Integral accumulator.
    pub integral: f64,
}
