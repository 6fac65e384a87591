//! Drum actuator constraint stack.
//!
//! A raw controller command is first clamped to the drum travel range, then
//! limited so it moves at most `max_rate * elapsed` away from the previous
//! applied command. Saturating first means a command that exceeds the rate
//! limit is only visible after hard clamping.

use serde::{Deserialize, Serialize};

use crate::error::{ControlError, ControlResult};

/// Position and rate limits of the drum actuator (degrees, degrees/second).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActuatorLimits {
    pub min_val: f64,
    pub max_val: f64,
    pub max_rate: f64,
}

impl ActuatorLimits {
    /// Create actuator limits.
    ///
    /// # Errors
    ///
    /// Returns error if `min_val >= max_val`, `max_rate` is negative, or any
    /// value is not finite.
    pub fn new(min_val: f64, max_val: f64, max_rate: f64) -> ControlResult<Self> {
        mr_core::ensure_finite(min_val, "min_val")?;
        mr_core::ensure_finite(max_val, "max_val")?;
        mr_core::ensure_finite(max_rate, "max_rate")?;
        if min_val >= max_val {
            return Err(ControlError::InvalidArg {
                what: "min_val must be less than max_val",
            });
        }
        if max_rate < 0.0 {
            return Err(ControlError::InvalidArg {
                what: "max_rate must be non-negative",
            });
        }
        Ok(Self {
            min_val,
            max_val,
            max_rate,
        })
    }

    pub fn contains(&self, command: f64) -> bool {
        command >= self.min_val && command <= self.max_val
    }

    /// Clamp to `[min_val, max_val]`.
    pub fn saturate(&self, command: f64) -> f64 {
        if command > self.max_val {
            self.max_val
        } else if command < self.min_val {
            self.min_val
        } else {
            command
        }
    }

    /// Limit the move away from `previous` to `max_rate * elapsed`.
    pub fn rate_limit(&self, command: f64, previous: f64, elapsed: f64) -> f64 {
        let step = self.max_rate * elapsed;
        if command > previous + step {
            previous + step
        } else if command < previous - step {
            previous - step
        } else {
            command
        }
    }

    /// Saturate, then rate limit, a raw command.
    ///
    /// A non-finite raw command holds the previous applied command.
    pub fn apply(&self, raw: f64, previous: f64, elapsed: f64) -> f64 {
        if !raw.is_finite() {
            return previous;
        }
        self.rate_limit(self.saturate(raw), previous, elapsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drum() -> ActuatorLimits {
        ActuatorLimits::new(0.0, 180.0, 0.5).unwrap()
    }

    #[test]
    fn saturation_clamps_to_travel() {
        let a = drum();
        assert_eq!(a.saturate(200.0), 180.0);
        assert_eq!(a.saturate(-5.0), 0.0);
        assert_eq!(a.saturate(90.0), 90.0);
    }

    #[test]
    fn rate_limit_caps_move() {
        let a = drum();
        assert!((a.rate_limit(100.0, 90.0, 0.1) - 90.05).abs() < 1e-12);
        assert!((a.rate_limit(80.0, 90.0, 0.1) - 89.95).abs() < 1e-12);
        assert_eq!(a.rate_limit(90.01, 90.0, 0.1), 90.01);
    }

    #[test]
    fn saturation_happens_before_rate_limit() {
        let a = ActuatorLimits::new(0.0, 180.0, 100.0).unwrap();
        // Raw 500 saturates to 180, then moves at most 10 from 175.
        assert_eq!(a.apply(500.0, 175.0, 0.1), 180.0);
        let slow = drum();
        assert!((slow.apply(500.0, 179.0, 0.1) - 179.05).abs() < 1e-12);
    }

    #[test]
    fn zero_elapsed_freezes_command() {
        let a = drum();
        assert_eq!(a.apply(0.0, 120.0, 0.0), 120.0);
    }

    #[test]
    fn non_finite_command_holds_previous() {
        let a = drum();
        assert_eq!(a.apply(f64::NAN, 42.0, 0.1), 42.0);
        assert_eq!(a.apply(f64::INFINITY, 42.0, 0.1), 42.0);
    }

    #[test]
    fn invalid_parameters() {
        assert!(ActuatorLimits::new(1.0, 1.0, 0.5).is_err());
        assert!(ActuatorLimits::new(2.0, 1.0, 0.5).is_err());
        assert!(ActuatorLimits::new(0.0, 1.0, -0.5).is_err());
        assert!(ActuatorLimits::new(0.0, f64::NAN, 0.5).is_err());
    }
}
