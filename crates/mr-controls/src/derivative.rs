//! Discrete low-pass filtered derivative.

use serde::{Deserialize, Serialize};

use crate::error::{ControlError, ControlResult};

/// First-order filtered derivative of the control error.
///
/// `deriv = (err - err_prev + t_c * deriv_prev) / (elapsed + t_c)`
///
/// When `elapsed + t_c` is exactly zero the denominator falls back to `t_c`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FilteredDerivative {
    /// Filter time constant (seconds)
    pub t_c: f64,
}

impl FilteredDerivative {
    pub fn new(t_c: f64) -> ControlResult<Self> {
        if t_c <= 0.0 || !t_c.is_finite() {
            return Err(ControlError::InvalidArg {
                what: "t_c must be positive and finite",
            });
        }
        Ok(Self { t_c })
    }

    /// Filtered derivative for the current sample.
    pub fn filter(&self, err: f64, err_prev: f64, deriv_prev: f64, elapsed: f64) -> f64 {
        let sum = elapsed + self.t_c;
        let denom = if sum != 0.0 { sum } else { self.t_c };
        (err - err_prev + self.t_c * deriv_prev) / denom
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_error_decays_derivative() {
        let f = FilteredDerivative::new(0.5).unwrap();
        let mut deriv = 2.0;
        for _ in 0..50 {
            deriv = f.filter(1.0, 1.0, deriv, 0.1);
        }
        assert!(deriv.abs() < 1e-3);
    }

    #[test]
    fn step_in_error() {
        let f = FilteredDerivative::new(0.2).unwrap();
        // (1 - 0 + 0) / (0.1 + 0.2)
        let d = f.filter(1.0, 0.0, 0.0, 0.1);
        assert!((d - 1.0 / 0.3).abs() < 1e-12);
    }

    #[test]
    fn zero_step_uses_filter_constant() {
        let f = FilteredDerivative::new(0.2).unwrap();
        let d = f.filter(0.5, 0.0, 0.0, 0.0);
        assert!((d - 2.5).abs() < 1e-12);
    }

    #[test]
    fn degenerate_denominator_falls_back_to_time_constant() {
        let f = FilteredDerivative::new(0.5).unwrap();
        let d = f.filter(1.0, 0.0, 1.0, -0.5);
        // (1 + 0.5 * 1) / 0.5
        assert!((d - 3.0).abs() < 1e-12);
        assert!(d.is_finite());
    }

    #[test]
    fn invalid_time_constant() {
        assert!(FilteredDerivative::new(0.0).is_err());
        assert!(FilteredDerivative::new(-1.0).is_err());
        assert!(FilteredDerivative::new(f64::NAN).is_err());
    }
}
